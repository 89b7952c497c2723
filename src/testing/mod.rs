//! Testing utilities and fixtures
//!
//! [`TestContext`] wires an [`OrderSession`] to in-memory collaborators so
//! unit and integration tests can drive the whole ordering flow without a
//! backend.

pub mod mocks;

use crate::abstractions::ItemProfile;
use crate::session::{AggregationOutcome, Collaborators, OrderSession, SessionEvent};
use mocks::{MockCatalog, MockDescriber, RecordingPoster, RecordingSink};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// The two-item menu most tests order from
pub fn sample_menu() -> Vec<ItemProfile> {
    vec![
        ItemProfile::new("bread", 60, 4).with_id("id-bread"),
        ItemProfile::new("soup", 90, 2).with_id("id-soup"),
    ]
}

/// Test context containing all necessary mocks
pub struct TestContext {
    pub catalog: MockCatalog,
    pub sink: RecordingSink,
    pub poster: RecordingPoster,
    pub describer: MockDescriber,
    pub lookup_timeout: Duration,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Context with the sample menu and one known user, `alice`
    pub fn new() -> Self {
        let catalog = sample_menu()
            .into_iter()
            .fold(MockCatalog::new(), MockCatalog::with_item)
            .with_user("alice", "user-alice");
        Self::with_catalog(catalog)
    }

    pub fn with_catalog(catalog: MockCatalog) -> Self {
        Self {
            catalog,
            sink: RecordingSink::new(),
            poster: RecordingPoster::new(),
            describer: MockDescriber::new(),
            lookup_timeout: Duration::from_millis(500),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            catalog: Arc::new(self.catalog.clone()),
            sink: Arc::new(self.sink.clone()),
            poster: Arc::new(self.poster.clone()),
            lookup_timeout: self.lookup_timeout,
        }
    }

    pub fn session(&self) -> OrderSession {
        OrderSession::new(self.collaborators())
    }
}

/// Wait for the next `Finalized` event, panicking after a few seconds
pub async fn next_finalized(events: &mut broadcast::Receiver<SessionEvent>) -> AggregationOutcome {
    let wait = async {
        loop {
            match events.recv().await {
                Ok(SessionEvent::Finalized { outcome, .. }) => return outcome,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("event channel closed"),
            }
        }
    };
    match tokio::time::timeout(Duration::from_secs(5), wait).await {
        Ok(outcome) => outcome,
        Err(_) => panic!("session did not finalize in time"),
    }
}
