//! Group order sessions
//!
//! A session opens with a deadline, collects orders into a priority queue
//! and, when the deadline passes or it is closed by hand, aggregates the
//! queue into cumulative cook times and reports them.

pub mod aggregator;
pub mod deadline;
pub mod events;
pub mod manager;
pub mod queue;
pub mod state;

pub use aggregator::{render_report, AggregationOutcome, Summary, SummaryLine};
pub use events::SessionEvent;
pub use manager::{Collaborators, OrderSession};
pub use queue::{OrderEntry, OrderQueue};
pub use state::{SessionState, SessionStatus, StartReceipt};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new session ID
    pub fn new() -> Self {
        Self(format!("session-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
