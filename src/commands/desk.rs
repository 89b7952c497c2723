//! Order intake
//!
//! Validates an `/order` request against the session and the catalog before
//! queueing it, then records it with the order sink in the background.

use super::Origin;
use crate::abstractions::{within, Catalog, ItemProfile, OrderSink, OrderSubmission};
use crate::config::SessionSettings;
use crate::error::{OrderError, Result};
use crate::session::{OrderEntry, OrderSession};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct OrderDesk {
    session: OrderSession,
    catalog: Arc<dyn Catalog>,
    sink: Arc<dyn OrderSink>,
    settings: SessionSettings,
    lookup_timeout: Duration,
}

impl OrderDesk {
    pub fn new(
        session: OrderSession,
        catalog: Arc<dyn Catalog>,
        sink: Arc<dyn OrderSink>,
        settings: SessionSettings,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            session,
            catalog,
            sink,
            settings,
            lookup_timeout,
        }
    }

    /// Accept `quantity` of `item` on behalf of the origin's user
    ///
    /// Checks run in a fixed order: open session, quantity, owner, item.
    /// The first failing check decides the error and nothing is queued.
    pub async fn place_order(
        &self,
        origin: &Origin,
        item: &str,
        raw_quantity: &str,
    ) -> Result<OrderEntry> {
        if !self.session.is_open().await {
            return Err(OrderError::SessionNotOpen {
                state: self.session.status().await.state.name().to_string(),
            });
        }

        let quantity = parse_quantity(raw_quantity)?;
        let owner_id = self.resolve_owner(origin).await?;
        let profile = self.resolve_item(item).await?;
        let start_time = self.timestamp()?;

        let entry = self.session.submit(item, quantity, &profile).await?;

        let submission = OrderSubmission {
            item_id: profile.backend_id().to_string(),
            owner_id,
            quantity,
            start_time,
        };
        self.record(submission, item);

        Ok(entry)
    }

    /// Hand the order to the sink without waiting for it
    ///
    /// The sink may retry with backoff, so a slow backend never holds up the
    /// reply. Failures are only logged; the order stays queued either way.
    fn record(&self, submission: OrderSubmission, item: &str) {
        let sink = Arc::clone(&self.sink);
        let item = item.to_string();
        tokio::spawn(async move {
            if let Err(e) = sink.submit_order(&submission).await {
                warn!(
                    "Order for {} x{} was queued but not recorded: {}",
                    item, submission.quantity, e
                );
            }
        });
    }

    async fn resolve_owner(&self, origin: &Origin) -> Result<String> {
        let name = origin
            .user
            .as_deref()
            .or(self.settings.default_owner.as_deref())
            .ok_or_else(|| {
                OrderError::Usage(
                    "Cannot tell who is ordering. Set session.default_owner or prefix the line with '#channel user'."
                        .to_string(),
                )
            })?;

        match within("user lookup", self.lookup_timeout, self.catalog.lookup_user(name)).await {
            Ok(Some(id)) => Ok(id),
            Ok(None) => Err(OrderError::UserNotFound(name.to_string())),
            Err(e) => {
                warn!("User lookup for '{}' failed: {}", name, e);
                Err(OrderError::UserNotFound(name.to_string()))
            }
        }
    }

    async fn resolve_item(&self, item: &str) -> Result<ItemProfile> {
        match within("item lookup", self.lookup_timeout, self.catalog.lookup_item(item)).await {
            Ok(Some(profile)) => {
                debug!(
                    "Resolved '{}': capacity {}, {}s per batch",
                    item, profile.capacity_on_grill, profile.seconds_to_cook
                );
                Ok(profile)
            }
            Ok(None) => Err(OrderError::ItemNotFound(item.to_string())),
            Err(e) => {
                warn!("Item lookup for '{}' failed: {}", item, e);
                Err(OrderError::ItemNotFound(item.to_string()))
            }
        }
    }

    fn timestamp(&self) -> Result<String> {
        let offset = self.settings.timestamp_offset()?;
        Ok(Utc::now()
            .with_timezone(&offset)
            .format(&self.settings.timestamp_format)
            .to_string())
    }
}

/// Parse a strictly positive order quantity
pub fn parse_quantity(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(quantity) if quantity > 0 => Ok(quantity),
        _ => Err(OrderError::MalformedQuantity {
            raw: raw.to_string(),
        }),
    }
}
