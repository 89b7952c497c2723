//! Bounded retry decorator for order sinks
//!
//! Wraps any [`OrderSink`] and retries soft failures with exponential
//! backoff. Hard errors (missing configuration and the like) are returned
//! immediately.

use super::delivery::{OrderSink, OrderSubmission, SummarySubmission};
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

pub struct RetryingSink<S> {
    inner: S,
    max_retries: u32,
    base_delay: Duration,
}

impl<S: OrderSink> RetryingSink<S> {
    pub fn new(inner: S, max_retries: u32, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Delay before retry number `attempt` (1-based), capped at 8x the base
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.pow(attempt.saturating_sub(1).min(3))
    }

    async fn deliver(&self, payload: Payload<'_>) -> Result<()> {
        let mut attempt = 0;
        loop {
            let result = match payload {
                Payload::Order(order) => self.inner.submit_order(order).await,
                Payload::Summary(summary) => self.inner.submit_summary(summary).await,
            };
            match result {
                Ok(()) => return Ok(()),
                Err(e) if e.is_soft() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.backoff(attempt);
                    warn!(
                        "{} failed ({}), retrying after {:?} (attempt {}/{})",
                        payload.description(),
                        e,
                        delay,
                        attempt,
                        self.max_retries
                    );
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Payload<'a> {
    Order(&'a OrderSubmission),
    Summary(&'a SummarySubmission),
}

impl Payload<'_> {
    fn description(&self) -> &'static str {
        match self {
            Payload::Order(_) => "order submission",
            Payload::Summary(_) => "summary submission",
        }
    }
}

#[async_trait]
impl<S: OrderSink> OrderSink for RetryingSink<S> {
    async fn submit_order(&self, order: &OrderSubmission) -> Result<()> {
        self.deliver(Payload::Order(order)).await
    }

    async fn submit_summary(&self, summary: &SummarySubmission) -> Result<()> {
        self.deliver(Payload::Summary(summary)).await
    }
}
