//! Recording sinks and posters for testing

use super::catalog::lock;
use crate::abstractions::{MessagePoster, OrderSink, OrderSubmission, SummarySubmission};
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Order sink that records what it accepted
///
/// Clones share the same recording, so a test can keep one handle and give
/// another to the code under test.
#[derive(Clone, Default)]
pub struct RecordingSink {
    orders: Arc<Mutex<Vec<OrderSubmission>>>,
    summaries: Arc<Mutex<Vec<SummarySubmission>>>,
    attempts: Arc<Mutex<usize>>,
    failures_left: Arc<Mutex<usize>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `times` submissions with a soft delivery error
    pub fn failing_times(self, times: usize) -> Self {
        *lock(&self.failures_left) = times;
        self
    }

    pub fn failing(self) -> Self {
        self.failing_times(usize::MAX)
    }

    /// Submissions attempted, successful or not
    pub fn attempts(&self) -> usize {
        *lock(&self.attempts)
    }

    pub fn orders(&self) -> Vec<OrderSubmission> {
        lock(&self.orders).clone()
    }

    /// Wait until at least `count` orders are recorded, or five seconds pass
    ///
    /// Orders are recorded from a background task, so tests poll for them.
    pub async fn wait_for_orders(&self, count: usize) -> Vec<OrderSubmission> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let orders = self.orders();
            if orders.len() >= count || Instant::now() >= deadline {
                return orders;
            }
            sleep(Duration::from_millis(10)).await;
        }
    }

    pub fn summaries(&self) -> Vec<SummarySubmission> {
        lock(&self.summaries).clone()
    }

    fn attempt(&self) -> Result<()> {
        *lock(&self.attempts) += 1;
        let mut failures_left = lock(&self.failures_left);
        if *failures_left > 0 {
            *failures_left -= 1;
            return Err(OrderError::delivery("mock sink", "rejected"));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderSink for RecordingSink {
    async fn submit_order(&self, order: &OrderSubmission) -> Result<()> {
        self.attempt()?;
        lock(&self.orders).push(order.clone());
        Ok(())
    }

    async fn submit_summary(&self, summary: &SummarySubmission) -> Result<()> {
        self.attempt()?;
        lock(&self.summaries).push(summary.clone());
        Ok(())
    }
}

/// Poster that records `(channel, text)` pairs
#[derive(Clone, Default)]
pub struct RecordingPoster {
    messages: Arc<Mutex<Vec<(String, String)>>>,
    failing: bool,
}

impl RecordingPoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        lock(&self.messages).clone()
    }

    pub fn last_message(&self) -> Option<String> {
        lock(&self.messages).last().map(|(_, text)| text.clone())
    }
}

#[async_trait]
impl MessagePoster for RecordingPoster {
    async fn post(&self, channel: &str, text: &str) -> Result<()> {
        if self.failing {
            return Err(OrderError::delivery(channel, "mock poster offline"));
        }
        lock(&self.messages).push((channel.to_string(), text.to_string()));
        Ok(())
    }
}
