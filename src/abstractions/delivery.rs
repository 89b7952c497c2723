//! Outbound sinks: order/summary submission and chat message posting

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One accepted order, as recorded by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSubmission {
    #[serde(rename = "ordered item")]
    pub item_id: String,
    #[serde(rename = "owner")]
    pub owner_id: String,
    pub quantity: u32,
    #[serde(rename = "start time")]
    pub start_time: String,
}

/// One summary line, as recorded by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySubmission {
    #[serde(rename = "item ordered")]
    pub item_id: String,
    #[serde(rename = "seconds to cook")]
    pub cumulative_secs: u64,
    #[serde(rename = "summed quantity")]
    pub summed_quantity: u64,
}

/// Destination for orders and summaries
///
/// The core never depends on these calls succeeding; failures are logged
/// by the caller and the session carries on.
#[async_trait]
pub trait OrderSink: Send + Sync {
    async fn submit_order(&self, order: &OrderSubmission) -> Result<()>;

    async fn submit_summary(&self, summary: &SummarySubmission) -> Result<()>;
}

/// Posts text back to where a command came from
#[async_trait]
pub trait MessagePoster: Send + Sync {
    async fn post(&self, channel: &str, text: &str) -> Result<()>;
}

/// Poster that writes to stdout, used by the line-oriented front end
pub struct ConsolePoster;

#[async_trait]
impl MessagePoster for ConsolePoster {
    async fn post(&self, channel: &str, text: &str) -> Result<()> {
        println!("[{channel}] {text}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_wire_format() {
        let order = OrderSubmission {
            item_id: "item-1".to_string(),
            owner_id: "user-7".to_string(),
            quantity: 3,
            start_time: "Jun 4, 2024 01:15 pm".to_string(),
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["ordered item"], "item-1");
        assert_eq!(json["owner"], "user-7");
        assert_eq!(json["quantity"], 3);
        assert_eq!(json["start time"], "Jun 4, 2024 01:15 pm");
    }

    #[test]
    fn test_summary_wire_format() {
        let summary = SummarySubmission {
            item_id: "item-1".to_string(),
            cumulative_secs: 390,
            summed_quantity: 5,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["item ordered"], "item-1");
        assert_eq!(json["seconds to cook"], 390);
        assert_eq!(json["summed quantity"], 5);
    }
}
