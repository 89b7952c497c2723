//! Session lifecycle events

use super::aggregator::AggregationOutcome;
use super::queue::OrderEntry;
use super::SessionId;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Events broadcast to session subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    Started {
        id: SessionId,
        deadline: DateTime<Local>,
    },
    /// An open session was replaced before its deadline
    Discarded { id: SessionId, pending: usize },
    OrderAccepted { id: SessionId, entry: OrderEntry },
    Finalized {
        id: SessionId,
        outcome: AggregationOutcome,
    },
}

impl SessionEvent {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            SessionEvent::Started { deadline, .. } => {
                format!("Session started, deadline {}", deadline.format("%H:%M"))
            }
            SessionEvent::Discarded { pending, .. } => {
                format!("Session replaced, {pending} pending order(s) discarded")
            }
            SessionEvent::OrderAccepted { entry, .. } => {
                format!("Order accepted: {} x{}", entry.item, entry.quantity)
            }
            SessionEvent::Finalized { outcome, .. } => match outcome {
                AggregationOutcome::Empty => "Session closed with no orders".to_string(),
                AggregationOutcome::Summarized(summary) => format!(
                    "Session closed: {} item(s), {}s total cook time",
                    summary.lines.len(),
                    summary.total_cook_secs()
                ),
            },
        }
    }

    pub fn session_id(&self) -> &SessionId {
        match self {
            SessionEvent::Started { id, .. }
            | SessionEvent::Discarded { id, .. }
            | SessionEvent::OrderAccepted { id, .. }
            | SessionEvent::Finalized { id, .. } => id,
        }
    }

    /// Check if this event ends a session
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionEvent::Finalized { .. } | SessionEvent::Discarded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_descriptions() {
        let id = SessionId::new();
        let event = SessionEvent::Discarded {
            id: id.clone(),
            pending: 3,
        };
        assert_eq!(
            event.description(),
            "Session replaced, 3 pending order(s) discarded"
        );
        assert!(event.is_terminal());
        assert_eq!(event.session_id(), &id);

        let event = SessionEvent::Finalized {
            id,
            outcome: AggregationOutcome::Empty,
        };
        assert_eq!(event.description(), "Session closed with no orders");
        assert!(event.is_terminal());
    }
}
