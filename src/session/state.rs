//! Session state machine states

use super::SessionId;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifetime of the ordering window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No session has been started yet
    Idle,
    /// Accepting orders until the deadline
    Open { deadline: DateTime<Local> },
    /// Finalized; a new start is needed to accept orders
    Closed { closed_at: DateTime<Local> },
}

impl SessionState {
    pub fn is_open(&self) -> bool {
        matches!(self, SessionState::Open { .. })
    }

    pub fn deadline(&self) -> Option<DateTime<Local>> {
        match self {
            SessionState::Open { deadline } => Some(*deadline),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Open { .. } => "Open",
            SessionState::Closed { .. } => "Closed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Point-in-time view of the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub id: Option<SessionId>,
    pub state: SessionState,
    pub pending_orders: usize,
    pub pending_quantity: u64,
}

impl SessionStatus {
    pub fn describe(&self) -> String {
        match &self.state {
            SessionState::Idle => "No order session has been started.".to_string(),
            SessionState::Open { deadline } => format!(
                "Order session open until {}: {} order(s), {} item(s) pending.",
                deadline.format("%H:%M"),
                self.pending_orders,
                self.pending_quantity
            ),
            SessionState::Closed { closed_at } => format!(
                "Order session closed at {}. Start a new one with /start {{time}}.",
                closed_at.format("%H:%M")
            ),
        }
    }
}

/// Result of opening a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartReceipt {
    pub id: SessionId,
    pub deadline: DateTime<Local>,
    /// Pending orders thrown away from a session that was still open
    pub discarded: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_queries() {
        assert!(!SessionState::Idle.is_open());
        assert_eq!(SessionState::Idle.deadline(), None);

        let deadline = Local::now();
        let open = SessionState::Open { deadline };
        assert!(open.is_open());
        assert_eq!(open.deadline(), Some(deadline));
        assert_eq!(open.to_string(), "Open");

        let closed = SessionState::Closed {
            closed_at: deadline,
        };
        assert!(!closed.is_open());
        assert_eq!(closed.name(), "Closed");
    }

    #[test]
    fn test_status_description() {
        let status = SessionStatus {
            id: None,
            state: SessionState::Idle,
            pending_orders: 0,
            pending_quantity: 0,
        };
        assert_eq!(status.describe(), "No order session has been started.");

        let closed = SessionStatus {
            state: SessionState::Closed {
                closed_at: Local::now(),
            },
            ..status
        };
        assert!(closed.describe().ends_with("Start a new one with /start {time}."));
    }
}
