//! Order session state machine
//!
//! One [`OrderSession`] owns the pending queue and the deadline timer. It is
//! cheap to clone; clones share the same session. All state changes happen
//! under a single lock, while catalog and sink calls made on close run after
//! the lock has been released.
//!
//! Because a close publishes outside the lock, a `/start` that arrives while
//! the previous session is still publishing opens the new session at once.
//! The old session's report can then be posted after the new session's
//! start reply. Orders are never mixed between the two: the old queue was
//! taken before the lock was released.

use super::aggregator::{self, AggregationOutcome};
use super::deadline;
use super::queue::{OrderEntry, OrderQueue};
use super::state::{SessionState, SessionStatus, StartReceipt};
use super::{SessionEvent, SessionId};
use crate::abstractions::{
    within, Catalog, ItemProfile, MenuSnapshot, MessagePoster, OrderSink, SummarySubmission,
};
use crate::error::{OrderError, Result};
use chrono::{DateTime, Local};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 64;

/// External services a session reports to
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<dyn Catalog>,
    pub sink: Arc<dyn OrderSink>,
    pub poster: Arc<dyn MessagePoster>,
    /// Budget for the menu fetch made on close
    pub lookup_timeout: Duration,
}

struct SessionData {
    id: Option<SessionId>,
    state: SessionState,
    queue: OrderQueue,
    channel: Option<String>,
    /// Bumped on every start so a superseded timer can recognise itself
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

struct Inner {
    data: Mutex<SessionData>,
    collaborators: Collaborators,
    events: broadcast::Sender<SessionEvent>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(timer) = self.data.get_mut().timer.take() {
            timer.abort();
        }
    }
}

/// What the closing path carries out of the lock
struct Closing {
    id: SessionId,
    channel: Option<String>,
    queue: OrderQueue,
}

#[derive(Clone)]
pub struct OrderSession {
    inner: Arc<Inner>,
}

impl OrderSession {
    pub fn new(collaborators: Collaborators) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                data: Mutex::new(SessionData {
                    id: None,
                    state: SessionState::Idle,
                    queue: OrderQueue::new(),
                    channel: None,
                    generation: 0,
                    timer: None,
                }),
                collaborators,
                events,
            }),
        }
    }

    /// Receive lifecycle events from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Open a new session closing at `deadline`
    ///
    /// Any session still open is replaced and its pending orders are
    /// discarded without being summarized. A deadline in the past closes
    /// the new session right away.
    pub async fn start(&self, deadline: DateTime<Local>, channel: impl Into<String>) -> StartReceipt {
        let delay = deadline::remaining(&deadline, &Local::now());
        let id = SessionId::new();

        let mut data = self.inner.data.lock().await;
        if let Some(timer) = data.timer.take() {
            timer.abort();
        }
        let replaced = match (&data.state, &data.id) {
            (SessionState::Open { .. }, Some(previous)) => Some((previous.clone(), data.queue.len())),
            _ => None,
        };
        data.queue.clear();
        data.generation += 1;
        let generation = data.generation;
        data.id = Some(id.clone());
        data.state = SessionState::Open { deadline };
        data.channel = Some(channel.into());
        data.timer = Some(self.spawn_timer(generation, delay));
        drop(data);

        let discarded = match replaced {
            Some((previous, pending)) => {
                info!(
                    "Replacing open session {}, discarding {} pending order(s)",
                    previous, pending
                );
                self.emit(SessionEvent::Discarded {
                    id: previous,
                    pending,
                });
                pending
            }
            None => 0,
        };

        info!("Session {} open until {} ({:?} left)", id, deadline, delay);
        self.emit(SessionEvent::Started {
            id: id.clone(),
            deadline,
        });

        StartReceipt {
            id,
            deadline,
            discarded,
        }
    }

    /// Open a session closing today at `raw` (`HH:MM`, local time)
    pub async fn start_at(&self, raw: &str, channel: impl Into<String>) -> Result<StartReceipt> {
        let deadline = deadline::parse_deadline(raw, &Local::now())?;
        Ok(self.start(deadline, channel).await)
    }

    /// Queue an order in the open session
    pub async fn submit(
        &self,
        item: &str,
        quantity: u32,
        profile: &ItemProfile,
    ) -> Result<OrderEntry> {
        let mut data = self.inner.data.lock().await;
        if !data.state.is_open() {
            return Err(OrderError::SessionNotOpen {
                state: data.state.name().to_string(),
            });
        }
        let entry = OrderEntry::new(item, quantity, profile)?;
        data.queue.insert(entry.clone());
        let id = data.id.clone().unwrap_or_default();
        let pending = data.queue.len();
        drop(data);

        debug!(
            "Queued {} x{} ({}s), {} pending",
            entry.item, entry.quantity, entry.cook_time_secs, pending
        );
        self.emit(SessionEvent::OrderAccepted {
            id,
            entry: entry.clone(),
        });
        Ok(entry)
    }

    /// Close the open session now instead of waiting for its deadline
    pub async fn finalize(&self) -> Result<AggregationOutcome> {
        let mut data = self.inner.data.lock().await;
        if !data.state.is_open() {
            return Err(OrderError::SessionNotOpen {
                state: data.state.name().to_string(),
            });
        }
        if let Some(timer) = data.timer.take() {
            timer.abort();
        }
        let closing = Self::close_locked(&mut data);
        drop(data);

        Ok(self.publish(closing).await)
    }

    pub async fn status(&self) -> SessionStatus {
        let data = self.inner.data.lock().await;
        SessionStatus {
            id: data.id.clone(),
            state: data.state.clone(),
            pending_orders: data.queue.len(),
            pending_quantity: data.queue.total_quantity(),
        }
    }

    pub async fn is_open(&self) -> bool {
        self.inner.data.lock().await.state.is_open()
    }

    fn spawn_timer(&self, generation: u64, delay: Duration) -> JoinHandle<()> {
        let session: Weak<Inner> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            sleep(delay).await;
            if let Some(inner) = session.upgrade() {
                OrderSession { inner }.on_deadline(generation).await;
            }
        })
    }

    async fn on_deadline(&self, generation: u64) {
        let mut data = self.inner.data.lock().await;
        if data.generation != generation || !data.state.is_open() {
            debug!("Ignoring stale deadline for generation {}", generation);
            return;
        }
        // Detach rather than abort: this task is the timer
        data.timer = None;
        let closing = Self::close_locked(&mut data);
        drop(data);

        info!("Deadline reached for session {}", closing.id);
        self.publish(closing).await;
    }

    fn close_locked(data: &mut SessionData) -> Closing {
        data.state = SessionState::Closed {
            closed_at: Local::now(),
        };
        Closing {
            id: data.id.clone().unwrap_or_default(),
            channel: data.channel.clone(),
            queue: std::mem::take(&mut data.queue),
        }
    }

    /// Aggregate a closed queue and report it to every collaborator
    async fn publish(&self, mut closing: Closing) -> AggregationOutcome {
        let collaborators = &self.inner.collaborators;

        let outcome = if closing.queue.is_empty() {
            AggregationOutcome::Empty
        } else {
            let snapshot = match within(
                "menu snapshot",
                collaborators.lookup_timeout,
                collaborators.catalog.menu_snapshot(),
            )
            .await
            {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!("Summarizing without cook times: {}", e);
                    MenuSnapshot::default()
                }
            };
            aggregator::finalize(&mut closing.queue, &snapshot)
        };

        if let AggregationOutcome::Summarized(summary) = &outcome {
            let unpriced = summary.unpriced_items();
            if !unpriced.is_empty() {
                warn!("Closed without cook times for: {}", unpriced.join(", "));
            }
        }

        for line in outcome.lines() {
            let submission = SummarySubmission {
                item_id: line.item_id.clone().unwrap_or_else(|| line.item.clone()),
                cumulative_secs: line.cumulative_secs,
                summed_quantity: line.summed_quantity,
            };
            if let Err(e) = collaborators.sink.submit_summary(&submission).await {
                warn!("Failed to submit summary for '{}': {}", line.item, e);
            }
        }

        if let Some(channel) = &closing.channel {
            let report = aggregator::render_report(&outcome);
            if let Err(e) = collaborators.poster.post(channel, &report).await {
                warn!("Failed to post close report to {}: {}", channel, e);
            }
        }

        let event = SessionEvent::Finalized {
            id: closing.id,
            outcome: outcome.clone(),
        };
        info!("{}", event.description());
        self.emit(event);
        outcome
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.inner.events.send(event);
    }
}
