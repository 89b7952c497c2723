//! Session close aggregation
//!
//! Drains the order queue, sums quantities per item and converts each
//! item's total into cook time. The reported time is cumulative: it is the
//! time since close at which that item is done, assuming every item is
//! grilled one after another in emission order.

use super::queue::OrderQueue;
use crate::abstractions::{ItemProfile, ProfileLookup};
use crate::kitchen;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One item's aggregated result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLine {
    pub item: String,
    /// Backend id of the item, when the catalog knew it
    pub item_id: Option<String>,
    pub summed_quantity: u64,
    /// Cook time of this item's total quantity alone
    pub item_cook_secs: u64,
    /// Running total across this and every earlier line
    pub cumulative_secs: u64,
}

/// Everything produced by closing a session that had orders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub lines: Vec<SummaryLine>,
    pub per_item_totals: HashMap<String, u64>,
    /// Number of entries drained from the queue
    pub entries: usize,
}

impl Summary {
    /// Cook time for the whole session
    pub fn total_cook_secs(&self) -> u64 {
        self.lines.last().map_or(0, |line| line.cumulative_secs)
    }

    /// Items without a usable catalog profile
    pub fn unpriced_items(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|line| line.item_id.is_none())
            .map(|line| line.item.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationOutcome {
    /// The session closed with nothing in the queue
    Empty,
    Summarized(Summary),
}

impl AggregationOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, AggregationOutcome::Empty)
    }

    pub fn lines(&self) -> &[SummaryLine] {
        match self {
            AggregationOutcome::Empty => &[],
            AggregationOutcome::Summarized(summary) => &summary.lines,
        }
    }
}

/// Drain `queue` and summarize it against `lookup`
///
/// Items missing from the catalog, or listed with a zero grill capacity, are
/// still summarized but contribute no cook time.
pub fn finalize(queue: &mut OrderQueue, lookup: &dyn ProfileLookup) -> AggregationOutcome {
    if queue.is_empty() {
        return AggregationOutcome::Empty;
    }

    let mut per_item_totals: HashMap<String, u64> = HashMap::new();
    let mut emission_order: Vec<String> = Vec::new();
    let mut entries = 0;

    for entry in queue.drain() {
        entries += 1;
        let total = per_item_totals.entry(entry.item.clone()).or_insert_with(|| {
            emission_order.push(entry.item.clone());
            0
        });
        *total += u64::from(entry.quantity);
    }

    let mut cumulative_secs: u64 = 0;
    let lines = emission_order
        .into_iter()
        .map(|item| {
            let summed_quantity = per_item_totals[&item];
            let (profile, known) = match lookup.profile(&item) {
                Some(profile) if profile.capacity_on_grill > 0 => (profile.clone(), true),
                Some(_) => {
                    debug!("Item '{}' has zero grill capacity, counting no cook time", item);
                    (ItemProfile::unknown(item.as_str()), false)
                }
                None => {
                    debug!("No catalog profile for '{}', counting no cook time", item);
                    (ItemProfile::unknown(item.as_str()), false)
                }
            };

            // Capacity is at least one here, so the calculator cannot fail
            let item_cook_secs = kitchen::cook_time(
                summed_quantity,
                profile.capacity_on_grill,
                profile.seconds_to_cook,
            )
            .unwrap_or(0);
            cumulative_secs = cumulative_secs.saturating_add(item_cook_secs);
            debug!(
                "{} x{} -> {}s (cumulative {}s)",
                item, summed_quantity, item_cook_secs, cumulative_secs
            );

            SummaryLine {
                item_id: if known { profile.id.clone() } else { None },
                item,
                summed_quantity,
                item_cook_secs,
                cumulative_secs,
            }
        })
        .collect();

    AggregationOutcome::Summarized(Summary {
        lines,
        per_item_totals,
        entries,
    })
}

/// Human-readable close report posted back to the session's channel
pub fn render_report(outcome: &AggregationOutcome) -> String {
    match outcome {
        AggregationOutcome::Empty => "No orders were placed.".to_string(),
        AggregationOutcome::Summarized(summary) => {
            let mut report = String::from("You have collectively ordered:\n");
            for (index, line) in summary.lines.iter().enumerate() {
                report.push_str(&format!(
                    "{}. {} x{} -> {} seconds to cook\n",
                    index + 1,
                    line.item,
                    line.summed_quantity,
                    line.cumulative_secs
                ));
            }
            report.push_str(
                "The order won't be received now - start a new order session with /start {time}.",
            );
            report
        }
    }
}
