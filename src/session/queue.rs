//! Pending order container
//!
//! Orders are extracted smallest quantity first. Equal quantities leave in
//! the order they arrived, so a drain is fully deterministic.

use crate::abstractions::ItemProfile;
use crate::error::{OrderError, Result};
use crate::kitchen;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One accepted request in an open session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub item: String,
    pub quantity: u32,
    /// Cook time for this entry alone
    pub cook_time_secs: u64,
}

impl OrderEntry {
    /// Build an entry, pricing it against the item's grill profile
    pub fn new(item: impl Into<String>, quantity: u32, profile: &ItemProfile) -> Result<Self> {
        let item = item.into();
        if quantity == 0 {
            return Err(OrderError::MalformedQuantity {
                raw: quantity.to_string(),
            });
        }
        let cook_time_secs = kitchen::cook_time_for(
            &item,
            u64::from(quantity),
            profile.capacity_on_grill,
            profile.seconds_to_cook,
        )?;
        Ok(Self {
            item,
            quantity,
            cook_time_secs,
        })
    }
}

#[derive(Debug)]
struct Queued {
    seq: u64,
    entry: OrderEntry,
}

impl Queued {
    fn key(&self) -> (u32, u64) {
        (self.entry.quantity, self.seq)
    }
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    // BinaryHeap pops the greatest element; invert so the smallest key wins
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Priority container of pending orders
#[derive(Debug, Default)]
pub struct OrderQueue {
    heap: BinaryHeap<Queued>,
    next_seq: u64,
}

impl OrderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: OrderEntry) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Queued { seq, entry });
    }

    /// Remove and return the smallest-quantity entry
    pub fn extract_next(&mut self) -> Option<OrderEntry> {
        self.heap.pop().map(|queued| queued.entry)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Sum of all pending quantities
    pub fn total_quantity(&self) -> u64 {
        self.heap
            .iter()
            .map(|queued| u64::from(queued.entry.quantity))
            .sum()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.next_seq = 0;
    }

    /// Extract every entry in priority order
    pub fn drain(&mut self) -> impl Iterator<Item = OrderEntry> + '_ {
        std::iter::from_fn(move || self.extract_next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(item: &str, quantity: u32) -> OrderEntry {
        OrderEntry {
            item: item.to_string(),
            quantity,
            cook_time_secs: 0,
        }
    }

    #[test]
    fn test_entry_prices_cook_time() {
        let profile = ItemProfile::new("bread", 60, 4);
        let order = OrderEntry::new("bread", 5, &profile).unwrap();
        assert_eq!(order.cook_time_secs, 120);
    }

    #[test]
    fn test_entry_rejects_zero_quantity() {
        let profile = ItemProfile::new("bread", 60, 4);
        let err = OrderEntry::new("bread", 0, &profile).unwrap_err();
        assert!(matches!(err, OrderError::MalformedQuantity { .. }));
    }

    #[test]
    fn test_entry_rejects_zero_capacity() {
        let profile = ItemProfile::new("bread", 60, 0);
        let err = OrderEntry::new("bread", 2, &profile).unwrap_err();
        assert!(matches!(err, OrderError::InvalidCapacity { .. }));
    }

    #[test]
    fn test_smallest_quantity_first() {
        let mut queue = OrderQueue::new();
        queue.insert(entry("a", 7));
        queue.insert(entry("b", 1));
        queue.insert(entry("c", 3));

        let order: Vec<u32> = queue.drain().map(|e| e.quantity).collect();
        assert_eq!(order, vec![1, 3, 7]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_ties_leave_in_arrival_order() {
        let mut queue = OrderQueue::new();
        queue.insert(entry("first", 5));
        queue.insert(entry("small", 2));
        queue.insert(entry("second", 5));
        queue.insert(entry("third", 5));

        let items: Vec<String> = queue.drain().map(|e| e.item).collect();
        assert_eq!(items, vec!["small", "first", "second", "third"]);
    }

    #[test]
    fn test_extract_from_empty() {
        let mut queue = OrderQueue::new();
        assert_eq!(queue.extract_next(), None);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_len_and_total() {
        let mut queue = OrderQueue::new();
        queue.insert(entry("a", 2));
        queue.insert(entry("a", 4));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.total_quantity(), 6);

        queue.extract_next();
        assert_eq!(queue.len(), 1);

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.total_quantity(), 0);
    }
}
