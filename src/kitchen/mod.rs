//! Grill batching arithmetic
//!
//! Items are cooked in sequential batches of a fixed capacity. Every batch
//! takes the item's full base time no matter how full it is.

use crate::error::{OrderError, Result};

/// Number of grill batches needed for `quantity` items
pub fn batches(quantity: u64, capacity: u32) -> Option<u64> {
    if capacity == 0 {
        return None;
    }
    Some(quantity.div_ceil(u64::from(capacity)))
}

/// Total seconds needed to cook `quantity` items in batches of `capacity`
///
/// `cook_time(10, 4, 30)` is three batches, 90 seconds. Zero quantity is zero
/// seconds. A zero capacity cannot be batched and is rejected.
pub fn cook_time(quantity: u64, capacity: u32, base_seconds: u64) -> Result<u64> {
    batches(quantity, capacity)
        .map(|count| count.saturating_mul(base_seconds))
        .ok_or(OrderError::InvalidCapacity {
            item: String::new(),
            capacity,
        })
}

/// Cook time for a named item, reporting the item on capacity errors
pub fn cook_time_for(item: &str, quantity: u64, capacity: u32, base_seconds: u64) -> Result<u64> {
    cook_time(quantity, capacity, base_seconds).map_err(|_| OrderError::InvalidCapacity {
        item: item.to_string(),
        capacity,
    })
}
