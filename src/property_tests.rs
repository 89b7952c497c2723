//! Property-based tests for cook-time arithmetic and close aggregation

#[cfg(test)]
mod tests {
    use crate::abstractions::{ItemProfile, MenuSnapshot};
    use crate::kitchen;
    use crate::session::aggregator::finalize;
    use crate::session::{OrderEntry, OrderQueue};
    use proptest::prelude::*;
    use std::collections::HashMap;

    const ITEMS: [&str; 4] = ["bread", "soup", "corn", "kebab"];

    fn menu() -> MenuSnapshot {
        MenuSnapshot::from_items(vec![
            ItemProfile::new("bread", 60, 4),
            ItemProfile::new("soup", 90, 2),
            ItemProfile::new("corn", 45, 6),
            ItemProfile::new("kebab", 240, 3),
        ])
    }

    proptest! {
        #[test]
        fn test_cook_time_is_whole_batches(
            quantity in 0u64..10_000,
            capacity in 1u32..100,
            base in 0u64..3_600,
        ) {
            let total = kitchen::cook_time(quantity, capacity, base).unwrap();
            let batches = kitchen::batches(quantity, capacity).unwrap();

            // Enough batches for every unit, and no spare empty batch
            prop_assert!(batches * u64::from(capacity) >= quantity);
            prop_assert!(batches == 0 || (batches - 1) * u64::from(capacity) < quantity);
            prop_assert_eq!(total, batches * base);
        }

        #[test]
        fn test_cook_time_monotonic_in_quantity(
            quantity in 0u64..10_000,
            extra in 0u64..1_000,
            capacity in 1u32..100,
            base in 0u64..3_600,
        ) {
            let smaller = kitchen::cook_time(quantity, capacity, base).unwrap();
            let larger = kitchen::cook_time(quantity + extra, capacity, base).unwrap();
            prop_assert!(smaller <= larger);
        }
    }

    proptest! {
        #[test]
        fn test_queue_drains_in_nondecreasing_quantity(
            quantities in prop::collection::vec(1u32..500, 0..50),
        ) {
            let mut queue = OrderQueue::new();
            let profile = ItemProfile::unknown("bread");
            for quantity in &quantities {
                queue.insert(OrderEntry::new("bread", *quantity, &profile).unwrap());
            }

            let drained: Vec<u32> = queue.drain().map(|entry| entry.quantity).collect();
            let mut expected = quantities.clone();
            expected.sort_unstable();
            prop_assert_eq!(drained, expected);
        }

        #[test]
        fn test_aggregation_preserves_totals(
            orders in prop::collection::vec((0usize..4, 1u32..50), 1..40),
        ) {
            let snapshot = menu();
            let mut queue = OrderQueue::new();
            let mut expected: HashMap<&str, u64> = HashMap::new();
            for (index, quantity) in &orders {
                let item = ITEMS[*index];
                let profile = ItemProfile::unknown(item);
                queue.insert(OrderEntry::new(item, *quantity, &profile).unwrap());
                *expected.entry(item).or_default() += u64::from(*quantity);
            }

            let outcome = finalize(&mut queue, &snapshot);
            prop_assert!(queue.is_empty());

            let lines = outcome.lines();
            prop_assert_eq!(lines.len(), expected.len());

            let mut running = 0;
            for line in lines {
                prop_assert_eq!(line.summed_quantity, expected[line.item.as_str()]);
                running += line.item_cook_secs;
                prop_assert_eq!(line.cumulative_secs, running);
            }
        }
    }
}
