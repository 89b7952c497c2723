//! Catalog abstraction
//!
//! Item profiles and user identities come from an external backend. Lookups
//! are expected to be slow or flaky at times, so callers wrap them in
//! [`within`] and treat a timeout like any other soft failure.

use crate::error::{OrderError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

/// Cooking characteristics of one menu item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemProfile {
    pub name: String,
    /// Backend record id, when the backend supplied one
    pub id: Option<String>,
    pub seconds_to_cook: u64,
    pub capacity_on_grill: u32,
}

impl ItemProfile {
    pub fn new(name: impl Into<String>, seconds_to_cook: u64, capacity_on_grill: u32) -> Self {
        Self {
            name: name.into(),
            id: None,
            seconds_to_cook,
            capacity_on_grill,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Stand-in for an item the catalog does not know: one per batch, no time
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::new(name, 0, 1)
    }

    /// Id to report to the backend, falling back to the item name
    pub fn backend_id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }
}

/// Item to be added to the menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMenuItem {
    #[serde(rename = "item name")]
    pub name: String,
    #[serde(rename = "capacity on grill")]
    pub capacity_on_grill: u32,
    pub price: f64,
    #[serde(rename = "seconds to cook")]
    pub seconds_to_cook: u64,
}

/// Synchronous profile source used while aggregating
pub trait ProfileLookup {
    fn profile(&self, item: &str) -> Option<&ItemProfile>;
}

impl ProfileLookup for HashMap<String, ItemProfile> {
    fn profile(&self, item: &str) -> Option<&ItemProfile> {
        self.get(item)
    }
}

/// Menu fetched once and indexed by item name
#[derive(Debug, Clone, Default)]
pub struct MenuSnapshot {
    items: HashMap<String, ItemProfile>,
}

impl MenuSnapshot {
    pub fn from_items(items: impl IntoIterator<Item = ItemProfile>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|profile| (profile.name.clone(), profile))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ProfileLookup for MenuSnapshot {
    fn profile(&self, item: &str) -> Option<&ItemProfile> {
        self.items.get(item)
    }
}

/// Catalog of items and users
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Find an item by its menu name
    async fn lookup_item(&self, name: &str) -> Result<Option<ItemProfile>>;

    /// Resolve a user name to the backend user id
    async fn lookup_user(&self, name: &str) -> Result<Option<String>>;

    /// Every item on the menu
    async fn list_items(&self) -> Result<Vec<ItemProfile>>;

    /// Add an item to the menu
    async fn add_item(&self, item: &NewMenuItem) -> Result<()>;

    /// Fetch the whole menu for aggregation
    async fn menu_snapshot(&self) -> Result<MenuSnapshot> {
        Ok(MenuSnapshot::from_items(self.list_items().await?))
    }
}

/// Run a catalog call with a time budget
pub async fn within<T, F>(what: &str, limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(OrderError::catalog_timeout(what, limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_profile_contributes_nothing() {
        let profile = ItemProfile::unknown("mystery");
        assert_eq!(profile.capacity_on_grill, 1);
        assert_eq!(profile.seconds_to_cook, 0);
        assert_eq!(profile.backend_id(), "mystery");
        assert_eq!(profile.with_id("rec-9").backend_id(), "rec-9");
    }

    #[test]
    fn test_snapshot_lookup() {
        let snapshot = MenuSnapshot::from_items(vec![
            ItemProfile::new("bread", 60, 4),
            ItemProfile::new("soup", 90, 2),
        ]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.profile("soup").unwrap().capacity_on_grill, 2);
        assert!(snapshot.profile("cake").is_none());
    }

    #[test]
    fn test_new_item_wire_names() {
        let item = NewMenuItem {
            name: "kebab".to_string(),
            capacity_on_grill: 6,
            price: 4.5,
            seconds_to_cook: 240,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["item name"], "kebab");
        assert_eq!(json["capacity on grill"], 6);
        assert_eq!(json["seconds to cook"], 240);
    }

    #[tokio::test]
    async fn test_within_passes_result_through() {
        let value = within("lookup", Duration::from_secs(1), async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_within_times_out() {
        let err = within("slow lookup", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, OrderError::CatalogLookupFailed { .. }));
        assert!(err.to_string().contains("slow lookup"));
    }
}
