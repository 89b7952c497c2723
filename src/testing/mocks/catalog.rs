//! Mock catalog implementation for testing

use crate::abstractions::{Catalog, ItemProfile, NewMenuItem};
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory catalog with optional latency and failure injection
#[derive(Clone, Default)]
pub struct MockCatalog {
    items: Arc<Mutex<HashMap<String, ItemProfile>>>,
    users: Arc<Mutex<HashMap<String, String>>>,
    added: Arc<Mutex<Vec<NewMenuItem>>>,
    delay: Option<Duration>,
    failing: bool,
    calls: Arc<Mutex<usize>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(self, profile: ItemProfile) -> Self {
        lock(&self.items).insert(profile.name.clone(), profile);
        self
    }

    pub fn with_user(self, name: &str, id: &str) -> Self {
        lock(&self.users).insert(name.to_string(), id.to_string());
        self
    }

    /// Delay every call by `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every call with a soft catalog error
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Items added through [`Catalog::add_item`]
    pub fn added_items(&self) -> Vec<NewMenuItem> {
        lock(&self.added).clone()
    }

    /// Number of catalog calls made so far
    pub fn calls(&self) -> usize {
        *lock(&self.calls)
    }

    async fn enter(&self) -> Result<()> {
        *lock(&self.calls) += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            return Err(OrderError::catalog("mock catalog unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn lookup_item(&self, name: &str) -> Result<Option<ItemProfile>> {
        self.enter().await?;
        Ok(lock(&self.items).get(name).cloned())
    }

    async fn lookup_user(&self, name: &str) -> Result<Option<String>> {
        self.enter().await?;
        Ok(lock(&self.users).get(name).cloned())
    }

    async fn list_items(&self) -> Result<Vec<ItemProfile>> {
        self.enter().await?;
        let mut items: Vec<ItemProfile> = lock(&self.items).values().cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn add_item(&self, item: &NewMenuItem) -> Result<()> {
        self.enter().await?;
        lock(&self.added).push(item.clone());
        let mut profile = ItemProfile::new(
            item.name.as_str(),
            item.seconds_to_cook,
            item.capacity_on_grill,
        );
        profile.id = Some(format!("added-{}", item.name));
        lock(&self.items).insert(item.name.clone(), profile);
        Ok(())
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
