//! Mock image describer for testing

use super::catalog::lock;
use crate::abstractions::ImageDescriber;
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MockDescriber {
    descriptions: Arc<Mutex<HashMap<String, String>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockDescriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(self, image_path: &str, description: &str) -> Self {
        lock(&self.descriptions).insert(image_path.to_string(), description.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl ImageDescriber for MockDescriber {
    async fn describe(&self, image_path: &str) -> Result<String> {
        lock(&self.requests).push(image_path.to_string());
        lock(&self.descriptions)
            .get(image_path)
            .cloned()
            .ok_or_else(|| OrderError::delivery("describe", "API error: File not found"))
    }
}
