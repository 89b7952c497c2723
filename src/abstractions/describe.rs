//! Image description helper
//!
//! A small side service turns a receipt photo into one sentence of text.
//! It answers `{"description": ...}` on success and `{"error": ...}` otherwise.

use crate::error::{OrderError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[async_trait]
pub trait ImageDescriber: Send + Sync {
    async fn describe(&self, image_path: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct DescribeRequest<'a> {
    image_path: &'a str,
}

#[derive(Debug, Deserialize)]
struct DescribeResponse {
    description: Option<String>,
    error: Option<String>,
}

impl DescribeResponse {
    fn into_result(self) -> Result<String> {
        if let Some(error) = self.error {
            return Err(OrderError::delivery(
                "image description service",
                format!("API error: {error}"),
            ));
        }
        self.description.ok_or_else(|| {
            OrderError::delivery("image description service", "response had no description")
        })
    }
}

pub struct HttpImageDescriber {
    client: Client,
    url: String,
}

impl HttpImageDescriber {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OrderError::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ImageDescriber for HttpImageDescriber {
    async fn describe(&self, image_path: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.url)
            .json(&DescribeRequest { image_path })
            .send()
            .await
            .map_err(|e| {
                OrderError::delivery("image description service", "request failed").with_source(e)
            })?;

        // Errors come back as JSON bodies with non-2xx statuses, so decode first
        let body: DescribeResponse = response.json().await.map_err(|e| {
            OrderError::delivery("image description service", "unreadable response")
                .with_source(e)
        })?;
        body.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_description_response() {
        let body: DescribeResponse =
            serde_json::from_value(json!({"description": "A receipt for two coffees."})).unwrap();
        assert_eq!(body.into_result().unwrap(), "A receipt for two coffees.");
    }

    #[test]
    fn test_error_response() {
        let body: DescribeResponse =
            serde_json::from_value(json!({"error": "Image path is required"})).unwrap();
        let err = body.into_result().unwrap_err();
        assert!(err.to_string().contains("Image path is required"));
    }

    #[test]
    fn test_empty_response() {
        let body: DescribeResponse = serde_json::from_value(json!({})).unwrap();
        assert!(body.into_result().is_err());
    }
}
