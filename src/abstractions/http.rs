//! HTTP client for the catalog/order backend
//!
//! The backend wraps every listing in `{"response": {"results": [...]}}`.
//! Numeric fields are sometimes stored as strings, so records are decoded
//! loosely and coerced.

use super::catalog::{Catalog, ItemProfile, NewMenuItem};
use super::delivery::{OrderSink, OrderSubmission, SummarySubmission};
use crate::config::BackendConfig;
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: ResultsPage<T>,
}

#[derive(Debug, Deserialize)]
struct ResultsPage<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ItemRecord {
    #[serde(rename = "_id")]
    id: Option<String>,
    #[serde(rename = "item name")]
    name: Option<String>,
    #[serde(rename = "seconds to cook")]
    seconds_to_cook: Option<Value>,
    #[serde(rename = "capacity on grill")]
    capacity_on_grill: Option<Value>,
}

impl ItemRecord {
    fn into_profile(self) -> Option<ItemProfile> {
        let name = self.name?;
        let seconds = self.seconds_to_cook.as_ref().and_then(as_whole_number);
        let capacity = self.capacity_on_grill.as_ref().and_then(as_whole_number);
        if seconds.is_none() || capacity.is_none() {
            debug!("Item record '{}' has incomplete cooking data", name);
        }
        Some(ItemProfile {
            name,
            id: self.id,
            seconds_to_cook: seconds.unwrap_or(0),
            capacity_on_grill: capacity
                .and_then(|c| u32::try_from(c).ok())
                .unwrap_or(0),
        })
    }
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    #[serde(rename = "_id")]
    id: Option<String>,
    name: Option<String>,
}

/// Accept a JSON number or a numeric string, truncating fractions
fn as_whole_number(value: &Value) -> Option<u64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (number.is_finite() && number >= 0.0).then(|| number as u64)
}

/// Client for the catalog and order persistence service
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| OrderError::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn endpoint<'a>(&self, url: &'a Option<String>, name: &str) -> Result<&'a str> {
        url.as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| OrderError::config(format!("{name} endpoint is not configured")))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch_records<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| OrderError::catalog(format!("GET {url} failed")).with_source(e))?;

        if response.status() != StatusCode::OK {
            return Err(OrderError::catalog(format!(
                "GET {url} returned {}",
                response.status()
            )));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| OrderError::catalog(format!("Unreadable listing from {url}")).with_source(e))?;
        Ok(envelope.response.results)
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        target: &str,
        url: &str,
        body: &B,
        accepted: StatusCode,
    ) -> Result<()> {
        let response = self
            .authorize(self.client.post(url))
            .json(body)
            .send()
            .await
            .map_err(|e| OrderError::delivery(target, format!("POST {url} failed")).with_source(e))?;

        let status = response.status();
        if status != accepted {
            let detail = response.text().await.unwrap_or_default();
            return Err(OrderError::delivery(
                target,
                format!("POST {url} returned {status}: {detail}"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Catalog for HttpBackend {
    async fn lookup_item(&self, name: &str) -> Result<Option<ItemProfile>> {
        let items = self.list_items().await?;
        Ok(items.into_iter().find(|item| item.name == name))
    }

    async fn lookup_user(&self, name: &str) -> Result<Option<String>> {
        let url = self.endpoint(&self.config.users_url, "users")?;
        let users: Vec<UserRecord> = self.fetch_records(url).await?;
        let found = users
            .into_iter()
            .find(|user| user.name.as_deref() == Some(name))
            .and_then(|user| user.id);
        if found.is_none() {
            debug!("User '{}' not present in catalog", name);
        }
        Ok(found)
    }

    async fn list_items(&self) -> Result<Vec<ItemProfile>> {
        let url = self.endpoint(&self.config.items_url, "items")?;
        let records: Vec<ItemRecord> = self.fetch_records(url).await?;
        Ok(records
            .into_iter()
            .filter_map(ItemRecord::into_profile)
            .collect())
    }

    async fn add_item(&self, item: &NewMenuItem) -> Result<()> {
        let url = self.endpoint(&self.config.items_url, "items")?;
        self.post_json("menu", url, item, StatusCode::CREATED).await?;
        info!("Added menu item '{}'", item.name);
        Ok(())
    }
}

#[async_trait]
impl OrderSink for HttpBackend {
    async fn submit_order(&self, order: &OrderSubmission) -> Result<()> {
        let url = self.endpoint(&self.config.orders_url, "orders")?;
        self.post_json("order sink", url, order, StatusCode::OK)
            .await?;
        info!("Order sent successfully");
        Ok(())
    }

    async fn submit_summary(&self, summary: &SummarySubmission) -> Result<()> {
        let url = self.endpoint(&self.config.summary_url, "summary")?;
        if let Err(e) = self
            .post_json("summary sink", url, summary, StatusCode::OK)
            .await
        {
            warn!("Summary for {} rejected: {}", summary.item_id, e);
            return Err(e);
        }
        info!("Order summary sent successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_whole_number_coercion() {
        assert_eq!(as_whole_number(&json!(90)), Some(90));
        assert_eq!(as_whole_number(&json!(90.7)), Some(90));
        assert_eq!(as_whole_number(&json!("120")), Some(120));
        assert_eq!(as_whole_number(&json!(" 4 ")), Some(4));
        assert_eq!(as_whole_number(&json!(-3)), None);
        assert_eq!(as_whole_number(&json!("lots")), None);
        assert_eq!(as_whole_number(&json!(null)), None);
    }

    #[test]
    fn test_item_envelope_decoding() {
        let body = json!({
            "response": {
                "results": [
                    {"_id": "a1", "item name": "bread", "seconds to cook": 60, "capacity on grill": 4},
                    {"_id": "a2", "item name": "soup", "seconds to cook": "90", "capacity on grill": "2"},
                    {"_id": "a3", "price": 3}
                ]
            }
        });
        let envelope: Envelope<ItemRecord> = serde_json::from_value(body).unwrap();
        let profiles: Vec<ItemProfile> = envelope
            .response
            .results
            .into_iter()
            .filter_map(ItemRecord::into_profile)
            .collect();

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0], ItemProfile::new("bread", 60, 4).with_id("a1"));
        assert_eq!(profiles[1], ItemProfile::new("soup", 90, 2).with_id("a2"));
    }

    #[test]
    fn test_missing_results_is_empty() {
        let envelope: Envelope<UserRecord> =
            serde_json::from_value(json!({"response": {}})).unwrap();
        assert!(envelope.response.results.is_empty());
    }

    #[test]
    fn test_incomplete_record_gets_zero_capacity() {
        let record: ItemRecord =
            serde_json::from_value(json!({"item name": "corn"})).unwrap();
        let profile = record.into_profile().unwrap();
        assert_eq!(profile.capacity_on_grill, 0);
        assert_eq!(profile.seconds_to_cook, 0);
    }

    #[tokio::test]
    async fn test_unconfigured_endpoint() {
        let backend = HttpBackend::new(BackendConfig::default()).unwrap();
        let err = backend.list_items().await.unwrap_err();
        assert!(matches!(err, OrderError::Config { .. }));
    }
}
