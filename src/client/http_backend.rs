//! REST backend over HTTP
//!
//! Endpoints per collection:
//! - `GET    {base}/api/{collection}?category=..&type=..&search=..&from=..&to=..`
//! - `POST   {base}/api/{collection}`
//! - `PUT    {base}/api/{collection}/{id}`
//! - `DELETE {base}/api/{collection}/{id}`
//!
//! Every response body is an `ApiEnvelope`.

use crate::config::JourneyConfig;
use crate::error::{JourneyError, Result};
use crate::traits::{CollectionBackend, JourneyRecord};
use crate::types::ApiEnvelope;
use crate::view::FilterParams;
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tracing::{debug, info};

/// HTTP client for one record collection
pub struct HttpBackend<R: JourneyRecord> {
    config: JourneyConfig,
    client: Client,
    _record: PhantomData<fn() -> R>,
}

impl<R: JourneyRecord> HttpBackend<R> {
    /// Build a backend; the API key (if any) is sent as a bearer token
    pub fn new(config: JourneyConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        if let Some(ref api_key) = config.api_key {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| {
                    JourneyError::Config("api_key contains invalid header characters".into())
                })?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| JourneyError::Config(format!("failed to build HTTP client: {}", e)))?;

        info!(collection = R::collection(), base_url = %config.api_root(), "HTTP backend ready");

        Ok(Self {
            config,
            client,
            _record: PhantomData,
        })
    }

    pub fn config(&self) -> &JourneyConfig {
        &self.config
    }

    pub fn collection_url(&self) -> String {
        format!("{}/api/{}", self.config.api_root(), R::collection())
    }

    pub fn record_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), urlencoding::encode(id))
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        parse_envelope(status, &body)
    }
}

/// Interpret an HTTP status and body as an envelope result.
///
/// Non-2xx statuses become `Server` errors carrying the envelope's error
/// message when the body has one, the raw body otherwise.
pub fn parse_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<T> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
            .ok()
            .and_then(|envelope| envelope.error)
            .unwrap_or_else(|| body.to_string());
        return Err(JourneyError::Server { status, message });
    }

    let envelope: ApiEnvelope<T> = serde_json::from_str(body)?;
    envelope.into_result()
}

/// Like `parse_envelope` for endpoints that answer without data
pub fn parse_unit_envelope(status: u16, body: &str) -> Result<()> {
    if !(200..300).contains(&status) {
        return parse_envelope::<serde_json::Value>(status, body).map(|_| ());
    }
    if body.trim().is_empty() {
        return Ok(());
    }
    let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(body)?;
    envelope.into_unit()
}

#[async_trait]
impl<R: JourneyRecord> CollectionBackend<R> for HttpBackend<R> {
    async fn list(&self, filters: &FilterParams) -> Result<Vec<R>> {
        let url = self.collection_url();
        debug!(url = %url, "GET collection");
        let response = self
            .client
            .get(&url)
            .query(&filters.to_query())
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        let url = self.collection_url();
        debug!(url = %url, "POST record");
        let response = self.client.post(&url).json(draft).send().await?;
        Self::handle_response(response).await
    }

    async fn update(&self, id: &str, draft: &R::Draft) -> Result<R> {
        let url = self.record_url(id);
        debug!(url = %url, "PUT record");
        let response = self.client.put(&url).json(draft).send().await?;
        Self::handle_response(response).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.record_url(id);
        debug!(url = %url, "DELETE record");
        let response = self.client.delete(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        parse_unit_envelope(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::calendar::CalendarEvent;

    #[test]
    fn test_urls() {
        let backend = HttpBackend::<CalendarEvent>::new(JourneyConfig {
            base_url: "https://api.example.com/".into(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(backend.collection_url(), "https://api.example.com/api/events");
        assert_eq!(backend.record_url("a b/c"), "https://api.example.com/api/events/a%20b%2Fc");
    }

    #[test]
    fn test_invalid_api_key_is_config_error() {
        let result = HttpBackend::<CalendarEvent>::new(JourneyConfig {
            api_key: Some("bad\nkey".into()),
            ..Default::default()
        });
        assert!(matches!(result, Err(JourneyError::Config(_))));
    }

    #[test]
    fn test_parse_list_body() {
        let body = r#"{"success": true, "data": [
            {"id": "e1", "title": "Dinner", "type": "date", "date": "2025-02-14T19:00:00Z"}
        ]}"#;
        let events: Vec<CalendarEvent> = parse_envelope(200, body).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Dinner");
    }

    #[test]
    fn test_parse_failure_envelope() {
        let result: Result<Vec<CalendarEvent>> =
            parse_envelope(200, r#"{"success": false, "error": "x"}"#);
        assert!(matches!(result, Err(JourneyError::Backend(ref m)) if m == "x"));
    }

    #[test]
    fn test_parse_http_error_prefers_envelope_message() {
        let result: Result<Vec<CalendarEvent>> =
            parse_envelope(401, r#"{"success": false, "error": "Unauthorized"}"#);
        assert!(matches!(
            result,
            Err(JourneyError::Server { status: 401, ref message }) if message == "Unauthorized"
        ));

        let result: Result<Vec<CalendarEvent>> = parse_envelope(502, "Bad Gateway");
        assert!(matches!(
            result,
            Err(JourneyError::Server { status: 502, ref message }) if message == "Bad Gateway"
        ));
    }

    #[test]
    fn test_malformed_body_is_serialization_error() {
        let result: Result<Vec<CalendarEvent>> =
            parse_envelope(200, r#"{"success": true, "data": {"oops": 1}}"#);
        assert!(matches!(result, Err(JourneyError::Serialization(_))));
    }

    #[test]
    fn test_unit_envelope() {
        assert!(parse_unit_envelope(204, "").is_ok());
        assert!(parse_unit_envelope(200, r#"{"success": true}"#).is_ok());
        assert!(matches!(
            parse_unit_envelope(404, r#"{"success": false, "error": "gone"}"#),
            Err(JourneyError::Server { status: 404, .. })
        ));
    }
}
