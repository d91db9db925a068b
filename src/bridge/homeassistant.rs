//! Home Assistant REST API client

use std::time::Duration;

use log::debug;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, Method};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ConfigError, HassError, Result};

/// Thin client over `{url}/api/`
pub struct HomeAssistantClient {
    http: HttpClient,
    base_url: String,
}

impl HomeAssistantClient {
    /// Create a client authenticated with a long-lived access token
    pub fn new(url: &str, token: &str, timeout: Duration) -> Result<Self> {
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            ConfigError::Invalid("Home Assistant token contains invalid characters".to_string())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(HassError::from)?;

        Ok(Self {
            http,
            base_url: format!("{}/api/", url.trim_end_matches('/')),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, endpoint: &str) -> std::result::Result<Value, HassError> {
        self.send(Method::GET, endpoint, None::<&()>).await
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        payload: &T,
    ) -> std::result::Result<Value, HassError> {
        self.send(Method::POST, endpoint, Some(payload)).await
    }

    async fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&T>,
    ) -> std::result::Result<Value, HassError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.http.request(method, &url);
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HassError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| HassError::InvalidResponse(format!("{}: {}", endpoint, e)))?;

        debug!("Home Assistant {} -> {}", endpoint, status.as_u16());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[test]
    fn test_base_url_normalized() {
        let client =
            HomeAssistantClient::new("http://supervisor/core/", "t", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url(), "http://supervisor/core/api/");
    }

    #[test]
    fn test_invalid_token_rejected() {
        let result = HomeAssistantClient::new("http://ha", "bad\ntoken", Duration::from_secs(5));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_post_sends_bearer_and_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/states/sensor.x")
            .match_header("authorization", "Bearer secret")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"state": 1})))
            .with_status(201)
            .with_body(r#"{"entity_id": "sensor.x"}"#)
            .create_async()
            .await;

        let client = HomeAssistantClient::new(&server.url(), "secret", Duration::from_secs(5))
            .unwrap();
        let body = client.post("states/sensor.x", &json!({"state": 1})).await.unwrap();

        assert_eq!(body["entity_id"], "sensor.x");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/config")
            .with_status(401)
            .create_async()
            .await;

        let client =
            HomeAssistantClient::new(&server.url(), "t", Duration::from_secs(5)).unwrap();

        match client.get("config").await {
            Err(HassError::Status { status, .. }) => assert_eq!(status, 401),
            other => panic!("Expected HassError::Status, got {:?}", other),
        }
    }
}
