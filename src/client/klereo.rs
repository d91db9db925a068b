//! Klereo API client implementation

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use log::{debug, error, info, warn};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::maintenance::{MaintenanceSchedule, MaintenanceWindow};
use super::models::{Credentials, PoolDetail, PoolSummary, Probe};
use super::rate_limit::{DEFAULT_REQUESTS_PER_SECOND, RequestPacer};
use super::PoolSource;
use crate::cache::{CacheKey, CacheStats, CacheStorage, CacheTtl};
use crate::clock::{Clock, SystemClock};
use crate::error::{ApiError, Result};

/// Klereo API base URL
pub const API_ROOT: &str = "https://connect.klereo.fr/php/";

/// Client version string the login endpoint expects
pub const WEB_VERSION: &str = "393-J";

/// User agent sent with every request
pub const USER_AGENT: &str = "Home Assistant Add-on";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const LOGIN_ENDPOINT: &str = "GetJWT.php";
const INDEX_ENDPOINT: &str = "GetIndex.php";
const DETAILS_ENDPOINT: &str = "GetPoolDetails.php";

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Klereo API client
///
/// Owns one HTTP session for its whole lifetime, released on drop.
pub struct KlereoClient {
    http: HttpClient,
    base_url: String,
    credentials: Credentials,
    cache: Mutex<CacheStorage>,
    maintenance: MaintenanceSchedule,
    pacer: RequestPacer,
    clock: Arc<dyn Clock>,
}

/// Builder for [`KlereoClient`]
pub struct KlereoClientBuilder {
    credentials: Credentials,
    base_url: String,
    timeout: Duration,
    requests_per_second: u32,
    maintenance: MaintenanceSchedule,
    clock: Arc<dyn Clock>,
}

impl KlereoClientBuilder {
    /// Override the API root (for development/testing)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.base_url = url;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn requests_per_second(mut self, requests_per_second: u32) -> Self {
        self.requests_per_second = requests_per_second;
        self
    }

    pub fn maintenance(mut self, schedule: MaintenanceSchedule) -> Self {
        self.maintenance = schedule;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<KlereoClient> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );

        let http = HttpClient::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(self.timeout)
            .build()
            .map_err(ApiError::from)?;

        let pacer = RequestPacer::new(self.requests_per_second);
        debug!(
            "Klereo client for {} at {} req/s",
            self.base_url,
            pacer.requests_per_second()
        );

        Ok(KlereoClient {
            http,
            base_url: self.base_url,
            credentials: self.credentials,
            cache: Mutex::new(CacheStorage::new(self.clock.clone())),
            maintenance: self.maintenance,
            pacer,
            clock: self.clock,
        })
    }
}

impl KlereoClient {
    /// Create a client against the production API with default settings
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    pub fn builder(credentials: Credentials) -> KlereoClientBuilder {
        KlereoClientBuilder {
            credentials,
            base_url: API_ROOT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            maintenance: MaintenanceSchedule::klereo(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Check whether a server maintenance window is ongoing right now
    pub fn is_maintenance_ongoing(&self) -> bool {
        self.active_maintenance().is_some()
    }

    fn active_maintenance(&self) -> Option<MaintenanceWindow> {
        let now = self.clock.now().with_timezone(&Local);
        let window = self.maintenance.active_at(&now)?;
        info!("Maintenance ongoing: {:04}-{:04}", window.from, window.to);
        Some(window)
    }

    /// Get the JWT, logging in when no unexpired token is cached
    pub async fn get_jwt_token(&self) -> Result<String> {
        if let Some(token) = self.get_cached::<String>(&CacheKey::JwtToken) {
            return Ok(token);
        }

        let digest = self.credentials.password_digest();
        let form = [
            ("login", self.credentials.username()),
            ("password", digest.as_str()),
            ("version", WEB_VERSION),
        ];

        let body = match self
            .execute(Method::POST, LOGIN_ENDPOINT, Some(&form[..]), None)
            .await
        {
            Ok((_, body)) => body,
            Err(ApiError::Protocol { reason, .. }) => {
                error!("Failed to get JWT token");
                return Err(ApiError::Auth(reason).into());
            }
            Err(err) => {
                error!("Failed to get JWT token");
                return Err(err.into());
            }
        };

        let Some(token) = body
            .get("jwt")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
        else {
            error!("Failed to get JWT token");
            return Err(ApiError::Auth("login response carries no jwt".to_string()).into());
        };

        let token = token.to_string();
        self.set_cached(
            &CacheKey::JwtToken,
            Value::String(token.clone()),
            CacheTtl::JWT,
        );

        debug!("JWT token obtained successfully");
        Ok(token)
    }

    /// Get the pool index
    pub async fn get_index(&self) -> Result<Vec<PoolSummary>> {
        let entries = match self.get_cached::<Vec<Value>>(&CacheKey::Index) {
            Some(entries) => entries,
            None => self.fetch_index().await?,
        };

        Ok(entries.into_iter().map(PoolSummary::from_value).collect())
    }

    async fn fetch_index(&self) -> Result<Vec<Value>> {
        let jwt = self.get_jwt_token().await?;

        let (_, body) = self
            .execute(Method::GET, INDEX_ENDPOINT, None, Some(&jwt))
            .await
            .inspect_err(|_| error!("Failed to get index"))?;

        let Some(Value::Array(entries)) = take_response(body) else {
            error!("Failed to get index");
            return Err(ApiError::protocol(INDEX_ENDPOINT, "missing response list").into());
        };

        self.set_cached(
            &CacheKey::Index,
            Value::Array(entries.clone()),
            CacheTtl::INDEX,
        );

        debug!("Index data obtained: {} pools", entries.len());
        Ok(entries)
    }

    /// Get pools as `{pool_id: pool_nickname}`.
    ///
    /// An empty index is "no data". Entries lacking an id or a nickname are
    /// skipped; a repeated id keeps the last nickname seen.
    pub async fn get_pools(&self) -> Result<BTreeMap<String, String>> {
        let index = self.get_index().await?;
        if index.is_empty() {
            warn!("No pools in index");
            return Err(ApiError::protocol(INDEX_ENDPOINT, "empty index").into());
        }

        let mut pools = BTreeMap::new();
        for summary in &index {
            if let Some((id, name)) = summary.identity() {
                pools.insert(id.to_string(), name.to_string());
            }
        }

        Ok(pools)
    }

    /// Get the detail blob of one pool
    pub async fn get_pool_details(&self, pool_id: &str) -> Result<PoolDetail> {
        let key = CacheKey::pool_details(pool_id);
        if let Some(details) = self.get_cached::<Value>(&key) {
            return Ok(PoolDetail(details));
        }

        let jwt = self.get_jwt_token().await?;
        let form = [("idSystem", pool_id)];

        let (_, body) = self
            .execute(Method::POST, DETAILS_ENDPOINT, Some(&form[..]), Some(&jwt))
            .await
            .inspect_err(|_| error!("Failed to get pool details for {}", pool_id))?;

        let Some(details) = take_response(body) else {
            error!("Failed to get pool details for {}", pool_id);
            return Err(ApiError::protocol(DETAILS_ENDPOINT, "missing response").into());
        };

        self.set_cached(&key, details.clone(), CacheTtl::POOL_DETAILS);

        debug!("Pool details obtained for {}", pool_id);
        Ok(PoolDetail(details))
    }

    /// Get the probes of one pool. A detail blob without probes yields none.
    pub async fn get_pool_probes(&self, pool_id: &str) -> Result<Vec<Probe>> {
        let details = self.get_pool_details(pool_id).await?;
        Ok(details.probes())
    }

    /// Test if the API connection is working. Never fails.
    pub async fn test_connection(&self) -> bool {
        if let Err(err) = self.get_jwt_token().await {
            error!("Connection test failed: {}", err);
            return false;
        }

        match self.get_pools().await {
            Ok(_) => true,
            Err(err) => {
                error!("Connection test failed: {}", err);
                false
            }
        }
    }

    /// Drop every cached entry, token included
    pub fn clear_cache(&self) {
        let stats = self.lock_cache().clear_all();
        info!("Cache cleared ({} entries)", stats.entries_removed);
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.lock_cache().stats()
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, CacheStorage> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Try to get cached data
    fn get_cached<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let value = self.lock_cache().get(key)?;
        debug!("Cache hit: {}", key);
        serde_json::from_value(value).ok()
    }

    /// Store data in cache
    fn set_cached(&self, key: &CacheKey, value: Value, ttl: Duration) {
        self.lock_cache().put(key, value, ttl);
    }

    /// Issue one request and validate the Klereo response envelope.
    ///
    /// Returns the response headers and the parsed JSON body.
    async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        form: Option<&[(&str, &str)]>,
        bearer: Option<&str>,
    ) -> ApiResult<(HeaderMap, Value)> {
        if let Some(window) = self.active_maintenance() {
            warn!("Maintenance ongoing, skipping request to {}", endpoint);
            return Err(ApiError::MaintenanceSuppressed {
                from: window.from,
                to: window.to,
            });
        }

        self.pacer.wait().await;

        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.http.request(method, &url);
        if let Some(form) = form {
            request = request.form(form);
        }
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            let err = ApiError::from(e);
            error!("Request failed for {}: {}", endpoint, err);
            err
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            error!("HTTP {} error for {}", status.as_u16(), endpoint);
            return Err(ApiError::protocol(
                endpoint,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let headers = response.headers().clone();
        let text = response.text().await.map_err(|e| {
            let err = ApiError::from(e);
            error!("Request failed for {}: {}", endpoint, err);
            err
        })?;

        let body: Value = serde_json::from_str(&text).map_err(|_| {
            error!("Invalid JSON response from {}", endpoint);
            ApiError::protocol(endpoint, "invalid JSON body")
        })?;

        if let Some(fields) = body.as_object()
            && fields.contains_key("error")
        {
            let detail = match fields.get("detail") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => "Unknown error".to_string(),
                Some(other) => other.to_string(),
            };
            error!("API error: {}", detail);
            return Err(ApiError::protocol(endpoint, detail));
        }

        Ok((headers, body))
    }
}

/// Pull the `response` member out of a Klereo envelope
fn take_response(body: Value) -> Option<Value> {
    match body {
        Value::Object(mut fields) => fields.remove("response"),
        _ => None,
    }
}

#[async_trait]
impl PoolSource for KlereoClient {
    async fn get_pools(&self) -> Result<BTreeMap<String, String>> {
        KlereoClient::get_pools(self).await
    }

    async fn get_pool_probes(&self, pool_id: &str) -> Result<Vec<Probe>> {
        KlereoClient::get_pool_probes(self, pool_id).await
    }
}
