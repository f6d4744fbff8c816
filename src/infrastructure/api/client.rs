//! HTTP client for the auth and events endpoints

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::domain::{Event, EventPage, EventQuery, NewEvent};
use crate::infrastructure::api::error::{classify, ApiError};
use crate::infrastructure::api::normalize::normalize_page;
use crate::store::TokenStore;

/// Seconds a token lives when the auth response leaves `expires_in` out
const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Operations the runtime worker needs from the remote API
#[async_trait::async_trait]
pub trait EventsApi: Send + Sync + 'static {
    /// Whether a non-expired token is stored
    fn is_authenticated(&self) -> bool;

    /// Exchange the client credentials for a token and store it
    async fn authenticate(&self) -> Result<(), ApiError>;

    /// Drop the stored token
    fn logout(&self) -> Result<(), ApiError>;

    async fn list_events(&self, query: &EventQuery) -> Result<EventPage, ApiError>;

    async fn create_event(&self, event: &NewEvent) -> Result<Event, ApiError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Credentials<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    tokens: Mutex<TokenStore>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, tokens: TokenStore) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            http,
            config,
            tokens: Mutex::new(tokens),
        })
    }

    fn tokens(&self) -> MutexGuard<'_, TokenStore> {
        self.tokens.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Attach the bearer token when one is stored
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens().read() {
            Ok(Some(token)) => request.bearer_auth(token),
            Ok(None) => request,
            Err(err) => {
                warn!("token store read failed: {err:#}");
                request
            }
        }
    }

    /// Send and classify. Session expiry clears the stored token.
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if let Err(err) = classify(status, response.headers()) {
            warn!(status = status.as_u16(), "request rejected: {err}");
            if err.is_session_expired() {
                self.tokens().clear()?;
            }
            return Err(err);
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl EventsApi for ApiClient {
    fn is_authenticated(&self) -> bool {
        self.tokens().is_authenticated()
    }

    async fn authenticate(&self) -> Result<(), ApiError> {
        let url = self.config.endpoint("auth");
        let credentials = Credentials {
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
        };
        let response = self
            .http
            .post(&url)
            .json(&credentials)
            .send()
            .await
            .map_err(|err| ApiError::Authentication(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Authentication(format!("status {}", status.as_u16())));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| ApiError::Authentication(format!("bad token response: {err}")))?;
        let ttl = token
            .expires_in
            .filter(|ttl| *ttl > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        self.tokens().save(&token.access_token, ttl)?;
        info!(ttl_secs = ttl, "authenticated");
        Ok(())
    }

    fn logout(&self) -> Result<(), ApiError> {
        self.tokens().clear()?;
        info!("logged out");
        Ok(())
    }

    async fn list_events(&self, query: &EventQuery) -> Result<EventPage, ApiError> {
        let url = self.config.endpoint("events");
        let request = self.http.get(&url).query(&query.to_params());
        let response = self.send(request).await?;
        let text = response.text().await?;
        let body = match serde_json::from_str::<Value>(&text) {
            Ok(body) => body,
            Err(err) => {
                warn!("events response is not JSON: {err}");
                Value::Null
            }
        };
        let page = normalize_page(&body, query.offset());
        debug!(
            page = query.page,
            items = page.items.len(),
            total = page.total_count,
            "listed events"
        );
        Ok(page)
    }

    async fn create_event(&self, event: &NewEvent) -> Result<Event, ApiError> {
        let url = self.config.endpoint("events");
        let request = self.http.post(&url).json(event);
        let response = self.send(request).await?;
        let text = response.text().await?;
        let created = serde_json::from_str::<Event>(&text)
            .unwrap_or_else(|_| event.clone().into_event());
        info!(title = %created.title, "created event");
        Ok(created)
    }
}
