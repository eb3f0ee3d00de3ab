//! REST client for the admin promotions API
//!
//! One request per call, no retries and no caching. Every failure is logged
//! here and returned to the caller, which decides how to show it.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::action::{Action, BulkKind};
use crate::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::{PromoError, Result};
use crate::promotion::{ApiErrorBody, BulkResponse, MutationResponse, Promotion, PromotionList};
use crate::view::Tab;

/// Connection settings for [`PromotionClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Bearer token; `None` or empty sends no Authorization header
    pub token: Option<String>,
    pub timeout: Duration,
    pub insecure: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            insecure: false,
        }
    }
}

/// What a mutation returned
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    Mutation(MutationResponse),
    Bulk(BulkResponse),
}

impl ActionOutcome {
    /// Text to show the user after a successful action
    pub fn message(&self, action: &Action) -> String {
        match self {
            ActionOutcome::Bulk(bulk) => bulk.summary(),
            ActionOutcome::Mutation(resp) => resp
                .message
                .clone()
                .unwrap_or_else(|| action.success_message()),
        }
    }
}

/// Admin promotions API client
#[derive(Debug, Clone)]
pub struct PromotionClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl PromotionClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(PromoError::invalid_base_url(
                &config.base_url,
                "must start with http:// or https://",
            ));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(|e| PromoError::http(&base_url, e))?;

        Ok(Self {
            http,
            base_url,
            token: config.token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        fallback: &str,
    ) -> Result<T> {
        let url = self.url(path);
        debug!(%method, %url, "sending request");

        let mut request = self.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            error!(%method, %url, error = %e, "request failed");
            PromoError::http(&url, e)
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PromoError::http(&url, e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(|body| body.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| fallback.to_string());
            error!(%method, %url, status = status.as_u16(), %message, "backend rejected request");
            return Err(PromoError::api(status.as_u16(), message));
        }

        let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| {
            error!(%method, %url, error = %e, "unexpected response body");
            PromoError::decode(&url, e)
        })
    }

    /// Promotions for a tab: `/all` or `/status/{STATUS}`
    #[instrument(skip(self))]
    pub async fn fetch(&self, tab: Tab) -> Result<Vec<Promotion>> {
        let path = match tab.status() {
            Some(status) => format!("/status/{}", status.as_wire()),
            None => "/all".to_string(),
        };
        let list: PromotionList = self
            .send(Method::GET, &path, None, "Failed to fetch promotions")
            .await?;
        debug!(count = list.promotions.len(), "fetched promotions");
        Ok(list.promotions)
    }

    /// Active (live and not paused) promotions
    pub async fn active(&self) -> Result<Vec<Promotion>> {
        let list: PromotionList = self
            .send(Method::GET, "/active", None, "Failed to fetch active promotions")
            .await?;
        Ok(list.promotions)
    }

    pub async fn get(&self, id: i64) -> Result<Promotion> {
        self.send(Method::GET, &format!("/{}", id), None, "Promotion not found")
            .await
    }

    /// Send a mutation and decode its response
    pub async fn execute(&self, action: &Action) -> Result<ActionOutcome> {
        if action.is_bulk() {
            self.dispatch(action).await.map(ActionOutcome::Bulk)
        } else {
            self.dispatch(action).await.map(ActionOutcome::Mutation)
        }
    }

    #[instrument(skip(self, action), fields(request = %action))]
    async fn dispatch<T: DeserializeOwned>(&self, action: &Action) -> Result<T> {
        let response = self
            .send(
                action.method(),
                &action.path(),
                action.body(),
                action.failure_message(),
            )
            .await?;
        info!("{}", action.success_message());
        Ok(response)
    }

    pub async fn approve(&self, id: i64, comment: &str) -> Result<MutationResponse> {
        self.dispatch(&Action::approve(id, comment)).await
    }

    pub async fn reject(&self, id: i64, comment: &str) -> Result<MutationResponse> {
        self.dispatch(&Action::reject(id, comment)).await
    }

    pub async fn advertise(&self, id: i64) -> Result<MutationResponse> {
        self.dispatch(&Action::Advertise { id }).await
    }

    pub async fn toggle_active(&self, id: i64) -> Result<MutationResponse> {
        self.dispatch(&Action::ToggleActive { id }).await
    }

    pub async fn delete(&self, id: i64) -> Result<MutationResponse> {
        self.dispatch(&Action::Delete { id }).await
    }

    pub async fn bulk(&self, kind: BulkKind, ids: Vec<i64>) -> Result<BulkResponse> {
        self.dispatch(&kind.action(ids)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_base_url_without_scheme() {
        let err = PromotionClient::new(ClientConfig {
            base_url: "localhost:8080/admin".to_string(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, PromoError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_trailing_slash_and_empty_token_are_normalized() {
        let client = PromotionClient::new(ClientConfig {
            base_url: "http://localhost:8080/admin/auth/promotions/".to_string(),
            token: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/admin/auth/promotions");
        assert_eq!(client.url("/all"), "http://localhost:8080/admin/auth/promotions/all");
        assert!(!client.has_token());
    }
}
