//! reqwest-backed API client with ordered request/response hooks.
//!
//! ERROR HANDLING
//! ==============
//! A 401 becomes [`ApiError::AuthRejected`] and any other non-2xx status
//! becomes [`ApiError::Status`], so response hooks and callers can match on
//! the variant instead of re-inspecting status codes.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{ApiError, ApiResponse, OutboundRequest};
use crate::config::{Timeouts, normalize_base_url};

// =============================================================================
// HOOKS
// =============================================================================

/// Runs on every outbound request after default headers are merged.
/// Must not fail; a hook that cannot do its job leaves the request alone.
pub trait RequestHook: Send + Sync {
    fn name(&self) -> &'static str;

    fn on_request(&self, request: &mut OutboundRequest);
}

/// Runs on every outcome, success or failure, before it reaches the caller.
/// Observes only; the caller always receives the outcome unchanged.
pub trait ResponseHook: Send + Sync {
    fn name(&self) -> &'static str;

    fn on_response(&self, request: &OutboundRequest, outcome: &Result<ApiResponse, ApiError>);
}

// =============================================================================
// DEFAULT HEADERS
// =============================================================================

/// Standing headers applied to every request, shared between the client and
/// whoever needs to set them (the session controller, for `Authorization`).
#[derive(Clone, Debug, Default)]
pub struct DefaultHeaders {
    inner: Arc<RwLock<HeaderMap>>,
}

impl DefaultHeaders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: HeaderName, value: HeaderValue) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, value);
    }

    pub fn remove(&self, name: &HeaderName) -> Option<HeaderValue> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    pub fn get(&self, name: &HeaderName) -> Option<HeaderValue> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Copy defaults into `headers` without overriding headers already set
    /// on the request.
    pub(crate) fn merge_into(&self, headers: &mut HeaderMap) {
        let defaults = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        for (name, value) in defaults.iter() {
            if !headers.contains_key(name) {
                headers.insert(name.clone(), value.clone());
            }
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Shared API client. Clones share the transport, defaults, and hooks.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    defaults: DefaultHeaders,
    request_hooks: Vec<Arc<dyn RequestHook>>,
    response_hooks: Vec<Arc<dyn ResponseHook>>,
}

pub struct ApiClientBuilder {
    base_url: String,
    timeouts: Timeouts,
    defaults: DefaultHeaders,
    request_hooks: Vec<Arc<dyn RequestHook>>,
    response_hooks: Vec<Arc<dyn ResponseHook>>,
}

impl ApiClientBuilder {
    #[must_use]
    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    #[must_use]
    pub fn default_headers(mut self, defaults: DefaultHeaders) -> Self {
        self.defaults = defaults;
        self
    }

    /// Append a request hook. Hooks run in the order they are added.
    #[must_use]
    pub fn request_hook(mut self, hook: Arc<dyn RequestHook>) -> Self {
        self.request_hooks.push(hook);
        self
    }

    /// Append a response hook. Hooks run in the order they are added.
    #[must_use]
    pub fn response_hook(mut self, hook: Arc<dyn ResponseHook>) -> Self {
        self.response_hooks.push(hook);
        self
    }

    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the transport cannot be built.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(self.timeouts.request())
            .connect_timeout(self.timeouts.connect())
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                http,
                base_url: self.base_url,
                defaults: self.defaults,
                request_hooks: self.request_hooks,
                response_hooks: self.response_hooks,
            }),
        })
    }
}

impl ApiClient {
    pub fn builder(base_url: &str) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: normalize_base_url(base_url),
            timeouts: Timeouts::default(),
            defaults: DefaultHeaders::new(),
            request_hooks: Vec::new(),
            response_hooks: Vec::new(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    #[must_use]
    pub fn default_headers(&self) -> &DefaultHeaders {
        &self.inner.defaults
    }

    pub fn request_hook_names(&self) -> Vec<&'static str> {
        self.inner
            .request_hooks
            .iter()
            .map(|h| h.name())
            .collect()
    }

    pub fn response_hook_names(&self) -> Vec<&'static str> {
        self.inner
            .response_hooks
            .iter()
            .map(|h| h.name())
            .collect()
    }

    /// Run `request` through the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns the dispatch outcome's error unchanged after response hooks
    /// have seen it.
    pub async fn send(&self, mut request: OutboundRequest) -> Result<ApiResponse, ApiError> {
        self.prepare(&mut request);
        debug!(method = %request.method, path = %request.path, "api request");

        let outcome = self.dispatch(&request).await;
        for hook in &self.inner.response_hooks {
            hook.on_response(&request, &outcome);
        }
        outcome
    }

    /// Merge defaults into `request`, then run request hooks in order.
    pub(crate) fn prepare(&self, request: &mut OutboundRequest) {
        self.inner.defaults.merge_into(&mut request.headers);
        for hook in &self.inner.request_hooks {
            hook.on_request(request);
        }
    }

    async fn dispatch(&self, request: &OutboundRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.inner.base_url, request.path);
        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), &url)
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!(status = status.as_u16(), path = %request.path, "api response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::AuthRejected { body });
        }
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), body });
        }
        Ok(ApiResponse { status: status.as_u16(), body })
    }

    /// `GET path` and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call or from decoding.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(OutboundRequest::get(path)).await?.json()
    }

    /// `POST path` with a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from encoding, the call, or decoding.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.send(OutboundRequest::post(path).json(body))
            .await?
            .json()
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
