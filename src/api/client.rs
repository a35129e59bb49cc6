//! Request pipeline wrapped around every API call
//!
//! Each call runs the same ordered stages:
//! - outbound: attach the session credential when one is valid
//! - dispatch: the HTTP exchange, bounded by the configured timeout
//! - inbound: hand back the payload on success, otherwise classify the
//!   failure; an expired session short-circuits into clearing the store and
//!   requesting the login view before the rejection reaches the caller

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::classify::{classify, ApiError};
use crate::auth::SessionStore;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::notice::{Notice, Notifier};
use crate::router::Navigator;

/// Request payload
#[derive(Debug, Clone, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(Value),
    /// Sent as `multipart/form-data`
    Form(Vec<(String, String)>),
}

/// One outbound call, owned by its issuer
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL
    pub path: String,
    pub body: Body,
    pub headers: HeaderMap,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: Body::Empty,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Body::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn form<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.body = Body::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }
}

/// HTTP client for the platform API, bound to one session store
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    pub(crate) session: SessionStore,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    login_path: String,
    pub(crate) default_expires_in_secs: u64,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("login_path", &self.login_path)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        config: &Config,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.api.timeout())
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api.resolved_base_url(),
            session,
            navigator,
            notifier,
            login_path: config.router.login_path.clone(),
            default_expires_in_secs: config.session.default_expires_in_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Run `request` through the pipeline and decode the payload
    pub async fn send<T: DeserializeOwned>(&self, mut request: ApiRequest) -> Result<T> {
        let span = tracing::info_span!(
            "api_request",
            id = %Uuid::new_v4(),
            method = %request.method,
            path = %request.path,
        );

        async move {
            self.outbound(&mut request).await;
            let outcome = self.dispatch(request).await;
            self.inbound(outcome).await
        }
        .instrument(span)
        .await
    }

    /// Attach the credential if the session is valid; never fails
    pub async fn outbound(&self, request: &mut ApiRequest) {
        let Some(credential) = self.session.authorization().await else {
            return;
        };

        match HeaderValue::from_str(&credential) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => tracing::warn!("Stored token is not a valid header value, sending without it"),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn dispatch(&self, request: ApiRequest) -> std::result::Result<Response, reqwest::Error> {
        let builder = self
            .http
            .request(request.method, self.url(&request.path))
            .headers(request.headers);

        let builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Form(fields) => {
                let form = fields
                    .into_iter()
                    .fold(reqwest::multipart::Form::new(), |form, (key, value)| {
                        form.text(key, value)
                    });
                builder.multipart(form)
            }
        };

        builder.send().await
    }

    async fn inbound<T: DeserializeOwned>(
        &self,
        outcome: std::result::Result<Response, reqwest::Error>,
    ) -> Result<T> {
        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, timeout = e.is_timeout(), "No response");
                return Err(self.reject(classify(None, None)).await);
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(error = %e, "Response body did not arrive");
                return Err(self.reject(classify(None, None)).await);
            }
        };

        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "Call succeeded");
            return decode(&bytes);
        }

        let payload = serde_json::from_slice::<Value>(&bytes).ok();
        Err(self
            .reject(classify(Some(status.as_u16()), payload.as_ref()))
            .await)
    }

    /// Side effects of a classified failure, run once per failing call
    async fn reject(&self, error: ApiError) -> Error {
        tracing::warn!(
            kind = %error.kind,
            status = ?error.status,
            "Call failed: {}",
            error.message
        );

        if error.kind.invalidates_session() {
            self.session.clear_session().await;
            self.navigator.navigate(&self.login_path);
        }

        self.notifier.notify(Notice::error(error.message.clone()));
        Error::Api(error)
    }
}

/// Empty bodies decode as `null`, so unit-returning calls succeed
fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_slice(bytes)?)
}
