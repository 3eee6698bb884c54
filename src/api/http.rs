use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("built without network support")]
    Disabled,
}

/// The wire underneath `HttpClient`. Returns the decoded JSON body.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value, TransportError>;
}

/// Uniform response envelope. Domain-specific top-level fields land in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiResponse {
    pub const SUCCESS: i64 = 200;
    pub const FAILURE: i64 = 500;

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            code: Self::FAILURE,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Self::SUCCESS
    }

    /// Decode `data` into `T`. A missing or mismatched payload is logged and yields `None`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Option<T> {
        let data = self.data.clone()?;
        match serde_json::from_value(data) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("unexpected response payload: {e}");
                None
            }
        }
    }
}

/// Cheap-to-clone handle shared by every remote store.
#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    token: Arc<Mutex<Option<String>>>,
}

impl HttpClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, default_transport())
    }

    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            token: Arc::new(Mutex::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = token;
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|t| t.clone())
    }

    /// Never fails: transport and decode errors come back as code 500.
    pub fn request(&self, path: &str, method: Method, payload: Option<&Value>) -> ApiResponse {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("{method:?} {url}");
        let token = self.token();
        let body = match self.transport.send(method, &url, payload, token.as_deref()) {
            Ok(body) => body,
            Err(e) => {
                log::warn!("{method:?} {path} failed: {e}");
                return ApiResponse::failure(e.to_string());
            }
        };
        match serde_json::from_value::<ApiResponse>(body) {
            Ok(response) => {
                if !response.is_success() {
                    log::info!("{path} answered code {}", response.code);
                }
                response
            }
            Err(e) => {
                log::warn!("{path} returned a malformed envelope: {e}");
                ApiResponse::failure(format!("malformed response: {e}"))
            }
        }
    }

    pub fn post(&self, path: &str, payload: &Value) -> ApiResponse {
        self.request(path, Method::Post, Some(payload))
    }

    pub fn get(&self, path: &str) -> ApiResponse {
        self.request(path, Method::Get, None)
    }
}

#[cfg(feature = "network")]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "network")]
impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[cfg(feature = "network")]
impl Transport for ReqwestTransport {
    fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value, TransportError> {
        let mut builder = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url).json(body.unwrap_or(&Value::Null)),
        };
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        let response = builder
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        response
            .json::<Value>()
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

pub struct DisabledTransport;

impl Transport for DisabledTransport {
    fn send(
        &self,
        _method: Method,
        _url: &str,
        _body: Option<&Value>,
        _token: Option<&str>,
    ) -> Result<Value, TransportError> {
        Err(TransportError::Disabled)
    }
}

#[cfg(feature = "network")]
pub fn default_transport() -> Arc<dyn Transport> {
    match ReqwestTransport::new() {
        Ok(transport) => Arc::new(transport),
        Err(e) => {
            log::error!("falling back to offline transport: {e}");
            Arc::new(DisabledTransport)
        }
    }
}

#[cfg(not(feature = "network"))]
pub fn default_transport() -> Arc<dyn Transport> {
    Arc::new(DisabledTransport)
}
