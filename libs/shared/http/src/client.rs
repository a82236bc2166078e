use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::ApiError;

/// Thin adapter over the Smart Health HTTP API.
///
/// Every call is a single attempt bounded by the configured timeout. Non-2xx
/// answers become [`ApiError::Server`] carrying the `detail` field of the
/// body when there is one, and the raw body text otherwise.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.clone(),
            timeout: config.request_timeout,
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Issues a request and decodes the body as `T`.
    ///
    /// A `204 No Content` answer (or an empty body) decodes from JSON `null`,
    /// so `Option<T>`, `()` and `Value` all resolve to their empty value.
    pub async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self.client.request(method, &url).headers(self.get_headers());

        if let Some(body_data) = body {
            req = req.json(body_data);
        }

        let exchange = async {
            let response = req.send().await.map_err(|e| self.transport_error(e))?;
            let status = response.status();
            let text = response.text().await.map_err(|e| self.transport_error(e))?;
            Ok::<_, ApiError>((status, text))
        };

        let (status, text) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| self.timeout_error())??;

        if !status.is_success() {
            error!("API error ({}): {}", status, text);
            return Err(ApiError::Server {
                status: status.as_u16(),
                detail: extract_detail(status, &text),
            });
        }

        if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            return serde_json::from_value(Value::Null)
                .map_err(|e| ApiError::Decode(format!("empty response: {}", e)));
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Decode(format!("{}: {}", e, text)))
    }

    pub async fn get<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.request::<T, Value>(Method::GET, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, body).await
    }

    /// Sends a request whose successful body is ignored.
    pub async fn request_empty(&self, method: Method, path: &str) -> Result<(), ApiError> {
        self.request::<Value, Value>(method, path, None).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request_empty(Method::DELETE, path).await
    }

    fn timeout_error(&self) -> ApiError {
        ApiError::Timeout {
            after_ms: self.timeout.as_millis() as u64,
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            self.timeout_error()
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Unreachable(err.to_string())
        }
    }
}

/// Percent-encodes an identifier for use as a path segment.
pub fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

fn extract_detail(status: StatusCode, text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => text.to_string(),
        },
        _ if !text.trim().is_empty() => text.to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    }
}
