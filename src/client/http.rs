use crate::{Error, Result};
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client wrapper shared by the service clients.
///
/// Owns the base URL, the per-service default headers and a hard client
/// timeout, and normalizes status/JSON handling into the crate error type.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    default_headers: HeaderMap,
}

/// Pagination and freshness metadata read from response headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseMeta {
    pub page: Option<u32>,
    pub page_count: Option<u32>,
    pub item_count: Option<u64>,
    pub last_modified: Option<String>,
}

impl ResponseMeta {
    fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            page: read("x-pagination-page").and_then(|v| v.parse().ok()),
            page_count: read("x-pagination-page-count").and_then(|v| v.parse().ok()),
            item_count: read("x-pagination-item-count").and_then(|v| v.parse().ok()),
            last_modified: read("last-modified"),
        }
    }
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(concat!("showdeck/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            default_headers: HeaderMap::new(),
        }
    }

    /// Set headers sent with every request (API version, key headers)
    #[must_use]
    pub fn with_default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    /// Build full URL from endpoint
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Execute GET request and parse JSON response
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let (payload, _) = self.get_with_meta(endpoint, params, None).await?;
        Ok(payload)
    }

    /// GET with a bearer token taken from the active session
    pub async fn get_auth<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        bearer: &str,
    ) -> Result<T> {
        let (payload, _) = self.get_with_meta(endpoint, params, Some(bearer)).await?;
        Ok(payload)
    }

    /// GET returning both the payload and the response-header metadata
    /// (pagination counters, last-modified marker).
    pub async fn get_with_meta<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        bearer: Option<&str>,
    ) -> Result<(T, ResponseMeta)> {
        let mut request = self
            .client
            .get(self.url(endpoint))
            .headers(self.default_headers.clone())
            .query(params);
        if let Some(token) = bearer {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await.map_err(Error::Network)?;
        let meta = ResponseMeta::from_headers(response.headers());
        let payload = Self::handle_response(response).await?;
        Ok((payload, meta))
    }

    /// Execute POST request with JSON body and parse JSON response
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<T> {
        let response = self.send_json(reqwest::Method::POST, endpoint, body, bearer).await?;
        Self::handle_response(response).await
    }

    /// POST returning only the status code, for action endpoints whose
    /// response body is irrelevant.
    pub async fn post_status<B: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<StatusCode> {
        let response = self.send_json(reqwest::Method::POST, endpoint, body, bearer).await?;
        Ok(response.status())
    }

    /// DELETE returning only the status code
    pub async fn delete_status(&self, endpoint: &str, bearer: Option<&str>) -> Result<StatusCode> {
        let mut request = self
            .client
            .delete(self.url(endpoint))
            .headers(self.default_headers.clone());
        if let Some(token) = bearer {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = request.send().await.map_err(Error::Network)?;
        Ok(response.status())
    }

    async fn send_json<B: serde::Serialize>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response> {
        let mut request = self
            .client
            .request(method, self.url(endpoint))
            .headers(self.default_headers.clone())
            .json(body);
        if let Some(token) = bearer {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        request.send().await.map_err(Error::Network)
    }

    /// Handle response and parse JSON
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let message = response.text().await.unwrap_or_default();

            return Err(Error::Api {
                status: status_code,
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Parse(format!("JSON parse error: {e}")))
    }
}
