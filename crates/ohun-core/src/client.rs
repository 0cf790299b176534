//! Shared HTTP plumbing for the remote services
//!
//! Every service call goes through [`ApiClient`]: relative paths resolve
//! against the configured backend, blank query parameters are dropped, and
//! non-success statuses surface as [`Error::HttpStatus`] with the response
//! body. Requests are attempted once.

use reqwest::{multipart, Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::config::ServiceConfig;
use crate::error::{Error, Result};

/// Query parameters; `None` and blank values are skipped
pub type QueryParams<'a> = &'a [(&'a str, Option<String>)];

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ServiceConfig,
}

impl ApiClient {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: Client, config: ServiceConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Resolve an absolute URL or a backend-relative path and append the query.
    pub fn resolve_url(&self, url_or_path: &str, query: QueryParams<'_>) -> Result<Url> {
        let mut url = if is_absolute(url_or_path) {
            parse_url(url_or_path)?
        } else {
            parse_url(&format!("{}{}", self.require_base_url()?, url_or_path))?
        };

        let pairs: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| (*key, v))
            })
            .collect();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(url)
    }

    /// Build a backend URL from raw path segments, percent-encoding each one.
    pub fn asset_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = parse_url(self.require_base_url()?)?;
        url.path_segments_mut()
            .map_err(|_| Error::Configuration(format!("cannot append paths to '{}'", url_base(&self.config))))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url_or_path: &str,
        query: QueryParams<'_>,
    ) -> Result<Option<T>> {
        let url = self.resolve_url(url_or_path, query)?;
        self.send(self.http.get(url.clone()), &url).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url_or_path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        let url = self.resolve_url(url_or_path, &[])?;
        self.send(self.http.post(url.clone()).json(body), &url).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        url_or_path: &str,
        form: multipart::Form,
    ) -> Result<Option<T>> {
        let url = self.resolve_url(url_or_path, &[])?;
        self.send(self.http.post(url.clone()).multipart(form), &url)
            .await
    }

    /// Send a request; `204 No Content` yields `None`.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: &Url) -> Result<Option<T>> {
        debug!("Fetching from {}", url);

        let response = request.send().await.map_err(|e| {
            error!("Error during API request to {}: {}", url, e);
            Error::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("HTTP error for {}! Status: {}, Message: {}", url, status, body);
            return Err(Error::HttpStatus { status, body });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let payload = response.json::<T>().await.map_err(|e| {
            error!("Invalid JSON from {}: {}", url, e);
            Error::Http(e)
        })?;
        Ok(Some(payload))
    }

    fn require_base_url(&self) -> Result<&str> {
        self.config.base_url().ok_or_else(|| {
            Error::Configuration(
                "Backend URL not configured. Please set your BACKEND_BASE_URL.".to_string(),
            )
        })
    }
}

fn is_absolute(url_or_path: &str) -> bool {
    url_or_path.starts_with("http://") || url_or_path.starts_with("https://")
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| Error::Configuration(format!("invalid URL '{}': {}", raw, e)))
}

fn url_base(config: &ServiceConfig) -> &str {
    config.backend_base_url.as_deref().unwrap_or_default()
}
