//! Authenticated client for the headless content API

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::BuildError;
use crate::helpers::join_endpoint;

/// Header carrying the API secret on every request (`X-API-KEY`)
pub const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client bound to one endpoint and key
///
/// The key header is attached once as a default header, so every fetch
/// made through this client is authenticated the same way.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ApiClient {
    /// Build a client from the API configuration
    pub fn new(config: &ApiConfig) -> Result<Self, BuildError> {
        if config.endpoint.is_empty() {
            return Err(BuildError::MissingConfig("api.endpoint / ENDPOINT"));
        }
        if config.api_key.is_empty() {
            return Err(BuildError::MissingConfig("api.api_key / API_KEY"));
        }

        let mut key =
            HeaderValue::from_str(&config.api_key).map_err(|_| BuildError::InvalidApiKey)?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("cms-blog/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build().map_err(BuildError::Client)?,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Full URL of a path below the endpoint
    pub fn url(&self, path: &str) -> String {
        join_endpoint(&self.endpoint, path)
    }

    /// GET a path below the endpoint and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BuildError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let mut request = self.http.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(|source| BuildError::Request {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BuildError::Status { url, status });
        }

        let body = response.text().await.map_err(|source| BuildError::Request {
            url: url.clone(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| BuildError::Decode { url, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ApiConfig {
        ApiConfig {
            endpoint: "https://demo.microcms.io/api/v1/".to_string(),
            api_key: "secret".to_string(),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn test_url() {
        let client = ApiClient::new(&config()).unwrap();
        assert_eq!(client.url("blogs"), "https://demo.microcms.io/api/v1/blogs");
        assert_eq!(client.url("/blogs/a1"), "https://demo.microcms.io/api/v1/blogs/a1");
    }

    #[test]
    fn test_missing_config() {
        let mut config = config();
        config.api_key.clear();
        assert!(matches!(
            ApiClient::new(&config),
            Err(BuildError::MissingConfig(_))
        ));

        let mut config = self::config();
        config.endpoint.clear();
        assert!(matches!(
            ApiClient::new(&config),
            Err(BuildError::MissingConfig(_))
        ));
    }

    #[test]
    fn test_invalid_key() {
        let mut config = config();
        config.api_key = "bad\nkey".to_string();
        assert!(matches!(
            ApiClient::new(&config),
            Err(BuildError::InvalidApiKey)
        ));
    }
}
