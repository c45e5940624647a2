//! Plain JSON GETs against the claim services
//!
//! Each wallet gets its own [`HttpClient`]: a direct client plus, when the
//! wallet has one, a client tunnelled through its proxy.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::domain::ProxyAddr;
use crate::error::{ClaimerError, Result};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(100);

#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// GET `url` and parse the body as JSON.
    ///
    /// Non-2xx status, connection failure, malformed URL and unparsable
    /// bodies are all errors.
    async fn get_json(&self, url: &str, use_proxy: bool) -> Result<serde_json::Value>;
}

#[derive(Clone)]
pub struct HttpClient {
    direct: Client,
    proxied: Option<Client>,
}

impl HttpClient {
    pub fn new(proxy: Option<&ProxyAddr>, timeout: Duration) -> Result<Self> {
        let direct = Client::builder().timeout(timeout).build()?;

        let proxied = match proxy {
            Some(proxy) => {
                let reqwest_proxy = reqwest::Proxy::all(proxy.to_url())
                    .map_err(|_| ClaimerError::InvalidProxy(proxy.to_string()))?;
                Some(Client::builder().timeout(timeout).proxy(reqwest_proxy).build()?)
            }
            None => None,
        };

        Ok(Self { direct, proxied })
    }

    pub fn has_proxy(&self) -> bool {
        self.proxied.is_some()
    }

    fn client(&self, use_proxy: bool) -> &Client {
        match (&self.proxied, use_proxy) {
            (Some(proxied), true) => proxied,
            _ => &self.direct,
        }
    }
}

#[async_trait]
impl JsonFetcher for HttpClient {
    async fn get_json(&self, url: &str, use_proxy: bool) -> Result<serde_json::Value> {
        let parsed = url::Url::parse(url).map_err(|e| ClaimerError::InvalidUrl(format!("{}: {}", url, e)))?;

        debug!("GET {} (proxy: {})", parsed, use_proxy && self.has_proxy());

        let response = self.client(use_proxy).get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClaimerError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn malformed_url_is_rejected_before_sending() {
        let client = HttpClient::new(None, Duration::from_secs(1)).unwrap();
        let err = client.get_json("not a url", false).await.unwrap_err();
        assert!(matches!(err, ClaimerError::InvalidUrl(_)));
    }

    #[test]
    fn proxy_client_only_built_when_configured() {
        let plain = HttpClient::new(None, DEFAULT_REQUEST_TIMEOUT).unwrap();
        assert!(!plain.has_proxy());

        let proxy = ProxyAddr::parse("user:pass@127.0.0.1:3128").unwrap();
        let proxied = HttpClient::new(Some(&proxy), DEFAULT_REQUEST_TIMEOUT).unwrap();
        assert!(proxied.has_proxy());
    }
}
