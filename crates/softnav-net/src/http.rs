//! HTTP fetcher
//!
//! reqwest's blocking client driven from smol's blocking pool, so the
//! navigation task stays on its single-threaded executor while the
//! request is in flight.

use crate::{Fetcher, Method, NetError, Request, Response};
use std::future::Future;
use std::time::Duration;

const USER_AGENT: &str = concat!("softnav/", env!("CARGO_PKG_VERSION"));

/// Fetcher backed by a real HTTP client with a shared cookie store
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// Client with cookie store, used when credentials are sent
    credentialed: reqwest::blocking::Client,
    /// Cookie-less client
    anonymous: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher with a 30s request timeout
    pub fn new() -> Result<Self, NetError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a fetcher with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, NetError> {
        let build = |cookies: bool| {
            reqwest::blocking::Client::builder()
                .user_agent(USER_AGENT)
                .cookie_store(cookies)
                .timeout(timeout)
                .build()
                .map_err(|e| NetError::Network(e.to_string()))
        };
        Ok(Self {
            credentialed: build(true)?,
            anonymous: build(false)?,
        })
    }

    fn send_blocking(client: &reqwest::blocking::Client, request: Request) -> Result<Response, NetError> {
        tracing::info!(method = request.method.as_str(), url = %request.url, "HTTP request");

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
            Method::Post => reqwest::Method::POST,
        };
        let mut builder = client.request(method, request.url.as_str());
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let resp = builder.send().map_err(|e| NetError::Network(e.to_string()))?;
        let status = resp.status().as_u16();
        let url = resp.url().to_string();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = resp
            .bytes()
            .map_err(|e| NetError::Network(e.to_string()))?
            .to_vec();

        tracing::debug!(status, url = %url, bytes = body.len(), "HTTP response");
        Ok(Response {
            url,
            status,
            headers,
            body,
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, request: Request) -> impl Future<Output = Result<Response, NetError>> {
        let client = if request.sends_credentials() {
            self.credentialed.clone()
        } else {
            self.anonymous.clone()
        };
        smol::unblock(move || Self::send_blocking(&client, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent() {
        assert!(USER_AGENT.starts_with("softnav/"));
    }

    #[test]
    fn test_client_builds() {
        assert!(HttpFetcher::with_timeout(Duration::from_secs(1)).is_ok());
    }
}
