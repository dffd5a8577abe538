//! softnav Networking
//!
//! The fetch capability used by soft navigation: request/response types,
//! the [`Fetcher`] trait, a real HTTP implementation and an in-memory one.

mod http;
mod memory;
mod request;

pub use http::HttpFetcher;
pub use memory::MemoryFetcher;
pub use request::{Credentials, Method, Request};
pub use url::Url;

use std::future::Future;

/// Something that can perform a network request.
///
/// Implementations resolve once the full body has been read, so a
/// successful [`Response`] always carries its complete body.
pub trait Fetcher {
    fn fetch(&self, request: Request) -> impl Future<Output = Result<Response, NetError>>;
}

impl<F: Fetcher + ?Sized> Fetcher for std::rc::Rc<F> {
    fn fetch(&self, request: Request) -> impl Future<Output = Result<Response, NetError>> {
        (**self).fetch(request)
    }
}

/// HTTP Response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Final URL after redirects
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// Build a `200 text/html` response
    pub fn html(url: &str, body: &str) -> Self {
        Self {
            url: url.to_string(),
            status: 200,
            headers: vec![("Content-Type".to_string(), "text/html; charset=utf-8".to_string())],
            body: body.as_bytes().to_vec(),
        }
    }

    /// Build a response with an arbitrary status
    pub fn with_status(url: &str, status: u16, body: &str) -> Self {
        Self {
            status,
            ..Self::html(url, body)
        }
    }

    /// Check if response is OK (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body as UTF-8 text; invalid sequences become U+FFFD
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Network error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetError {
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
