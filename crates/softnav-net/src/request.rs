//! Request description
//!
//! Mirrors the parts of a `fetch()` init that soft navigation relies on:
//! method, headers and the credentials mode.

use std::collections::BTreeMap;
use url::Url;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Head,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
        }
    }
}

/// Credentials mode (`fetch()` `credentials` option)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Credentials {
    /// Never send cookies
    Omit,
    /// Send cookies only when the request stays on the initiator's origin
    #[default]
    SameOrigin,
    /// Always send cookies
    Include,
}

/// Request configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    pub credentials: Credentials,
    /// Origin of the page issuing the request, if any
    pub initiator: Option<Url>,
}

impl Request {
    /// `GET` with default (`same-origin`) credentials
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::Get,
            url,
            headers: BTreeMap::new(),
            credentials: Credentials::default(),
            initiator: None,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Record the page that issues the request
    pub fn with_initiator(mut self, initiator: Url) -> Self {
        self.initiator = Some(initiator);
        self
    }

    /// Whether cookies should accompany this request
    pub fn sends_credentials(&self) -> bool {
        match self.credentials {
            Credentials::Omit => false,
            Credentials::Include => true,
            Credentials::SameOrigin => self
                .initiator
                .as_ref()
                .is_none_or(|init| init.origin() == self.url.origin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_request_builder() {
        let req = Request::get(url("https://ib.example/about.html"))
            .with_header("Accept", "text/html");

        assert_eq!(req.method, Method::Get);
        assert_eq!(req.credentials, Credentials::SameOrigin);
        assert_eq!(req.headers.get("Accept").map(String::as_str), Some("text/html"));
    }

    #[test]
    fn test_same_origin_credentials() {
        let page = url("https://ib.example/index.html");
        let same = Request::get(url("https://ib.example/about.html")).with_initiator(page.clone());
        let cross = Request::get(url("https://cdn.example/x.html")).with_initiator(page);

        assert!(same.sends_credentials());
        assert!(!cross.sends_credentials());
        assert!(!same.clone().with_credentials(Credentials::Omit).sends_credentials());
        assert!(cross.with_credentials(Credentials::Include).sends_credentials());
    }

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Head.as_str(), "HEAD");
        assert_eq!(Method::Post.as_str(), "POST");
    }
}
