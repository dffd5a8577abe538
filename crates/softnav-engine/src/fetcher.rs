//! Document fetcher
//!
//! Retrieves a destination page and turns it into a [`NavigableDocument`].
//! The network request and the body read are the suspension points; parsing
//! happens synchronously once the text is in hand.

use crate::NavError;
use softnav_dom::{Document, NodeId};
use softnav_html::HtmlParser;
use softnav_net::{Credentials, Fetcher, Request};
use url::Url;

/// A fetched, parsed page with its content region located
#[derive(Debug)]
pub struct NavigableDocument {
    pub url: Url,
    pub document: Document,
    /// Content region inside `document`
    pub region: NodeId,
}

impl NavigableDocument {
    /// Locate the content region of an already parsed document
    pub fn from_document(url: Url, document: Document, region_id: &str) -> Result<Self, NavError> {
        let region = document
            .get_element_by_id(region_id)
            .ok_or_else(|| NavError::ContentRegionMissing {
                url: url.clone(),
                region: region_id.to_string(),
            })?;
        Ok(Self {
            url,
            document,
            region,
        })
    }

    /// `<title>` text
    pub fn title(&self) -> String {
        self.document.title()
    }

    /// `<meta name="description">` content
    pub fn description(&self) -> Option<&str> {
        self.document.meta_content("description")
    }
}

/// Fetch `url` on behalf of the page at `initiator` and parse it.
pub async fn fetch_document<F: Fetcher>(
    fetcher: &F,
    url: &Url,
    initiator: &Url,
    region_id: &str,
) -> Result<NavigableDocument, NavError> {
    let request = Request::get(url.clone())
        .with_credentials(Credentials::SameOrigin)
        .with_initiator(initiator.clone())
        .with_header("Accept", "text/html");

    let response = fetcher
        .fetch(request)
        .await
        .map_err(|source| NavError::Network {
            url: url.clone(),
            source,
        })?;
    if !response.ok() {
        return Err(NavError::FetchFailed {
            url: url.clone(),
            status: response.status,
        });
    }
    let html = response.text();

    let document = HtmlParser::new().parse_with_url(&html, url.as_str());
    tracing::debug!(url = %url, nodes = document.tree().len(), "fetched document parsed");
    NavigableDocument::from_document(url.clone(), document, region_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use softnav_net::{MemoryFetcher, NetError};

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn fetch(fetcher: &MemoryFetcher, target: &str) -> Result<NavigableDocument, NavError> {
        smol::block_on(fetch_document(
            fetcher,
            &url(target),
            &url("https://ib.example/"),
            "page-content",
        ))
    }

    #[test]
    fn test_fetch_success() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert_page(
            "https://ib.example/about.html",
            r#"<title>About</title><meta name="description" content="d"><main id="page-content">hi</main>"#,
        );
        let doc = fetch(&fetcher, "https://ib.example/about.html").unwrap();
        assert_eq!(doc.title(), "About");
        assert_eq!(doc.description(), Some("d"));
        assert_eq!(doc.document.tree().text_content(doc.region), "hi");

        let sent = &fetcher.requests()[0];
        assert_eq!(sent.credentials, Credentials::SameOrigin);
        assert_eq!(sent.headers.get("Accept").map(String::as_str), Some("text/html"));
    }

    #[test]
    fn test_fetch_error_status() {
        let fetcher = MemoryFetcher::new();
        let err = fetch(&fetcher, "https://ib.example/missing.html").unwrap_err();
        assert!(matches!(err, NavError::FetchFailed { status: 404, .. }));
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn test_fetch_network_error() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert_error("https://ib.example/a.html", NetError::Network("reset".into()));
        let err = fetch(&fetcher, "https://ib.example/a.html").unwrap_err();
        assert!(matches!(err, NavError::Network { .. }));
    }

    #[test]
    fn test_fetch_missing_region() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert_page("https://ib.example/raw.html", "<main id=\"content\"></main>");
        let err = fetch(&fetcher, "https://ib.example/raw.html").unwrap_err();
        assert!(matches!(err, NavError::ContentRegionMissing { .. }));
        assert!(!err.is_fetch_failure());
    }
}
