//! softnav HTML Parser
//!
//! HTML5 parsing built on html5ever. Fetched pages and the initial page
//! both go through here to become `softnav_dom::Document`s.

mod parser;

pub use parser::HtmlParser;
pub use softnav_dom::Document;

/// Parse an HTML string into a detached document
pub fn parse(html: &str, url: &str) -> Document {
    HtmlParser::new().parse_with_url(html, url)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),
}
