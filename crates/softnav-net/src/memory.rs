//! In-memory fetcher
//!
//! Serves canned responses keyed by URL (fragment ignored) and logs every
//! request it sees. Unknown URLs answer `404`.

use crate::{Fetcher, NetError, Request, Response};
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use url::Url;

#[derive(Debug, Clone)]
enum Canned {
    Response(Response),
    Error(NetError),
}

/// Fetcher serving responses from a table
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    routes: RefCell<HashMap<String, Canned>>,
    log: RefCell<Vec<Request>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(url: &str) -> String {
        match Url::parse(url) {
            Ok(mut parsed) => {
                parsed.set_fragment(None);
                parsed.to_string()
            }
            Err(_) => url.to_string(),
        }
    }

    /// Serve `html` with status 200 at `url`
    pub fn insert_page(&self, url: &str, html: &str) {
        self.insert_response(url, Response::html(url, html));
    }

    /// Serve a response with an arbitrary status at `url`
    pub fn insert_status(&self, url: &str, status: u16, body: &str) {
        self.insert_response(url, Response::with_status(url, status, body));
    }

    /// Serve a prepared response at `url`
    pub fn insert_response(&self, url: &str, response: Response) {
        self.routes
            .borrow_mut()
            .insert(Self::key(url), Canned::Response(response));
    }

    /// Fail requests to `url` with a transport error
    pub fn insert_error(&self, url: &str, error: NetError) {
        self.routes
            .borrow_mut()
            .insert(Self::key(url), Canned::Error(error));
    }

    /// Forget the route for `url`
    pub fn remove(&self, url: &str) {
        self.routes.borrow_mut().remove(&Self::key(url));
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<Request> {
        self.log.borrow().clone()
    }

    /// URLs requested so far, in order
    pub fn requested_urls(&self) -> Vec<String> {
        self.log.borrow().iter().map(|r| r.url.to_string()).collect()
    }

    fn lookup(&self, request: &Request) -> Result<Response, NetError> {
        let key = Self::key(request.url.as_str());
        match self.routes.borrow().get(&key) {
            Some(Canned::Response(resp)) => Ok(resp.clone()),
            Some(Canned::Error(err)) => Err(err.clone()),
            None => Ok(Response::with_status(&key, 404, "Not Found")),
        }
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, request: Request) -> impl Future<Output = Result<Response, NetError>> {
        tracing::debug!(url = %request.url, "memory fetch");
        let result = self.lookup(&request);
        self.log.borrow_mut().push(request);
        std::future::ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(url: &str) -> Request {
        Request::get(Url::parse(url).unwrap())
    }

    #[test]
    fn test_serves_pages_and_404() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert_page("https://ib.example/about.html", "<title>About</title>");

        let ok = smol::block_on(fetcher.fetch(get("https://ib.example/about.html#team"))).unwrap();
        assert!(ok.ok());
        assert_eq!(ok.text(), "<title>About</title>");

        let missing = smol::block_on(fetcher.fetch(get("https://ib.example/nope.html"))).unwrap();
        assert_eq!(missing.status, 404);

        assert_eq!(
            fetcher.requested_urls(),
            vec![
                "https://ib.example/about.html#team".to_string(),
                "https://ib.example/nope.html".to_string(),
            ]
        );
    }

    #[test]
    fn test_transport_error() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert_error(
            "https://ib.example/down.html",
            NetError::Network("connection reset".to_string()),
        );
        let err = smol::block_on(fetcher.fetch(get("https://ib.example/down.html"))).unwrap_err();
        assert_eq!(err, NetError::Network("connection reset".to_string()));
    }
}
