//! Navigation errors and outcomes

use softnav_net::NetError;
use url::Url;

/// Why a soft navigation could not complete.
///
/// Every variant is recovered the same way: the pipeline hands the URL to
/// the browser for a normal page load.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// The server answered with a non-2xx status
    #[error("fetch of {url} failed with HTTP {status}")]
    FetchFailed { url: Url, status: u16 },

    /// Transport failure
    #[error("fetch of {url} failed: {source}")]
    Network {
        url: Url,
        #[source]
        source: NetError,
    },

    /// The fetched document has no content region
    #[error("{url} has no #{region} element")]
    ContentRegionMissing { url: Url, region: String },

    /// The live page has no (connected) content region to replace
    #[error("current page has no #{region} element")]
    LiveRegionMissing { region: String },
}

impl NavError {
    /// `FetchFailed` in the broad sense: anything that went wrong on the wire
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, NavError::FetchFailed { .. } | NavError::Network { .. })
    }
}

/// How one navigation ended
#[derive(Debug)]
pub enum NavigationOutcome {
    /// Content swapped in place and history updated as requested
    Swapped,
    /// Handed to the browser for a full page load (terminal)
    FellBackToFullLoad { reason: NavError },
    /// Overtaken by a newer navigation while suspended; nothing applied
    Superseded,
}

impl NavigationOutcome {
    pub fn is_swapped(&self) -> bool {
        matches!(self, NavigationOutcome::Swapped)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, NavigationOutcome::FellBackToFullLoad { .. })
    }

    /// Short label for logs and summaries
    pub fn label(&self) -> &'static str {
        match self {
            NavigationOutcome::Swapped => "swapped",
            NavigationOutcome::FellBackToFullLoad { .. } => "full-load",
            NavigationOutcome::Superseded => "superseded",
        }
    }
}

impl std::fmt::Display for NavigationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavigationOutcome::FellBackToFullLoad { reason } => write!(f, "full-load ({reason})"),
            other => f.write_str(other.label()),
        }
    }
}
