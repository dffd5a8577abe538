//! History bridge
//!
//! Connects the pipeline to session history: successful click navigations
//! push an entry, back/forward traversals re-enter the pipeline without
//! pushing.

use crate::Host;
use url::Url;

/// Where to navigate and whether to record a history entry for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub url: Url,
    pub push: bool,
}

impl NavigationTarget {
    /// Link click: push on success
    pub fn push(url: Url) -> Self {
        Self { url, push: true }
    }

    /// History traversal: the entry already exists
    pub fn replay(url: Url) -> Self {
        Self { url, push: false }
    }
}

/// Push an entry without reloading when the target asks for it.
pub fn record_if_requested<H: Host>(host: &mut H, target: &NavigationTarget) -> bool {
    if target.push {
        host.push_state(&target.url);
    }
    target.push
}

/// Target for a pop signal: whatever the location is now.
pub fn pop_target<H: Host>(host: &H) -> NavigationTarget {
    NavigationTarget::replay(host.location())
}

/// Traverse by `delta`; yields the pop target if the location moved.
pub fn go<H: Host>(host: &mut H, delta: i32) -> Option<NavigationTarget> {
    host.traverse(delta).then(|| pop_target(host))
}

pub fn back<H: Host>(host: &mut H) -> Option<NavigationTarget> {
    go(host, -1)
}

pub fn forward<H: Host>(host: &mut H) -> Option<NavigationTarget> {
    go(host, 1)
}
