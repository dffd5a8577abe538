//! Link classifier
//!
//! Decides whether a clicked anchor is soft-navigated or left to the
//! browser. Pure: reads the anchor, the click modifiers and the current
//! location, touches nothing.

use softnav_dom::{DomTree, NodeId};
use url::Url;

/// Modifier keys held during a click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        meta: false,
        ctrl: false,
        shift: false,
        alt: false,
    };

    pub fn any(&self) -> bool {
        self.meta || self.ctrl || self.shift || self.alt
    }
}

/// A click delivered to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    /// Innermost element under the pointer
    pub target: NodeId,
    pub modifiers: Modifiers,
}

impl ClickEvent {
    /// Plain primary-button click
    pub fn on(target: NodeId) -> Self {
        Self {
            target,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Why a link is left to native behavior
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("no href")]
    MissingHref,
    #[error("fragment-only href")]
    FragmentOnly,
    #[error("opens a new browsing context")]
    NewBrowsingContext,
    #[error("marked as download")]
    Download,
    #[error("modifier key held")]
    ModifierKey,
    #[error("mailto: or tel: link")]
    MailOrTel,
    #[error("href does not resolve: {0}")]
    Unresolvable(#[from] url::ParseError),
    #[error("cross-origin destination")]
    CrossOrigin,
    #[error("same-page anchor")]
    SamePageAnchor,
}

/// Classify `anchor`; on acceptance returns the resolved destination.
pub fn classify(
    tree: &DomTree,
    anchor: NodeId,
    modifiers: Modifiers,
    location: &Url,
) -> Result<Url, Rejection> {
    let href = tree
        .attribute(anchor, "href")
        .filter(|h| !h.is_empty())
        .ok_or(Rejection::MissingHref)?;
    if href.starts_with('#') {
        return Err(Rejection::FragmentOnly);
    }
    if opens_new_context(tree.attribute(anchor, "target")) {
        return Err(Rejection::NewBrowsingContext);
    }
    if tree.has_attribute(anchor, "download") {
        return Err(Rejection::Download);
    }
    if modifiers.any() {
        return Err(Rejection::ModifierKey);
    }
    if has_scheme(href, "mailto:") || has_scheme(href, "tel:") {
        return Err(Rejection::MailOrTel);
    }

    let url = location.join(href.trim())?;
    if url.origin() != location.origin() {
        return Err(Rejection::CrossOrigin);
    }
    let hash_only = url.path() == location.path()
        && url.query() == location.query()
        && url.fragment().is_some_and(|f| !f.is_empty());
    if hash_only {
        return Err(Rejection::SamePageAnchor);
    }
    Ok(url)
}

/// Boolean form of [`classify`]
pub fn is_eligible(tree: &DomTree, anchor: NodeId, modifiers: Modifiers, location: &Url) -> bool {
    classify(tree, anchor, modifiers, location).is_ok()
}

fn opens_new_context(target: Option<&str>) -> bool {
    match target.map(str::trim) {
        None | Some("") => false,
        Some(t) if t.eq_ignore_ascii_case("_blank") => true,
        Some(t) => !t.starts_with('_'),
    }
}

fn has_scheme(href: &str, scheme: &str) -> bool {
    href.trim_start()
        .get(..scheme.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
}
