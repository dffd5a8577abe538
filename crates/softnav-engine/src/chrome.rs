//! Page chrome
//!
//! Header shadow, mobile navigation overlay, active nav link and the
//! active-pill indicator. These live outside the content region, so the
//! same nodes survive every swap.

use crate::{Host, NavConfig, Selectors};
use softnav_dom::{Document, NodeId};

/// Mobile navigation: toggle button, slide-out panel and backdrop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MobileNav {
    pub toggle: NodeId,
    pub panel: NodeId,
    pub overlay: NodeId,
}

/// Chrome elements located once at attach time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChromeHandles {
    pub header: Option<NodeId>,
    /// Present only when toggle, panel and overlay all exist
    pub mobile: Option<MobileNav>,
}

impl ChromeHandles {
    pub fn locate(document: &Document, selectors: &Selectors) -> Self {
        let header = document.query_selector(&selectors.header);
        let mobile = match (
            document.query_selector(&selectors.toggle),
            document.query_selector(&selectors.mobile_nav),
            document.query_selector(&selectors.overlay),
        ) {
            (Some(toggle), Some(panel), Some(overlay)) => Some(MobileNav {
                toggle,
                panel,
                overlay,
            }),
            _ => None,
        };
        Self { header, mobile }
    }
}

// === Header ===

/// Toggle the `scrolled` class from the scroll offset
pub fn set_header_shadow(document: &mut Document, header: Option<NodeId>, scroll_y: f32, config: &NavConfig) {
    if let Some(header) = header {
        let scrolled = scroll_y > config.header_scroll_threshold;
        document
            .tree_mut()
            .toggle_class(header, &config.classes.scrolled, Some(scrolled));
    }
}

// === Mobile nav ===

pub fn is_nav_open(document: &Document, mobile: &MobileNav, config: &NavConfig) -> bool {
    document.tree().has_class(mobile.panel, &config.classes.open)
}

pub fn open_nav(document: &mut Document, mobile: &MobileNav, config: &NavConfig) {
    set_nav_open(document, mobile, config, true);
}

pub fn close_nav(document: &mut Document, mobile: &MobileNav, config: &NavConfig) {
    set_nav_open(document, mobile, config, false);
}

/// Toggle button click; returns whether the nav is now open
pub fn toggle_nav(document: &mut Document, mobile: &MobileNav, config: &NavConfig) -> bool {
    let open = !is_nav_open(document, mobile, config);
    set_nav_open(document, mobile, config, open);
    open
}

fn set_nav_open(document: &mut Document, mobile: &MobileNav, config: &NavConfig, open: bool) {
    let body = document.body();
    let class = config.classes.open.as_str();
    let tree = document.tree_mut();
    for node in [mobile.toggle, mobile.panel, mobile.overlay] {
        tree.toggle_class(node, class, Some(open));
    }
    tree.set_attribute(mobile.toggle, "aria-expanded", if open { "true" } else { "false" });
    // Lock page scroll behind the overlay
    tree.set_style_property(body, "overflow", if open { "hidden" } else { "" });
}

// === Active link ===

/// Last path segment, or the index document for a directory path
pub fn current_page(path: &str, index_document: &str) -> String {
    match path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => index_document.to_string(),
    }
}

/// Mark nav links whose raw `href` equals the current page; clear the rest.
///
/// Returns the links now active.
pub fn set_active_nav(document: &mut Document, path: &str, config: &NavConfig, selectors: &Selectors) -> Vec<NodeId> {
    let page = current_page(path, &config.index_document);
    let links = document.query_selector_all(&selectors.nav_links);
    let tree = document.tree_mut();

    let mut active = Vec::new();
    for link in links {
        let is_active = tree.attribute(link, "href") == Some(page.as_str());
        tree.toggle_class(link, &config.classes.active, Some(is_active));
        if is_active {
            active.push(link);
        }
    }
    tracing::trace!(page = %page, active = active.len(), "active nav updated");
    active
}

/// Flag the nav enclosing `link` as mid-navigation
pub fn mark_navigating(document: &mut Document, link: NodeId, config: &NavConfig, selectors: &Selectors) {
    if let Some(nav) = document.tree().closest(link, &selectors.nav) {
        document.tree_mut().add_class(nav, &config.classes.navigating);
    }
}

pub fn clear_navigating(document: &mut Document, config: &NavConfig, selectors: &Selectors) {
    if let Some(nav) = document.query_selector(&selectors.nav) {
        document.tree_mut().remove_class(nav, &config.classes.navigating);
    }
}

// === Pill indicator ===

/// Position the pill under `target`, or under the active desktop link.
///
/// Does nothing at or below the breakpoint. Returns `true` if the pill was
/// positioned.
pub fn update_nav_indicator<H: Host>(
    document: &mut Document,
    host: &H,
    target: Option<NodeId>,
    config: &NavConfig,
    selectors: &Selectors,
) -> bool {
    let Some(nav) = document.query_selector(&selectors.nav) else {
        return false;
    };
    if host.viewport().width <= config.pill_breakpoint {
        return false;
    }

    let active = target.or_else(|| {
        let tree = document.tree();
        tree.query_selector_all(nav, &selectors.pill_links)
            .into_iter()
            .find(|&link| tree.has_class(link, &config.classes.active))
    });
    let Some(link) = active else {
        document.tree_mut().remove_class(nav, &config.classes.has_active_pill);
        return false;
    };

    let Some(link_rect) = host.element_rect(document, link) else {
        tracing::trace!(link = %link, "active link has no layout box");
        return false;
    };
    let nav_x = host.element_rect(document, nav).map_or(0.0, |r| r.x);
    let left = (link_rect.x - nav_x).max(0.0);

    let tree = document.tree_mut();
    tree.set_style_property(nav, "--nav-pill-x", &format!("{left}px"));
    tree.set_style_property(nav, "--nav-pill-w", &format!("{}px", link_rect.width));
    tree.add_class(nav, &config.classes.has_active_pill);
    true
}
