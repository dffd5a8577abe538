//! Query and mutation tests for softnav-dom
//!
//! Builds small site skeletons by hand and exercises the selector engine
//! the way the navigation layer uses it.

use softnav_dom::{Document, NodeId, SelectorList};

fn element(doc: &mut Document, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let tree = doc.tree_mut();
    let id = tree.create_element(tag);
    for (name, value) in attrs {
        tree.set_attribute(id, name, value);
    }
    tree.append_child(parent, id);
    id
}

fn site() -> (Document, Vec<NodeId>) {
    let mut doc = Document::new("https://ib.example/index.html");
    let body = doc.body();
    let header = element(&mut doc, body, "header", &[("class", "site-header")]);
    let nav = element(&mut doc, header, "nav", &[("class", "nav-links")]);
    let home = element(&mut doc, nav, "a", &[("href", "index.html")]);
    let about = element(&mut doc, nav, "a", &[("href", "about.html")]);
    let cta = element(&mut doc, nav, "a", &[("href", "contact.html"), ("class", "nav-cta")]);
    let mobile = element(&mut doc, body, "div", &[("class", "mobile-nav")]);
    let m_about = element(&mut doc, mobile, "a", &[("href", "about.html")]);
    (doc, vec![home, about, cta, m_about])
}

// ============================================================================
// SELECTOR QUERIES
// ============================================================================

#[test]
fn test_nav_link_selector_list() {
    let (doc, links) = site();
    let sel = SelectorList::parse(".nav-links a:not(.nav-cta), .mobile-nav a").unwrap();
    let found = doc.query_selector_all(&sel);
    assert_eq!(found, vec![links[0], links[1], links[3]]);
}

#[test]
fn test_closest_from_inner_span() {
    let (mut doc, links) = site();
    let span = element(&mut doc, links[1], "span", &[]);
    let sel = SelectorList::parse("a[href]").unwrap();
    assert_eq!(doc.tree().closest(span, &sel), Some(links[1]));

    let nav = SelectorList::parse(".nav-links").unwrap();
    assert!(doc.tree().closest(span, &nav).is_some());
}

#[test]
fn test_query_selector_scoped() {
    let (doc, links) = site();
    let mobile = doc
        .query_selector(&SelectorList::parse(".mobile-nav").unwrap())
        .unwrap();
    let anchors = doc
        .tree()
        .query_selector_all(mobile, &SelectorList::parse("a").unwrap());
    assert_eq!(anchors, vec![links[3]]);
}

#[test]
fn test_selector_display_roundtrip() {
    let sel: SelectorList = "  meta[name=\"description\"] ".parse().unwrap();
    assert_eq!(sel.to_string(), "meta[name=\"description\"]");
}

// ============================================================================
// CLASS AND STYLE MUTATION
// ============================================================================

#[test]
fn test_class_toggles_visible_to_selectors() {
    let (mut doc, links) = site();
    let active = SelectorList::parse("a.active").unwrap();
    assert!(doc.query_selector(&active).is_none());

    doc.tree_mut().toggle_class(links[1], "active", Some(true));
    assert_eq!(doc.query_selector(&active), Some(links[1]));

    doc.tree_mut().remove_class(links[1], "active");
    assert!(doc.query_selector(&active).is_none());
}

#[test]
fn test_style_property_clear() {
    let (mut doc, _) = site();
    let body = doc.body();
    doc.tree_mut().set_style_property(body, "overflow", "hidden");
    assert_eq!(doc.tree().style_property(body, "overflow"), Some("hidden"));
    doc.tree_mut().set_style_property(body, "overflow", "");
    assert_eq!(doc.tree().style_property(body, "overflow"), None);
}
