//! Content swapper
//!
//! Installs the content region of a fetched document in place of the live
//! one and brings the page head (title, description) in line with it.

use crate::NavigableDocument;
use softnav_dom::{Document, NodeId};

/// Replace `current` with the incoming region and update the head.
///
/// The outgoing region is released from the arena, so its node ids stop
/// resolving and its slots are reused by the next import. Returns the new live region, or `None` (with the page untouched) when
/// `current` is not attached to the page.
pub fn swap_content(live: &mut Document, current: NodeId, incoming: &NavigableDocument) -> Option<NodeId> {
    if !live.tree().is_connected(current) {
        return None;
    }

    let tree = live.tree_mut();
    let region = tree.import_subtree(incoming.document.tree(), incoming.region);
    if !tree.replace_with(current, region) {
        return None;
    }
    tree.remove_subtree(current);

    update_head(live, incoming);
    live.set_url(incoming.url.as_str());
    tracing::debug!(old = %current, new = %region, url = %incoming.url, "content region swapped");
    Some(region)
}

/// Copy title and description from the incoming document.
///
/// The description is only written when both documents carry the tag.
pub fn update_head(live: &mut Document, incoming: &NavigableDocument) {
    live.set_title(&incoming.title());

    let Some(next) = incoming.description() else {
        return;
    };
    if let Some(meta) = live.meta_element("description") {
        live.tree_mut().set_attribute(meta, "content", next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use softnav_html::parse;
    use url::Url;

    const LIVE: &str = r#"<head><title>Home</title><meta name="description" content="home"></head>
        <body><header>h</header><main id="page-content" class="page-transition-out">old</main><footer>f</footer></body>"#;

    fn incoming(html: &str) -> NavigableDocument {
        let url = Url::parse("https://ib.example/about.html").unwrap();
        let document = parse(html, url.as_str());
        NavigableDocument::from_document(url, document, "page-content").unwrap()
    }

    #[test]
    fn test_swap_replaces_in_place() {
        let mut live = parse(LIVE, "https://ib.example/");
        let old = live.get_element_by_id("page-content").unwrap();
        let next = incoming(r#"<title>About</title><meta name="description" content="about"><main id="page-content">new</main>"#);

        let region = swap_content(&mut live, old, &next).unwrap();

        assert_ne!(region, old);
        assert!(!live.tree().is_connected(old));
        assert_eq!(live.get_element_by_id("page-content"), Some(region));
        assert_eq!(live.count_elements_with_id("page-content"), 1);
        assert_eq!(live.tree().text_content(live.body()), "hnewf");
        assert_eq!(live.title(), "About");
        assert_eq!(live.meta_content("description"), Some("about"));
        assert_eq!(live.url(), "https://ib.example/about.html");
        assert!(!live.tree().has_class(region, "page-transition-out"));
        assert!(live.tree().get(old).is_none());
    }

    #[test]
    fn test_repeated_swaps_reuse_arena() {
        let mut live = parse(LIVE, "https://ib.example/");
        let next = incoming(r#"<title>About</title><main id="page-content"><p>one</p><p>two</p></main>"#);
        let mut region = live.get_element_by_id("page-content").unwrap();

        region = swap_content(&mut live, region, &next).unwrap();
        let slots = live.tree().capacity();
        for _ in 0..10 {
            region = swap_content(&mut live, region, &next).unwrap();
        }

        assert_eq!(live.tree().capacity(), slots);
        assert_eq!(live.tree().text_content(region), "onetwo");
        assert_eq!(live.count_elements_with_id("page-content"), 1);
    }

    #[test]
    fn test_description_needs_both_tags() {
        let mut live = parse(LIVE, "https://ib.example/");
        let old = live.get_element_by_id("page-content").unwrap();
        let next = incoming(r#"<title>Bare</title><main id="page-content">x</main>"#);

        swap_content(&mut live, old, &next).unwrap();
        assert_eq!(live.title(), "Bare");
        assert_eq!(live.meta_content("description"), Some("home"));
    }

    #[test]
    fn test_detached_region_is_refused() {
        let mut live = parse(LIVE, "https://ib.example/");
        let old = live.get_element_by_id("page-content").unwrap();
        live.tree_mut().detach(old);
        let next = incoming(r#"<main id="page-content">x</main>"#);

        assert!(swap_content(&mut live, old, &next).is_none());
        assert_eq!(live.title(), "Home");
    }
}
