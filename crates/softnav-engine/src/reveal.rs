//! Reveal-on-scroll
//!
//! `.fade-up` elements get the `visible` class the first time enough of
//! them enters the viewport. Hosts without visibility observation reveal
//! everything at once; the choice is made when the navigator is attached.

use crate::{DOMRect, Host};
use softnav_dom::{Document, NodeId};

/// Margin applied to the viewport before intersecting.
///
/// Positive values grow the root box, negative values shrink it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RootMargin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl RootMargin {
    /// `0px 0px -{px}px 0px`
    pub fn shrink_bottom(px: f32) -> Self {
        Self {
            bottom: -px,
            ..Self::default()
        }
    }

    pub fn apply(&self, viewport: DOMRect) -> DOMRect {
        DOMRect {
            x: viewport.x - self.left,
            y: viewport.y - self.top,
            width: (viewport.width + self.left + self.right).max(0.0),
            height: (viewport.height + self.top + self.bottom).max(0.0),
        }
    }
}

/// One observation result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub bounding_client_rect: DOMRect,
    pub intersection_ratio: f32,
    pub is_intersecting: bool,
}

/// Single-threshold intersection observer over host layout boxes
#[derive(Debug, Clone)]
pub struct IntersectionObserver {
    threshold: f32,
    root_margin: RootMargin,
    observed: Vec<NodeId>,
}

impl IntersectionObserver {
    pub fn new(threshold: f32, root_margin: RootMargin) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            root_margin,
            observed: Vec::new(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn observe(&mut self, target: NodeId) {
        if !self.observed.contains(&target) {
            self.observed.push(target);
        }
    }

    pub fn unobserve(&mut self, target: NodeId) {
        self.observed.retain(|&n| n != target);
    }

    pub fn disconnect(&mut self) {
        self.observed.clear();
    }

    pub fn is_observing(&self, target: NodeId) -> bool {
        self.observed.contains(&target)
    }

    pub fn observed(&self) -> &[NodeId] {
        &self.observed
    }

    /// Keep only targets for which `keep` returns true
    pub fn retain(&mut self, keep: impl FnMut(&NodeId) -> bool) {
        self.observed.retain(keep);
    }

    /// Measure every observed target that has a layout box.
    pub fn take_records(
        &self,
        viewport: DOMRect,
        mut rect_of: impl FnMut(NodeId) -> Option<DOMRect>,
    ) -> Vec<IntersectionEntry> {
        let root = self.root_margin.apply(viewport);
        self.observed
            .iter()
            .filter_map(|&target| {
                let rect = rect_of(target)?;
                let intersection = rect.intersect(&root);
                let ratio = match intersection {
                    None => 0.0,
                    // Zero-area boxes count as fully visible once inside the root
                    Some(_) if rect.area() <= 0.0 => 1.0,
                    Some(i) => (i.area() / rect.area()).min(1.0),
                };
                Some(IntersectionEntry {
                    target,
                    bounding_client_rect: rect,
                    intersection_ratio: ratio,
                    is_intersecting: intersection.is_some(),
                })
            })
            .collect()
    }

    /// Entries that cross the threshold
    pub fn crossed(&self, entries: &[IntersectionEntry]) -> Vec<NodeId> {
        entries
            .iter()
            .filter(|e| e.is_intersecting && e.intersection_ratio >= self.threshold)
            .map(|e| e.target)
            .collect()
    }
}

/// How reveal targets become visible
#[derive(Debug, Clone)]
pub enum RevealStrategy {
    /// Reveal on first sufficient intersection
    Observe(IntersectionObserver),
    /// Reveal as soon as armed
    Immediate,
}

impl RevealStrategy {
    /// Pick the strategy a host supports
    pub fn for_host(supports_observation: bool, threshold: f32, bottom_margin: f32) -> Self {
        if supports_observation {
            RevealStrategy::Observe(IntersectionObserver::new(
                threshold,
                RootMargin::shrink_bottom(bottom_margin),
            ))
        } else {
            RevealStrategy::Immediate
        }
    }

    pub fn is_observing(&self) -> bool {
        matches!(self, RevealStrategy::Observe(_))
    }

    /// Number of targets still waiting to be revealed
    pub fn pending(&self) -> usize {
        match self {
            RevealStrategy::Observe(observer) => observer.observed().len(),
            RevealStrategy::Immediate => 0,
        }
    }

    /// Start tracking `targets`. Immediate reveal happens here; observed
    /// targets wait for the next [`check`](Self::check).
    ///
    /// Returns how many targets were revealed.
    pub fn arm(&mut self, document: &mut Document, targets: &[NodeId], visible_class: &str) -> usize {
        let fresh: Vec<NodeId> = targets
            .iter()
            .copied()
            .filter(|&n| !document.tree().has_class(n, visible_class))
            .collect();

        match self {
            RevealStrategy::Immediate => {
                for &node in &fresh {
                    document.tree_mut().add_class(node, visible_class);
                }
                fresh.len()
            }
            RevealStrategy::Observe(observer) => {
                for node in fresh {
                    observer.observe(node);
                }
                0
            }
        }
    }

    /// Re-measure observed targets, revealing those that crossed the
    /// threshold. Targets no longer in the page are dropped.
    pub fn check<H: Host>(&mut self, document: &mut Document, host: &H, visible_class: &str) -> usize {
        let RevealStrategy::Observe(observer) = self else {
            return 0;
        };

        observer.retain(|&n| document.tree().is_connected(n));
        let entries = observer.take_records(host.viewport(), |n| host.element_rect(document, n));
        let revealed = observer.crossed(&entries);
        for &node in &revealed {
            document.tree_mut().add_class(node, visible_class);
            observer.unobserve(node);
        }
        if !revealed.is_empty() {
            tracing::debug!(count = revealed.len(), "revealed elements");
        }
        revealed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use softnav_dom::DomTree;

    fn ids(n: usize) -> Vec<NodeId> {
        let mut tree = DomTree::new();
        (0..n).map(|_| tree.create_element("div")).collect()
    }

    fn observer() -> IntersectionObserver {
        IntersectionObserver::new(0.15, RootMargin::shrink_bottom(40.0))
    }

    fn ratio_of(rect: DOMRect) -> IntersectionEntry {
        let mut obs = observer();
        obs.observe(ids(1)[0]);
        obs.take_records(DOMRect::new(0.0, 0.0, 1000.0, 800.0), |_| Some(rect))[0]
    }

    #[test]
    fn test_root_margin_shrinks_bottom() {
        let root = RootMargin::shrink_bottom(40.0).apply(DOMRect::new(0.0, 0.0, 1000.0, 800.0));
        assert_eq!(root, DOMRect::new(0.0, 0.0, 1000.0, 760.0));
    }

    #[test]
    fn test_ratio_uses_shrunk_root() {
        // 100px tall box starting at 700: only 60px inside the 760px root
        let entry = ratio_of(DOMRect::new(0.0, 700.0, 100.0, 100.0));
        assert!(entry.is_intersecting);
        assert!((entry.intersection_ratio - 0.6).abs() < 1e-4);

        // Sits entirely in the excluded 40px strip
        let entry = ratio_of(DOMRect::new(0.0, 765.0, 100.0, 30.0));
        assert!(!entry.is_intersecting);
        assert_eq!(entry.intersection_ratio, 0.0);
    }

    #[test]
    fn test_threshold_filter() {
        let obs = observer();
        let nodes = ids(2);
        let entries = [
            IntersectionEntry {
                target: nodes[0],
                bounding_client_rect: DOMRect::default(),
                intersection_ratio: 0.10,
                is_intersecting: true,
            },
            IntersectionEntry {
                target: nodes[1],
                bounding_client_rect: DOMRect::default(),
                intersection_ratio: 0.15,
                is_intersecting: true,
            },
        ];
        assert_eq!(obs.crossed(&entries), vec![nodes[1]]);
    }

    #[test]
    fn test_zero_area_inside_root() {
        let entry = ratio_of(DOMRect::new(10.0, 10.0, 0.0, 0.0));
        assert_eq!(entry.intersection_ratio, 1.0);
    }

    #[test]
    fn test_observe_is_idempotent() {
        let mut obs = observer();
        let node = ids(1)[0];
        obs.observe(node);
        obs.observe(node);
        assert_eq!(obs.observed().len(), 1);
        obs.unobserve(node);
        assert!(!obs.is_observing(node));
    }

    #[test]
    fn test_arm_and_check() {
        use crate::HeadlessHost;
        use url::Url;

        let mut doc = Document::new("https://ib.example/");
        let body = doc.body();
        let tree = doc.tree_mut();
        let near = tree.create_element("div");
        let far = tree.create_element("div");
        let done = tree.create_element("div");
        tree.add_class(done, "visible");
        for n in [near, far, done] {
            tree.append_child(body, n);
        }

        let mut host = HeadlessHost::new(Url::parse("https://ib.example/").unwrap());
        host.set_layout_rect(near, DOMRect::new(0.0, 100.0, 200.0, 100.0));
        host.set_layout_rect(far, DOMRect::new(0.0, 2000.0, 200.0, 100.0));

        let mut reveal = RevealStrategy::for_host(true, 0.15, 40.0);
        assert_eq!(reveal.arm(&mut doc, &[near, far, done], "visible"), 0);
        assert_eq!(reveal.pending(), 2);

        assert_eq!(reveal.check(&mut doc, &host, "visible"), 1);
        assert!(doc.tree().has_class(near, "visible"));
        assert!(!doc.tree().has_class(far, "visible"));

        host.set_scroll(1500.0);
        assert_eq!(reveal.check(&mut doc, &host, "visible"), 1);
        assert_eq!(reveal.pending(), 0);
    }

    #[test]
    fn test_check_drops_detached_targets() {
        use crate::HeadlessHost;
        use url::Url;

        let mut doc = Document::new("https://ib.example/");
        let body = doc.body();
        let node = doc.tree_mut().create_element("div");
        doc.tree_mut().append_child(body, node);

        let host = HeadlessHost::new(Url::parse("https://ib.example/").unwrap());
        let mut reveal = RevealStrategy::for_host(true, 0.15, 40.0);
        reveal.arm(&mut doc, &[node], "visible");
        doc.tree_mut().detach(node);

        assert_eq!(reveal.check(&mut doc, &host, "visible"), 0);
        assert_eq!(reveal.pending(), 0);
    }

    #[test]
    fn test_immediate_reveals_on_arm() {
        let mut doc = Document::new("https://ib.example/");
        let node = doc.tree_mut().create_element("div");
        let mut reveal = RevealStrategy::Immediate;
        assert_eq!(reveal.arm(&mut doc, &[node], "visible"), 1);
        assert!(doc.tree().has_class(node, "visible"));
        assert_eq!(reveal.arm(&mut doc, &[node], "visible"), 0);
    }

    #[test]
    fn test_strategy_for_host() {
        assert!(RevealStrategy::for_host(true, 0.15, 40.0).is_observing());
        assert!(!RevealStrategy::for_host(false, 0.15, 40.0).is_observing());
    }
}
