//! Host capabilities
//!
//! Everything the behavior layer needs from the browser besides the DOM
//! and the network: location and session history, scrolling, viewport
//! geometry and (optionally) visibility observation.

use softnav_dom::{Document, NodeId};
use std::collections::HashMap;
use url::Url;

/// Viewport-relative rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DOMRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Overlap with another rect, edges included
    pub fn intersect(&self, other: &DOMRect) -> Option<DOMRect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right >= x && bottom >= y {
            Some(DOMRect {
                x,
                y,
                width: right - x,
                height: bottom - y,
            })
        } else {
            None
        }
    }

    /// Move vertically by `dy`
    pub fn offset_y(&self, dy: f32) -> DOMRect {
        DOMRect {
            y: self.y + dy,
            ..*self
        }
    }
}

/// Browser capabilities consumed by the navigator
pub trait Host {
    /// `window.location.href`
    fn location(&self) -> Url;

    /// `history.pushState(…, url)`: add an entry without loading
    fn push_state(&mut self, url: &Url);

    /// `location.href = url`: hand over to a full page load
    fn assign(&mut self, url: &Url);

    /// `history.go(delta)`. Returns `true` if the location changed, in which
    /// case the caller delivers the pop signal.
    fn traverse(&mut self, delta: i32) -> bool;

    /// `window.scrollY`
    fn scroll_y(&self) -> f32;

    /// `window.scrollTo({ top, behavior: 'auto' })`
    fn scroll_to(&mut self, top: f32);

    /// The visual viewport
    fn viewport(&self) -> DOMRect;

    /// `getBoundingClientRect()` of an element, if it has a layout box
    fn element_rect(&self, document: &Document, node: NodeId) -> Option<DOMRect>;

    /// Whether visibility observation is available
    fn supports_visibility_observation(&self) -> bool;
}

/// Session history entry list
#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: Vec<Url>,
    current: usize,
}

impl SessionHistory {
    pub fn new(initial: Url) -> Self {
        Self {
            entries: vec![initial],
            current: 0,
        }
    }

    /// Push a new entry, dropping forward history
    pub fn push(&mut self, url: Url) {
        self.entries.truncate(self.current + 1);
        self.entries.push(url);
        self.current = self.entries.len() - 1;
    }

    /// Go to a relative offset; `None` if out of range
    pub fn go(&mut self, delta: i32) -> Option<&Url> {
        let target = self.current.checked_add_signed(delta as isize)?;
        if target >= self.entries.len() {
            return None;
        }
        self.current = target;
        Some(&self.entries[target])
    }

    /// Current entry
    pub fn current(&self) -> &Url {
        &self.entries[self.current]
    }

    /// Index of the current entry
    pub fn index(&self) -> usize {
        self.current
    }

    /// `history.length`
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Url] {
        &self.entries
    }
}

/// Host without a rendering surface.
///
/// Layout boxes are whatever the embedder registers with
/// [`HeadlessHost::set_layout_rect`], in page coordinates; they are shifted
/// by the scroll offset when reported.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    history: SessionHistory,
    hard_loads: Vec<Url>,
    scroll_y: f32,
    viewport: DOMRect,
    layout: HashMap<NodeId, DOMRect>,
    visibility: bool,
}

impl HeadlessHost {
    /// 1280x800 viewport, visibility observation enabled
    pub fn new(url: Url) -> Self {
        Self {
            history: SessionHistory::new(url),
            hard_loads: Vec::new(),
            scroll_y: 0.0,
            viewport: DOMRect::new(0.0, 0.0, 1280.0, 800.0),
            layout: HashMap::new(),
            visibility: true,
        }
    }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = DOMRect::new(0.0, 0.0, width, height);
        self
    }

    pub fn with_visibility_observation(mut self, supported: bool) -> Self {
        self.visibility = supported;
        self
    }

    /// Resize the viewport (caller delivers the resize event)
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = DOMRect::new(0.0, 0.0, width, height);
    }

    /// Register a layout box in page coordinates
    pub fn set_layout_rect(&mut self, node: NodeId, rect: DOMRect) {
        self.layout.insert(node, rect);
    }

    /// Forget all layout boxes
    pub fn clear_layout(&mut self) {
        self.layout.clear();
    }

    /// User scroll (caller delivers the scroll event)
    pub fn set_scroll(&mut self, y: f32) {
        self.scroll_y = y.max(0.0);
    }

    /// URLs handed over for full page loads
    pub fn hard_loads(&self) -> &[Url] {
        &self.hard_loads
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }
}

impl Host for HeadlessHost {
    fn location(&self) -> Url {
        self.history.current().clone()
    }

    fn push_state(&mut self, url: &Url) {
        self.history.push(url.clone());
    }

    fn assign(&mut self, url: &Url) {
        tracing::debug!(url = %url, "full page load");
        self.hard_loads.push(url.clone());
        self.history.push(url.clone());
        self.scroll_y = 0.0;
    }

    fn traverse(&mut self, delta: i32) -> bool {
        delta != 0 && self.history.go(delta).is_some()
    }

    fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    fn scroll_to(&mut self, top: f32) {
        self.set_scroll(top);
    }

    fn viewport(&self) -> DOMRect {
        self.viewport
    }

    fn element_rect(&self, _document: &Document, node: NodeId) -> Option<DOMRect> {
        self.layout.get(&node).map(|r| r.offset_y(-self.scroll_y))
    }

    fn supports_visibility_observation(&self) -> bool {
        self.visibility
    }
}
