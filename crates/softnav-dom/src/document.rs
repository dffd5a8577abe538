//! Document - High-level document API

use crate::{DomTree, NodeData, NodeId, SelectorList};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with an empty html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure). Call [`Document::finalize`]
    /// after filling the tree.
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate and cache the html/head/body elements
    pub fn finalize(&mut self) {
        let find = |tree: &DomTree, parent: NodeId, tag: &str| {
            tree.children(parent)
                .find(|(_, n)| n.as_element().is_some_and(|e| e.tag == tag))
                .map_or(NodeId::NONE, |(id, _)| id)
        };
        self.html_element = find(&self.tree, self.tree.root(), "html");
        if self.html_element.is_valid() {
            self.head_element = find(&self.tree, self.html_element, "head");
            self.body_element = find(&self.tree, self.html_element, "body");
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Update the document URL (history push or replay)
    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// First HTML <title>: `<head>` is searched first, and a <title>
    /// inside an <svg> never counts.
    fn title_element(&self) -> Option<NodeId> {
        let is_title = |id: NodeId| self.tree.element(id).is_some_and(|e| e.tag == "title");
        let in_svg = |id: NodeId| {
            self.tree
                .ancestors(id)
                .any(|a| self.tree.element(a).is_some_and(|e| e.tag == "svg"))
        };

        if self.head_element.is_valid() {
            let in_head = self
                .tree
                .descendants(self.head_element)
                .into_iter()
                .find(|&id| is_title(id) && !in_svg(id));
            if in_head.is_some() {
                return in_head;
            }
        }
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&id| is_title(id) && !in_svg(id))
    }

    /// `document.title`: text of the first <title>, whitespace collapsed
    pub fn title(&self) -> String {
        self.title_element()
            .map(|id| {
                self.tree
                    .text_content(id)
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    }

    /// Set `document.title`, creating a <title> in <head> if needed
    pub fn set_title(&mut self, title: &str) {
        let id = match self.title_element() {
            Some(id) => id,
            None => {
                if !self.head_element.is_valid() {
                    return;
                }
                let id = self.tree.create_element("title");
                self.tree.append_child(self.head_element, id);
                id
            }
        };
        self.tree.clear_children(id);
        if !title.is_empty() {
            let text = self.tree.create_text(title);
            self.tree.append_child(id, text);
        }
    }

    /// `<meta name="...">` element
    pub fn meta_element(&self, name: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&id| {
                self.tree
                    .element(id)
                    .is_some_and(|e| e.tag == "meta" && e.attr("name") == Some(name))
            })
    }

    /// Content of `<meta name="...">`; `Some("")` when the tag exists
    /// without a content attribute
    pub fn meta_content(&self, name: &str) -> Option<&str> {
        let id = self.meta_element(name)?;
        Some(self.tree.attribute(id, "content").unwrap_or(""))
    }

    /// Get element by ID (first in document order)
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&n| self.tree.element(n).and_then(|e| e.id()) == Some(id))
    }

    /// Number of connected elements carrying the given id
    pub fn count_elements_with_id(&self, id: &str) -> usize {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .filter(|&n| self.tree.element(n).and_then(|e| e.id()) == Some(id))
            .count()
    }

    /// `document.querySelector`
    pub fn query_selector(&self, selector: &SelectorList) -> Option<NodeId> {
        self.tree.query_selector(self.tree.root(), selector)
    }

    /// `document.querySelectorAll`
    pub fn query_selector_all(&self, selector: &SelectorList) -> Vec<NodeId> {
        self.tree.query_selector_all(self.tree.root(), selector)
    }

    /// Doctype name, if the document has one
    pub fn doctype(&self) -> Option<&str> {
        self.tree.children(self.tree.root()).find_map(|(_, n)| match &n.data {
            NodeData::Doctype { name } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
