//! DOM Tree (arena-based allocation)
//!
//! A detached subtree keeps its nodes until [`DomTree::remove_subtree`]
//! releases them. Released slots go on a free list and are handed out
//! again by the next allocation; until then a stale id resolves to nothing.

use crate::{ElementData, Node, NodeData, NodeId, SelectorList};

/// Arena-based DOM tree
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            free: Vec::new(),
        }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).filter(|n| !n.is_vacant())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).filter(|n| !n.is_vacant())
    }

    /// Number of live nodes (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Slots allocated in the arena, released ones included
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = node;
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // === Construction ===

    /// Create an unattached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::new(NodeData::Element(ElementData::new(tag))))
    }

    /// Create an unattached element from prepared data
    pub fn create_element_with(&mut self, data: ElementData) -> NodeId {
        self.push(Node::new(NodeData::Element(data)))
    }

    /// Create an unattached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::new(NodeData::Text(text.to_string())))
    }

    /// Create an unattached comment
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::new(NodeData::Comment(text.to_string())))
    }

    /// Create an unattached doctype
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.push(Node::new(NodeData::Doctype {
            name: name.to_string(),
        }))
    }

    // === Mutation ===

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, NodeId::NONE);
    }

    /// Insert `child` before `reference` (or append when `reference` is NONE)
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        if self.get(parent).is_none() || self.get(child).is_none() || parent == child {
            return;
        }
        self.detach(child);

        let prev = if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling
        } else {
            self.nodes[parent.index()].last_child
        };

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }
    }

    /// Unlink a node from its parent and siblings. The subtree below it is
    /// kept intact.
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Put `new` where `old` is, then detach `old`.
    ///
    /// `new` is attached before `old` leaves the tree, so there is no
    /// moment where the slot is empty. Returns `false` (and changes
    /// nothing) when `old` is not attached.
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) -> bool {
        let Some(parent) = self.parent(old) else {
            return false;
        };
        if old == new || self.get(new).is_none() {
            return false;
        }
        self.insert_before(parent, new, old);
        self.detach(old);
        tracing::trace!(%old, %new, %parent, "node replaced");
        true
    }

    /// Detach `id` and release it together with its descendants.
    ///
    /// Returns the number of nodes released. The document node is never
    /// released.
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        if id == NodeId::ROOT || self.get(id).is_none() {
            return 0;
        }
        self.detach(id);
        let mut released = self.descendants(id);
        released.push(id);
        for &node in &released {
            self.nodes[node.index()] = Node::new(NodeData::Vacant);
        }
        self.free.extend_from_slice(&released);
        tracing::trace!(%id, count = released.len(), "subtree released");
        released.len()
    }

    /// Remove every child of `parent`
    pub fn clear_children(&mut self, parent: NodeId) {
        while let Some(child) = self.get(parent).map(|n| n.first_child).filter(|c| c.is_valid()) {
            self.detach(child);
        }
    }

    /// Deep-copy a subtree from another tree into this arena.
    ///
    /// The copy is returned unattached.
    pub fn import_subtree(&mut self, source: &DomTree, source_root: NodeId) -> NodeId {
        let Some(node) = source.get(source_root) else {
            return NodeId::NONE;
        };
        let copy = self.push(Node::new(node.data.clone()));
        let mut child = node.first_child;
        while child.is_valid() {
            let imported = self.import_subtree(source, child);
            self.append_child(copy, imported);
            child = source.nodes[child.index()].next_sibling;
        }
        copy
    }

    // === Traversal ===

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// All descendants of `id` in document order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).map(|(c, _)| c).collect();
        stack.reverse();
        while let Some(next) = stack.pop() {
            out.push(next);
            let mut kids: Vec<NodeId> = self.children(next).map(|(c, _)| c).collect();
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    /// Ancestors from the parent upwards
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Whether the node is reachable from the document root
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == NodeId::ROOT || self.ancestors(id).any(|a| a == NodeId::ROOT)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }

    // === Element access ===

    /// Element data of a node
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Mutable element data of a node
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    /// `getAttribute` for raw attributes
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attr(name))
    }

    /// `hasAttribute`
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_attr(name))
    }

    /// `setAttribute`
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(elem) = self.element_mut(id) {
            elem.set_attr(name, value);
        }
    }

    /// `classList.contains`
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.classes.contains(class))
    }

    /// `classList.add`
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(elem) = self.element_mut(id) {
            elem.classes.add(class);
        }
    }

    /// `classList.remove`
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(elem) = self.element_mut(id) {
            elem.classes.remove(class);
        }
    }

    /// `classList.toggle`; returns the new state (false for non-elements)
    pub fn toggle_class(&mut self, id: NodeId, class: &str, force: Option<bool>) -> bool {
        self.element_mut(id)
            .is_some_and(|e| e.classes.toggle(class, force))
    }

    /// `style.getPropertyValue`
    pub fn style_property(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.style.get_property(name))
    }

    /// `style.setProperty`; an empty value clears the property
    pub fn set_style_property(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(elem) = self.element_mut(id) {
            elem.style.set_property(name, value);
        }
    }

    // === Selectors ===

    /// Whether `id` is an element matching `selector`
    pub fn matches(&self, id: NodeId, selector: &SelectorList) -> bool {
        selector.matches(self, id)
    }

    /// First matching descendant of `scope` in document order
    pub fn query_selector(&self, scope: NodeId, selector: &SelectorList) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&d| selector.matches(self, d))
    }

    /// All matching descendants of `scope` in document order
    pub fn query_selector_all(&self, scope: NodeId, selector: &SelectorList) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&d| selector.matches(self, d))
            .collect()
    }

    /// Nearest inclusive ancestor matching `selector`
    pub fn closest(&self, id: NodeId, selector: &SelectorList) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&a| selector.matches(self, a))
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the direct children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let body = tree.create_element("body");
        let a = tree.create_element("header");
        let b = tree.create_element("main");
        tree.append_child(tree.root(), body);
        tree.append_child(body, a);
        tree.append_child(body, b);
        (tree, body, a, b)
    }

    #[test]
    fn test_append_and_children_order() {
        let (tree, body, a, b) = sample();
        let kids: Vec<NodeId> = tree.children(body).map(|(id, _)| id).collect();
        assert_eq!(kids, vec![a, b]);
        assert_eq!(tree.parent(a), Some(body));
    }

    #[test]
    fn test_replace_with_keeps_position() {
        let (mut tree, body, a, b) = sample();
        let replacement = tree.create_element("main");
        assert!(tree.replace_with(a, replacement));

        let kids: Vec<NodeId> = tree.children(body).map(|(id, _)| id).collect();
        assert_eq!(kids, vec![replacement, b]);
        assert!(!tree.is_connected(a));
        assert!(tree.is_connected(replacement));
    }

    #[test]
    fn test_replace_detached_is_noop() {
        let (mut tree, _, _, _) = sample();
        let loose = tree.create_element("div");
        let other = tree.create_element("div");
        assert!(!tree.replace_with(loose, other));
        assert!(!tree.is_connected(other));
    }

    #[test]
    fn test_import_subtree_deep_copies() {
        let mut source = DomTree::new();
        let main = source.create_element("main");
        let p = source.create_element("p");
        let text = source.create_text("Hello");
        source.append_child(source.root(), main);
        source.append_child(main, p);
        source.append_child(p, text);

        let (mut tree, body, _, _) = sample();
        let copy = tree.import_subtree(&source, main);
        tree.append_child(body, copy);

        assert_eq!(tree.text_content(copy), "Hello");
        assert_eq!(tree.descendants(copy).len(), 2);
        assert!(tree.is_connected(copy));
    }

    #[test]
    fn test_clear_children() {
        let (mut tree, body, a, _) = sample();
        tree.clear_children(body);
        assert_eq!(tree.children(body).count(), 0);
        assert!(!tree.is_connected(a));
    }

    #[test]
    fn test_remove_subtree_recycles_slots() {
        let (mut tree, body, _, main) = sample();
        let p = tree.create_element("p");
        tree.append_child(main, p);
        let slots = tree.capacity();

        assert_eq!(tree.remove_subtree(main), 2);
        assert!(tree.get(main).is_none());
        assert!(tree.get(p).is_none());
        assert!(!tree.is_connected(main));
        assert_eq!(tree.children(body).count(), 1);
        assert_eq!(tree.len(), slots - 2);

        let fresh = tree.create_element("section");
        let other = tree.create_element("aside");
        assert_eq!(tree.capacity(), slots);
        assert!([main, p].contains(&fresh) && [main, p].contains(&other));
        assert_eq!(tree.element(fresh).map(|e| e.tag.as_str()), Some("section"));
    }

    #[test]
    fn test_remove_root_is_refused() {
        let (mut tree, _, _, _) = sample();
        assert_eq!(tree.remove_subtree(tree.root()), 0);
        assert!(tree.get(tree.root()).is_some());
    }
}
