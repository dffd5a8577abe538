//! DOM Node
//!
//! Nodes link to each other through `NodeId`s into the owning arena rather
//! than through pointers, so a whole tree can be cloned or walked without
//! reference counting.

use crate::{DOMTokenList, NodeId, StyleDeclaration};

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if root or detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    /// Create an unattached node
    pub fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Whether the slot has been released
    #[inline]
    pub fn is_vacant(&self) -> bool {
        matches!(self.data, NodeData::Vacant)
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    Doctype { name: String },
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
    /// Released slot awaiting reuse
    Vacant,
}

/// Element-specific data
///
/// `class` and `style` are kept parsed in `classes` and `style` instead of
/// in the raw attribute list.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag: String,
    attrs: Vec<Attribute>,
    /// Parsed class list
    pub classes: DOMTokenList,
    /// Parsed inline style
    pub style: StyleDeclaration,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            classes: DOMTokenList::new(),
            style: StyleDeclaration::new(),
        }
    }

    /// Get a raw attribute value (not `class` or `style`)
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Attribute presence, including `class` and `style`
    pub fn has_attr(&self, name: &str) -> bool {
        match name {
            "class" => !self.classes.is_empty(),
            "style" => !self.style.is_empty(),
            _ => self.attr(name).is_some(),
        }
    }

    /// Set an attribute; `class` and `style` are parsed
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "class" => self.classes = DOMTokenList::from_string(value),
            "style" => self.style = StyleDeclaration::parse(value),
            _ => match self.attrs.iter_mut().find(|a| a.name == name) {
                Some(attr) => attr.value = value.to_string(),
                None => self.attrs.push(Attribute {
                    name,
                    value: value.to_string(),
                }),
            },
        }
    }

    /// Remove an attribute
    pub fn remove_attr(&mut self, name: &str) {
        match name {
            "class" => self.classes = DOMTokenList::new(),
            "style" => self.style = StyleDeclaration::new(),
            _ => self.attrs.retain(|a| !a.name.eq_ignore_ascii_case(name)),
        }
    }

    /// The `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Raw attributes in document order
    pub fn attrs(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.iter()
    }
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_and_style_are_parsed() {
        let mut elem = ElementData::new("DIV");
        elem.set_attr("class", "fade-up visible");
        elem.set_attr("style", "overflow: hidden");
        elem.set_attr("ID", "page-content");

        assert_eq!(elem.tag, "div");
        assert!(elem.classes.contains("visible"));
        assert_eq!(elem.style.get_property("overflow"), Some("hidden"));
        assert_eq!(elem.id(), Some("page-content"));
        assert!(elem.attr("class").is_none());
        assert!(elem.has_attr("class"));
    }

    #[test]
    fn test_set_attr_overwrites() {
        let mut elem = ElementData::new("a");
        elem.set_attr("href", "a.html");
        elem.set_attr("href", "b.html");
        assert_eq!(elem.attrs().count(), 1);
        assert_eq!(elem.attr("href"), Some("b.html"));

        elem.remove_attr("href");
        assert!(!elem.has_attr("href"));
    }
}
