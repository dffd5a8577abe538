//! Inline style declarations
//!
//! Just enough of `element.style` for `overflow` locking and the custom
//! properties driving the active-pill indicator.

/// Ordered list of `property: value` pairs from a `style` attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclaration {
    props: Vec<(String, String)>,
}

impl StyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `style` attribute value. Malformed declarations are skipped.
    pub fn parse(css_text: &str) -> Self {
        let mut style = Self::new();
        for decl in css_text.split(';') {
            if let Some((name, value)) = decl.split_once(':') {
                style.set_property(name.trim(), value.trim());
            }
        }
        style
    }

    /// Get a property value
    pub fn get_property(&self, name: &str) -> Option<&str> {
        self.props
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a property. An empty value removes it, like assigning `''`.
    pub fn set_property(&mut self, name: &str, value: &str) {
        if name.is_empty() {
            return;
        }
        if value.is_empty() {
            self.remove_property(name);
            return;
        }
        match self.props.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.props.push((name.to_string(), value.to_string())),
        }
    }

    /// Remove a property, returning its old value
    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        let pos = self.props.iter().position(|(n, _)| n == name)?;
        Some(self.props.remove(pos).1)
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Serialize back to attribute form
    pub fn css_text(&self) -> String {
        self.props
            .iter()
            .map(|(n, v)| format!("{n}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_serialize() {
        let style = StyleDeclaration::parse("overflow: hidden; --nav-pill-x:12px;;bogus");
        assert_eq!(style.get_property("overflow"), Some("hidden"));
        assert_eq!(style.get_property("--nav-pill-x"), Some("12px"));
        assert_eq!(style.css_text(), "overflow: hidden; --nav-pill-x: 12px;");
    }

    #[test]
    fn test_empty_value_removes() {
        let mut style = StyleDeclaration::parse("overflow: hidden");
        style.set_property("overflow", "");
        assert!(style.is_empty());
    }
}
