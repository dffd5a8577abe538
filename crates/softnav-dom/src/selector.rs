//! Selector engine
//!
//! A small subset of CSS selectors: type, universal, `#id`, `.class`,
//! `[attr]`, `[attr=value]`, `:not(compound)`, descendant and child
//! combinators, and comma-separated lists. Matching runs right to left.

use crate::{DomTree, NodeId};

/// Selector parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected {found:?} at offset {offset} in selector {selector:?}")]
    Unexpected {
        selector: String,
        offset: usize,
        found: char,
    },

    #[error("unterminated {what} in selector {selector:?}")]
    Unterminated { selector: String, what: &'static str },

    #[error("unsupported pseudo-class :{0}")]
    UnsupportedPseudo(String),
}

/// Parsed, comma-separated selector list
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    selectors: Vec<Complex>,
    source: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Complex {
    /// Rightmost compound last; `combinators[i]` joins `compounds[i]` and
    /// `compounds[i + 1]`.
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    parts: Vec<Simple>,
}

#[derive(Debug, Clone, PartialEq)]
enum Simple {
    Id(String),
    Class(String),
    Attr { name: String, value: Option<String> },
    Not(Box<Compound>),
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        if selector.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut parser = Parser {
            src: selector,
            chars: selector.char_indices().collect(),
            pos: 0,
        };
        let selectors = parser.parse_list()?;
        Ok(Self {
            selectors,
            source: selector.trim().to_string(),
        })
    }

    /// Selector source text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the element `id` in `tree` matches any selector of the list
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        tree.element(id).is_some()
            && self
                .selectors
                .iter()
                .any(|c| c.matches_at(tree, id, c.compounds.len() - 1))
    }
}

impl std::str::FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for SelectorList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl Complex {
    fn matches_at(&self, tree: &DomTree, id: NodeId, index: usize) -> bool {
        if !self.compounds[index].matches(tree, id) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => tree
                .parent(id)
                .is_some_and(|p| self.matches_at(tree, p, index - 1)),
            Combinator::Descendant => tree
                .ancestors(id)
                .any(|a| self.matches_at(tree, a, index - 1)),
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.parts.is_empty()
    }

    fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        let Some(elem) = tree.element(id) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if tag != "*" && !elem.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.parts.iter().all(|part| match part {
            Simple::Id(want) => elem.id() == Some(want.as_str()),
            Simple::Class(class) => elem.classes.contains(class),
            Simple::Attr { name, value: None } => elem.has_attr(name),
            Simple::Attr {
                name,
                value: Some(want),
            } => match name.as_str() {
                "class" => elem.classes.value() == *want,
                "style" => elem.style.css_text() == *want,
                _ => elem.attr(name) == Some(want.as_str()),
            },
            Simple::Not(inner) => !inner.matches(tree, id),
        })
    }
}

struct Parser<'a> {
    src: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.chars.get(self.pos).map_or(self.src.len(), |&(o, _)| o)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected {
                selector: self.src.to_string(),
                offset: self.offset(),
                found,
            },
            None => self.unterminated("selector"),
        }
    }

    fn unterminated(&self, what: &'static str) -> SelectorError {
        SelectorError::Unterminated {
            selector: self.src.to_string(),
            what,
        }
    }

    fn parse_list(&mut self) -> Result<Vec<Complex>, SelectorError> {
        let mut list = vec![self.parse_complex()?];
        while self.peek() == Some(',') {
            self.bump();
            list.push(self.parse_complex()?);
        }
        if self.peek().is_some() {
            return Err(self.unexpected());
        }
        Ok(list)
    }

    fn parse_complex(&mut self) -> Result<Complex, SelectorError> {
        self.skip_ws();
        let first = self.parse_compound()?;
        if first.is_empty() {
            return Err(self.unexpected());
        }
        let mut complex = Complex {
            compounds: vec![first],
            combinators: Vec::new(),
        };

        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.bump();
                    self.skip_ws();
                    Combinator::Child
                }
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            let next = self.parse_compound()?;
            if next.is_empty() {
                return Err(self.unexpected());
            }
            complex.combinators.push(combinator);
            complex.compounds.push(next);
        }
        Ok(complex)
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        if self.peek() == Some('*') {
            self.bump();
            compound.tag = Some("*".to_string());
        } else if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    compound.parts.push(Simple::Id(self.ident()?));
                }
                Some('.') => {
                    self.bump();
                    compound.parts.push(Simple::Class(self.ident()?));
                }
                Some('[') => {
                    self.bump();
                    compound.parts.push(self.attribute()?);
                }
                Some(':') => {
                    self.bump();
                    let name = self.ident()?;
                    if !name.eq_ignore_ascii_case("not") || self.peek() != Some('(') {
                        return Err(SelectorError::UnsupportedPseudo(name));
                    }
                    self.bump();
                    self.skip_ws();
                    let inner = self.parse_compound()?;
                    self.skip_ws();
                    if inner.is_empty() {
                        return Err(self.unexpected());
                    }
                    if self.bump() != Some(')') {
                        return Err(self.unterminated(":not()"));
                    }
                    compound.parts.push(Simple::Not(Box::new(inner)));
                }
                _ => return Ok(compound),
            }
        }
    }

    fn attribute(&mut self) -> Result<Simple, SelectorError> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();
        match self.bump() {
            Some(']') => Ok(Simple::Attr { name, value: None }),
            Some('=') => {
                self.skip_ws();
                let value = match self.peek() {
                    Some(q @ ('"' | '\'')) => {
                        self.bump();
                        let mut value = String::new();
                        loop {
                            match self.bump() {
                                Some(c) if c == q => break,
                                Some(c) => value.push(c),
                                None => return Err(self.unterminated("string")),
                            }
                        }
                        value
                    }
                    _ => self.ident()?,
                };
                self.skip_ws();
                if self.bump() != Some(']') {
                    return Err(self.unterminated("attribute selector"));
                }
                Ok(Simple::Attr {
                    name,
                    value: Some(value),
                })
            }
            Some(_) => {
                self.pos -= 1;
                Err(self.unexpected())
            }
            None => Err(self.unterminated("attribute selector")),
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();
        while let Some(c) = self.peek().filter(|&c| is_ident_char(c)) {
            out.push(c);
            self.pos += 1;
        }
        if out.is_empty() {
            return Err(self.unexpected());
        }
        Ok(out)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav_tree() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let nav = tree.create_element("ul");
        tree.set_attribute(nav, "class", "nav-links");
        tree.append_child(tree.root(), nav);

        let about = tree.create_element("a");
        tree.set_attribute(about, "href", "about.html");
        tree.append_child(nav, about);

        let cta = tree.create_element("a");
        tree.set_attribute(cta, "href", "contact.html");
        tree.set_attribute(cta, "class", "nav-cta");
        tree.append_child(nav, cta);
        (tree, nav, about, cta)
    }

    #[test]
    fn test_not_and_descendant() {
        let (tree, _, about, cta) = nav_tree();
        let sel = SelectorList::parse(".nav-links a:not(.nav-cta)").unwrap();
        assert!(sel.matches(&tree, about));
        assert!(!sel.matches(&tree, cta));
    }

    #[test]
    fn test_attribute_selectors() {
        let (tree, _, about, cta) = nav_tree();
        let any_href = SelectorList::parse("a[href]").unwrap();
        assert!(any_href.matches(&tree, about));

        let exact = SelectorList::parse(r#"a[href="contact.html"]"#).unwrap();
        assert!(exact.matches(&tree, cta));
        assert!(!exact.matches(&tree, about));
    }

    #[test]
    fn test_child_combinator_and_list() {
        let (tree, nav, about, _) = nav_tree();
        let sel = SelectorList::parse("div > a, ul>a").unwrap();
        assert!(sel.matches(&tree, about));
        assert!(!sel.matches(&tree, nav));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(SelectorList::parse("   "), Err(SelectorError::Empty));
        assert!(matches!(
            SelectorList::parse("a[href"),
            Err(SelectorError::Unterminated { .. })
        ));
        assert_eq!(
            SelectorList::parse("a:hover"),
            Err(SelectorError::UnsupportedPseudo("hover".to_string()))
        );
        assert!(matches!(
            SelectorList::parse("a $"),
            Err(SelectorError::Unexpected { found: '$', .. })
        ));
        assert!(SelectorList::parse("a,,b").is_err());
    }
}
