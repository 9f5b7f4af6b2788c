//! The S-expression tree model.
//!
//! This module provides the [`Node`] enum, the only structural type of the
//! format, together with its two non-trivial building blocks:
//!
//! - [`List`]: a parenthesized group `(name child ...)` with ordered children
//! - [`Token`]: a validated bareword (identifiers, numbers, booleans, keywords)
//!
//! Quoted strings and line comments are plain `String` payloads.
//!
//! ## Building Trees
//!
//! ```rust
//! use serde_sexpr::{List, Node};
//!
//! let mut pin = List::new("pin");
//! pin.append(Node::token("2b0b3f3e-3a4c-4b4f-9c5d-0a1b2c3d4e5f"));
//! pin.append_value("name", &"1".to_string());
//! pin.append_value("length", &2.54);
//!
//! assert_eq!(pin.name(), "pin");
//! assert_eq!(pin.require_value::<f64>("length").unwrap(), 2.54);
//! ```
//!
//! ## Equality
//!
//! Equality is structural: kind, value and ordered children, recursively.
//! Blank-line hints only influence the writer and are ignored by `==`.
//!
//! ```rust
//! use serde_sexpr::{List, Node};
//!
//! let mut a = List::new("symbol");
//! a.append(Node::from("R"));
//! let mut b = List::new("symbol");
//! b.append_with_blank_line(Node::from("R"));
//! assert_eq!(a, b);
//! ```

use crate::values::SerializableValue;
use crate::{Error, Result};
use std::fmt;

/// A validated bareword.
///
/// Tokens are written verbatim, so their text must not contain whitespace,
/// control characters, parentheses, quotes or `;`, and must not be empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(String);

impl Token {
    /// Creates a token, rejecting text that could not be written verbatim.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_sexpr::Token;
    ///
    /// assert!(Token::new("R1").is_ok());
    /// assert!(Token::new("a b").is_err());
    /// ```
    pub fn new<S: Into<String>>(text: S) -> Result<Self> {
        let text = text.into();
        match invalid_identifier_reason(&text) {
            None => Ok(Token(text)),
            Some(reason) => Err(Error::custom(format!("invalid token {:?}: {}", text, reason))),
        }
    }

    /// Returns the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns `true` if `c` may appear inside a token or list name.
#[inline]
pub(crate) fn is_identifier_char(c: char) -> bool {
    !(c.is_whitespace() || c.is_control() || matches!(c, '(' | ')' | '"' | ';'))
}

/// Returns `true` if `c` may appear unescaped inside a quoted string.
///
/// Strings are written raw apart from the `\"` and `\\` escapes, so control
/// characters other than line breaks and tabs cannot be represented.
#[inline]
pub(crate) fn is_string_char(c: char) -> bool {
    !c.is_control() || matches!(c, '\n' | '\r' | '\t')
}

fn invalid_identifier_reason(text: &str) -> Option<&'static str> {
    if text.is_empty() {
        Some("empty")
    } else if text.chars().any(char::is_whitespace) {
        Some("contains whitespace")
    } else if text.chars().any(|c| !is_identifier_char(c)) {
        Some("contains a delimiter or control character")
    } else {
        None
    }
}

/// A parenthesized list `(name child ...)`.
///
/// Children keep the order in which they were appended. Each child carries a
/// blank-line hint for the writer which does not take part in equality.
#[derive(Clone, Debug)]
pub struct List {
    name: String,
    children: Vec<Node>,
    blank_lines: Vec<bool>,
}

impl List {
    /// Creates an empty list.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a valid identifier. Names are chosen by code,
    /// not by data; use [`List::try_new`] for names coming from input.
    #[must_use]
    pub fn new(name: &str) -> Self {
        match Self::try_new(name) {
            Ok(list) => list,
            Err(err) => panic!("{}", err),
        }
    }

    /// Creates an empty list, rejecting invalid names.
    pub fn try_new(name: &str) -> Result<Self> {
        match invalid_identifier_reason(name) {
            None => Ok(List {
                name: name.to_string(),
                children: Vec::new(),
                blank_lines: Vec::new(),
            }),
            Some(reason) => Err(Error::custom(format!(
                "invalid list name {:?}: {}",
                name, reason
            ))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All children, comments included.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Returns `true` if the child at `index` (in [`List::children`]) should be
    /// preceded by a blank line.
    pub fn has_blank_line_before(&self, index: usize) -> bool {
        self.blank_lines.get(index).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Appends a child.
    pub fn append(&mut self, child: Node) {
        self.children.push(child);
        self.blank_lines.push(false);
    }

    /// Appends a child that the writer separates from its predecessor by a
    /// blank line.
    pub fn append_with_blank_line(&mut self, child: Node) {
        self.children.push(child);
        self.blank_lines.push(true);
    }

    /// Appends `(name value)`.
    pub fn append_value<T: SerializableValue>(&mut self, name: &str, value: &T) {
        let mut list = List::new(name);
        list.append(value.to_node());
        self.append(Node::List(list));
    }

    /// Children that carry meaning, i.e. everything except comments.
    pub fn items(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|node| !node.is_comment())
    }

    /// The `index`-th non-comment child.
    pub fn child(&self, index: usize) -> Option<&Node> {
        self.items().nth(index)
    }

    /// First child list called `name`.
    pub fn find(&self, name: &str) -> Option<&List> {
        self.children
            .iter()
            .filter_map(Node::as_list)
            .find(|list| list.name == name)
    }

    /// All child lists called `name`, in file order.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a List> + 'a {
        self.children
            .iter()
            .filter_map(Node::as_list)
            .filter(move |list| list.name == name)
    }

    /// First child list called `name`, or a structural error naming this list.
    pub fn require(&self, name: &str) -> Result<&List> {
        self.find(name)
            .ok_or_else(|| Error::structural(&self.name, format!("missing child `{}`", name)))
    }

    /// Converts the `index`-th non-comment child to `T`.
    pub fn value<T: SerializableValue>(&self, index: usize) -> Result<T> {
        let node = self.child(index).ok_or_else(|| {
            Error::structural(&self.name, format!("missing value at position {}", index))
        })?;
        T::from_node(node).map_err(|e| e.within(&self.name))
    }

    /// Reads `(name value)`.
    pub fn require_value<T: SerializableValue>(&self, name: &str) -> Result<T> {
        let list = self.require(name)?;
        list.single_value().map_err(|e| e.within(&self.name))
    }

    /// Reads `(name value)` if present.
    pub fn optional_value<T: SerializableValue>(&self, name: &str) -> Result<Option<T>> {
        match self.find(name) {
            Some(list) => list
                .single_value()
                .map(Some)
                .map_err(|e| e.within(&self.name)),
            None => Ok(None),
        }
    }

    /// Converts the only non-comment child of this list to `T`.
    pub fn single_value<T: SerializableValue>(&self) -> Result<T> {
        let mut items = self.items();
        match (items.next(), items.next()) {
            (Some(node), None) => T::from_node(node).map_err(|e| e.within(&self.name)),
            (None, _) => Err(Error::structural(&self.name, "missing value")),
            (Some(_), Some(_)) => Err(Error::structural(&self.name, "expected exactly one value")),
        }
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.children == other.children
    }
}

impl Eq for List {}

/// One node of an S-expression tree.
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::Node;
///
/// let token = Node::token("true");
/// let text = Node::from("hello world");
/// assert!(token.is_token());
/// assert!(text.is_string());
/// assert_ne!(Node::token("R1"), Node::from("R1"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    List(List),
    Token(Token),
    String(String),
    Comment(String),
}

impl Node {
    /// Creates a token node.
    ///
    /// # Panics
    ///
    /// Panics if `text` is not a valid token. Building a token from arbitrary
    /// data is a bug in the calling code; use [`Token::new`] to validate first.
    #[must_use]
    pub fn token(text: &str) -> Self {
        match Token::new(text) {
            Ok(token) => Node::Token(token),
            Err(err) => panic!("{}", err),
        }
    }

    /// Creates a comment node.
    ///
    /// # Panics
    ///
    /// Panics if `text` spans several lines.
    #[must_use]
    pub fn comment(text: &str) -> Self {
        assert!(
            !text.contains(['\n', '\r']),
            "comment must fit on one line: {:?}",
            text
        );
        Node::Comment(text.to_string())
    }

    /// Checks that the tree can be written and read back unchanged.
    ///
    /// Tokens and list names are validated on construction, but string and
    /// comment payloads are plain `String`s. This rejects strings holding
    /// control characters other than line breaks and tabs, and comments
    /// spanning several lines. The `to_string` family calls it before
    /// rendering.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_sexpr::{List, Node};
    ///
    /// let mut list = List::new("text");
    /// list.append(Node::from("tab\tand\nnewline"));
    /// assert!(Node::List(list.clone()).validate().is_ok());
    ///
    /// list.append(Node::from("bell\u{7}"));
    /// assert!(Node::List(list).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        match self {
            Node::List(list) => {
                for (index, child) in list.children.iter().enumerate() {
                    child
                        .validate()
                        .map_err(|e| e.within(&list.name))?;
                }
                Ok(())
            }
            Node::Token(_) => Ok(()),
            Node::String(s) => match s.chars().find(|&c| !is_string_char(c)) {
                Some(c) => Err(Error::custom(format!(
                    "string {:?} contains the control character {:?}, which cannot be written",
                    s, c
                ))),
                None => Ok(()),
            },
            Node::Comment(text) => {
                if text.contains(['\n', '\r']) {
                    Err(Error::custom(format!("comment must fit on one line: {:?}", text)))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Short name of the node kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::List(_) => "list",
            Node::Token(_) => "token",
            Node::String(_) => "string",
            Node::Comment(_) => "comment",
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Node::List(_))
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Node::Token(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Node::String(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Node::Comment(_))
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Node::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_token(&self) -> Option<&str> {
        match self {
            Node::Token(token) => Some(token.as_str()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the list, or a structural error attributed to `element`.
    pub fn expect_list(&self, element: &str) -> Result<&List> {
        self.as_list().ok_or_else(|| {
            Error::structural(element, format!("expected a list, found a {}", self.kind()))
        })
    }
}

impl From<List> for Node {
    fn from(list: List) -> Self {
        Node::List(list)
    }
}

impl From<Token> for Node {
    fn from(token: Token) -> Self {
        Node::Token(token)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::String(s)
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        b.to_node()
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Node {
                fn from(n: $ty) -> Self {
                    n.to_node()
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);
