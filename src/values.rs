//! Primitive value objects.
//!
//! A primitive maps to exactly one [`Node`]: numbers, booleans, UUIDs and
//! timestamps become tokens, free text becomes a quoted string.
//!
//! | Rust type | Node | Example |
//! |-----------|------|---------|
//! | `bool` | token | `true` |
//! | integers, floats | token | `-42`, `2.54` |
//! | `String` | quoted string | `"Resistor"` |
//! | `Uuid` | token | `2b0b3f3e-3a4c-4b4f-9c5d-0a1b2c3d4e5f` |
//! | `DateTime<Utc>` | token | `2019-01-26T09:41:27Z`, `2019-01-26T09:41:27.123Z` |
//!
//! Conversions back from a node check both the node kind and the value's own
//! validity, so `(uuid "not-a-uuid")` and `(uuid not-a-uuid)` are both rejected.

use crate::node::Token;
use crate::{Error, Node, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Two-way mapping between a primitive value and a single node.
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::{Node, SerializableValue};
///
/// assert_eq!(42u32.to_node(), Node::token("42"));
/// assert_eq!(u32::from_node(&Node::token("42")).unwrap(), 42);
/// assert!(u32::from_node(&Node::from("42")).is_err());
/// ```
pub trait SerializableValue: Sized {
    fn to_node(&self) -> Node;

    /// Errors returned here are not yet attributed to an element; callers
    /// localize them with [`Error::within`].
    fn from_node(node: &Node) -> Result<Self>;
}

/// Returns the token text or a kind mismatch error.
pub(crate) fn expect_token<'a>(node: &'a Node, what: &str) -> Result<&'a str> {
    node.as_token()
        .ok_or_else(|| Error::custom(format!("expected {}, found a {}", what, node.kind())))
}

/// Returns the string text or a kind mismatch error.
pub(crate) fn expect_string<'a>(node: &'a Node, what: &str) -> Result<&'a str> {
    node.as_str()
        .ok_or_else(|| Error::custom(format!("expected {}, found a {}", what, node.kind())))
}

/// Builds a token from text produced by a `Display` impl that never emits
/// delimiters (numbers, UUIDs, timestamps).
fn display_token<T: ToString>(value: &T) -> Node {
    Node::token(&value.to_string())
}

impl SerializableValue for bool {
    fn to_node(&self) -> Node {
        Node::token(if *self { "true" } else { "false" })
    }

    fn from_node(node: &Node) -> Result<Self> {
        match expect_token(node, "a boolean")? {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(Error::custom(format!("invalid boolean `{}`", other))),
        }
    }
}

macro_rules! impl_number_value {
    ($($ty:ty => $what:literal),* $(,)?) => {
        $(
            impl SerializableValue for $ty {
                fn to_node(&self) -> Node {
                    display_token(self)
                }

                fn from_node(node: &Node) -> Result<Self> {
                    let text = expect_token(node, $what)?;
                    text.parse::<$ty>().map_err(|e| {
                        Error::custom(format!("expected {}, found `{}`: {}", $what, text, e))
                    })
                }
            }
        )*
    };
}

impl_number_value! {
    i8 => "an integer",
    i16 => "an integer",
    i32 => "an integer",
    i64 => "an integer",
    i128 => "an integer",
    u8 => "an unsigned integer",
    u16 => "an unsigned integer",
    u32 => "an unsigned integer",
    u64 => "an unsigned integer",
    u128 => "an unsigned integer",
    usize => "an unsigned integer",
    f32 => "a number",
    f64 => "a number",
}

impl SerializableValue for String {
    fn to_node(&self) -> Node {
        Node::String(self.clone())
    }

    fn from_node(node: &Node) -> Result<Self> {
        expect_string(node, "a quoted string").map(str::to_string)
    }
}

impl SerializableValue for Token {
    fn to_node(&self) -> Node {
        Node::Token(self.clone())
    }

    fn from_node(node: &Node) -> Result<Self> {
        match node {
            Node::Token(token) => Ok(token.clone()),
            other => Err(Error::custom(format!(
                "expected a token, found a {}",
                other.kind()
            ))),
        }
    }
}

impl SerializableValue for Uuid {
    fn to_node(&self) -> Node {
        display_token(&self.hyphenated())
    }

    fn from_node(node: &Node) -> Result<Self> {
        let text = expect_token(node, "a UUID")?;
        // Only the canonical lowercase hyphenated form is accepted so that
        // equal UUIDs always have equal text.
        match Uuid::try_parse(text) {
            Ok(uuid) if uuid.hyphenated().to_string() == text => Ok(uuid),
            _ => Err(Error::custom(format!("invalid UUID `{}`", text))),
        }
    }
}

impl SerializableValue for DateTime<Utc> {
    fn to_node(&self) -> Node {
        // Fractional seconds only appear when present, in groups of three digits.
        Node::token(&self.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    fn from_node(node: &Node) -> Result<Self> {
        let text = expect_token(node, "a timestamp")?;
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Error::custom(format!("invalid timestamp `{}`: {}", text, e)))
    }
}
