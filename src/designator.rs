//! Designators: short validated labels such as `R1` or `U3:A`.
//!
//! [`DesignatorString`] is the one validated value type shipped with the
//! engine. It shows how a domain primitive checks its invariants on
//! construction and reports invalid file content as a structural error.

use crate::values::{expect_string, SerializableValue};
use crate::{Error, Node, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Longest accepted designator, in characters.
pub const MAX_DESIGNATOR_LENGTH: usize = 32;

/// A short user-visible label such as a component designator (`R1`, `U3:A`)
/// or a pin name (`VCC`, `D+`).
///
/// Valid designators are non-empty, at most [`MAX_DESIGNATOR_LENGTH`]
/// characters long and use only `0-9 a-z A-Z \ / + - _ . :`. They are written
/// as quoted strings.
///
/// Equality, hashing and ordering all ignore ASCII case, so `r1 == R1` and
/// `r10` sorts next to `R1`. The original spelling is kept for display and
/// for writing.
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::DesignatorString;
///
/// let r1 = DesignatorString::new("R1").unwrap();
/// assert_eq!(r1.as_str(), "R1");
/// assert!(DesignatorString::new("R 1").is_err());
/// assert!(DesignatorString::new("").is_err());
/// assert_eq!(r1, DesignatorString::new("r1").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct DesignatorString(String);

impl DesignatorString {
    pub fn new<T: Into<String>>(text: T) -> Result<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(Error::custom("designator must not be empty"));
        }
        if let Some(ch) = text.chars().find(|&ch| !is_designator_char(ch)) {
            return Err(Error::custom(format!(
                "invalid character {:?} in designator {:?}",
                ch, text
            )));
        }
        // All accepted characters are ASCII.
        if text.len() > MAX_DESIGNATOR_LENGTH {
            return Err(Error::custom(format!(
                "designator {:?} is longer than {} characters",
                text, MAX_DESIGNATOR_LENGTH
            )));
        }
        Ok(DesignatorString(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn is_designator_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '\\' | '/' | '+' | '-' | '_' | '.' | ':')
}

impl DesignatorString {
    fn folded(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.bytes().map(|b| b.to_ascii_uppercase())
    }
}

impl PartialEq for DesignatorString {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for DesignatorString {}

impl Hash for DesignatorString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.folded() {
            state.write_u8(b);
        }
        state.write_usize(self.0.len());
    }
}

impl PartialOrd for DesignatorString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DesignatorString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(other.folded())
    }
}

impl fmt::Display for DesignatorString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DesignatorString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for DesignatorString {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DesignatorString::new(s)
    }
}

impl SerializableValue for DesignatorString {
    fn to_node(&self) -> Node {
        Node::String(self.0.clone())
    }

    fn from_node(node: &Node) -> Result<Self> {
        DesignatorString::new(expect_string(node, "a quoted designator")?)
    }
}

impl Serialize for DesignatorString {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DesignatorString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        DesignatorString::new(text).map_err(serde::de::Error::custom)
    }
}
