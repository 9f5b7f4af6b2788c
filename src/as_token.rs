//! Field adapter that writes a `Display`/`FromStr` value as a bare token.
//!
//! By default strings are quoted. Identifiers such as UUIDs, enum-like
//! keywords or versioned names read better unquoted:
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_sexpr::{from_node, render, to_node};
//! use uuid::Uuid;
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Pin {
//!     #[serde(with = "serde_sexpr::as_token")]
//!     uuid: Uuid,
//!     name: String,
//! }
//!
//! let pin = Pin { uuid: Uuid::nil(), name: "1".to_string() };
//! let node = to_node(&pin, "pin").unwrap();
//! assert_eq!(
//!     render(&node),
//!     "(pin (uuid 00000000-0000-0000-0000-000000000000) (name \"1\"))\n"
//! );
//! assert_eq!(from_node::<Pin>(&node).unwrap(), pin);
//! ```
//!
//! With other serde formats the value passes through as a plain string.

use crate::ser::TOKEN_MARKER;
use serde::{de, Deserializer, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: Serializer,
{
    serializer.serialize_newtype_struct(TOKEN_MARKER, &value.to_string())
}

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: FromStr,
    T::Err: fmt::Display,
    D: Deserializer<'de>,
{
    deserializer.deserialize_newtype_struct(TOKEN_MARKER, TokenVisitor(PhantomData))
}

struct TokenVisitor<T>(PhantomData<T>);

impl<'de, T> de::Visitor<'de> for TokenVisitor<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a token")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<T, E> {
        value
            .parse()
            .map_err(|e| E::custom(format!("invalid token `{}`: {}", value, e)))
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::{from_node, parse, to_node};
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Net {
        #[serde(with = "crate::as_token")]
        id: u32,
        #[serde(with = "crate::as_token")]
        kind: String,
    }

    #[test]
    fn test_writes_bare_token() {
        let net = Net {
            id: 7,
            kind: "power".to_string(),
        };
        let node = to_node(&net, "net").unwrap();
        assert_eq!(crate::render(&node), "(net (id 7) (kind power))\n");
    }

    #[test]
    fn test_quoted_string_rejected() {
        let root = parse("(net (id 7) (kind \"power\"))").unwrap();
        let err = from_node::<Net>(&root).unwrap_err();
        assert_eq!(err.element(), Some("net/kind"));
    }

    #[test]
    fn test_invalid_token_text_rejected() {
        let net = Net {
            id: 1,
            kind: "two words".to_string(),
        };
        assert!(to_node(&net, "net").is_err());
    }

    #[test]
    fn test_passes_through_json() {
        let net = Net {
            id: 3,
            kind: "signal".to_string(),
        };
        let json = serde_json::to_string(&net).unwrap();
        assert_eq!(json, r#"{"id":"3","kind":"signal"}"#);
        let back: Net = serde_json::from_str(&json).unwrap();
        assert_eq!(back, net);
    }
}
