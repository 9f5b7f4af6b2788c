//! Serde deserialization from S-expression trees.
//!
//! This module provides the deserializers that rebuild any
//! `T: DeserializeOwned` from a parsed [`List`], mirroring the mapping of
//! [`crate::ser`].
//!
//! ## Overview
//!
//! - **Read-only walk**: the tree is borrowed, never mutated
//! - **File order**: repeated children are read in the order they appear
//! - **Lazy validation**: each field is checked when it is read, and errors
//!   carry the path of the failing element (`symbol/pin/name`)
//! - **Strict kinds**: a quoted string never reads as a number and a token
//!   never reads as a string
//!
//! ## Usage
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_sexpr::{from_node, parse};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Pad {
//!     name: String,
//!     position: (f64, f64),
//!     #[serde(rename = "layer")]
//!     layers: Vec<u8>,
//!     note: Option<String>,
//! }
//!
//! let root = parse("(pad (name \"1\") (position 0 1.27) (layer 1) (layer 16))").unwrap();
//! let pad: Pad = from_node(&root).unwrap();
//! assert_eq!(pad.position, (0.0, 1.27));
//! assert_eq!(pad.layers, vec![1, 16]);
//! assert_eq!(pad.note, None);
//! ```

use crate::node::Token;
use crate::ser::TOKEN_MARKER;
use crate::values::{expect_string, expect_token, SerializableValue};
use crate::{Error, List, Node, Result};
use indexmap::IndexMap;
use serde::de::{self, DeserializeOwned};
use serde::de::value::StrDeserializer;

/// Deserializes `T` from a list node.
pub fn from_node<T: DeserializeOwned>(node: &Node) -> Result<T> {
    match node {
        Node::List(list) => from_list(list),
        other => Err(Error::custom(format!(
            "expected a list, found a {}",
            other.kind()
        ))),
    }
}

/// Deserializes `T` from the children of `list`.
pub fn from_list<T: DeserializeOwned>(list: &List) -> Result<T> {
    T::deserialize(ContentDeserializer::new(list)).map_err(|e| e.within(list.name()))
}

/// Deserializer over the non-comment children of one list.
pub struct ContentDeserializer<'a> {
    nodes: Vec<&'a Node>,
}

impl<'a> ContentDeserializer<'a> {
    pub fn new(list: &'a List) -> Self {
        ContentDeserializer {
            nodes: list.items().collect(),
        }
    }

    fn from_nodes(nodes: Vec<&'a Node>) -> Self {
        ContentDeserializer { nodes }
    }

    fn single(&self) -> Result<&'a Node> {
        match self.nodes.as_slice() {
            [node] => Ok(*node),
            [] => Err(Error::custom("missing value")),
            nodes => Err(Error::custom(format!(
                "expected a single value, found {}",
                nodes.len()
            ))),
        }
    }

    fn value<T: SerializableValue>(&self) -> Result<T> {
        T::from_node(self.single()?)
    }

    fn expect_empty(&self) -> Result<()> {
        if self.nodes.is_empty() {
            Ok(())
        } else {
            Err(Error::custom(format!(
                "expected no value, found {}",
                self.nodes.len()
            )))
        }
    }

    /// Groups child lists by name, keeping file order.
    fn fields(&self) -> Result<IndexMap<&'a str, Vec<&'a List>>> {
        let mut fields: IndexMap<&'a str, Vec<&'a List>> = IndexMap::new();
        for node in self.nodes.iter().copied() {
            match node {
                Node::List(list) => fields.entry(list.name()).or_default().push(list),
                other => {
                    return Err(Error::custom(format!(
                        "expected named fields, found a {}",
                        other.kind()
                    )))
                }
            }
        }
        Ok(fields)
    }

    fn visit_elements<'de, V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let mut access = NodeSeqAccess {
            iter: self.nodes.into_iter(),
        };
        let value = visitor.visit_seq(&mut access)?;
        match access.iter.len() {
            0 => Ok(value),
            n => Err(Error::custom(format!("{} unexpected trailing values", n))),
        }
    }
}

macro_rules! deserialize_value {
    ($($method:ident => $ty:ty, $visit:ident;)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                visitor.$visit(self.value::<$ty>()?)
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for ContentDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.nodes.as_slice() {
            [] => return visitor.visit_unit(),
            [Node::String(s)] => return visitor.visit_str(s),
            [Node::Token(token)] => {
                let text = token.as_str();
                return match text {
                    "true" => visitor.visit_bool(true),
                    "false" => visitor.visit_bool(false),
                    _ => {
                        if let Ok(i) = text.parse::<i64>() {
                            visitor.visit_i64(i)
                        } else if let Ok(u) = text.parse::<u64>() {
                            visitor.visit_u64(u)
                        } else if let Ok(f) = text.parse::<f64>() {
                            visitor.visit_f64(f)
                        } else {
                            visitor.visit_str(text)
                        }
                    }
                };
            }
            _ => {}
        }
        if self.nodes.iter().all(|node| node.is_list()) {
            self.deserialize_map(visitor)
        } else {
            self.visit_elements(visitor)
        }
    }

    deserialize_value! {
        deserialize_bool => bool, visit_bool;
        deserialize_i8 => i8, visit_i8;
        deserialize_i16 => i16, visit_i16;
        deserialize_i32 => i32, visit_i32;
        deserialize_i64 => i64, visit_i64;
        deserialize_i128 => i128, visit_i128;
        deserialize_u8 => u8, visit_u8;
        deserialize_u16 => u16, visit_u16;
        deserialize_u32 => u32, visit_u32;
        deserialize_u64 => u64, visit_u64;
        deserialize_u128 => u128, visit_u128;
        deserialize_f32 => f32, visit_f32;
        deserialize_f64 => f64, visit_f64;
        deserialize_string => String, visit_string;
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let text = expect_string(self.single()?, "a character")?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => visitor.visit_char(ch),
            _ => Err(Error::custom(format!("expected a single character, found {:?}", text))),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_str(expect_string(self.single()?, "a quoted string")?)
    }

    fn deserialize_bytes<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("byte arrays"))
    }

    fn deserialize_byte_buf<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("byte arrays"))
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.nodes.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.expect_empty()?;
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if name == TOKEN_MARKER {
            visitor.visit_str(expect_token(self.single()?, "a token")?)
        } else {
            visitor.visit_newtype_struct(self)
        }
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.visit_elements(visitor)
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.visit_elements(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.visit_elements(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let fields = self.fields()?;
        visitor.visit_map(FieldMapAccess::new(fields))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        declared: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let mut fields = self.fields()?;
        // Absent fields are still offered, so that options read as `None` and
        // sequences as empty.
        for field in declared {
            fields.entry(*field).or_default();
        }
        visitor.visit_map(FieldMapAccess::new(fields))
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.single()? {
            Node::Token(token) => visitor.visit_enum(StrDeserializer::<Error>::new(token.as_str())),
            Node::List(list) => visitor.visit_enum(VariantAccess { list }),
            other => Err(Error::custom(format!(
                "expected an enum variant, found a {}",
                other.kind()
            ))),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_str(expect_token(self.single()?, "an identifier")?)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

/// Deserializer over all occurrences of one named field.
struct FieldDeserializer<'a> {
    lists: Vec<&'a List>,
}

impl<'a> FieldDeserializer<'a> {
    fn into_single(self) -> Result<ContentDeserializer<'a>> {
        match self.lists.as_slice() {
            [list] => Ok(ContentDeserializer::new(*list)),
            [] => Err(Error::custom("missing required element")),
            lists => Err(Error::custom(format!(
                "element appears {} times, expected once",
                lists.len()
            ))),
        }
    }
}

macro_rules! forward_to_single {
    ($($method:ident)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                self.into_single()?.$method(visitor)
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for FieldDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.lists.len() > 1 {
            self.deserialize_seq(visitor)
        } else {
            self.into_single()?.deserialize_any(visitor)
        }
    }

    forward_to_single! {
        deserialize_bool deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
        deserialize_i128 deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64
        deserialize_u128 deserialize_f32 deserialize_f64 deserialize_char deserialize_str
        deserialize_string deserialize_bytes deserialize_byte_buf deserialize_unit
        deserialize_map deserialize_identifier
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.lists.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.into_single()?.deserialize_unit_struct(name, visitor)
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if name == TOKEN_MARKER {
            self.into_single()?.deserialize_newtype_struct(name, visitor)
        } else {
            visitor.visit_newtype_struct(self)
        }
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(ListSeqAccess {
            iter: self.lists.into_iter(),
        })
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.into_single()?.deserialize_tuple(len, visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.into_single()?.deserialize_tuple_struct(name, len, visitor)
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.into_single()?.deserialize_struct(name, fields, visitor)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.into_single()?.deserialize_enum(name, variants, visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

/// Sequence of single nodes (tuple elements).
struct NodeSeqAccess<'a> {
    iter: std::vec::IntoIter<&'a Node>,
}

impl<'de, 'a> de::SeqAccess<'de> for NodeSeqAccess<'a> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(node) => seed
                .deserialize(ContentDeserializer::from_nodes(vec![node]))
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Sequence of repeated field lists.
struct ListSeqAccess<'a> {
    iter: std::vec::IntoIter<&'a List>,
}

impl<'de, 'a> de::SeqAccess<'de> for ListSeqAccess<'a> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(list) => seed.deserialize(ContentDeserializer::new(list)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct FieldMapAccess<'a> {
    iter: indexmap::map::IntoIter<&'a str, Vec<&'a List>>,
    value: Option<(&'a str, Vec<&'a List>)>,
}

impl<'a> FieldMapAccess<'a> {
    fn new(fields: IndexMap<&'a str, Vec<&'a List>>) -> Self {
        FieldMapAccess {
            iter: fields.into_iter(),
            value: None,
        }
    }
}

impl<'de, 'a> de::MapAccess<'de> for FieldMapAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((name, lists)) => {
                self.value = Some((name, lists));
                seed.deserialize(KeyDeserializer { name }).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some((name, lists)) => seed
                .deserialize(FieldDeserializer { lists })
                .map_err(|e| e.within(name)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Map keys are stored as list names. Numeric and boolean keys are parsed
/// back from the name; every other request sees the name as a string.
struct KeyDeserializer<'a> {
    name: &'a str,
}

impl<'a> KeyDeserializer<'a> {
    fn value<T: SerializableValue>(&self) -> Result<T> {
        T::from_node(&Node::Token(Token::new(self.name)?))
    }
}

impl<'de, 'a> de::Deserializer<'de> for KeyDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_str(self.name)
    }

    deserialize_value! {
        deserialize_bool => bool, visit_bool;
        deserialize_i8 => i8, visit_i8;
        deserialize_i16 => i16, visit_i16;
        deserialize_i32 => i32, visit_i32;
        deserialize_i64 => i64, visit_i64;
        deserialize_i128 => i128, visit_i128;
        deserialize_u8 => u8, visit_u8;
        deserialize_u16 => u16, visit_u16;
        deserialize_u32 => u32, visit_u32;
        deserialize_u64 => u64, visit_u64;
        deserialize_u128 => u128, visit_u128;
        deserialize_f32 => f32, visit_f32;
        deserialize_f64 => f64, visit_f64;
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_enum(StrDeserializer::<Error>::new(self.name))
    }

    serde::forward_to_deserialize_any! {
        char str string bytes byte_buf option unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

struct VariantAccess<'a> {
    list: &'a List,
}

impl<'de, 'a> de::EnumAccess<'de> for VariantAccess<'a> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(StrDeserializer::<Error>::new(self.list.name()))?;
        Ok((variant, self))
    }
}

impl<'de, 'a> de::VariantAccess<'de> for VariantAccess<'a> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        ContentDeserializer::new(self.list)
            .expect_empty()
            .map_err(|e| e.within(self.list.name()))
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ContentDeserializer::new(self.list))
            .map_err(|e| e.within(self.list.name()))
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_tuple(ContentDeserializer::new(self.list), len, visitor)
            .map_err(|e| e.within(self.list.name()))
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_struct(
            ContentDeserializer::new(self.list),
            "",
            fields,
            visitor,
        )
        .map_err(|e| e.within(self.list.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, to_node};
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Pin {
        name: String,
        length: f64,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "snake_case")]
    enum Shape {
        Round,
        Rect { width: f64, height: f64 },
        Offset(f64, f64),
        Label(String),
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Symbol {
        name: String,
        #[serde(rename = "pin")]
        pins: Vec<Pin>,
        shape: Shape,
        description: Option<String>,
        visible: bool,
        grid: Option<(f64, f64)>,
    }

    fn parse_as<T: DeserializeOwned>(text: &str) -> Result<T> {
        from_node(&parse(text).unwrap())
    }

    #[test]
    fn test_read_struct() {
        let symbol: Symbol = parse_as(
            "(symbol (name \"R\") (pin (name \"1\") (length 2.54)) (shape round) (visible true))",
        )
        .unwrap();
        assert_eq!(symbol.name, "R");
        assert_eq!(symbol.pins.len(), 1);
        assert_eq!(symbol.shape, Shape::Round);
        assert_eq!(symbol.description, None);
        assert!(symbol.visible);
        assert_eq!(symbol.grid, None);
    }

    #[test]
    fn test_roundtrip_through_tree() {
        let symbol = Symbol {
            name: "C".to_string(),
            pins: vec![
                Pin {
                    name: "+".to_string(),
                    length: 1.27,
                },
                Pin {
                    name: "-".to_string(),
                    length: 1.27,
                },
            ],
            shape: Shape::Rect {
                width: 2.0,
                height: 1.0,
            },
            description: Some("polarized \"cap\"".to_string()),
            visible: false,
            grid: Some((0.5, 0.5)),
        };
        let node = to_node(&symbol, "symbol").unwrap();
        let back: Symbol = from_node(&node).unwrap();
        assert_eq!(back, symbol);
    }

    #[test]
    fn test_field_order_is_free() {
        let symbol: Symbol = parse_as(
            "(symbol (visible false) (shape (offset 1 2)) (name \"R\"))",
        )
        .unwrap();
        assert_eq!(symbol.shape, Shape::Offset(1.0, 2.0));
        assert!(symbol.pins.is_empty());
    }

    #[test]
    fn test_sequence_keeps_file_order() {
        let symbol: Symbol = parse_as(
            "(symbol (name \"R\") (pin (name \"2\") (length 1)) (shape round) (pin (name \"1\") (length 1)) (visible true))",
        )
        .unwrap();
        let names: Vec<&str> = symbol.pins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["2", "1"]);
    }

    #[test]
    fn test_missing_field_is_structural() {
        let err = parse_as::<Symbol>("(symbol (name \"R\") (shape round))").unwrap_err();
        assert!(err.is_structural());
        assert_eq!(err.element(), Some("symbol/visible"));
    }

    #[test]
    fn test_wrong_kind_reports_path() {
        let err = parse_as::<Symbol>(
            "(symbol (name \"R\") (pin (name 1) (length 1)) (shape round) (visible true))",
        )
        .unwrap_err();
        assert!(err.is_structural());
        assert_eq!(err.element(), Some("symbol/pin/name"));
    }

    #[test]
    fn test_quoted_number_rejected() {
        let err = parse_as::<Pin>("(pin (name \"1\") (length \"2.54\"))").unwrap_err();
        assert_eq!(err.element(), Some("pin/length"));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = parse_as::<Pin>("(pin (name \"1\") (name \"2\") (length 1))").unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("2 times"));
    }

    #[test]
    fn test_tuple_arity() {
        #[derive(Deserialize, Debug)]
        struct At {
            #[allow(dead_code)]
            position: (f64, f64),
        }
        assert!(parse_as::<At>("(at (position 1 2 3))").is_err());
        assert!(parse_as::<At>("(at (position 1))").is_err());
        assert!(parse_as::<At>("(at (position 1 2))").is_ok());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let pin: Pin = parse_as("(pin (name \"1\") (length 1) (color red))").unwrap();
        assert_eq!(pin.name, "1");
    }

    #[test]
    fn test_comments_are_skipped() {
        let pin: Pin = parse_as("(pin ; first pin\n (name \"1\")\n (length 1) ; mm\n)").unwrap();
        assert_eq!(pin.length, 1.0);
    }

    #[test]
    fn test_empty_optional_sequence_reads_as_none() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Net {
            #[serde(rename = "pin")]
            pins: Option<Vec<u32>>,
        }

        let node = to_node(&Net { pins: Some(vec![]) }, "net").unwrap();
        assert_eq!(node, Node::List(List::new("net")));
        assert_eq!(from_node::<Net>(&node).unwrap(), Net { pins: None });

        let node = to_node(&Net { pins: Some(vec![3]) }, "net").unwrap();
        assert_eq!(from_node::<Net>(&node).unwrap(), Net { pins: Some(vec![3]) });
    }

    #[test]
    fn test_map() {
        let map: BTreeMap<String, i32> = parse_as("(nets (gnd 0) (vcc 5))").unwrap();
        assert_eq!(map.get("vcc"), Some(&5));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_numeric_map_keys() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Layers {
            map: BTreeMap<u32, String>,
        }

        let layers = Layers {
            map: BTreeMap::from([(1, "top".to_string()), (16, "bottom".to_string())]),
        };
        let node = to_node(&layers, "layers").unwrap();
        assert_eq!(from_node::<Layers>(&node).unwrap(), layers);

        let flags: BTreeMap<bool, i32> = parse_as("(flags (true 1) (false 0))").unwrap();
        assert_eq!(flags.get(&true), Some(&1));

        let err = parse_as::<BTreeMap<u32, String>>("(layers (one \"top\"))").unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_unit_variant_with_payload_rejected() {
        let err = parse_as::<Symbol>(
            "(symbol (name \"R\") (shape (round 1)) (visible true))",
        )
        .unwrap_err();
        assert!(err.is_structural());
    }
}
