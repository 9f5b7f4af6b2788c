//! Serde serialization into S-expression trees.
//!
//! This module provides the [`ContentSerializer`] that turns any
//! `T: Serialize` into list children, so domain types can derive their
//! adapters instead of walking trees by hand.
//!
//! ## Mapping
//!
//! - **Primitives**: numbers, booleans and unit variants become tokens;
//!   `str`, `String` and `char` become quoted strings
//! - **Structs and maps**: one `(field ...)` child per field, in declaration order
//! - **Sequences**: the field's list is repeated once per element
//! - **Tuples**: elements are concatenated, e.g. `(position 1.5 2)`
//! - **Options**: `None` fields are omitted, and so are empty sequences, so
//!   `Some(vec![])` reads back as `None`
//! - **Enum variants with data**: `(variant ...)`
//!
//! ## Usage
//!
//! ```rust
//! use serde::Serialize;
//! use serde_sexpr::{render, to_node};
//!
//! #[derive(Serialize)]
//! struct Pad {
//!     name: String,
//!     position: (f64, f64),
//!     #[serde(rename = "layer")]
//!     layers: Vec<u8>,
//!     note: Option<String>,
//! }
//!
//! let pad = Pad {
//!     name: "1".to_string(),
//!     position: (0.0, 1.27),
//!     layers: vec![1, 16],
//!     note: None,
//! };
//! let node = to_node(&pad, "pad").unwrap();
//! assert_eq!(
//!     render(&node),
//!     "(pad (name \"1\") (position 0 1.27) (layer 1) (layer 16))\n"
//! );
//! ```

use crate::node::Token;
use crate::{Error, List, Node, Result};
use serde::{ser, Serialize};

/// Newtype struct name that makes the serializer emit a bare token.
pub(crate) const TOKEN_MARKER: &str = "$serde_sexpr::private::Token";

/// Children produced for one value, each with its blank-line hint.
type Children = Vec<(Node, bool)>;

/// What one serialized value contributes to its parent.
pub enum Content {
    /// Nothing at all (`None`): an enclosing field is omitted.
    Absent,
    /// Children of the enclosing list.
    Nodes(Children),
    /// One child list per element (sequences).
    Repeated(Vec<Children>),
}

impl Content {
    fn single(node: Node) -> Self {
        Content::Nodes(vec![(node, false)])
    }

    fn token<T: ToString>(value: T) -> Result<Self> {
        Ok(Content::single(Node::Token(Token::new(value.to_string())?)))
    }

    /// A quoted string, rejected if its text could not be read back.
    fn string(value: String) -> Result<Self> {
        let node = Node::String(value);
        node.validate()?;
        Ok(Content::single(node))
    }

    /// Children for a position that holds exactly one value.
    fn into_children(self, context: &str) -> Result<Children> {
        match self {
            Content::Absent => Ok(Vec::new()),
            Content::Nodes(children) => Ok(children),
            Content::Repeated(_) => Err(Error::unsupported_type(&format!(
                "sequence nested directly inside {}",
                context
            ))),
        }
    }
}

/// Serializes `value` into a new list called `name`.
///
/// # Errors
///
/// Fails if `name` or a field name is not a valid identifier, if a token
/// value contains delimiters, if a string holds a control character other
/// than a line break or tab, or if the value's shape has no S-expression
/// representation (byte arrays, sequences of sequences).
pub fn to_node<T>(value: &T, name: &str) -> Result<Node>
where
    T: ?Sized + Serialize,
{
    let mut root = List::try_new(name)?;
    serialize_into(value, &mut root)?;
    Ok(Node::List(root))
}

/// Appends the serialized fields of `value` to `root`.
///
/// This lets a hand-written [`crate::SerializableObject`] implementation
/// delegate to `#[derive(Serialize)]`.
pub fn serialize_into<T>(value: &T, root: &mut List) -> Result<()>
where
    T: ?Sized + Serialize,
{
    let children = value
        .serialize(ContentSerializer)?
        .into_children("a single list")?;
    append_children(root, children);
    Ok(())
}

fn append_children(list: &mut List, children: Children) {
    for (node, blank_line) in children {
        if blank_line {
            list.append_with_blank_line(node);
        } else {
            list.append(node);
        }
    }
}

fn named_list(name: &str, children: Children) -> Result<Node> {
    let mut list = List::try_new(name)?;
    append_children(&mut list, children);
    Ok(Node::List(list))
}

/// Appends the child lists for field `name`.
fn push_field(children: &mut Children, name: &str, content: Content) -> Result<()> {
    match content {
        Content::Absent => {}
        Content::Nodes(nodes) => children.push((named_list(name, nodes)?, false)),
        Content::Repeated(items) => {
            for item in items {
                // Composite elements get their own paragraph.
                let blank_line = item.iter().any(|(node, _)| node.is_list());
                children.push((named_list(name, item)?, blank_line));
            }
        }
    }
    Ok(())
}

fn to_content<T: Serialize + ?Sized>(value: &T) -> Result<Content> {
    value.serialize(ContentSerializer)
}

/// Serializer producing the [`Content`] of one value.
pub struct ContentSerializer;

pub struct SerializeVec {
    items: Vec<Children>,
}

pub struct SerializeTuple {
    children: Children,
}

pub struct SerializeTupleVariant {
    variant: &'static str,
    children: Children,
}

pub struct SerializeMap {
    children: Children,
    current_key: Option<String>,
}

pub struct SerializeStructVariant {
    variant: &'static str,
    children: Children,
}

impl ser::Serializer for ContentSerializer {
    type Ok = Content;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeTuple;
    type SerializeTupleStruct = SerializeTuple;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Content> {
        Content::token(v)
    }

    fn serialize_i8(self, v: i8) -> Result<Content> {
        Content::token(v)
    }

    fn serialize_i16(self, v: i16) -> Result<Content> {
        Content::token(v)
    }

    fn serialize_i32(self, v: i32) -> Result<Content> {
        Content::token(v)
    }

    fn serialize_i64(self, v: i64) -> Result<Content> {
        Content::token(v)
    }

    fn serialize_i128(self, v: i128) -> Result<Content> {
        Content::token(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Content> {
        Content::token(v)
    }

    fn serialize_u16(self, v: u16) -> Result<Content> {
        Content::token(v)
    }

    fn serialize_u32(self, v: u32) -> Result<Content> {
        Content::token(v)
    }

    fn serialize_u64(self, v: u64) -> Result<Content> {
        Content::token(v)
    }

    fn serialize_u128(self, v: u128) -> Result<Content> {
        Content::token(v)
    }

    fn serialize_f32(self, v: f32) -> Result<Content> {
        Content::token(v)
    }

    fn serialize_f64(self, v: f64) -> Result<Content> {
        Content::token(v)
    }

    fn serialize_char(self, v: char) -> Result<Content> {
        Content::string(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<Content> {
        Content::string(v.to_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Content> {
        Err(Error::unsupported_type("byte arrays"))
    }

    fn serialize_none(self) -> Result<Content> {
        Ok(Content::Absent)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Content>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Content> {
        Ok(Content::Nodes(Vec::new()))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Content> {
        Ok(Content::Nodes(Vec::new()))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Content> {
        Content::token(variant)
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Content>
    where
        T: ?Sized + Serialize,
    {
        if name != TOKEN_MARKER {
            return value.serialize(self);
        }
        let children = to_content(value)?.into_children("a token")?;
        match children.as_slice() {
            [(Node::String(text), _)] => Content::token(text),
            [(Node::Token(token), _)] => Ok(Content::single(Node::Token(token.clone()))),
            _ => Err(Error::custom("token values must serialize to a single string")),
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Content>
    where
        T: ?Sized + Serialize,
    {
        let children = to_content(value)?.into_children("an enum variant")?;
        Ok(Content::single(named_list(variant, children)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeTuple> {
        Ok(SerializeTuple {
            children: Vec::with_capacity(len),
        })
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeTuple> {
        self.serialize_tuple(len)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            children: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap {
            children: Vec::new(),
            current_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        self.serialize_map(None)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            children: Vec::new(),
        })
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Content;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items
            .push(to_content(value)?.into_children("a sequence")?);
        Ok(())
    }

    fn end(self) -> Result<Content> {
        Ok(Content::Repeated(self.items))
    }
}

impl ser::SerializeTuple for SerializeTuple {
    type Ok = Content;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.children
            .extend(to_content(value)?.into_children("a tuple")?);
        Ok(())
    }

    fn end(self) -> Result<Content> {
        Ok(Content::Nodes(self.children))
    }
}

impl ser::SerializeTupleStruct for SerializeTuple {
    type Ok = Content;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeTuple::serialize_element(self, value)
    }

    fn end(self) -> Result<Content> {
        ser::SerializeTuple::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Content;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.children
            .extend(to_content(value)?.into_children("a tuple variant")?);
        Ok(())
    }

    fn end(self) -> Result<Content> {
        Ok(Content::single(named_list(self.variant, self.children)?))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Content;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let children = to_content(key)?.into_children("a map key")?;
        match children.as_slice() {
            [(Node::String(s), _)] => {
                self.current_key = Some(s.clone());
                Ok(())
            }
            [(Node::Token(token), _)] => {
                self.current_key = Some(token.as_str().to_string());
                Ok(())
            }
            _ => Err(Error::custom("Map keys must serialize to a single string or token")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        let content = to_content(value).map_err(|e| e.within(&key))?;
        push_field(&mut self.children, &key, content)
    }

    fn end(self) -> Result<Content> {
        Ok(Content::Nodes(self.children))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Content;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        push_field(
            &mut self.children,
            key,
            to_content(value).map_err(|e| e.within(key))?,
        )
    }

    fn end(self) -> Result<Content> {
        Ok(Content::Nodes(self.children))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Content;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        push_field(
            &mut self.children,
            key,
            to_content(value).map_err(|e| e.within(key))?,
        )
    }

    fn end(self) -> Result<Content> {
        Ok(Content::single(named_list(self.variant, self.children)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Pin {
        name: String,
        length: f64,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "snake_case")]
    enum Shape {
        Round,
        Rect { width: f64, height: f64 },
        Offset(f64, f64),
        Label(String),
    }

    #[derive(Serialize)]
    struct Symbol {
        name: String,
        #[serde(rename = "pin")]
        pins: Vec<Pin>,
        shape: Shape,
        tags: Vec<String>,
        description: Option<String>,
    }

    #[test]
    fn test_struct_layout() {
        let symbol = Symbol {
            name: "R".to_string(),
            pins: vec![
                Pin {
                    name: "1".to_string(),
                    length: 2.54,
                },
                Pin {
                    name: "2".to_string(),
                    length: 2.54,
                },
            ],
            shape: Shape::Round,
            tags: vec!["passive".to_string()],
            description: None,
        };
        let node = to_node(&symbol, "symbol").unwrap();
        assert_eq!(
            render(&node),
            "(symbol\n (name \"R\")\n\n (pin (name \"1\") (length 2.54))\n\n (pin (name \"2\") (length 2.54))\n (shape round)\n (tags \"passive\")\n)\n"
        );
    }

    #[test]
    fn test_enum_variants() {
        let rect = to_node(&Shape::Rect { width: 1.0, height: 0.5 }, "shape").unwrap();
        assert_eq!(render(&rect), "(shape\n (rect (width 1) (height 0.5))\n)\n");

        let offset = to_node(&Shape::Offset(1.5, -2.0), "shape").unwrap();
        assert_eq!(render(&offset), "(shape (offset 1.5 -2))\n");

        let label = to_node(&Shape::Label("top".to_string()), "shape").unwrap();
        assert_eq!(render(&label), "(shape (label \"top\"))\n");
    }

    #[test]
    fn test_map_keys() {
        let mut map = BTreeMap::new();
        map.insert("vcc", 5);
        map.insert("gnd", 0);
        let node = to_node(&map, "nets").unwrap();
        assert_eq!(render(&node), "(nets (gnd 0) (vcc 5))\n");
    }

    #[test]
    fn test_invalid_field_name() {
        let mut map = BTreeMap::new();
        map.insert("two words", 1);
        assert!(to_node(&map, "nets").is_err());
    }

    #[test]
    fn test_nested_sequences_rejected() {
        let nested = vec![vec![1, 2], vec![3]];
        #[derive(Serialize)]
        struct Grid {
            rows: Vec<Vec<i32>>,
        }
        let err = to_node(&Grid { rows: nested }, "grid").unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }

    #[test]
    fn test_top_level_sequence_rejected() {
        assert!(to_node(&vec![1, 2, 3], "numbers").is_err());
    }

    #[test]
    fn test_bytes_rejected() {
        struct Raw;
        impl Serialize for Raw {
            fn serialize<S: ser::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
                s.serialize_bytes(b"raw")
            }
        }
        #[derive(Serialize)]
        struct Blob {
            data: Raw,
        }
        assert!(to_node(&Blob { data: Raw }, "blob").is_err());
    }
}
