//! # serde_sexpr
//!
//! A serialization engine for S-expression documents: a tree model, a
//! canonical reader and writer, and typed adapters that turn domain objects
//! into trees and back.
//!
//! ## What does a document look like?
//!
//! ```text
//! (symbol
//!  (version "0.1")
//!  (uuid 2b0b3f3e-3a4c-4b4f-9c5d-0a1b2c3d4e5f)
//!  (name "Resistor")
//!
//!  (pin 9f1c0c52-41a2-4a51-a3c4-37b7bb0e8a1d (name "1") (length 2.54))
//! )
//! ```
//!
//! Documents are line-oriented and written in one canonical layout, so that
//! the same data always produces the same bytes and version control diffs stay
//! small. See [`format`] for the full grammar and layout rules.
//!
//! ## Key Features
//!
//! - **Canonical output**: structurally equal trees render byte-identically
//! - **Deterministic collections**: entity collections can be written in UUID
//!   order regardless of insertion order
//! - **Version gating**: documents from a newer format version are rejected
//!   before any content is read
//! - **Precise errors**: syntax errors carry line and column, structural errors
//!   carry the element path (`symbol/pin/name`) and the entity UUID
//! - **Serde compatible**: `#[derive(Serialize, Deserialize)]` types map onto
//!   trees without hand-written adapters
//!
//! ## Quick Start
//!
//! ### Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_sexpr::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Net {
//!     name: String,
//!     voltage: f64,
//!     routed: bool,
//! }
//!
//! let net = Net { name: "VCC".to_string(), voltage: 3.3, routed: true };
//!
//! let text = to_string(&net, "net").unwrap();
//! assert_eq!(text, "(net (name \"VCC\") (voltage 3.3) (routed true))\n");
//!
//! let back: Net = from_str(&text).unwrap();
//! assert_eq!(back, net);
//! ```
//!
//! ### Hand-written adapters
//!
//! Types whose layout does not follow the serde mapping implement
//! [`SerializableObject`] and [`DeserializableObject`] directly:
//!
//! ```rust
//! use serde_sexpr::{
//!     DeserializableObject, DocumentFormat, List, Result, SerializableObject, Version,
//! };
//! use uuid::Uuid;
//!
//! struct Symbol { uuid: Uuid, name: String }
//!
//! impl SerializableObject for Symbol {
//!     fn serialize(&self, root: &mut List) -> Result<()> {
//!         root.append_value("uuid", &self.uuid);
//!         root.append_value("name", &self.name);
//!         Ok(())
//!     }
//! }
//!
//! impl DeserializableObject for Symbol {
//!     fn deserialize(root: &List) -> Result<Self> {
//!         Ok(Symbol { uuid: root.require_value("uuid")?, name: root.require_value("name")? })
//!     }
//! }
//!
//! let format = DocumentFormat::new("symbol", Version::new(&[0, 1]));
//! let symbol = Symbol { uuid: Uuid::nil(), name: "R".to_string() };
//! let text = format.to_string(&symbol).unwrap();
//! let back: Symbol = format.from_str(&text).unwrap();
//! assert_eq!(back.name, "R");
//! ```
//!
//! ### Building trees by hand
//!
//! ```rust
//! use serde_sexpr::{parse, render, sexpr};
//!
//! let tree = sexpr!((position 1.5 2));
//! assert_eq!(render(&tree), "(position 1.5 2)\n");
//! assert_eq!(parse("(position 1.5 2)").unwrap(), tree);
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `debug` for parsed and accepted
//! documents, `warn` when a document is rejected for its version, and `trace`
//! for container canonicalization. Install any `tracing` subscriber to see
//! them.
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Nesting depth is bounded, see [`ParseOptions::max_depth`]
//! - Malformed input is reported through [`Result`], never by panicking
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Serde types to text and back
//! - **`macro.rs`** - Building trees with the sexpr! macro
//! - **`library_element.rs`** - A versioned document with UUID-sorted entities
//! - **`custom_options.rs`** - Writer layout and parse limits
//!
//! Run any example with: `cargo run --example <name>`

pub mod adapter;
pub mod as_token;
pub mod de;
pub mod designator;
pub mod error;
pub mod format;
pub mod macros;
pub mod node;
pub mod options;
pub mod parser;
pub mod ser;
pub mod values;
pub mod version;
pub mod writer;

pub use adapter::{
    deserialize_object_container, deserialize_pointer_container, serialize_object,
    serialize_object_container, serialize_pointer_container,
    serialize_pointer_container_uuid_sorted, DeserializableObject, HasUuid, SerializableObject,
};
pub use de::{from_list, from_node};
pub use designator::{DesignatorString, MAX_DESIGNATOR_LENGTH};
pub use error::{Error, Result};
pub use node::{List, Node, Token};
pub use options::{ParseOptions, WriterOptions, DEFAULT_MAX_DEPTH};
pub use parser::Parser;
pub use ser::{serialize_into, to_node};
pub use values::SerializableValue;
pub use version::{DocumentFormat, Version};
pub use writer::Writer;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use tracing::debug;

/// Parses a document into its root list.
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::parse;
///
/// let root = parse("(net (name \"GND\"))").unwrap();
/// assert_eq!(root.as_list().unwrap().name(), "net");
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`] with line and column for malformed text and
/// [`Error::ResourceLimit`] for nesting deeper than [`DEFAULT_MAX_DEPTH`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(text: &str) -> Result<Node> {
    parse_with_options(text, &ParseOptions::default())
}

/// Parses a document with custom limits.
///
/// # Errors
///
/// See [`parse`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(text: &str, options: &ParseOptions) -> Result<Node> {
    let node = Parser::new(text, options).parse()?;
    if let Node::List(root) = &node {
        debug!(root = root.name(), bytes = text.len(), "parsed document");
    }
    Ok(node)
}

/// Renders a tree in the canonical layout, ending with a line break.
///
/// Rendering does not fail. Trees assembled from raw `Node::String` payloads
/// should be checked with [`Node::validate`] first; the `to_string` family
/// does this already.
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::{render, sexpr};
///
/// assert_eq!(render(&sexpr!((net (name "GND")))), "(net (name \"GND\"))\n");
/// ```
#[must_use]
pub fn render(node: &Node) -> String {
    render_with_options(node, &WriterOptions::default())
}

/// Renders a tree with a custom layout.
#[must_use]
pub fn render_with_options(node: &Node, options: &WriterOptions) -> String {
    let mut writer = Writer::new(options);
    writer.write_document(node);
    writer.into_inner()
}

/// Serializes any `T: Serialize` into a document whose root list is `name`.
///
/// # Errors
///
/// Returns an error if `name` is not a valid list name or if the value has no
/// S-expression representation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T, name: &str) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, name, &WriterOptions::default())
}

/// Serializes any `T: Serialize` with a custom layout.
///
/// # Errors
///
/// See [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, name: &str, options: &WriterOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    Ok(render_with_options(&to_node(value, name)?, options))
}

/// Serializes any `T: Serialize` to a writer.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_sexpr::to_writer;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Point { x: 1, y: 2 }, "point").unwrap();
/// assert_eq!(buffer, b"(point (x 1) (y 2))\n");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T, name: &str) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string(value, name)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserializes an instance of type `T` from document text.
///
/// The root list's name is not checked; use [`DocumentFormat`] for documents
/// with a fixed root name and version.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_sexpr::from_str;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("(point (x 1) (y 2))").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns a syntax error for malformed text and a structural error, with the
/// path of the failing element, if the tree does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(text: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_node(&parse(text)?)
}

/// Deserializes an instance of type `T` from an I/O stream.
///
/// # Errors
///
/// Returns an error if reading fails or if [`from_str`] fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&text)
}
