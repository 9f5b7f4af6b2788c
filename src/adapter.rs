//! Typed objects to trees and back.
//!
//! This module provides the adapter traits implemented by domain types and
//! the generic helpers that serialize whole collections of them:
//!
//! - [`SerializableObject`] / [`DeserializableObject`]: one composite object
//!   to and from the children of a list
//! - [`HasUuid`]: independently identified entities
//!
//! ## Conversion Shapes
//!
//! | Helper | Output order |
//! |--------|--------------|
//! | [`serialize_object`] | one named list |
//! | [`serialize_object_container`] | iteration order (value objects) |
//! | [`serialize_pointer_container`] | iteration order (owned entities) |
//! | [`serialize_pointer_container_uuid_sorted`] | ascending UUID |
//!
//! Reading back ([`deserialize_object_container`],
//! [`deserialize_pointer_container`]) always follows file order; UUID order is
//! a write-time canonicalization only.
//!
//! ## Examples
//!
//! ```rust
//! use serde_sexpr::{
//!     deserialize_object_container, serialize_object_container, DeserializableObject,
//!     List, Result, SerializableObject,
//! };
//!
//! #[derive(Debug, PartialEq)]
//! struct Vertex { x: f64, y: f64 }
//!
//! impl SerializableObject for Vertex {
//!     fn serialize(&self, root: &mut List) -> Result<()> {
//!         root.append_value("x", &self.x);
//!         root.append_value("y", &self.y);
//!         Ok(())
//!     }
//! }
//!
//! impl DeserializableObject for Vertex {
//!     fn deserialize(root: &List) -> Result<Self> {
//!         Ok(Vertex { x: root.require_value("x")?, y: root.require_value("y")? })
//!     }
//! }
//!
//! let outline = vec![Vertex { x: 0.0, y: 0.0 }, Vertex { x: 1.0, y: 0.5 }];
//! let mut polygon = List::new("polygon");
//! serialize_object_container(&mut polygon, &outline, "vertex").unwrap();
//!
//! let back: Vec<Vertex> = deserialize_object_container(&polygon, "vertex").unwrap();
//! assert_eq!(back, outline);
//! ```

use crate::values::SerializableValue;
use crate::{List, Node, Result};
use std::ops::Deref;
use tracing::trace;
use uuid::Uuid;

/// A composite object that writes its fields as children of a list.
///
/// Implementations append primitive fields first, then nested objects and
/// collections. The list itself (and its name) is created by the caller.
pub trait SerializableObject {
    fn serialize(&self, root: &mut List) -> Result<()>;
}

/// A composite object that can be rebuilt from a list.
///
/// Implementations validate lazily: every missing field or invalid value is
/// reported as a structural error of the subtree being read.
pub trait DeserializableObject: Sized {
    fn deserialize(root: &List) -> Result<Self>;
}

/// An entity with a globally unique identifier.
pub trait HasUuid {
    fn uuid(&self) -> &Uuid;
}

impl<T: SerializableObject + ?Sized> SerializableObject for Box<T> {
    fn serialize(&self, root: &mut List) -> Result<()> {
        (**self).serialize(root)
    }
}

impl<T: HasUuid + ?Sized> HasUuid for Box<T> {
    fn uuid(&self) -> &Uuid {
        (**self).uuid()
    }
}

/// Serializes `obj` into a new list called `name`.
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::{render, serialize_object, List, Result, SerializableObject};
///
/// struct Net { name: String }
///
/// impl SerializableObject for Net {
///     fn serialize(&self, root: &mut List) -> Result<()> {
///         root.append_value("name", &self.name);
///         Ok(())
///     }
/// }
///
/// let node = serialize_object(&Net { name: "GND".into() }, "net").unwrap();
/// assert_eq!(render(&node), "(net (name \"GND\"))\n");
/// ```
pub fn serialize_object<T: SerializableObject + ?Sized>(obj: &T, name: &str) -> Result<Node> {
    let mut root = List::new(name);
    obj.serialize(&mut root)?;
    Ok(Node::List(root))
}

/// Appends one `(name ...)` child per item, in iteration order.
///
/// For value objects without identity whose order carries meaning, such as
/// the segments of a wire or the vertices of a polygon.
pub fn serialize_object_container<'a, T, I>(root: &mut List, items: I, name: &str) -> Result<()>
where
    T: SerializableObject + 'a,
    I: IntoIterator<Item = &'a T>,
{
    for item in items {
        root.append_with_blank_line(serialize_object(item, name)?);
    }
    Ok(())
}

/// Appends one `(name ...)` child per owned entity, in iteration order.
pub fn serialize_pointer_container<P, T>(root: &mut List, items: &[P], name: &str) -> Result<()>
where
    P: Deref<Target = T>,
    T: SerializableObject + ?Sized,
{
    for item in items {
        root.append_with_blank_line(serialize_object(&**item, name)?);
    }
    Ok(())
}

/// Appends one `(name ...)` child per owned entity, in ascending UUID order.
///
/// The collection itself is left untouched; a sorted view is serialized so
/// that collections with the same members always produce the same text.
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::{
///     render, serialize_pointer_container_uuid_sorted, HasUuid, List, Node, Result,
///     SerializableObject, SerializableValue,
/// };
/// use uuid::Uuid;
///
/// struct Pin { uuid: Uuid }
///
/// impl HasUuid for Pin {
///     fn uuid(&self) -> &Uuid { &self.uuid }
/// }
///
/// impl SerializableObject for Pin {
///     fn serialize(&self, root: &mut List) -> Result<()> {
///         root.append(self.uuid.to_node());
///         Ok(())
///     }
/// }
///
/// let b = Uuid::parse_str("bbbbbbbb-0000-4000-8000-000000000000").unwrap();
/// let a = Uuid::parse_str("aaaaaaaa-0000-4000-8000-000000000000").unwrap();
/// let pins = vec![Box::new(Pin { uuid: b }), Box::new(Pin { uuid: a })];
///
/// let mut symbol = List::new("symbol");
/// serialize_pointer_container_uuid_sorted(&mut symbol, &pins, "pin").unwrap();
/// let first = symbol.find("pin").unwrap();
/// assert_eq!(first.value::<Uuid>(0).unwrap(), a);
/// ```
pub fn serialize_pointer_container_uuid_sorted<P, T>(
    root: &mut List,
    items: &[P],
    name: &str,
) -> Result<()>
where
    P: Deref<Target = T>,
    T: SerializableObject + HasUuid + ?Sized,
{
    let mut sorted: Vec<&T> = items.iter().map(|item| &**item).collect();
    sorted.sort_by(|a, b| a.uuid().cmp(b.uuid()));
    trace!(element = name, count = sorted.len(), "serializing uuid-sorted container");
    for item in sorted {
        root.append_with_blank_line(serialize_object(item, name)?);
    }
    Ok(())
}

/// Rebuilds every `(name ...)` child of `root`, in file order.
pub fn deserialize_object_container<T: DeserializableObject>(
    root: &List,
    name: &str,
) -> Result<Vec<T>> {
    root.find_all(name)
        .map(|item| T::deserialize(item).map_err(|e| e.within(root.name())))
        .collect()
}

/// Rebuilds every `(name ...)` child of `root` as an owned entity, in file order.
///
/// When an item fails and its first value is a UUID, the error carries that
/// UUID as its key.
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::{deserialize_pointer_container, parse, DeserializableObject, List, Result};
/// use std::rc::Rc;
/// use uuid::Uuid;
///
/// struct Pin { uuid: Uuid, name: String }
///
/// impl DeserializableObject for Pin {
///     fn deserialize(root: &List) -> Result<Self> {
///         Ok(Pin { uuid: root.value(0)?, name: root.require_value("name")? })
///     }
/// }
///
/// let text = "(symbol (pin aaaaaaaa-0000-4000-8000-000000000000 (name 1)))";
/// let root = parse(text).unwrap();
/// let err = deserialize_pointer_container::<Pin, Rc<Pin>>(root.as_list().unwrap(), "pin")
///     .err()
///     .unwrap();
/// assert_eq!(err.key(), Some("aaaaaaaa-0000-4000-8000-000000000000"));
/// ```
pub fn deserialize_pointer_container<T, P>(root: &List, name: &str) -> Result<Vec<P>>
where
    T: DeserializableObject,
    P: From<T>,
{
    root.find_all(name)
        .map(|item| {
            T::deserialize(item).map(P::from).map_err(|e| {
                let e = e.within(root.name());
                match item.child(0).and_then(|node| Uuid::from_node(node).ok()) {
                    Some(uuid) => e.with_key(uuid),
                    None => e,
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, render};

    #[derive(Debug, Clone, PartialEq)]
    struct Pin {
        uuid: Uuid,
        name: String,
    }

    impl HasUuid for Pin {
        fn uuid(&self) -> &Uuid {
            &self.uuid
        }
    }

    impl SerializableObject for Pin {
        fn serialize(&self, root: &mut List) -> Result<()> {
            root.append(self.uuid.to_node());
            root.append_value("name", &self.name);
            Ok(())
        }
    }

    impl DeserializableObject for Pin {
        fn deserialize(root: &List) -> Result<Self> {
            Ok(Pin {
                uuid: root.value(0)?,
                name: root.require_value("name")?,
            })
        }
    }

    fn pin(uuid: &str, name: &str) -> Pin {
        Pin {
            uuid: Uuid::parse_str(uuid).unwrap(),
            name: name.to_string(),
        }
    }

    const A: &str = "aaaaaaaa-0000-4000-8000-000000000000";
    const B: &str = "bbbbbbbb-0000-4000-8000-000000000000";
    const C: &str = "cccccccc-0000-4000-8000-000000000000";

    #[test]
    fn test_serialize_object() {
        let node = serialize_object(&pin(A, "1"), "pin").unwrap();
        assert_eq!(
            render(&node),
            format!("(pin {} (name \"1\"))\n", A)
        );
    }

    #[test]
    fn test_value_container_keeps_order() {
        let pins = vec![pin(C, "3"), pin(A, "1"), pin(B, "2")];
        let mut root = List::new("symbol");
        serialize_object_container(&mut root, &pins, "pin").unwrap();

        let back: Vec<Pin> = deserialize_object_container(&root, "pin").unwrap();
        assert_eq!(back, pins);
    }

    #[test]
    fn test_uuid_sorted_container() {
        let pins = vec![Box::new(pin(C, "3")), Box::new(pin(A, "1")), Box::new(pin(B, "2"))];
        let mut root = List::new("symbol");
        serialize_pointer_container_uuid_sorted(&mut root, &pins, "pin").unwrap();

        let uuids: Vec<Uuid> = root
            .find_all("pin")
            .map(|item| item.value::<Uuid>(0).unwrap())
            .collect();
        assert_eq!(
            uuids,
            vec![
                Uuid::parse_str(A).unwrap(),
                Uuid::parse_str(B).unwrap(),
                Uuid::parse_str(C).unwrap()
            ]
        );
        // The collection itself is not reordered.
        assert_eq!(pins[0].name, "3");
    }

    #[test]
    fn test_pointer_container_keeps_order() {
        let pins = vec![Box::new(pin(B, "2")), Box::new(pin(A, "1"))];
        let mut root = List::new("symbol");
        serialize_pointer_container(&mut root, &pins, "pin").unwrap();

        let back = deserialize_pointer_container::<Pin, Box<Pin>>(&root, "pin").unwrap();
        assert_eq!(back, pins);
    }

    #[test]
    fn test_read_accepts_unsorted_file() {
        let text = format!("(symbol (pin {} (name \"2\")) (pin {} (name \"1\")))", B, A);
        let root = parse(&text).unwrap();
        let pins =
            deserialize_pointer_container::<Pin, Box<Pin>>(root.as_list().unwrap(), "pin")
                .unwrap();
        assert_eq!(pins[0].name, "2");
        assert_eq!(pins[1].name, "1");
    }

    #[test]
    fn test_failure_names_element_and_uuid() {
        let text = format!("(symbol (pin {} (name \"1\")) (pin {}))", A, B);
        let root = parse(&text).unwrap();
        let err = deserialize_pointer_container::<Pin, Box<Pin>>(root.as_list().unwrap(), "pin")
            .unwrap_err();
        assert!(err.is_structural());
        assert_eq!(err.element(), Some("symbol/pin"));
        assert_eq!(err.key(), Some(B));
    }

    #[test]
    fn test_invalid_uuid_is_structural() {
        let root = parse("(symbol (pin not-a-uuid (name \"1\")))").unwrap();
        let err = deserialize_object_container::<Pin>(root.as_list().unwrap(), "pin").unwrap_err();
        assert!(err.is_structural());
        assert_eq!(err.element(), Some("symbol/pin"));
        assert_eq!(err.key(), None);
    }
}
