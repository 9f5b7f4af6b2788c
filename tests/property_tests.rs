//! Property-based tests for the guarantees the file format relies on:
//! round trips, canonical output and deterministic collection order.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_sexpr::{
    deserialize_object_container, from_str, parse, render, serialize_object_container,
    serialize_pointer_container_uuid_sorted, to_string, DeserializableObject, HasUuid, List, Node,
    Result, SerializableObject, SerializableValue,
};
use uuid::Uuid;

fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
    value: &T,
) -> bool {
    match to_string(value, "value") {
        Ok(serialized) => match from_str::<T>(&serialized) {
            Ok(deserialized) => *value == deserialized,
            Err(e) => {
                eprintln!("Deserialize failed: {}", e);
                eprintln!("Serialized was: {}", serialized);
                false
            }
        },
        Err(e) => {
            eprintln!("Serialize failed: {}", e);
            false
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Record {
    id: i64,
    name: String,
    enabled: bool,
    scale: Option<u32>,
    #[serde(rename = "tag")]
    tags: Vec<String>,
}

struct Entity {
    uuid: Uuid,
}

impl HasUuid for Entity {
    fn uuid(&self) -> &Uuid {
        &self.uuid
    }
}

impl SerializableObject for Entity {
    fn serialize(&self, root: &mut List) -> Result<()> {
        root.append(self.uuid.to_node());
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
struct Segment {
    width: i32,
}

impl SerializableObject for Segment {
    fn serialize(&self, root: &mut List) -> Result<()> {
        root.append_value("width", &self.width);
        Ok(())
    }
}

impl DeserializableObject for Segment {
    fn deserialize(root: &List) -> Result<Self> {
        Ok(Segment {
            width: root.require_value("width")?,
        })
    }
}

fn entities_text(uuids: &[Uuid]) -> String {
    let entities: Vec<Box<Entity>> = uuids
        .iter()
        .map(|&uuid| Box::new(Entity { uuid }))
        .collect();
    let mut root = List::new("library");
    serialize_pointer_container_uuid_sorted(&mut root, &entities, "entity").unwrap();
    render(&Node::List(root))
}

fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

proptest! {
    // Primitives
    #[test]
    fn prop_i64(n in any::<i64>()) {
        let record = Record { id: n, name: String::new(), enabled: false, scale: None, tags: vec![] };
        prop_assert!(roundtrip(&record));
    }

    #[test]
    fn prop_f64(x in any::<f64>().prop_filter("finite", |x| x.is_finite())) {
        let node = x.to_node();
        prop_assert_eq!(f64::from_node(&node).unwrap(), x);
    }

    #[test]
    fn prop_uuid(uuid in arb_uuid()) {
        prop_assert_eq!(Uuid::from_node(&uuid.to_node()).unwrap(), uuid);
    }

    // Any text either survives quoting or is refused before it is written.
    #[test]
    fn prop_string_escaping(s in any::<String>()) {
        let mut root = List::new("text");
        root.append_value("value", &s);
        let node = Node::List(root);
        let writable = !s
            .chars()
            .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'));
        prop_assert_eq!(node.validate().is_ok(), writable);
        if writable {
            let parsed = parse(&render(&node)).unwrap();
            prop_assert_eq!(parsed.as_list().unwrap().require_value::<String>("value").unwrap(), s);
        }
    }

    // A successful write always reads back, whatever the text.
    #[test]
    fn prop_serde_string_never_writes_unreadable_text(name in any::<String>()) {
        let record = Record { id: 0, name, enabled: true, scale: None, tags: vec![] };
        if let Ok(text) = to_string(&record, "record") {
            prop_assert_eq!(from_str::<Record>(&text).unwrap(), record);
        }
    }

    #[test]
    fn prop_record(
        id in any::<i64>(),
        name in "[a-zA-Z0-9 \"\\\\]{0,20}",
        enabled in any::<bool>(),
        scale in proptest::option::of(any::<u32>()),
        tags in prop::collection::vec("[a-z]{0,8}", 0..5),
    ) {
        let record = Record { id, name, enabled, scale, tags };
        prop_assert!(roundtrip(&record));
    }

    // Collections written in UUID order produce the same text for every
    // insertion order of the same members.
    #[test]
    fn prop_uuid_sort_ignores_insertion_order(
        uuids in prop::collection::vec(arb_uuid(), 0..12).prop_shuffle(),
    ) {
        let mut sorted = uuids.clone();
        sorted.sort();
        prop_assert_eq!(entities_text(&uuids), entities_text(&sorted));
    }

    // Value containers keep their insertion order.
    #[test]
    fn prop_object_container_order(widths in prop::collection::vec(any::<i32>(), 0..12)) {
        let segments: Vec<Segment> = widths.iter().map(|&width| Segment { width }).collect();
        let mut root = List::new("trace");
        serialize_object_container(&mut root, &segments, "segment").unwrap();

        let parsed = parse(&render(&Node::List(root))).unwrap();
        let back: Vec<Segment> = deserialize_object_container(parsed.as_list().unwrap(), "segment").unwrap();
        prop_assert_eq!(back, segments);
    }

    // Rendering canonical text again yields the same bytes.
    #[test]
    fn prop_render_parse_render_is_stable(
        names in prop::collection::vec("[a-z_]{1,6}", 1..6),
        values in prop::collection::vec(any::<i16>(), 1..6),
        blank in prop::collection::vec(any::<bool>(), 1..6),
    ) {
        let mut root = List::new("root");
        for (i, name) in names.iter().enumerate() {
            let mut child = List::new(name);
            for value in &values[..values.len().min(i + 1)] {
                child.append(value.to_node());
            }
            if blank[i % blank.len()] {
                root.append_with_blank_line(Node::List(child));
            } else {
                root.append(Node::List(child));
            }
        }
        let text = render(&Node::List(root));
        let parsed = parse(&text).unwrap();
        prop_assert_eq!(render(&parsed), text);
    }
}
