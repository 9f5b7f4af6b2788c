//! A versioned library document with hand-written adapters.
//!
//! Entities are written in UUID order, so the file does not depend on the
//! order in which pins were added.
//!
//! Run with: cargo run --example library_element

use serde_sexpr::{
    deserialize_pointer_container, serialize_pointer_container_uuid_sorted, DeserializableObject,
    DesignatorString, DocumentFormat, HasUuid, List, Result, SerializableObject,
    SerializableValue, Version,
};
use uuid::Uuid;

#[derive(Debug)]
struct Pin {
    uuid: Uuid,
    name: DesignatorString,
    length: f64,
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
        root.append_value("length", &self.length);
        Ok(())
    }
}

impl DeserializableObject for Pin {
    fn deserialize(root: &List) -> Result<Self> {
        Ok(Pin {
            uuid: root.value(0)?,
            name: root.require_value("name")?,
            length: root.require_value("length")?,
        })
    }
}

#[derive(Debug)]
struct Symbol {
    uuid: Uuid,
    name: String,
    pins: Vec<Box<Pin>>,
}

impl SerializableObject for Symbol {
    fn serialize(&self, root: &mut List) -> Result<()> {
        root.append(self.uuid.to_node());
        root.append_value("name", &self.name);
        serialize_pointer_container_uuid_sorted(root, &self.pins, "pin")
    }
}

impl DeserializableObject for Symbol {
    fn deserialize(root: &List) -> Result<Self> {
        // Child 0 is the version field.
        Ok(Symbol {
            uuid: root.value(1)?,
            name: root.require_value("name")?,
            pins: deserialize_pointer_container::<Pin, Box<Pin>>(root, "pin")?,
        })
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let format = DocumentFormat::new("symbol", Version::new(&[0, 1]));

    let symbol = Symbol {
        uuid: Uuid::new_v4(),
        name: "Capacitor".to_string(),
        pins: vec![
            Box::new(Pin {
                uuid: Uuid::new_v4(),
                name: DesignatorString::new("+")?,
                length: 2.54,
            }),
            Box::new(Pin {
                uuid: Uuid::new_v4(),
                name: DesignatorString::new("-")?,
                length: 2.54,
            }),
        ],
    };

    let text = format.to_string(&symbol)?;
    println!("{}", text);

    let loaded: Symbol = format.from_str(&text)?;
    println!("Loaded {} with {} pins", loaded.name, loaded.pins.len());
    assert_eq!(loaded.uuid, symbol.uuid);

    // A file from a newer program is refused before its content is read.
    let newer = text.replace("(version \"0.1\")", "(version \"1.0\")");
    match format.from_str::<Symbol>(&newer) {
        Ok(_) => println!("unexpectedly accepted"),
        Err(e) => println!("Rejected: {}", e),
    }

    Ok(())
}
