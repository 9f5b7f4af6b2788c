//! Basic serialization and deserialization with serde.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use serde_sexpr::{from_str, to_string};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Net {
    name: String,
    voltage: Option<f64>,
    #[serde(rename = "pin")]
    pins: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Netlist {
    board: String,
    #[serde(rename = "net")]
    nets: Vec<Net>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let netlist = Netlist {
        board: "blinky".to_string(),
        nets: vec![
            Net {
                name: "VCC".to_string(),
                voltage: Some(3.3),
                pins: vec!["U1:8".to_string(), "C1:1".to_string()],
            },
            Net {
                name: "GND".to_string(),
                voltage: None,
                pins: vec!["U1:4".to_string(), "C1:2".to_string()],
            },
        ],
    };

    // Serialize to text
    let text = to_string(&netlist, "netlist")?;
    println!("Output:\n{}", text);

    // Deserialize back to struct
    let netlist_back: Netlist = from_str(&text)?;
    assert_eq!(netlist, netlist_back);
    println!("✓ Round-trip successful");

    Ok(())
}
