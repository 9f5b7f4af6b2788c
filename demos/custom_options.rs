//! Customizing the writer layout and parser limits.
//!
//! Run with: cargo run --example custom_options

use serde::Serialize;
use serde_sexpr::{parse_with_options, render_with_options, to_node, ParseOptions, WriterOptions};
use std::error::Error;

#[derive(Debug, Serialize)]
struct Via {
    position: (f64, f64),
    drill: f64,
    size: f64,
}

#[derive(Debug, Serialize)]
struct Board {
    name: String,
    #[serde(rename = "via")]
    vias: Vec<Via>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let board = Board {
        name: "blinky".to_string(),
        vias: vec![
            Via {
                position: (10.0, 5.0),
                drill: 0.3,
                size: 0.6,
            },
            Via {
                position: (12.5, 5.0),
                drill: 0.3,
                size: 0.6,
            },
        ],
    };
    let tree = to_node(&board, "board")?;

    println!("Default layout:");
    println!("{}", render_with_options(&tree, &WriterOptions::new()));

    println!("Two-space indent, only atom lists inline:");
    let options = WriterOptions::new().with_indent(2).with_inline_depth(0);
    println!("{}", render_with_options(&tree, &options));

    println!("Compact:");
    println!("{}", render_with_options(&tree, &WriterOptions::compact()));

    // Bounded nesting for untrusted input
    let deep = format!("{}{}", "(a ".repeat(100), ")".repeat(100));
    let limited = ParseOptions::new().with_max_depth(32);
    match parse_with_options(&deep, &limited) {
        Ok(_) => println!("parsed"),
        Err(e) => println!("Rejected: {}", e),
    }

    Ok(())
}
