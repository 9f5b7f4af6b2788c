//! Building and inspecting trees with the sexpr! macro.
//!
//! Run with: cargo run --example macro

use serde_sexpr::{parse, render, sexpr, Node};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let position = sexpr!((position 1.5 {-2.54}));
    let name = sexpr!((name "R1"));

    println!("Atoms:");
    print!("  {}", render(&position));
    print!("  {}", render(&name));

    let rotation = 90;
    let component = sexpr!((component
        (lib_component "resistor")
        {name.clone()}
        (placement {position.clone()} (rotation {rotation}) (mirror false))
    ));

    println!("\nNested:");
    print!("{}", render(&component));

    // Trees built by hand and parsed trees compare structurally
    let parsed = parse(&render(&component))?;
    assert_eq!(parsed, component);

    if let Node::List(list) = &component {
        let placement = list.require("placement")?;
        let angle: i32 = placement.require_value("rotation")?;
        println!("\nRotation read back: {}", angle);
    }

    Ok(())
}
