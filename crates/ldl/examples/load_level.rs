//! Example: Loading a level against a hand-written registry
//!
//! This example registers two entity classes, loads a small track layout and
//! prints where every entity ended up.

use glam::DMat4;

use ldl::{
    LevelLoader,
    entity::{Connectors, Entity},
    geometry::Connector,
    literal::{Literal, LiteralKind},
    registry::{BoxError, EntityClass, Registry},
};

const LEVEL: &str = r#"
using Rail as demo.track.Rail,
      Lamp as demo.props.Lamp

// A straight run of three rails with a lamp above the first one.
let r1 be Rail(4), r2 be Rail(4), r3 be Rail(4)
let lamp be Lamp([warm white])

position r1 at (0, 0, 0)
connect r2.tail to r1.head,
        r3.tail to r2.head
position lamp at (0, 3, 0) from r1
"#;

#[derive(Debug)]
struct Rail {
    transform: DMat4,
    length: f64,
}

impl Entity for Rail {
    fn transform(&self) -> DMat4 {
        self.transform
    }

    fn set_transform(&mut self, transform: DMat4) {
        self.transform = transform;
    }

    fn connectors(&self) -> Option<Connectors> {
        let half = self.length / 2.0;
        Some(
            Connectors::new()
                .with("tail", Connector::from_translation((-half, 0.0, 0.0).into()))
                .with("head", Connector::from_translation((half, 0.0, 0.0).into())),
        )
    }
}

#[derive(Debug)]
struct Lamp {
    transform: DMat4,
}

impl Entity for Lamp {
    fn transform(&self) -> DMat4 {
        self.transform
    }

    fn set_transform(&mut self, transform: DMat4) {
        self.transform = transform;
    }
}

fn rail(args: &[Literal]) -> Result<Box<dyn Entity>, BoxError> {
    let length = args[0].as_number().ok_or("rail length must be a number")?;
    Ok(Box::new(Rail {
        transform: DMat4::IDENTITY,
        length,
    }))
}

fn lamp(args: &[Literal]) -> Result<Box<dyn Entity>, BoxError> {
    let color = args[0].as_str().ok_or("lamp color must be a string")?;
    println!("Creating lamp with {color} light");
    Ok(Box::new(Lamp {
        transform: DMat4::IDENTITY,
    }))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = Registry::new()
        .with(EntityClass::new("demo.track.Rail").constructor([LiteralKind::Number], rail))
        .with(EntityClass::new("demo.props.Lamp").constructor([LiteralKind::String], lamp));

    let loader = LevelLoader::new(&registry);
    let level = loader.load_level_str(LEVEL)?;

    println!("\nLoaded {} entities:", level.len());
    for placed in &level {
        let t = placed.translation();
        println!(
            "  {:<5} {:<16} at ({:.2}, {:.2}, {:.2})",
            placed.name().as_str(),
            placed.class().as_str(),
            t.x,
            t.y,
            t.z
        );
    }

    Ok(())
}
