//! Sample Objects Demo
//!
//! Declares encoding rules for a small record type in the global registry and
//! converts a handful of records into named matrices.
//!
//! Run: RUST_LOG=matricize=debug cargo run --example sample_objects

use matricize::{Boolean, Categorical, Field, Number, Record, ScalarValue};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

// =============================================================================
// RECORD TYPE
// =============================================================================

struct SampleObject {
    kind: &'static str,
    x: f64,
    y: f64,
    height: f64,
    width: f64,
    weight: f64,
    verified: bool,
    local: bool,
}

impl Record for SampleObject {
    fn attribute(&self, name: &str) -> Option<ScalarValue> {
        match name {
            "kind" => Some(self.kind.into()),
            "x" => Some(self.x.into()),
            "y" => Some(self.y.into()),
            "height" => Some(self.height.into()),
            "width" => Some(self.width.into()),
            "weight" => Some(self.weight.into()),
            "verified" => Some(self.verified.into()),
            "local" => Some(self.local.into()),
            _ => None,
        }
    }
}

fn declare_fields() -> matricize::Result<()> {
    matricize::declare::<SampleObject>()
        .field(
            "kind",
            Categorical::new(["vehicle", "building", "person", "water", "object"])?
                .with_output_name("kind"),
        )
        .field("x", Number::new(0).with_output_name("position"))
        .field("y", Number::new(1).with_output_name("position"))
        .field("height", Number::new(0).with_output_name("dimensions"))
        .field("width", Number::new(1).with_output_name("dimensions"))
        .field("weight", Number::new(2).with_output_name("dimensions"))
        .field("verified", Boolean::new(0).with_output_name("parameters"))
        .field("local", Boolean::new(1).with_output_name("parameters"))
        .finish()?;
    Ok(())
}

fn main() -> matricize::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    declare_fields()?;

    let items = vec![
        SampleObject {
            kind: "person",
            x: 1.0,
            y: 2.0,
            height: 6.0,
            width: 12.0,
            weight: 160.0,
            verified: false,
            local: false,
        },
        SampleObject {
            kind: "building",
            x: 12.0,
            y: 20.0,
            height: 100.0,
            width: 12.0,
            weight: 10000.0,
            verified: false,
            local: true,
        },
        SampleObject {
            kind: "water",
            x: 50.0,
            y: 50.0,
            height: 100.0,
            width: 200.0,
            weight: 20000.0,
            verified: true,
            local: true,
        },
        SampleObject {
            kind: "object",
            x: 25.0,
            y: 30.0,
            height: 100.0,
            width: 200.0,
            weight: 20000.0,
            verified: true,
            local: false,
        },
    ];

    println!("Declared fields:");
    for (attribute, field) in matricize::get_fields::<SampleObject>()? {
        println!(
            "  {:<10} {:<12} -> {} {:?}",
            attribute,
            field.kind(),
            field.output_name(),
            field.columns()
        );
    }

    let matrices = matricize::matricize(&items)?;
    for (name, array) in &matrices {
        println!("\n{} {:?}:\n{}", name, array.dim(), array);
    }

    match matricize::matricize::<SampleObject>(&[]) {
        Err(err) => println!("\nEmpty input rejected: {}", err),
        Ok(_) => unreachable!("empty input must fail"),
    }

    Ok(())
}
