//! End-to-end conversion of record collections.

use approx::assert_abs_diff_eq;
use matricize::{
    Assembler, Boolean, Categorical, ErrorClass, FieldKind, FieldRegistry, MatricizeError,
    Number, Record, ScalarValue,
};
use ndarray::{array, Array2};
use rstest::rstest;

const KINDS: [&str; 5] = ["vehicle", "building", "person", "water", "object"];

#[derive(Clone)]
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

fn declare_sample(registry: &FieldRegistry) {
    registry
        .declare::<SampleObject>()
        .field(
            "kind",
            Categorical::new(KINDS).unwrap().with_output_name("kind"),
        )
        .field("x", Number::new(0).with_output_name("position"))
        .field("y", Number::new(1).with_output_name("position"))
        .field("height", Number::new(0).with_output_name("dimensions"))
        .field("width", Number::new(1).with_output_name("dimensions"))
        .field("weight", Number::new(2).with_output_name("dimensions"))
        .field("verified", Boolean::new(0).with_output_name("parameters"))
        .field("local", Boolean::new(1).with_output_name("parameters"))
        .finish()
        .unwrap();
}

fn assembler() -> Assembler {
    let registry = FieldRegistry::new();
    declare_sample(&registry);
    Assembler::new(registry)
}

#[allow(clippy::too_many_arguments)]
fn sample(
    kind: &'static str,
    x: f64,
    y: f64,
    height: f64,
    width: f64,
    weight: f64,
    verified: bool,
    local: bool,
) -> SampleObject {
    SampleObject {
        kind,
        x,
        y,
        height,
        width,
        weight,
        verified,
        local,
    }
}

fn items() -> Vec<SampleObject> {
    vec![
        sample("person", 1.0, 2.0, 6.0, 12.0, 160.0, false, false),
        sample("building", 12.0, 20.0, 100.0, 12.0, 10000.0, false, true),
        sample("water", 50.0, 50.0, 100.0, 200.0, 20000.0, true, true),
        sample("object", 25.0, 30.0, 100.0, 200.0, 20000.0, true, false),
    ]
}

#[test]
fn test_matricize_sample_objects() {
    let representation = assembler().matricize(&items()).unwrap();

    let kind: Array2<f64> = array![
        [0.0, 0.0, 1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 0.0, 1.0],
    ];
    let position = array![[1.0, 2.0], [12.0, 20.0], [50.0, 50.0], [25.0, 30.0]];
    let dimensions = array![
        [6.0, 12.0, 160.0],
        [100.0, 12.0, 10000.0],
        [100.0, 200.0, 20000.0],
        [100.0, 200.0, 20000.0],
    ];
    let parameters = array![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]];

    let keys: Vec<&str> = representation.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["dimensions", "kind", "parameters", "position"]);

    assert_abs_diff_eq!(representation["kind"], kind);
    assert_abs_diff_eq!(representation["position"], position);
    assert_abs_diff_eq!(representation["dimensions"], dimensions);
    assert_abs_diff_eq!(representation["parameters"], parameters);
}

#[test]
fn test_every_output_has_one_row_per_record() {
    let data = items();
    for count in 1..=data.len() {
        let representation = assembler().matricize(&data[..count]).unwrap();
        for array in representation.values() {
            assert_eq!(array.nrows(), count);
        }
    }
}

#[test]
fn test_boolean_columns_are_zero_or_one() {
    let representation = assembler().matricize(&items()).unwrap();
    assert!(representation["parameters"]
        .iter()
        .all(|&v| v == 0.0 || v == 1.0));
}

#[rstest]
#[case("vehicle", 0)]
#[case("building", 1)]
#[case("person", 2)]
#[case("water", 3)]
#[case("object", 4)]
fn test_one_hot_row(#[case] kind: &'static str, #[case] hot: usize) {
    let mut item = items()[0].clone();
    item.kind = kind;
    let representation = assembler().matricize(&[item]).unwrap();

    let row = representation["kind"].row(0).to_owned();
    for (column, value) in row.iter().enumerate() {
        let expected = if column == hot { 1.0 } else { 0.0 };
        assert_eq!(*value, expected, "column {column} for '{kind}'");
    }
}

#[test]
fn test_idempotent() {
    let assembler = assembler();
    let data = items();
    assert_eq!(
        assembler.matricize(&data).unwrap(),
        assembler.matricize(&data).unwrap()
    );
}

#[test]
fn test_declaration_order_does_not_matter() {
    let registry = FieldRegistry::new();
    registry
        .declare::<SampleObject>()
        .field("local", Boolean::new(1).with_output_name("parameters"))
        .field("weight", Number::new(2).with_output_name("dimensions"))
        .field("y", Number::new(1).with_output_name("position"))
        .field(
            "kind",
            Categorical::new(KINDS).unwrap().with_output_name("kind"),
        )
        .field("verified", Boolean::new(0).with_output_name("parameters"))
        .field("x", Number::new(0).with_output_name("position"))
        .field("width", Number::new(1).with_output_name("dimensions"))
        .field("height", Number::new(0).with_output_name("dimensions"))
        .finish()
        .unwrap();

    let reordered = Assembler::new(registry).matricize(&items()).unwrap();
    assert_eq!(reordered, assembler().matricize(&items()).unwrap());
}

#[test]
fn test_empty_collection() {
    let err = assembler().matricize::<SampleObject>(&[]).unwrap_err();
    assert!(matches!(err, MatricizeError::EmptyInput));
    assert_eq!(err.class(), ErrorClass::Input);
}

#[test]
fn test_unrecognized_category() {
    let mut data = items();
    data[2].kind = "spaceship";
    let err = assembler().matricize(&data).unwrap_err();
    assert!(matches!(err, MatricizeError::UnrecognizedCategory { .. }));
    assert_eq!(err.class(), ErrorClass::Domain);
}

struct Unregistered;

impl Record for Unregistered {
    fn attribute(&self, _name: &str) -> Option<ScalarValue> {
        None
    }
}

#[test]
fn test_unregistered_type() {
    let registry = FieldRegistry::new();
    declare_sample(&registry);

    let err = registry.get_fields_of(&Unregistered).unwrap_err();
    assert!(matches!(err, MatricizeError::NotRegistered { .. }));
    assert_eq!(err.class(), ErrorClass::Registration);

    let err = Assembler::new(registry)
        .matricize(&[Unregistered])
        .unwrap_err();
    assert!(matches!(err, MatricizeError::NoFields { .. }));
}

#[derive(Clone)]
struct Person {
    #[allow(dead_code)]
    name: &'static str,
    flags: [bool; 5],
}

const PERSON_FLAGS: [&str; 5] = ["bachelors", "masters", "phd", "employed", "married"];

impl Record for Person {
    fn attribute(&self, name: &str) -> Option<ScalarValue> {
        PERSON_FLAGS
            .iter()
            .position(|flag| *flag == name)
            .map(|idx| self.flags[idx].into())
    }
}

#[test]
fn test_boolean_state_fields() {
    let registry = FieldRegistry::new();
    let declaration = PERSON_FLAGS
        .iter()
        .enumerate()
        .fold(registry.declare::<Person>(), |d, (idx, flag)| {
            d.field(flag, Boolean::new(idx).with_output_name("state"))
        });
    declaration.finish().unwrap();

    let fields = registry.get_fields::<Person>().unwrap();
    assert!(fields.values().all(|f| f.kind() == FieldKind::Boolean));

    let people = vec![
        Person {
            name: "John Doe",
            flags: [true, false, false, true, true],
        },
        Person {
            name: "Jane McDonald",
            flags: [true, true, true, true, false],
        },
        Person {
            name: "Michael Smith",
            flags: [true, false, false, false, true],
        },
    ];
    let representation = Assembler::new(registry).matricize(&people).unwrap();

    assert_abs_diff_eq!(
        representation["state"],
        array![
            [1.0, 0.0, 0.0, 1.0, 1.0],
            [1.0, 1.0, 1.0, 1.0, 0.0],
            [1.0, 0.0, 0.0, 0.0, 1.0],
        ]
    );
}

#[test]
fn test_json_records_and_schema() {
    let registry = FieldRegistry::new();
    registry
        .declare_json::<serde_json::Value>(
            r#"{
                "kind": {"type": "categorical", "output_name": "kind", "categories": ["a", "b", "c"]},
                "x": {"type": "number", "output_name": "position"},
                "y": {"type": "number", "output_name": "position", "index": 1}
            }"#,
        )
        .unwrap();

    let records = vec![
        serde_json::json!({"kind": "c", "x": 1, "y": 2.5}),
        serde_json::json!({"kind": "a", "x": -3, "y": 0}),
    ];
    let representation = Assembler::new(registry).matricize(&records).unwrap();

    assert_abs_diff_eq!(
        representation["kind"],
        array![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]
    );
    assert_abs_diff_eq!(representation["position"], array![[1.0, 2.5], [-3.0, 0.0]]);
}

struct Coded {
    code: f64,
}

impl Record for Coded {
    fn attribute(&self, name: &str) -> Option<ScalarValue> {
        match name {
            "code" => Some(self.code.into()),
            _ => None,
        }
    }
}

#[test]
fn test_float_codes_match_integer_categories() {
    let registry = FieldRegistry::new();
    registry
        .declare::<Coded>()
        .field(
            "code",
            Categorical::new([1, 2, 3]).unwrap().with_output_name("code"),
        )
        .finish()
        .unwrap();

    let representation = Assembler::new(registry)
        .matricize(&[Coded { code: 2.0 }, Coded { code: 3.0 }])
        .unwrap();
    assert_abs_diff_eq!(
        representation["code"],
        array![[0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
    );
}
