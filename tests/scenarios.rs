//! Cross-module scenarios (spec §8.2, S1-S8).

use std::collections::BTreeMap;

use schemus::schema::{BinaryConstraints, BoundOp, Schema};
use schemus::{parse_schema, print_item_standalone, validate, Value};

fn value_object(pairs: &[(&str, Value)]) -> Value {
    let mut map = BTreeMap::new();
    for (k, v) in pairs {
        map.insert(k.to_string(), v.clone());
    }
    Value::Object(map)
}

#[test]
fn s1_basic_object_validation() {
    let parsed = parse_schema("= { name: text, age?: number [ value >= 0, integer ] }\n").unwrap();
    let schema = parsed.root.unwrap();

    let valid_with_age = value_object(&[
        ("name", Value::Text("Ada".into())),
        ("age", Value::Number(36.into())),
    ]);
    assert!(validate(&schema, &valid_with_age).is_valid());

    let valid_without_age = value_object(&[("name", Value::Text("Ada".into()))]);
    assert!(validate(&schema, &valid_without_age).is_valid());

    let missing_name = value_object(&[("age", Value::Number(36.into()))]);
    let result = validate(&schema, &missing_name);
    assert!(!result.is_valid());
    assert!(result
        .errors()
        .iter()
        .any(|e| e.path.contains("name") && e.message == "missing mandatory key"));

    let negative_age = value_object(&[
        ("name", Value::Text("Ada".into())),
        ("age", Value::Number((-1).into())),
    ]);
    let result = validate(&schema, &negative_age);
    assert!(!result.is_valid());
    assert!(result
        .errors()
        .iter()
        .any(|e| e.path.contains("age") && e.message.contains("out of range")));
}

#[test]
fn s2_alternatives_of_literals_canonicalize_to_enum() {
    let parsed = parse_schema("= \"red\" | \"green\" | \"blue\"\n").unwrap();
    assert_eq!(
        parsed.root.unwrap(),
        Schema::Enum(vec!["red".to_string(), "green".to_string(), "blue".to_string()])
    );
}

#[test]
fn s3_bounded_range_grammar_round_trips() {
    let parsed = parse_schema("X = text [ 1 <= length <= 10 ]\n").unwrap();
    let schema = parsed.definitions.get("X").unwrap();
    match schema {
        Schema::Text { constraints, .. } => {
            let size = constraints.size.clone().unwrap();
            assert_eq!(size.min.unwrap().op, BoundOp::MinInclusive);
            assert_eq!(size.max.unwrap().op, BoundOp::MaxInclusive);
        }
        other => panic!("expected text, got {other:?}"),
    }
    let printed = print_item_standalone(schema);
    let reprinted_schema = parse_schema(&format!("X = {printed}\n")).unwrap();
    assert_eq!(schema, reprinted_schema.definitions.get("X").unwrap());
}

#[test]
fn s4_list_with_composite_uniqueness() {
    let parsed = parse_schema("= { id: number, code: text }+ [ unique = (id, code) ]\n").unwrap();
    let schema = parsed.root.unwrap();

    let duplicate = Value::List(vec![
        value_object(&[("id", Value::Number(1.into())), ("code", Value::Text("a".into()))]),
        value_object(&[("id", Value::Number(1.into())), ("code", Value::Text("a".into()))]),
    ]);
    let result = validate(&schema, &duplicate);
    assert!(!result.is_valid());
    assert!(result.errors().iter().any(|e| e.message.contains("id") && e.message.contains("code")));

    let distinct = Value::List(vec![
        value_object(&[("id", Value::Number(1.into())), ("code", Value::Text("a".into()))]),
        value_object(&[("id", Value::Number(1.into())), ("code", Value::Text("b".into()))]),
    ]);
    assert!(validate(&schema, &distinct).is_valid());
}

#[cfg(feature = "json-schema")]
#[test]
fn s5_json_schema_import_with_ref() {
    use schemus::schema::ObjectLabel;
    use schemus::translate::json_schema_import::import;

    let text = r#"{"$defs":{"Addr":{"type":"object","properties":{"city":{"type":"string"}},"required":["city"]}},
 "type":"object","properties":{"home":{"$ref":"#/$defs/Addr"}},"required":["home"]}"#;
    let result = import(text).unwrap();

    match &result.root {
        Schema::Object(fields) => {
            assert_eq!(fields.len(), 1);
            assert_eq!(fields[0].0, ObjectLabel::Mandatory("home".to_string()));
            assert_eq!(fields[0].1, Schema::Ref("Addr".to_string()));
        }
        other => panic!("expected object root, got {other:?}"),
    }

    match result.definitions.get("Addr").unwrap() {
        Schema::Object(fields) => {
            assert_eq!(fields[0].0, ObjectLabel::Mandatory("city".to_string()));
            assert!(matches!(fields[0].1, Schema::Text { .. }));
        }
        other => panic!("expected object definition, got {other:?}"),
    }
    assert!(result.report.is_empty());
}

#[cfg(feature = "json-schema")]
#[test]
fn s6_json_schema_import_with_all_of_merge() {
    use schemus::schema::ObjectLabel;
    use schemus::translate::json_schema_import::import;

    let text = r#"{"allOf":[{"$ref":"#/$defs/Base"},{"type":"object","properties":{"extra":{"type":"string"}}}],
 "$defs":{"Base":{"type":"object","properties":{"id":{"type":"integer"}},"required":["id"]}}}"#;
    let result = import(text).unwrap();

    match &result.root {
        Schema::Object(fields) => {
            assert!(fields.iter().any(|(l, s)| {
                l == &ObjectLabel::Mandatory("id".to_string())
                    && matches!(s, Schema::Numeric { constraints, .. } if constraints.integer)
            }));
            assert!(fields
                .iter()
                .any(|(l, s)| l == &ObjectLabel::Optional("extra".to_string()) && matches!(s, Schema::Text { .. })));
        }
        other => panic!("expected object root, got {other:?}"),
    }
    assert!(
        result.report.entries().iter().all(|e| !e.message.to_lowercase().contains("merge")),
        "allOf merge of two objects should not produce Loss: {:?}",
        result.report.entries()
    );
}

#[cfg(feature = "json-schema")]
#[test]
fn s7_multiple_of_is_a_loss() {
    use schemus::friction::FrictionKind;
    use schemus::translate::json_schema_import::import;

    let text = r#"{"type":"integer","multipleOf":3}"#;
    let result = import(text).unwrap();

    assert!(matches!(&result.root, Schema::Numeric { constraints, .. } if constraints.integer));
    assert_eq!(result.report.entries().len(), 1);
    let entry = &result.report.entries()[0];
    assert_eq!(entry.kind, FrictionKind::Loss);
    assert!(entry.message.contains("multipleOf"));
}

#[test]
fn s8_binary_size_unit_normalization() {
    let parsed = parse_schema("= binary [ size <= 2 KB ]\n").unwrap();
    let schema = parsed.root.unwrap();
    match &schema {
        Schema::Binary { constraints: BinaryConstraints { size, .. } } => {
            assert_eq!(size.clone().unwrap().max.unwrap().value, 2048);
        }
        other => panic!("expected binary, got {other:?}"),
    }

    let too_big = Value::Binary(vec![0u8; 3000]);
    assert!(!validate(&schema, &too_big).is_valid());

    let ok = Value::Binary(vec![0u8; 2000]);
    assert!(validate(&schema, &ok).is_valid());
}
