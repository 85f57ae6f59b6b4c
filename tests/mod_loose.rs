use opshell::errors::ShellError;
use opshell::parse::parse_args;
use serde_json::json;

#[test]
fn strict_object_parses() {
    let vals = parse_args("{\"status\": \"active\"}").unwrap();
    assert_eq!(vals, vec![json!({"status": "active"})]);
}

#[test]
fn empty_payload_is_empty_filter() {
    assert_eq!(parse_args("").unwrap(), vec![json!({})]);
    assert_eq!(parse_args("   ").unwrap(), vec![json!({})]);
}

#[test]
fn top_level_comma_splits_two_objects() {
    let vals = parse_args("{\"a\": 1}, {\"$set\": {\"b\": 2}}").unwrap();
    assert_eq!(vals, vec![json!({"a": 1}), json!({"$set": {"b": 2}})]);
}

#[test]
fn nested_commas_do_not_split() {
    let vals = parse_args("{\"x\": [1, 2, 3], \"y\": {\"a\": 1, \"b\": 2}}").unwrap();
    assert_eq!(vals.len(), 1);
}

#[test]
fn comma_inside_string_does_not_split() {
    let vals = parse_args("{\"name\": \"a, b\"}, {\"n\": 1}").unwrap();
    assert_eq!(vals.len(), 2);
    assert_eq!(vals[0], json!({"name": "a, b"}));
}

#[test]
fn single_quotes_are_repaired() {
    let vals = parse_args("{'status': 'active'}").unwrap();
    assert_eq!(vals, vec![json!({"status": "active"})]);
}

#[test]
fn bare_keys_are_repaired() {
    let vals = parse_args("{status: \"active\", age: 30}").unwrap();
    assert_eq!(vals, vec![json!({"status": "active", "age": 30})]);
}

#[test]
fn bare_dollar_keys_are_repaired() {
    let vals = parse_args("{age: {$gte: 18}}").unwrap();
    assert_eq!(vals, vec![json!({"age": {"$gte": 18}})]);
}

#[test]
fn repairs_do_not_touch_string_content() {
    let vals = parse_args("{'note': \"key: value, isn't split\"}").unwrap();
    assert_eq!(vals, vec![json!({"note": "key: value, isn't split"})]);
}

#[test]
fn scalar_arguments_parse() {
    assert_eq!(parse_args("\"country\"").unwrap(), vec![json!("country")]);
    assert_eq!(parse_args("5").unwrap(), vec![json!(5)]);
}

#[test]
fn scalar_then_object_splits() {
    let vals = parse_args("\"country\", {\"active\": true}").unwrap();
    assert_eq!(vals, vec![json!("country"), json!({"active": true})]);
}

#[test]
fn hopeless_payload_reports_original() {
    let err = parse_args("{]").unwrap_err();
    match err {
        ShellError::InvalidArguments { payload } => assert_eq!(payload, "{]"),
        other => panic!("unexpected error: {other:?}"),
    }
}
