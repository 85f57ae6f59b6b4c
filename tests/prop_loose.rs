use opshell::parse::parse_args;
use proptest::prelude::*;
use serde_json::{Map, Value, json};

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 _-]{0,20}".prop_map(Value::String),
    ]
}

fn json_object() -> impl Strategy<Value = Value> {
    let node = json_leaf().prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,8}", inner), 0..4).prop_map(|pairs| {
                Value::Object(pairs.into_iter().collect::<Map<String, Value>>())
            }),
        ]
    });
    prop::collection::vec(("[a-z]{1,8}", node), 0..5)
        .prop_map(|pairs| Value::Object(pairs.into_iter().collect::<Map<String, Value>>()))
}

proptest! {
    // strict JSON is a fixed point of the loose parser
    #[test]
    fn prop_strict_json_round_trips(obj in json_object()) {
        let rendered = serde_json::to_string(&obj).unwrap();
        let parsed = parse_args(&rendered).unwrap();
        prop_assert_eq!(parsed, vec![obj]);
    }

    #[test]
    fn prop_two_objects_split_at_top_level(a in json_object(), b in json_object()) {
        let rendered = format!("{}, {}", serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
        let parsed = parse_args(&rendered).unwrap();
        prop_assert_eq!(parsed, vec![a, b]);
    }
}
