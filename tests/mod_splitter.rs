use opshell::errors::ShellError;
use opshell::parse::split;

#[test]
fn splits_nested_braces_verbatim() {
    let (col, calls) = split("a.find({\"x\": {\"$in\": [1,2]}})").unwrap();
    assert_eq!(col, "a");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "find");
    assert_eq!(calls[0].raw_args, "{\"x\": {\"$in\": [1,2]}}");
}

#[test]
fn splits_full_chain_in_order() {
    let (col, calls) = split("users.find({\"a\":1}).sort({\"b\":-1}).limit(5)").unwrap();
    assert_eq!(col, "users");
    let methods: Vec<&str> = calls.iter().map(|c| c.method.as_str()).collect();
    assert_eq!(methods, vec!["find", "sort", "limit"]);
    assert_eq!(calls[1].raw_args, "{\"b\":-1}");
}

#[test]
fn empty_args_are_empty_string() {
    let (_, calls) = split("users.find()").unwrap();
    assert_eq!(calls[0].raw_args, "");
}

#[test]
fn missing_separator_is_malformed() {
    assert!(matches!(split("users"), Err(ShellError::MalformedRequest(_))));
}

#[test]
fn bad_collection_name_rejected() {
    assert!(matches!(
        split("use rs.find()"),
        Err(ShellError::InvalidIdentifier(_))
    ));
    assert!(matches!(
        split("users-2.find()"),
        Err(ShellError::InvalidIdentifier(_))
    ));
}

#[test]
fn unbalanced_parens_are_malformed() {
    assert!(matches!(
        split("users.find({\"a\": 1}"),
        Err(ShellError::MalformedRequest(_))
    ));
}

#[test]
fn missing_call_is_malformed() {
    assert!(matches!(split("users."), Err(ShellError::MalformedRequest(_))));
    assert!(matches!(split("users.find"), Err(ShellError::MalformedRequest(_))));
}

#[test]
fn paren_inside_string_literal_does_not_close_call() {
    let (_, calls) = split("logs.find({\"msg\": \"boom (outer)\"})").unwrap();
    assert_eq!(calls[0].raw_args, "{\"msg\": \"boom (outer)\"}");
}

#[test]
fn trailing_garbage_stops_the_scan() {
    let (_, calls) = split("users.find({}).limit(5);").unwrap();
    assert_eq!(calls.len(), 2);
}

#[test]
fn dotted_arguments_stay_in_one_call() {
    let (_, calls) = split("users.find({\"profile.name\": \"a\"})").unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].raw_args, "{\"profile.name\": \"a\"}");
}
