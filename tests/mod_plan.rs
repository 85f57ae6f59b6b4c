use bson::doc;
use opshell::errors::ShellError;
use opshell::interpret;
use opshell::plan::OperationKind;

#[test]
fn find_defaults_to_empty_filter() {
    let plan = interpret("users.find()").unwrap();
    assert_eq!(plan.kind, OperationKind::Find);
    assert_eq!(plan.collection, "users");
    assert_eq!(plan.filter, Some(doc! {}));
}

#[test]
fn find_carries_its_filter() {
    let plan = interpret("users.find({\"status\": \"active\"})").unwrap();
    assert_eq!(plan.filter, Some(doc! {"status": "active"}));
}

#[test]
fn find_one_and_count_map_to_their_kinds() {
    assert_eq!(interpret("users.findOne()").unwrap().kind, OperationKind::FindOne);
    assert_eq!(
        interpret("users.countDocuments({\"a\": 1})").unwrap().kind,
        OperationKind::CountDocuments
    );
}

#[test]
fn distinct_takes_field_and_optional_filter() {
    let plan = interpret("users.distinct(\"country\")").unwrap();
    assert_eq!(plan.kind, OperationKind::Distinct);
    assert_eq!(plan.field.as_deref(), Some("country"));
    assert_eq!(plan.filter, Some(doc! {}));

    let plan = interpret("users.distinct(\"country\", {\"active\": true})").unwrap();
    assert_eq!(plan.filter, Some(doc! {"active": true}));
}

#[test]
fn distinct_without_field_is_arity_error() {
    assert!(matches!(
        interpret("users.distinct()"),
        Err(ShellError::ArityMismatch { .. })
    ));
}

#[test]
fn insert_one_populates_document() {
    let plan = interpret("users.insertOne({\"name\": \"John\", \"age\": 30})").unwrap();
    assert_eq!(plan.kind, OperationKind::InsertOne);
    assert_eq!(plan.document, Some(doc! {"name": "John", "age": 30}));
}

#[test]
fn insert_many_takes_array() {
    let plan = interpret("users.insertMany([{\"n\": 1}, {\"n\": 2}])").unwrap();
    assert_eq!(plan.documents, Some(vec![doc! {"n": 1}, doc! {"n": 2}]));
}

#[test]
fn insert_many_promotes_bare_object() {
    let plan = interpret("users.insertMany({\"n\": 1})").unwrap();
    assert_eq!(plan.documents, Some(vec![doc! {"n": 1}]));
}

#[test]
fn update_many_takes_filter_and_update() {
    let plan =
        interpret("orders.updateMany({\"status\": \"old\"}, {\"$set\": {\"status\": \"archived\"}})")
            .unwrap();
    assert_eq!(plan.kind, OperationKind::UpdateMany);
    assert_eq!(plan.filter, Some(doc! {"status": "old"}));
    assert_eq!(plan.update, Some(doc! {"$set": {"status": "archived"}}));
}

#[test]
fn update_one_with_one_argument_is_arity_error() {
    assert!(matches!(
        interpret("a.updateOne({\"x\": 1})"),
        Err(ShellError::ArityMismatch { .. })
    ));
}

#[test]
fn delete_kinds_use_filter_slot() {
    assert_eq!(interpret("a.deleteOne({\"x\": 1})").unwrap().kind, OperationKind::DeleteOne);
    let plan = interpret("a.deleteMany()").unwrap();
    assert_eq!(plan.kind, OperationKind::DeleteMany);
    assert_eq!(plan.filter, Some(doc! {}));
}

#[test]
fn aggregate_promotes_and_collects_stages() {
    let plan = interpret("users.aggregate([{\"$match\": {\"a\": 1}}, {\"$count\": \"n\"}])").unwrap();
    assert_eq!(plan.kind, OperationKind::Aggregate);
    assert_eq!(plan.pipeline.as_ref().map(Vec::len), Some(2));

    let plan = interpret("users.aggregate({\"$match\": {}})").unwrap();
    assert_eq!(plan.pipeline.as_ref().map(Vec::len), Some(1));
}

#[test]
fn unknown_entry_method_is_unsupported() {
    assert!(matches!(
        interpret("users.mapReduce({})"),
        Err(ShellError::UnsupportedOperation(m)) if m == "mapReduce"
    ));
}

#[test]
fn non_object_filter_is_arity_error() {
    assert!(matches!(
        interpret("users.find(5)"),
        Err(ShellError::ArityMismatch { .. })
    ));
}

#[test]
fn too_many_filter_arguments_is_arity_error() {
    assert!(matches!(
        interpret("users.find({\"a\": 1}, {\"b\": 2})"),
        Err(ShellError::ArityMismatch { .. })
    ));
}
