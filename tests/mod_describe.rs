use bson::doc;
use opshell::describe::{render_collection, render_collection_list, render_database_list, render_structure};
use opshell::memstore::MemStore;

#[test]
fn structure_lists_fields_with_types_and_samples() {
    let out = render_structure(&doc! {
        "name": "John Doe",
        "age": 25,
        "active": true,
    });
    assert!(out.contains("name: string = John Doe"));
    assert!(out.contains("age: number = "));
    assert!(out.contains("active: bool = "));
}

#[test]
fn nested_objects_are_indented() {
    let out = render_structure(&doc! {
        "profile": {"name": "John", "avatar": "x"},
    });
    assert!(out.contains("profile: {\n"));
    assert!(out.contains("  name: string = John"));
    assert!(out.contains("}\n"));
}

#[test]
fn arrays_report_length_and_sample_first_object() {
    let out = render_structure(&doc! {
        "tags": ["premium", "beta"],
        "orders": [{"sku": "a"}, {"sku": "b"}, {"sku": "c"}],
    });
    assert!(out.contains("tags: array (2 items)"));
    assert!(out.contains("orders: [ (array, 3 items)"));
    assert!(out.contains("  sku: string = a"));
}

#[test]
fn long_samples_are_truncated() {
    let long = "x".repeat(60);
    let out = render_structure(&doc! {"note": long});
    assert!(out.contains(&format!("note: string = {}...", "x".repeat(40))));
}

#[test]
fn collection_report_includes_count_and_structure() {
    let store = MemStore::new();
    store.seed("users", doc! {"name": "alice"});
    store.seed("users", doc! {"name": "bob"});
    let out = render_collection("users", store.count("users"), store.sample("users").as_ref());
    assert!(out.starts_with("Collection: users\n\nDocuments: 2\n"));
    assert!(out.contains("name: string = alice"));
}

#[test]
fn empty_collection_has_fixed_message() {
    assert_eq!(render_collection("ghosts", 0, None), "Collection 'ghosts' is empty.");
}

#[test]
fn collection_list_is_sorted_bullets() {
    let out = render_collection_list("appdb", &["orders".into(), "users".into(), "logs".into()]);
    assert_eq!(out, "Collections in 'appdb':\n\n  • logs\n  • orders\n  • users");
    assert_eq!(
        render_collection_list("appdb", &[]),
        "No collections found in database 'appdb'."
    );
}

#[test]
fn database_list_is_sorted_bullets() {
    let out = render_database_list(&["test".into(), "admin".into()]);
    assert_eq!(out, "Databases:\n\n  • admin\n  • test");
    assert_eq!(render_database_list(&[]), "No databases found.");
}
