use bson::{Bson, Document};

const SAMPLE_MAX: usize = 40;

/// Renders the structure of one sampled document: field name, inferred type,
/// and a truncated sample value, with nested objects indented and arrays
/// annotated with their length.
#[must_use]
pub fn render_structure(doc: &Document) -> String {
    let mut out = String::new();
    describe_fields(doc, 0, &mut out);
    out
}

fn describe_fields(doc: &Document, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    for (key, value) in doc {
        match value {
            Bson::Document(inner) => {
                out.push_str(&format!("{prefix}{key}: {{\n"));
                describe_fields(inner, indent + 1, out);
                out.push_str(&format!("{prefix}}}\n"));
            }
            Bson::Array(items) => {
                if let Some(Bson::Document(first)) = items.first() {
                    out.push_str(&format!("{prefix}{key}: [ (array, {} items)\n", items.len()));
                    describe_fields(first, indent + 1, out);
                    out.push_str(&format!("{prefix}]\n"));
                } else {
                    out.push_str(&format!("{prefix}{key}: array ({} items)\n", items.len()));
                }
            }
            other => {
                out.push_str(&format!(
                    "{prefix}{key}: {} = {}\n",
                    type_name(other),
                    truncate(&sample_text(other))
                ));
            }
        }
    }
}

/// Full collection report: document count plus the sampled structure.
#[must_use]
pub fn render_collection(name: &str, count: usize, sample: Option<&Document>) -> String {
    let Some(sample) = sample else {
        return format!("Collection '{name}' is empty.");
    };
    let mut out = format!("Collection: {name}\n\nDocuments: {count}\n\nSample Structure:\n\n");
    out.push_str(&render_structure(sample));
    out
}

#[must_use]
pub fn render_collection_list(database: &str, names: &[String]) -> String {
    if names.is_empty() {
        return format!("No collections found in database '{database}'.");
    }
    let mut sorted: Vec<&String> = names.iter().collect();
    sorted.sort();
    let mut out = format!("Collections in '{database}':\n\n");
    out.push_str(
        &sorted.iter().map(|n| format!("  • {n}")).collect::<Vec<_>>().join("\n"),
    );
    out
}

#[must_use]
pub fn render_database_list(names: &[String]) -> String {
    if names.is_empty() {
        return "No databases found.".to_string();
    }
    let mut sorted: Vec<&String> = names.iter().collect();
    sorted.sort();
    let mut out = String::from("Databases:\n\n");
    out.push_str(
        &sorted.iter().map(|n| format!("  • {n}")).collect::<Vec<_>>().join("\n"),
    );
    out
}

fn type_name(v: &Bson) -> &'static str {
    match v {
        Bson::String(_) => "string",
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) => "number",
        Bson::Boolean(_) => "bool",
        Bson::Null => "null",
        Bson::ObjectId(_) => "ObjectId",
        Bson::DateTime(_) => "date",
        Bson::Document(_) => "object",
        Bson::Array(_) => "array",
        _ => "other",
    }
}

fn sample_text(v: &Bson) -> String {
    match v {
        Bson::String(s) => s.clone(),
        Bson::ObjectId(id) => id.to_hex(),
        Bson::Int32(n) => n.to_string(),
        Bson::Int64(n) => n.to_string(),
        Bson::Double(f) => f.to_string(),
        Bson::Boolean(b) => b.to_string(),
        Bson::Null => "null".to_string(),
        other => format!("{other:?}"),
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() > SAMPLE_MAX {
        let cut: String = s.chars().take(SAMPLE_MAX).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}
