use crate::exec::ExecutionOutcome;
use bson::{Bson, Document};

const NO_RESULTS: &str = "Query executed successfully.\nNo results returned.";
const ID_PREVIEW: usize = 5;

/// Renders an execution outcome as the canonical textual report. Total:
/// every outcome has a rendering, nothing here can fail.
#[must_use]
pub fn format_outcome(outcome: &ExecutionOutcome) -> String {
    match outcome {
        ExecutionOutcome::InsertedId(id) => {
            format!("Document inserted successfully.\nID: {id}")
        }
        ExecutionOutcome::InsertedIds(ids) => {
            let mut preview = ids
                .iter()
                .take(ID_PREVIEW)
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            if ids.len() > ID_PREVIEW {
                preview.push_str(&format!("... ({} total)", ids.len()));
            }
            format!("{} document(s) inserted.\nIDs: {preview}", ids.len())
        }
        ExecutionOutcome::MatchedModified { matched, modified } => {
            format!("Update successful.\nMatched: {matched}\nModified: {modified}")
        }
        ExecutionOutcome::Deleted(n) => {
            format!("Delete successful.\n{n} document(s) deleted")
        }
        ExecutionOutcome::Count(n) => format!("Result: {n}"),
        ExecutionOutcome::Documents(docs) => {
            if docs.is_empty() {
                NO_RESULTS.to_string()
            } else {
                render_array(&docs.iter().map(|d| Bson::Document(d.clone())).collect::<Vec<_>>())
            }
        }
        ExecutionOutcome::DistinctValues(values) => {
            if values.is_empty() {
                NO_RESULTS.to_string()
            } else {
                render_array(values)
            }
        }
        ExecutionOutcome::SingleDocument(None) => NO_RESULTS.to_string(),
        ExecutionOutcome::SingleDocument(Some(doc)) => {
            let mut out = String::new();
            render_value(&Bson::Document(doc.clone()), 0, &mut out);
            out
        }
    }
}

fn render_array(values: &[Bson]) -> String {
    let mut out = String::new();
    render_value(&Bson::Array(values.to_vec()), 0, &mut out);
    out
}

/// Human-readable indented rendering. Field order is preserved; identifiers
/// and timestamps render as their display strings.
fn render_value(value: &Bson, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent + 1);
    let close = "  ".repeat(indent);
    match value {
        Bson::Document(doc) => {
            if doc.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{\n");
            for (i, (key, val)) in doc.iter().enumerate() {
                out.push_str(&pad);
                out.push_str(&json_escape(key));
                out.push_str(": ");
                render_value(val, indent + 1, out);
                if i + 1 < doc.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            out.push_str(&close);
            out.push('}');
        }
        Bson::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                out.push_str(&pad);
                render_value(item, indent + 1, out);
                if i + 1 < items.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            out.push_str(&close);
            out.push(']');
        }
        Bson::String(s) => out.push_str(&json_escape(s)),
        Bson::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Bson::Null => out.push_str("null"),
        Bson::Int32(n) => out.push_str(&n.to_string()),
        Bson::Int64(n) => out.push_str(&n.to_string()),
        Bson::Double(f) => out.push_str(&f.to_string()),
        Bson::ObjectId(id) => out.push_str(&json_escape(&id.to_hex())),
        Bson::DateTime(dt) => out.push_str(&json_escape(&render_datetime(*dt))),
        other => out.push_str(&json_escape(&format!("{other:?}"))),
    }
}

fn render_datetime(dt: bson::DateTime) -> String {
    chrono::DateTime::from_timestamp_millis(dt.timestamp_millis())
        .map_or_else(|| dt.timestamp_millis().to_string(), |d| d.to_rfc3339())
}

fn json_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
