use crate::errors::ShellError;
use crate::parse::Call;
use crate::plan::types::{OperationKind, OperationPlan};
use bson::{Bson, Document};

/// Maps the entry call onto an `OperationPlan`, validating argument count and
/// shape per operation. `args` are the already-parsed, already-coerced
/// top-level values of the entry call.
///
/// # Errors
/// `UnsupportedOperation` for a method outside the operation set;
/// `ArityMismatch` when the arguments do not fit the operation's slots.
pub fn build_plan(
    collection: &str,
    entry: &Call,
    args: Vec<Bson>,
) -> Result<OperationPlan, ShellError> {
    let Some(kind) = OperationKind::parse(&entry.method) else {
        return Err(ShellError::UnsupportedOperation(entry.method.clone()));
    };
    let mut plan = OperationPlan::new(collection.to_string(), kind);
    match kind {
        OperationKind::Find
        | OperationKind::FindOne
        | OperationKind::CountDocuments
        | OperationKind::DeleteOne
        | OperationKind::DeleteMany => {
            plan.filter = Some(filter_arg(&entry.method, args)?);
        }
        OperationKind::Distinct => {
            let mut args = args.into_iter();
            match args.next() {
                Some(Bson::String(field)) => plan.field = Some(field),
                _ => {
                    return Err(arity(&entry.method, "requires a field name as its first argument"));
                }
            }
            plan.filter = Some(match args.next() {
                None => Document::new(),
                Some(Bson::Document(d)) => d,
                Some(_) => return Err(arity(&entry.method, "optional second argument must be a filter object")),
            });
            if args.next().is_some() {
                return Err(arity(&entry.method, "takes at most two arguments"));
            }
        }
        OperationKind::InsertOne => {
            plan.document = Some(single_document(&entry.method, args)?);
        }
        OperationKind::InsertMany => {
            plan.documents = Some(document_list(&entry.method, args)?);
        }
        OperationKind::UpdateOne | OperationKind::UpdateMany => {
            let mut args = args.into_iter();
            let (filter, update) = match (args.next(), args.next()) {
                (Some(Bson::Document(f)), Some(Bson::Document(u))) => (f, u),
                (Some(_), Some(_)) => {
                    return Err(arity(&entry.method, "filter and update must both be objects"));
                }
                _ => return Err(arity(&entry.method, "requires [filter, update] arguments")),
            };
            if args.next().is_some() {
                return Err(arity(&entry.method, "takes exactly two arguments"));
            }
            plan.filter = Some(filter);
            plan.update = Some(update);
        }
        OperationKind::Aggregate => {
            plan.pipeline = Some(document_list(&entry.method, args)?);
        }
    }
    Ok(plan)
}

fn arity(method: &str, expected: &str) -> ShellError {
    ShellError::ArityMismatch { method: method.to_string(), expected: expected.to_string() }
}

/// 0 or 1 object; missing means the empty filter.
fn filter_arg(method: &str, args: Vec<Bson>) -> Result<Document, ShellError> {
    let mut args = args.into_iter();
    let filter = match args.next() {
        None => Document::new(),
        Some(Bson::Document(d)) => d,
        Some(_) => return Err(arity(method, "filter must be an object")),
    };
    if args.next().is_some() {
        return Err(arity(method, "takes at most one argument"));
    }
    Ok(filter)
}

fn single_document(method: &str, args: Vec<Bson>) -> Result<Document, ShellError> {
    let mut args = args.into_iter();
    let doc = match args.next() {
        Some(Bson::Document(d)) => d,
        _ => return Err(arity(method, "requires a single document argument")),
    };
    if args.next().is_some() {
        return Err(arity(method, "takes exactly one argument"));
    }
    Ok(doc)
}

/// 1 array of objects; a bare object is promoted to a one-element array.
fn document_list(method: &str, args: Vec<Bson>) -> Result<Vec<Document>, ShellError> {
    let mut args = args.into_iter();
    let docs = match args.next() {
        Some(Bson::Array(items)) => {
            let mut docs = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Bson::Document(d) => docs.push(d),
                    _ => return Err(arity(method, "array elements must be objects")),
                }
            }
            docs
        }
        Some(Bson::Document(d)) => vec![d],
        _ => return Err(arity(method, "requires an array of objects")),
    };
    if args.next().is_some() {
        return Err(arity(method, "takes exactly one argument"));
    }
    Ok(docs)
}
