use crate::errors::ShellError;
use crate::exec::{ExecutionOutcome, Executor};
use crate::plan::{OperationKind, OperationPlan, Order, SortSpec};
use bson::oid::ObjectId;
use bson::{Bson, Document};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// An in-memory document store implementing the executor contract. Backs the
/// CLI demo and the integration tests; filter coverage is the common operator
/// set, not the full query language.
#[derive(Default)]
pub struct MemStore {
    collections: RwLock<BTreeMap<String, Vec<Document>>>,
}

impl MemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a document directly, bypassing planning. Assigns an `_id` when
    /// missing.
    pub fn seed(&self, collection: &str, mut doc: Document) {
        if !doc.contains_key("_id") {
            doc.insert("_id", ObjectId::new());
        }
        self.collections.write().entry(collection.to_string()).or_default().push(doc);
    }

    #[must_use]
    pub fn collection_names(&self) -> Vec<String> {
        self.collections.read().keys().cloned().collect()
    }

    /// First document of a collection, used for structure sampling.
    #[must_use]
    pub fn sample(&self, collection: &str) -> Option<Document> {
        self.collections.read().get(collection).and_then(|docs| docs.first().cloned())
    }

    #[must_use]
    pub fn count(&self, collection: &str) -> usize {
        self.collections.read().get(collection).map_or(0, Vec::len)
    }

    fn insert_one(&self, collection: &str, mut doc: Document) -> Result<ObjectId, ShellError> {
        let id = match doc.get("_id") {
            Some(Bson::ObjectId(oid)) => *oid,
            Some(other) => {
                return Err(ShellError::Store(format!(
                    "only ObjectId _id values are supported, got {other:?}"
                )));
            }
            None => {
                let oid = ObjectId::new();
                doc.insert("_id", oid);
                oid
            }
        };
        self.collections.write().entry(collection.to_string()).or_default().push(doc);
        Ok(id)
    }
}

impl Executor for MemStore {
    fn execute(&self, plan: &OperationPlan) -> Result<ExecutionOutcome, ShellError> {
        let empty = Document::new();
        let filter = plan.filter.as_ref().unwrap_or(&empty);
        match plan.kind {
            OperationKind::Find => {
                let guard = self.collections.read();
                let mut docs: Vec<Document> = guard
                    .get(&plan.collection)
                    .map(|all| all.iter().filter(|d| matches_filter(d, filter)).cloned().collect())
                    .unwrap_or_default();
                drop(guard);
                if let Some(specs) = &plan.modifiers.sort {
                    sort_docs(&mut docs, specs);
                }
                let skip = plan.modifiers.skip.unwrap_or(0) as usize;
                let docs: Vec<Document> = docs
                    .into_iter()
                    .skip(skip)
                    .take(plan.modifiers.limit.map_or(usize::MAX, |l| l as usize))
                    .collect();
                Ok(ExecutionOutcome::Documents(docs))
            }
            OperationKind::FindOne => {
                let guard = self.collections.read();
                let doc = guard
                    .get(&plan.collection)
                    .and_then(|all| all.iter().find(|d| matches_filter(d, filter)).cloned());
                Ok(ExecutionOutcome::SingleDocument(doc))
            }
            OperationKind::CountDocuments => {
                let guard = self.collections.read();
                let n = guard
                    .get(&plan.collection)
                    .map_or(0, |all| all.iter().filter(|d| matches_filter(d, filter)).count());
                Ok(ExecutionOutcome::Count(n as u64))
            }
            OperationKind::Distinct => {
                let field = plan
                    .field
                    .as_deref()
                    .ok_or_else(|| ShellError::Store("distinct plan missing field".into()))?;
                let guard = self.collections.read();
                let mut values: Vec<Bson> = Vec::new();
                if let Some(all) = guard.get(&plan.collection) {
                    for doc in all.iter().filter(|d| matches_filter(d, filter)) {
                        if let Some(v) = get_path(doc, field)
                            && !values.iter().any(|seen| bson_equal(seen, v))
                        {
                            values.push(v.clone());
                        }
                    }
                }
                Ok(ExecutionOutcome::DistinctValues(values))
            }
            OperationKind::InsertOne => {
                let doc = plan
                    .document
                    .clone()
                    .ok_or_else(|| ShellError::Store("insertOne plan missing document".into()))?;
                let id = self.insert_one(&plan.collection, doc)?;
                Ok(ExecutionOutcome::InsertedId(id))
            }
            OperationKind::InsertMany => {
                let docs = plan
                    .documents
                    .clone()
                    .ok_or_else(|| ShellError::Store("insertMany plan missing documents".into()))?;
                let mut ids = Vec::with_capacity(docs.len());
                for doc in docs {
                    ids.push(self.insert_one(&plan.collection, doc)?);
                }
                Ok(ExecutionOutcome::InsertedIds(ids))
            }
            OperationKind::UpdateOne | OperationKind::UpdateMany => {
                let update = plan
                    .update
                    .as_ref()
                    .ok_or_else(|| ShellError::Store("update plan missing update document".into()))?;
                let one = plan.kind == OperationKind::UpdateOne;
                let mut matched = 0u64;
                let mut modified = 0u64;
                let mut guard = self.collections.write();
                if let Some(all) = guard.get_mut(&plan.collection) {
                    for doc in all.iter_mut().filter(|d| matches_filter(d, filter)) {
                        matched += 1;
                        if apply_update(doc, update)? {
                            modified += 1;
                        }
                        if one {
                            break;
                        }
                    }
                }
                Ok(ExecutionOutcome::MatchedModified { matched, modified })
            }
            OperationKind::DeleteOne | OperationKind::DeleteMany => {
                let one = plan.kind == OperationKind::DeleteOne;
                let mut deleted = 0u64;
                let mut guard = self.collections.write();
                if let Some(all) = guard.get_mut(&plan.collection) {
                    if one {
                        if let Some(pos) = all.iter().position(|d| matches_filter(d, filter)) {
                            all.remove(pos);
                            deleted = 1;
                        }
                    } else {
                        let before = all.len();
                        all.retain(|d| !matches_filter(d, filter));
                        deleted = (before - all.len()) as u64;
                    }
                }
                Ok(ExecutionOutcome::Deleted(deleted))
            }
            OperationKind::Aggregate => {
                let pipeline = plan
                    .pipeline
                    .as_ref()
                    .ok_or_else(|| ShellError::Store("aggregate plan missing pipeline".into()))?;
                let docs = self
                    .collections
                    .read()
                    .get(&plan.collection)
                    .cloned()
                    .unwrap_or_default();
                Ok(ExecutionOutcome::Documents(run_pipeline(docs, pipeline)?))
            }
        }
    }
}

/// Supported stages: `$match`, `$sort`, `$skip`, `$limit`, `$count`. Anything
/// else surfaces a store error; stage coverage is an executor property, the
/// planner accepts any pipeline.
fn run_pipeline(mut docs: Vec<Document>, pipeline: &[Document]) -> Result<Vec<Document>, ShellError> {
    for stage in pipeline {
        let Some((op, spec)) = stage.iter().next() else {
            continue;
        };
        match (op.as_str(), spec) {
            ("$match", Bson::Document(filter)) => {
                docs.retain(|d| matches_filter(d, filter));
            }
            ("$sort", Bson::Document(keys)) => {
                let specs: Vec<SortSpec> = keys
                    .iter()
                    .map(|(field, dir)| SortSpec {
                        field: field.clone(),
                        order: if to_f64(dir).is_some_and(|n| n < 0.0) { Order::Desc } else { Order::Asc },
                    })
                    .collect();
                sort_docs(&mut docs, &specs);
            }
            ("$skip", n) => {
                let n = to_f64(n).map_or(0, |f| f.max(0.0) as usize);
                docs.drain(..n.min(docs.len()));
            }
            ("$limit", n) => {
                let n = to_f64(n).map_or(0, |f| f.max(0.0) as usize);
                docs.truncate(n);
            }
            ("$count", Bson::String(name)) => {
                let mut counted = Document::new();
                counted.insert(name.clone(), docs.len() as i64);
                docs = vec![counted];
            }
            (other, _) => {
                return Err(ShellError::Store(format!("unsupported aggregation stage '{other}'")));
            }
        }
    }
    Ok(docs)
}

/// Evaluates a Mongo-style filter document against one document. Top-level
/// keys are either `$and`/`$or`/`$nor`/`$not` or field paths; a field
/// condition is either a literal (equality) or an operator document.
#[must_use]
pub fn matches_filter(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, cond)| match key.as_str() {
        "$and" => as_filter_list(cond).is_some_and(|fs| fs.iter().all(|f| matches_filter(doc, f))),
        "$or" => as_filter_list(cond).is_some_and(|fs| fs.iter().any(|f| matches_filter(doc, f))),
        "$nor" => as_filter_list(cond).is_some_and(|fs| !fs.iter().any(|f| matches_filter(doc, f))),
        "$not" => matches!(cond, Bson::Document(inner) if !matches_filter(doc, inner)),
        path => match cond {
            Bson::Document(ops) if ops.keys().any(|k| k.starts_with('$')) => {
                ops.iter().all(|(op, v)| eval_operator(doc, path, op, v))
            }
            literal => get_path(doc, path).is_some_and(|v| bson_equal(v, literal)),
        },
    })
}

fn as_filter_list(v: &Bson) -> Option<Vec<&Document>> {
    match v {
        Bson::Array(items) => items
            .iter()
            .map(|i| match i {
                Bson::Document(d) => Some(d),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

fn eval_operator(doc: &Document, path: &str, op: &str, expected: &Bson) -> bool {
    let actual = get_path(doc, path);
    match op {
        "$eq" => actual.is_some_and(|v| bson_equal(v, expected)),
        "$ne" => !actual.is_some_and(|v| bson_equal(v, expected)),
        "$gt" => actual.is_some_and(|v| bson_cmp(v, expected) == Some(Ordering::Greater)),
        "$gte" => actual.is_some_and(|v| {
            matches!(bson_cmp(v, expected), Some(Ordering::Greater | Ordering::Equal))
        }),
        "$lt" => actual.is_some_and(|v| bson_cmp(v, expected) == Some(Ordering::Less)),
        "$lte" => actual.is_some_and(|v| {
            matches!(bson_cmp(v, expected), Some(Ordering::Less | Ordering::Equal))
        }),
        "$in" => match (actual, expected) {
            (Some(v), Bson::Array(set)) => set.iter().any(|x| bson_equal(v, x)),
            _ => false,
        },
        "$nin" => match (actual, expected) {
            (Some(v), Bson::Array(set)) => !set.iter().any(|x| bson_equal(v, x)),
            (None, Bson::Array(_)) => true,
            _ => false,
        },
        "$exists" => {
            let want = matches!(expected, Bson::Boolean(true));
            actual.is_some() == want
        }
        "$not" => match expected {
            Bson::Document(inner) => !inner.iter().all(|(o, v)| eval_operator(doc, path, o, v)),
            _ => false,
        },
        other => {
            log::debug!("unknown filter operator {other}, matching nothing");
            false
        }
    }
}

fn get_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut iter = path.split('.');
    let mut cur = doc.get(iter.next()?);
    for part in iter {
        match cur {
            Some(Bson::Document(d)) => cur = d.get(part),
            _ => return None,
        }
    }
    cur
}

/// Applies `$set`/`$unset`/`$inc` to one document, reporting whether any
/// field actually changed.
///
/// # Errors
/// `Store` for update operators outside the supported set or non-numeric
/// `$inc` arguments.
fn apply_update(doc: &mut Document, update: &Document) -> Result<bool, ShellError> {
    let mut modified = false;
    for (op, spec) in update {
        match (op.as_str(), spec) {
            ("$set", Bson::Document(fields)) => {
                for (path, val) in fields {
                    modified |= set_path(doc, path, val.clone());
                }
            }
            ("$unset", Bson::Document(fields)) => {
                for path in fields.keys() {
                    modified |= unset_path(doc, path);
                }
            }
            ("$inc", Bson::Document(fields)) => {
                for (path, delta) in fields {
                    let delta = to_f64(delta).ok_or_else(|| {
                        ShellError::Store(format!("$inc requires a numeric value for '{path}'"))
                    })?;
                    modified |= inc_path(doc, path, delta);
                }
            }
            (other, _) => {
                return Err(ShellError::Store(format!("unsupported update operator '{other}'")));
            }
        }
    }
    Ok(modified)
}

fn set_path(doc: &mut Document, path: &str, val: Bson) -> bool {
    let parts: Vec<&str> = path.split('.').collect();
    let Some((last, parents)) = parts.split_last() else {
        return false;
    };
    let mut cur = doc;
    for key in parents {
        let key: &str = key;
        if !matches!(cur.get(key), Some(Bson::Document(_))) {
            cur.insert(key.to_string(), Bson::Document(Document::new()));
        }
        match cur.get_mut(key) {
            Some(Bson::Document(d)) => cur = d,
            _ => return false,
        }
    }
    let changed = cur.get(*last).is_none_or(|prev| !bson_equal(prev, &val));
    cur.insert((*last).to_string(), val);
    changed
}

fn inc_path(doc: &mut Document, path: &str, delta: f64) -> bool {
    let new_val = match get_path(doc, path) {
        Some(v) => match to_f64(v) {
            Some(f) => Bson::Double(f + delta),
            None => return false,
        },
        None => Bson::Double(delta),
    };
    set_path(doc, path, new_val)
}

fn unset_path(doc: &mut Document, path: &str) -> bool {
    let parts: Vec<&str> = path.split('.').collect();
    let Some((last, parents)) = parts.split_last() else {
        return false;
    };
    let mut cur = doc;
    for key in parents {
        match cur.get_mut(*key) {
            Some(Bson::Document(d)) => cur = d,
            _ => return false,
        }
    }
    cur.remove(*last).is_some()
}

fn sort_docs(docs: &mut [Document], specs: &[SortSpec]) {
    docs.sort_by(|a, b| compare_docs(a, b, specs));
}

fn compare_docs(a: &Document, b: &Document, specs: &[SortSpec]) -> Ordering {
    for spec in specs {
        let ord = match (get_path(a, &spec.field), get_path(b, &spec.field)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => bson_cmp(x, y).unwrap_or(Ordering::Equal),
        };
        if ord != Ordering::Equal {
            return if spec.order == Order::Asc { ord } else { ord.reverse() };
        }
    }
    Ordering::Equal
}

#[allow(clippy::cast_precision_loss)]
fn to_f64(b: &Bson) -> Option<f64> {
    match b {
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

#[allow(clippy::float_cmp)]
fn bson_equal(a: &Bson, b: &Bson) -> bool {
    if let (Some(x), Some(y)) = (to_f64(a), to_f64(b)) {
        return x == y;
    }
    a == b
}

fn bson_cmp(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (to_f64(a), to_f64(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.cmp(y)),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
