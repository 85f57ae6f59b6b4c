use bson::Document;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: Order,
}

/// The supported entry operations. Adding one is a compile-time-checked
/// change: every `match` over this enum is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Find,
    FindOne,
    CountDocuments,
    Distinct,
    InsertOne,
    InsertMany,
    UpdateOne,
    UpdateMany,
    DeleteOne,
    DeleteMany,
    Aggregate,
}

impl OperationKind {
    /// Maps an entry-call method name. `None` for anything outside the
    /// supported operation set.
    #[must_use]
    pub fn parse(method: &str) -> Option<Self> {
        Some(match method {
            "find" => Self::Find,
            "findOne" => Self::FindOne,
            "countDocuments" => Self::CountDocuments,
            "distinct" => Self::Distinct,
            "insertOne" => Self::InsertOne,
            "insertMany" => Self::InsertMany,
            "updateOne" => Self::UpdateOne,
            "updateMany" => Self::UpdateMany,
            "deleteOne" => Self::DeleteOne,
            "deleteMany" => Self::DeleteMany,
            "aggregate" => Self::Aggregate,
            _ => return None,
        })
    }
}

/// Cursor modifiers folded from the chain. Only `Find` plans carry any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    pub sort: Option<Vec<SortSpec>>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    /// `count` after `find`: report the count of materialized results
    /// instead of the documents themselves.
    pub count_only: bool,
}

/// A fully validated operation request, ready for execution. Exactly one of
/// the argument slots is populated per kind (the find family uses `filter`
/// with an empty-document default).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationPlan {
    pub collection: String,
    pub kind: OperationKind,
    pub filter: Option<Document>,
    pub update: Option<Document>,
    pub document: Option<Document>,
    pub documents: Option<Vec<Document>>,
    pub pipeline: Option<Vec<Document>>,
    pub field: Option<String>,
    pub modifiers: Modifiers,
}

impl OperationPlan {
    pub(crate) fn new(collection: String, kind: OperationKind) -> Self {
        Self {
            collection,
            kind,
            filter: None,
            update: None,
            document: None,
            documents: None,
            pipeline: None,
            field: None,
            modifiers: Modifiers::default(),
        }
    }
}
