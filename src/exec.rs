use crate::errors::ShellError;
use crate::format;
use crate::plan::OperationPlan;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use std::str::FromStr;

/// Target engine discriminator supplied by the caller. SQL engines take the
/// query string verbatim; only `Mongo` goes through the operation-string
/// front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Mysql,
    Postgres,
    Mongo,
}

impl FromStr for Engine {
    type Err = ShellError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mysql" => Ok(Self::Mysql),
            "postgres" => Ok(Self::Postgres),
            "mongo" => Ok(Self::Mongo),
            other => Err(ShellError::UnknownEngine(other.to_string())),
        }
    }
}

/// What one executed plan produced. Consumed exactly once by the formatter.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Documents(Vec<Document>),
    SingleDocument(Option<Document>),
    Count(u64),
    InsertedId(ObjectId),
    InsertedIds(Vec<ObjectId>),
    MatchedModified { matched: u64, modified: u64 },
    Deleted(u64),
    DistinctValues(Vec<Bson>),
}

/// The document-store collaborator: takes one validated plan, returns one
/// outcome. Transport, sessions, and timeouts are its concern, not the
/// front end's.
pub trait Executor {
    /// # Errors
    /// Store-specific failures, surfaced verbatim to the caller as text.
    fn execute(&self, plan: &OperationPlan) -> Result<ExecutionOutcome, ShellError>;
}

/// Relational passthrough collaborator. The SQL string is not parsed here.
pub trait SqlExecutor {
    /// # Errors
    /// Store-specific failures, surfaced verbatim to the caller as text.
    fn execute_sql(&self, sql: &str) -> Result<String, ShellError>;
}

/// Runs one operation string against the document store and renders the
/// outcome. Never panics; every failure comes back as a descriptive string.
pub fn run(store: &dyn Executor, query: &str) -> String {
    match crate::interpret(query) {
        Ok(plan) => match store.execute(&plan) {
            Ok(outcome) => {
                // count() after find() reports the materialized result count
                let outcome = if plan.modifiers.count_only {
                    match outcome {
                        ExecutionOutcome::Documents(docs) => {
                            ExecutionOutcome::Count(docs.len() as u64)
                        }
                        other => other,
                    }
                } else {
                    outcome
                };
                format::format_outcome(&outcome)
            }
            Err(e) => render_error(&e),
        },
        Err(e) => render_error(&e),
    }
}

/// Dispatches by engine: SQL strings go to the passthrough collaborator
/// verbatim, Mongo-style strings through the full pipeline.
pub fn run_query(engine: Engine, store: &dyn Executor, sql: &dyn SqlExecutor, query: &str) -> String {
    log::info!("running query on {engine:?} engine");
    match engine {
        Engine::Mysql | Engine::Postgres => match sql.execute_sql(query) {
            Ok(report) => report,
            Err(e) => render_error(&e),
        },
        Engine::Mongo => run(store, query),
    }
}

fn render_error(e: &ShellError) -> String {
    match e {
        ShellError::ForbiddenPattern(_) => format!("Security Error: {e}"),
        _ => format!("Error: {e}"),
    }
}
