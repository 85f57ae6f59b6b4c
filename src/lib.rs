pub mod config;
pub mod describe;
pub mod errors;
pub mod exec;
pub mod format;
pub mod guard;
pub mod logger;
pub mod memstore;
pub mod parse;
pub mod plan;

pub use exec::{Engine, ExecutionOutcome, Executor, SqlExecutor, run, run_query};

use crate::errors::ShellError;
use crate::plan::OperationPlan;
use bson::Bson;

/// Parses and plans one operation string: guard, call splitter, loose
/// argument parser, type coercer, plan builder, chain folder. No I/O; the
/// returned plan is ready for a store collaborator.
///
/// # Errors
/// Any `ShellError` from the parsing taxonomy; execution-side errors cannot
/// occur here.
pub fn interpret(raw: &str) -> Result<OperationPlan, ShellError> {
    guard::check(raw)?;
    let (collection, calls) = parse::split(raw)?;
    let (entry, rest) = calls
        .split_first()
        .ok_or_else(|| ShellError::MalformedRequest(raw.to_string()))?;
    let args: Vec<Bson> = parse::parse_args(&entry.raw_args)?
        .iter()
        .map(|v| parse::coerce(parse::json_to_bson(v)))
        .collect();
    log::debug!("planning {collection}.{}() with {} argument(s)", entry.method, args.len());
    let plan = plan::build_plan(&collection, entry, args)?;
    plan::fold_modifiers(plan, rest)
}
