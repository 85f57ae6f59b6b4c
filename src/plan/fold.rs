use crate::errors::ShellError;
use crate::parse::{self, Call};
use crate::plan::types::{OperationKind, OperationPlan, Order, SortSpec};
use bson::Bson;

const DEFAULT_LIMIT: u64 = 10;

/// Folds the non-entry calls of a chain into the plan's modifiers, strictly
/// left to right. Only cursor-shaped (`Find`) plans take modifiers; on any
/// other kind a modifier call is a no-op. A later `sort`/`skip`/`limit`
/// overrides an earlier one.
///
/// # Errors
/// `UnsupportedOperation` for a chained method outside
/// `sort`/`skip`/`limit`/`count`; `InvalidArguments` when a `sort` payload
/// cannot be parsed.
pub fn fold_modifiers(mut plan: OperationPlan, rest: &[Call]) -> Result<OperationPlan, ShellError> {
    for call in rest {
        if !matches!(call.method.as_str(), "sort" | "skip" | "limit" | "count") {
            return Err(ShellError::UnsupportedOperation(call.method.clone()));
        }
        if plan.kind != OperationKind::Find {
            log::debug!("ignoring modifier {}() on non-cursor operation {:?}", call.method, plan.kind);
            continue;
        }
        match call.method.as_str() {
            "sort" => plan.modifiers.sort = Some(parse_sort(&call.raw_args)?),
            "skip" => plan.modifiers.skip = Some(numeric_arg(&call.raw_args).unwrap_or(0)),
            "limit" => {
                plan.modifiers.limit = Some(numeric_arg(&call.raw_args).unwrap_or(DEFAULT_LIMIT));
            }
            "count" => plan.modifiers.count_only = true,
            _ => unreachable!(),
        }
    }
    Ok(plan)
}

/// `sort` takes one object mapping field name to 1 (ascending) or -1
/// (descending). Key order defines tie-break precedence.
fn parse_sort(raw_args: &str) -> Result<Vec<SortSpec>, ShellError> {
    let args = parse::parse_args(raw_args)?;
    let doc = match args.first().map(parse::json_to_bson) {
        Some(Bson::Document(d)) => d,
        _ => return Err(ShellError::InvalidArguments { payload: raw_args.to_string() }),
    };
    let mut specs = Vec::with_capacity(doc.len());
    for (field, direction) in doc {
        let order = match as_i64(&direction) {
            Some(n) if n < 0 => Order::Desc,
            _ => Order::Asc,
        };
        specs.push(SortSpec { field, order });
    }
    Ok(specs)
}

/// `skip`/`limit` accept a bare non-negative integer or a one-element array
/// holding one. `None` for anything else; callers substitute the intended
/// default rather than failing.
fn numeric_arg(raw_args: &str) -> Option<u64> {
    let args = parse::parse_args(raw_args).ok()?;
    let value = match args.first().map(parse::json_to_bson) {
        Some(Bson::Array(items)) if items.len() == 1 => items.into_iter().next()?,
        Some(v) => v,
        None => return None,
    };
    as_i64(&value).and_then(|n| u64::try_from(n).ok())
}

fn as_i64(v: &Bson) -> Option<i64> {
    match v {
        Bson::Int32(n) => Some(i64::from(*n)),
        Bson::Int64(n) => Some(*n),
        _ => None,
    }
}
