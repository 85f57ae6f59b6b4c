mod build;
mod fold;
mod types;

pub use build::build_plan;
pub use fold::fold_modifiers;
pub use types::{Modifiers, OperationKind, OperationPlan, Order, SortSpec};
