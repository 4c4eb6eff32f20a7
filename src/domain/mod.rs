pub mod case;
pub mod comparison;
pub mod execution;

pub use case::{CaseId, HeuristicTag, QueryCase, Variant};
pub use comparison::{ComparisonReport, RowDiff, RunSummary, Verdict};
pub use execution::ExecutionResult;
