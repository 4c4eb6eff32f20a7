use serde::{Deserialize, Serialize};

use crate::case::{CaseId, Variant};
use crate::execution::ExecutionResult;

/// Upper bound on divergent rows carried in a diff summary
pub const MAX_DIFF_ROWS: usize = 5;

/// Bounded summary of how two normalized result sets diverge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDiff {
    /// Rows present only in the heuristic result (truncated to MAX_DIFF_ROWS)
    pub only_in_heuristic: Vec<Vec<String>>,
    /// Rows present only in the baseline result (truncated to MAX_DIFF_ROWS)
    pub only_in_baseline: Vec<Vec<String>>,
    pub heuristic_total: usize,
    pub baseline_total: usize,
}

impl RowDiff {
    pub fn is_empty(&self) -> bool {
        self.only_in_heuristic.is_empty() && self.only_in_baseline.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} row(s) only in heuristic, {} row(s) only in baseline ({} vs {} total)",
            self.only_in_heuristic.len(),
            self.only_in_baseline.len(),
            self.heuristic_total,
            self.baseline_total,
        )
    }
}

/// Equivalence outcome for one case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// Both variants produced the same normalized result set
    Equivalent,
    /// Result sets diverge; carries a bounded diff
    Mismatch(RowDiff),
    /// A variant failed to run (engine error or timeout)
    Failed { variant: Variant, error: String },
}

impl Verdict {
    pub fn is_equivalent(&self) -> bool {
        matches!(self, Self::Equivalent)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Equivalent => "equivalent",
            Self::Mismatch(_) => "mismatch",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Timing and outcome of one variant's run, as carried in a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub elapsed_ms: u64,
    pub row_count: usize,
    pub error: Option<String>,
}

impl RunSummary {
    pub fn from_result(result: &ExecutionResult) -> Self {
        Self {
            elapsed_ms: result.elapsed_ms,
            row_count: result.row_count,
            error: result.error.clone(),
        }
    }
}

/// Comparison of the two formulations of one case. Derived from two
/// ExecutionResults; never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub case_id: CaseId,
    pub question: String,
    pub heuristic_sql: String,
    pub baseline_sql: String,
    pub heuristic: RunSummary,
    pub baseline: RunSummary,
    pub verdict: Verdict,
    pub narrative: String,
}

impl ComparisonReport {
    /// Baseline minus heuristic, in milliseconds. Positive means the
    /// heuristic formulation was faster. None when either run failed.
    pub fn delta_ms(&self) -> Option<i64> {
        if self.heuristic.error.is_some() || self.baseline.error.is_some() {
            return None;
        }
        Some(self.baseline.elapsed_ms as i64 - self.heuristic.elapsed_ms as i64)
    }

    pub fn faster_variant(&self) -> Option<Variant> {
        match self.delta_ms()? {
            d if d > 0 => Some(Variant::Heuristic),
            d if d < 0 => Some(Variant::Baseline),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(heuristic_ms: u64, baseline_ms: u64, verdict: Verdict) -> ComparisonReport {
        ComparisonReport {
            case_id: CaseId::new("c1"),
            question: "q".to_string(),
            heuristic_sql: "SELECT 1".to_string(),
            baseline_sql: "SELECT 1".to_string(),
            heuristic: RunSummary {
                elapsed_ms: heuristic_ms,
                row_count: 1,
                error: None,
            },
            baseline: RunSummary {
                elapsed_ms: baseline_ms,
                row_count: 1,
                error: None,
            },
            verdict,
            narrative: String::new(),
        }
    }

    #[test]
    fn delta_is_baseline_minus_heuristic() {
        let r = report(10, 25, Verdict::Equivalent);

        assert_eq!(r.delta_ms(), Some(15));
        assert_eq!(r.faster_variant(), Some(Variant::Heuristic));
    }

    #[test]
    fn negative_delta_means_baseline_was_faster() {
        let r = report(40, 25, Verdict::Equivalent);

        assert_eq!(r.delta_ms(), Some(-15));
        assert_eq!(r.faster_variant(), Some(Variant::Baseline));
    }

    #[test]
    fn equal_timings_have_no_faster_variant() {
        let r = report(20, 20, Verdict::Equivalent);

        assert_eq!(r.faster_variant(), None);
    }

    #[test]
    fn delta_is_none_when_a_run_failed() {
        let mut r = report(10, 0, Verdict::Failed {
            variant: Variant::Baseline,
            error: "syntax error".to_string(),
        });
        r.baseline.error = Some("syntax error".to_string());

        assert_eq!(r.delta_ms(), None);
        assert_eq!(r.faster_variant(), None);
    }

    #[test]
    fn diff_summary_reports_counts() {
        let diff = RowDiff {
            only_in_heuristic: vec![vec!["a".to_string()]],
            only_in_baseline: vec![],
            heuristic_total: 3,
            baseline_total: 2,
        };

        assert!(!diff.is_empty());
        assert_eq!(
            diff.summary(),
            "1 row(s) only in heuristic, 0 row(s) only in baseline (3 vs 2 total)"
        );
    }

    #[test]
    fn verdict_labels() {
        assert_eq!(Verdict::Equivalent.label(), "equivalent");
        assert!(Verdict::Equivalent.is_equivalent());
        let failed = Verdict::Failed {
            variant: Variant::Heuristic,
            error: "x".to_string(),
        };
        assert_eq!(failed.label(), "failed");
    }
}
