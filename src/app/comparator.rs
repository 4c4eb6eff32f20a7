use std::collections::BTreeMap;

use pairql_domain::comparison::MAX_DIFF_ROWS;
use pairql_domain::{
    ComparisonReport, ExecutionResult, HeuristicTag, QueryCase, RowDiff, RunSummary, Variant,
    Verdict,
};

use crate::ports::ExecutorError;
use crate::runner::ExecutionRunner;
use crate::sql;

/// Runs both formulations of a case and judges result-set equivalence.
pub struct Comparator {
    runner: ExecutionRunner,
    concurrent: bool,
}

impl Comparator {
    pub fn new(runner: ExecutionRunner) -> Self {
        Self {
            runner,
            concurrent: false,
        }
    }

    /// Run the two variants concurrently. Safe because both are read-only
    /// queries on independent connections.
    pub fn with_concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub async fn compare(&self, case: &QueryCase) -> Result<ComparisonReport, ExecutorError> {
        let (heuristic, baseline) = if self.concurrent {
            let (h, b) = tokio::join!(
                self.runner.run(case, Variant::Heuristic),
                self.runner.run(case, Variant::Baseline),
            );
            (h?, b?)
        } else {
            (
                self.runner.run(case, Variant::Heuristic).await?,
                self.runner.run(case, Variant::Baseline).await?,
            )
        };

        let verdict = Self::judge(case, &heuristic, &baseline);
        let narrative = Self::narrative(case, &verdict);

        Ok(ComparisonReport {
            case_id: case.id.clone(),
            question: case.question.clone(),
            heuristic_sql: case.heuristic_sql.clone(),
            baseline_sql: case.baseline_sql.clone(),
            heuristic: RunSummary::from_result(&heuristic),
            baseline: RunSummary::from_result(&baseline),
            verdict,
            narrative,
        })
    }

    fn judge(
        case: &QueryCase,
        heuristic: &ExecutionResult,
        baseline: &ExecutionResult,
    ) -> Verdict {
        if let Some(error) = &heuristic.error {
            return Verdict::Failed {
                variant: Variant::Heuristic,
                error: error.clone(),
            };
        }
        if let Some(error) = &baseline.error {
            return Verdict::Failed {
                variant: Variant::Baseline,
                error: error.clone(),
            };
        }

        let heuristic_rows = Self::normalize(&case.heuristic_sql, &heuristic.rows);
        let baseline_rows = Self::normalize(&case.baseline_sql, &baseline.rows);

        if heuristic_rows == baseline_rows {
            Verdict::Equivalent
        } else {
            Verdict::Mismatch(Self::diff(&heuristic_rows, &baseline_rows))
        }
    }

    /// Sort by the whole row as a stable key unless the query orders its
    /// own result, in which case the order is semantically required.
    fn normalize(query: &str, rows: &[Vec<String>]) -> Vec<Vec<String>> {
        let mut rows = rows.to_vec();
        if !sql::has_top_level_order_by(query) {
            rows.sort_unstable();
        }
        rows
    }

    /// Multiset difference, bounded to MAX_DIFF_ROWS samples per side.
    fn diff(heuristic: &[Vec<String>], baseline: &[Vec<String>]) -> RowDiff {
        let mut counts: BTreeMap<&Vec<String>, i64> = BTreeMap::new();
        for row in heuristic {
            *counts.entry(row).or_default() += 1;
        }
        for row in baseline {
            *counts.entry(row).or_default() -= 1;
        }

        let mut only_in_heuristic = Vec::new();
        let mut only_in_baseline = Vec::new();
        for (row, count) in counts {
            if count > 0 && only_in_heuristic.len() < MAX_DIFF_ROWS {
                only_in_heuristic.push(row.clone());
            } else if count < 0 && only_in_baseline.len() < MAX_DIFF_ROWS {
                only_in_baseline.push(row.clone());
            }
        }

        RowDiff {
            only_in_heuristic,
            only_in_baseline,
            heuristic_total: heuristic.len(),
            baseline_total: baseline.len(),
        }
    }

    fn narrative(case: &QueryCase, verdict: &Verdict) -> String {
        let mut parts = Vec::new();

        if !case.tags.is_empty() {
            let described: Vec<String> = case.tags.iter().map(HeuristicTag::describe).collect();
            parts.push(format!("Heuristic rewrite {}.", described.join("; ")));
        }
        if case.known_broken {
            parts.push(
                "The source pairs this heuristic with a baseline documented as answering \
                 a different question; a mismatch here is expected, not a regression."
                    .to_string(),
            );
        }
        if let Verdict::Failed { variant, .. } = verdict {
            parts.push(format!(
                "The {variant} run failed; no equivalence claim can be made."
            ));
        }

        parts.join(" ")
    }
}
