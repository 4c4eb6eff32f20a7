use thiserror::Error;
use tracing::{info, warn};

use pairql_domain::{CaseId, ComparisonReport, Verdict};

use crate::comparator::Comparator;
use crate::ports::ExecutorError;
use crate::registry::{QueryRegistry, RegistryError};

#[derive(Debug, Clone, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

/// Drives the comparator over a registry. A case that fails to run is
/// recorded in its report and never stops the batch; only an unusable
/// environment (missing client binary) aborts.
pub struct BatchRunner {
    comparator: Comparator,
}

impl BatchRunner {
    pub fn new(comparator: Comparator) -> Self {
        Self { comparator }
    }

    pub async fn run_all(
        &self,
        registry: &QueryRegistry,
    ) -> Result<Vec<ComparisonReport>, HarnessError> {
        let mut reports = Vec::with_capacity(registry.len());
        for case in registry.iter() {
            info!(case = %case.id, "comparing");
            let report = self.comparator.compare(case).await?;
            Self::log_outcome(&report);
            reports.push(report);
        }
        Ok(reports)
    }

    pub async fn run_case(
        &self,
        registry: &QueryRegistry,
        id: &CaseId,
    ) -> Result<ComparisonReport, HarnessError> {
        let case = registry.get(id)?;
        info!(case = %case.id, "comparing");
        let report = self.comparator.compare(case).await?;
        Self::log_outcome(&report);
        Ok(report)
    }

    fn log_outcome(report: &ComparisonReport) {
        match &report.verdict {
            Verdict::Equivalent => {
                info!(case = %report.case_id, delta_ms = ?report.delta_ms(), "equivalent");
            }
            Verdict::Mismatch(diff) => {
                warn!(case = %report.case_id, diff = %diff.summary(), "result sets differ");
            }
            Verdict::Failed { variant, error } => {
                warn!(case = %report.case_id, variant = %variant, error = %error, "run failed");
            }
        }
    }
}
