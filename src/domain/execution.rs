use serde::{Deserialize, Serialize};

use crate::case::{CaseId, Variant};

/// Result of executing one formulation of a case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub case_id: CaseId,
    pub variant: Variant,
    /// The SQL text that was executed
    pub query: String,
    /// Column names from the result set
    pub columns: Vec<String>,
    /// Row data as strings (each inner Vec is one row)
    pub rows: Vec<Vec<String>>,
    pub row_count: usize,
    /// Execution time in milliseconds
    pub elapsed_ms: u64,
    /// Error message if the run failed
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn success(
        case_id: CaseId,
        variant: Variant,
        query: String,
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
        elapsed_ms: u64,
    ) -> Self {
        let row_count = rows.len();
        Self {
            case_id,
            variant,
            query,
            columns,
            rows,
            row_count,
            elapsed_ms,
            error: None,
        }
    }

    pub fn failure(
        case_id: CaseId,
        variant: Variant,
        query: String,
        error: String,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            case_id,
            variant,
            query,
            columns: Vec::new(),
            rows: Vec::new(),
            row_count: 0,
            elapsed_ms,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn row_count_display(&self) -> String {
        if self.row_count == 1 {
            "1 row".to_string()
        } else {
            format!("{} rows", self.row_count)
        }
    }
}
