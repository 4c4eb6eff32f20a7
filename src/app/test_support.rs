//! Canned query executor for tests.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::ports::{ExecutorError, QueryExecutor, QueryOutput};

#[derive(Clone)]
struct Canned {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    delay: Duration,
    error: Option<ExecutorError>,
}

/// In-memory QueryExecutor with canned results keyed by exact SQL text.
/// Supports injected errors and injected delays; elapsed time is measured
/// around the (possibly delayed) lookup, so timing assertions hold.
#[derive(Default)]
pub struct FakeExecutor {
    canned: HashMap<String, Canned>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, sql: &str, columns: &[&str], rows: &[&[&str]]) -> Self {
        self.with_delayed_rows(sql, columns, rows, Duration::ZERO)
    }

    pub fn with_delayed_rows(
        mut self,
        sql: &str,
        columns: &[&str],
        rows: &[&[&str]],
        delay: Duration,
    ) -> Self {
        self.canned.insert(
            sql.to_string(),
            Canned {
                columns: columns.iter().map(|s| (*s).to_string()).collect(),
                rows: rows
                    .iter()
                    .map(|row| row.iter().map(|s| (*s).to_string()).collect())
                    .collect(),
                delay,
                error: None,
            },
        );
        self
    }

    pub fn with_error(mut self, sql: &str, error: ExecutorError) -> Self {
        self.canned.insert(
            sql.to_string(),
            Canned {
                columns: Vec::new(),
                rows: Vec::new(),
                delay: Duration::ZERO,
                error: Some(error),
            },
        );
        self
    }
}

#[async_trait]
impl QueryExecutor for FakeExecutor {
    async fn execute_read(&self, _dsn: &str, sql: &str) -> Result<QueryOutput, ExecutorError> {
        let start = Instant::now();
        let canned = self
            .canned
            .get(sql)
            .cloned()
            .ok_or_else(|| ExecutorError::QueryFailed(format!("no canned result for: {sql}")))?;

        if !canned.delay.is_zero() {
            tokio::time::sleep(canned.delay).await;
        }
        if let Some(error) = canned.error {
            return Err(error);
        }

        Ok(QueryOutput {
            columns: canned.columns,
            rows: canned.rows,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }
}
