use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("command not found: {0}")]
    CommandNotFound(String),
    #[error("query timed out after {0}s")]
    Timeout(u64),
}

/// Tabular output of one read query, with elapsed time measured by the
/// executor around the execution itself.
#[derive(Debug, Clone)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub elapsed_ms: u64,
}

/// Data-source handle: anything that can run a parameterless read query
/// against a DSN and return tabular results.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute_read(&self, dsn: &str, sql: &str) -> Result<QueryOutput, ExecutorError>;
}
