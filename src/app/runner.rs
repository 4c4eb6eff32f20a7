use std::sync::Arc;

use tracing::{debug, warn};

use pairql_domain::{ExecutionResult, QueryCase, Variant};

use crate::ports::{ExecutorError, QueryExecutor};
use crate::sql;

/// Executes one formulation of a case against the data source.
///
/// Engine failures and timeouts are folded into the ExecutionResult so the
/// batch can keep going; only a missing client binary propagates as an
/// error, since no case can run without it.
pub struct ExecutionRunner {
    executor: Arc<dyn QueryExecutor>,
    dsn: String,
}

impl ExecutionRunner {
    pub fn new(executor: Arc<dyn QueryExecutor>, dsn: impl Into<String>) -> Self {
        Self {
            executor,
            dsn: dsn.into(),
        }
    }

    pub async fn run(
        &self,
        case: &QueryCase,
        variant: Variant,
    ) -> Result<ExecutionResult, ExecutorError> {
        let query = case.sql_for(variant);

        if !sql::is_read_only(query) {
            return Ok(ExecutionResult::failure(
                case.id.clone(),
                variant,
                query.to_string(),
                "rejected: only single read-only queries are executed".to_string(),
                0,
            ));
        }

        debug!(case = %case.id, variant = %variant, "executing");
        match self.execute_with_retry(query).await {
            Ok(output) => Ok(ExecutionResult::success(
                case.id.clone(),
                variant,
                query.to_string(),
                output.columns,
                output.rows,
                output.elapsed_ms,
            )),
            Err(err @ ExecutorError::CommandNotFound(_)) => Err(err),
            Err(ExecutorError::Timeout(secs)) => Ok(ExecutionResult::failure(
                case.id.clone(),
                variant,
                query.to_string(),
                format!("query timed out after {secs}s"),
                secs * 1000,
            )),
            Err(err) => Ok(ExecutionResult::failure(
                case.id.clone(),
                variant,
                query.to_string(),
                err.to_string(),
                0,
            )),
        }
    }

    /// One bounded retry, on connection failures only. Query errors are
    /// logic problems and retrying them would just repeat the answer.
    async fn execute_with_retry(
        &self,
        query: &str,
    ) -> Result<crate::ports::QueryOutput, ExecutorError> {
        match self.executor.execute_read(&self.dsn, query).await {
            Err(ExecutorError::ConnectionFailed(msg)) => {
                warn!(error = %msg, "connection failed, retrying once");
                self.executor.execute_read(&self.dsn, query).await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::ports::QueryOutput;
    use pairql_domain::CaseId;

    fn case(heuristic_sql: &str) -> QueryCase {
        QueryCase {
            id: CaseId::new("c1"),
            question: "q".to_string(),
            heuristic_sql: heuristic_sql.to_string(),
            baseline_sql: "SELECT 1".to_string(),
            tags: vec![],
            known_broken: false,
        }
    }

    /// Scripted executor: pops one response per call, records call count.
    struct ScriptedExecutor {
        responses: Mutex<Vec<Result<QueryOutput, ExecutorError>>>,
        calls: Mutex<usize>,
    }

    impl ScriptedExecutor {
        fn new(mut responses: Vec<Result<QueryOutput, ExecutorError>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl QueryExecutor for ScriptedExecutor {
        async fn execute_read(
            &self,
            _dsn: &str,
            _sql: &str,
        ) -> Result<QueryOutput, ExecutorError> {
            *self.calls.lock().unwrap() += 1;
            self.responses
                .lock()
                .unwrap()
                .pop()
                .expect("no scripted response left")
        }
    }

    fn output(rows: Vec<Vec<String>>) -> QueryOutput {
        QueryOutput {
            columns: vec!["col".to_string()],
            rows,
            elapsed_ms: 7,
        }
    }

    #[tokio::test]
    async fn successful_run_carries_rows_and_timing() {
        let executor = Arc::new(ScriptedExecutor::new(vec![Ok(output(vec![vec![
            "1".to_string(),
        ]]))]));
        let runner = ExecutionRunner::new(executor.clone(), "postgres://localhost/test");

        let result = runner.run(&case("SELECT 1"), Variant::Heuristic).await.unwrap();

        assert!(!result.is_error());
        assert_eq!(result.row_count, 1);
        assert_eq!(result.elapsed_ms, 7);
        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test]
    async fn non_read_query_is_rejected_without_touching_the_executor() {
        let executor = Arc::new(ScriptedExecutor::new(vec![]));
        let runner = ExecutionRunner::new(executor.clone(), "dsn");

        let result = runner
            .run(&case("DELETE FROM agentes"), Variant::Heuristic)
            .await
            .unwrap();

        assert!(result.is_error());
        assert!(result.error.as_deref().unwrap().starts_with("rejected"));
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn query_error_is_folded_into_the_result() {
        let executor = Arc::new(ScriptedExecutor::new(vec![Err(
            ExecutorError::QueryFailed("syntax error at or near \"GROUP\"".to_string()),
        )]));
        let runner = ExecutionRunner::new(executor, "dsn");

        let result = runner.run(&case("SELECT 1"), Variant::Baseline).await.unwrap();

        assert!(result.is_error());
        assert!(result.error.as_deref().unwrap().contains("syntax error"));
    }

    #[tokio::test]
    async fn timeout_is_recorded_with_its_bound() {
        let executor = Arc::new(ScriptedExecutor::new(vec![Err(ExecutorError::Timeout(5))]));
        let runner = ExecutionRunner::new(executor, "dsn");

        let result = runner.run(&case("SELECT 1"), Variant::Heuristic).await.unwrap();

        assert!(result.is_error());
        assert_eq!(result.elapsed_ms, 5000);
    }

    #[tokio::test]
    async fn connection_failure_retries_once_then_succeeds() {
        let executor = Arc::new(ScriptedExecutor::new(vec![
            Err(ExecutorError::ConnectionFailed("refused".to_string())),
            Ok(output(vec![])),
        ]));
        let runner = ExecutionRunner::new(executor.clone(), "dsn");

        let result = runner.run(&case("SELECT 1"), Variant::Heuristic).await.unwrap();

        assert!(!result.is_error());
        assert_eq!(executor.calls(), 2);
    }

    #[tokio::test]
    async fn connection_failure_twice_is_folded_into_the_result() {
        let executor = Arc::new(ScriptedExecutor::new(vec![
            Err(ExecutorError::ConnectionFailed("refused".to_string())),
            Err(ExecutorError::ConnectionFailed("refused".to_string())),
        ]));
        let runner = ExecutionRunner::new(executor.clone(), "dsn");

        let result = runner.run(&case("SELECT 1"), Variant::Heuristic).await.unwrap();

        assert!(result.is_error());
        assert_eq!(executor.calls(), 2);
    }

    #[tokio::test]
    async fn missing_client_binary_aborts() {
        let executor = Arc::new(ScriptedExecutor::new(vec![Err(
            ExecutorError::CommandNotFound("psql".to_string()),
        )]));
        let runner = ExecutionRunner::new(executor, "dsn");

        let result = runner.run(&case("SELECT 1"), Variant::Heuristic).await;

        assert!(matches!(result, Err(ExecutorError::CommandNotFound(_))));
    }
}
