use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use pairql_app::ports::{ExecutorError, QueryExecutor, QueryOutput};

/// Driver-less executor: runs each query through the `psql` client with CSV
/// output. Every invocation is its own process and therefore its own
/// connection; killing the child on timeout cancels the in-flight query
/// server-side when the connection drops.
pub struct PsqlExecutor {
    timeout_secs: u64,
}

impl PsqlExecutor {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    fn classify_failure(stderr: &str) -> ExecutorError {
        let trimmed = stderr.trim();
        let lower = trimmed.to_lowercase();
        if lower.contains("could not connect")
            || lower.contains("connection to server")
            || lower.contains("server closed the connection")
        {
            ExecutorError::ConnectionFailed(trimmed.to_string())
        } else {
            ExecutorError::QueryFailed(trimmed.to_string())
        }
    }

    fn parse_csv(stdout: &str) -> Result<(Vec<String>, Vec<Vec<String>>), ExecutorError> {
        if stdout.trim().is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(stdout.as_bytes());

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| ExecutorError::QueryFailed(format!("CSV parse error: {e}")))?
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record
                .map_err(|e| ExecutorError::QueryFailed(format!("CSV parse error: {e}")))?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        Ok((columns, rows))
    }
}

impl Default for PsqlExecutor {
    fn default() -> Self {
        Self::new(30)
    }
}

#[async_trait]
impl QueryExecutor for PsqlExecutor {
    async fn execute_read(&self, dsn: &str, sql: &str) -> Result<QueryOutput, ExecutorError> {
        let start = Instant::now();

        let mut child = Command::new("psql")
            .arg(dsn)
            .arg("-X") // Ignore .psqlrc to avoid unexpected output
            .arg("-v")
            .arg("ON_ERROR_STOP=1") // Exit with non-zero on SQL errors
            .arg("--csv") // CSV output format (handles quoting/escaping)
            .arg("-c")
            .arg(sql)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true) // Child is killed on timeout/drop
            .spawn()
            .map_err(|e| ExecutorError::CommandNotFound(e.to_string()))?;

        // Read stdout/stderr BEFORE wait() to prevent pipe buffer deadlock
        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        let result = timeout(Duration::from_secs(self.timeout_secs), async {
            let (stdout_result, stderr_result) = tokio::join!(
                async {
                    let mut buf = Vec::new();
                    if let Some(ref mut out) = stdout_handle {
                        out.read_to_end(&mut buf).await?;
                    }
                    Ok::<_, std::io::Error>(String::from_utf8_lossy(&buf).into_owned())
                },
                async {
                    let mut buf = Vec::new();
                    if let Some(ref mut err) = stderr_handle {
                        err.read_to_end(&mut buf).await?;
                    }
                    Ok::<_, std::io::Error>(String::from_utf8_lossy(&buf).into_owned())
                }
            );

            let stdout = stdout_result?;
            let stderr = stderr_result?;
            let status = child.wait().await?;

            Ok::<_, std::io::Error>((status, stdout, stderr))
        })
        .await
        .map_err(|_| ExecutorError::Timeout(self.timeout_secs))?
        .map_err(|e| ExecutorError::QueryFailed(e.to_string()))?;

        // Elapsed covers the whole psql run; with a per-invocation client
        // there is no connection to reuse, so setup is part of the cost.
        let elapsed_ms = start.elapsed().as_millis() as u64;
        let (status, stdout, stderr) = result;

        if !status.success() {
            return Err(Self::classify_failure(&stderr));
        }

        let (columns, rows) = Self::parse_csv(&stdout)?;
        debug!(rows = rows.len(), elapsed_ms, "psql returned");

        Ok(QueryOutput {
            columns,
            rows,
            elapsed_ms,
        })
    }
}
