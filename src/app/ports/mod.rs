pub mod case_store;
pub mod query_executor;

pub use case_store::{CaseStore, CaseStoreError};
pub use query_executor::{ExecutorError, QueryExecutor, QueryOutput};
