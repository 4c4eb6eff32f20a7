use thiserror::Error;

use pairql_domain::QueryCase;

#[derive(Debug, Clone, Error)]
pub enum CaseStoreError {
    #[error("case file version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
    #[error("read error: {0}")]
    ReadError(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("duplicate case id: {0}")]
    DuplicateId(String),
}

pub trait CaseStore: Send + Sync {
    fn load(&self) -> Result<Vec<QueryCase>, CaseStoreError>;
}
