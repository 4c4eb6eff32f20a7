use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use pairql_app::ports::{CaseStore, CaseStoreError};
use pairql_domain::{CaseId, HeuristicTag, QueryCase};

pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct CaseFile {
    version: u32,
    #[serde(default, rename = "case")]
    cases: Vec<CaseEntry>,
}

#[derive(Debug, Deserialize)]
struct CaseEntry {
    id: String,
    question: String,
    heuristic: String,
    baseline: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    known_broken: bool,
}

impl CaseEntry {
    fn into_case(self) -> QueryCase {
        QueryCase {
            id: CaseId::new(self.id),
            question: self.question,
            heuristic_sql: self.heuristic,
            baseline_sql: self.baseline,
            tags: self.tags.iter().map(|t| HeuristicTag::parse(t)).collect(),
            known_broken: self.known_broken,
        }
    }
}

/// Loads query cases from a versioned TOML file with `[[case]]` entries.
pub struct TomlCaseStore {
    path: PathBuf,
}

impl TomlCaseStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CaseStore for TomlCaseStore {
    fn load(&self) -> Result<Vec<QueryCase>, CaseStoreError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            CaseStoreError::ReadError(format!("{}: {}", self.path.display(), e))
        })?;

        let file: CaseFile =
            toml::from_str(&content).map_err(|e| CaseStoreError::InvalidFormat(e.to_string()))?;

        if file.version != CURRENT_VERSION {
            return Err(CaseStoreError::VersionMismatch {
                found: file.version,
                expected: CURRENT_VERSION,
            });
        }

        let mut seen = HashSet::new();
        for entry in &file.cases {
            if !seen.insert(entry.id.clone()) {
                return Err(CaseStoreError::DuplicateId(entry.id.clone()));
            }
        }

        Ok(file.cases.into_iter().map(CaseEntry::into_case).collect())
    }
}
