use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a query case, taken from the case file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(String);

impl CaseId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which formulation of a case was executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Heuristic,
    Baseline,
}

impl Variant {
    pub fn label(self) -> &'static str {
        match self {
            Self::Heuristic => "heuristic",
            Self::Baseline => "baseline",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rewrite intent attached to a case's heuristic formulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicTag {
    DistinctProjection,
    ExistsOverIn,
    ConstantFolding,
    JoinOverSubquery,
    IndexFriendlyPredicate,
    Other(String),
}

impl HeuristicTag {
    /// Parse a free-form tag string from the case file.
    pub fn parse(s: &str) -> Self {
        match s {
            "distinct_projection" => Self::DistinctProjection,
            "exists_over_in" => Self::ExistsOverIn,
            "constant_folding" => Self::ConstantFolding,
            "join_over_subquery" => Self::JoinOverSubquery,
            "index_friendly_predicate" => Self::IndexFriendlyPredicate,
            other => Self::Other(other.to_string()),
        }
    }

    /// One-line description used in report narratives.
    pub fn describe(&self) -> String {
        match self {
            Self::DistinctProjection => {
                "projects only the needed columns and deduplicates with DISTINCT".to_string()
            }
            Self::ExistsOverIn => {
                "replaces an IN subquery with a correlated EXISTS".to_string()
            }
            Self::ConstantFolding => {
                "compares the column against a precomputed constant instead of \
                 applying arithmetic to the column"
                    .to_string()
            }
            Self::JoinOverSubquery => {
                "replaces a nested subquery with an explicit join".to_string()
            }
            Self::IndexFriendlyPredicate => {
                "keeps the predicate sargable so an index can be used".to_string()
            }
            Self::Other(s) => s.clone(),
        }
    }
}

/// A paired query definition: one question, two SQL formulations.
///
/// Immutable once loaded. `known_broken` marks pairs whose baseline is
/// documented as answering a different question; the comparator still runs
/// them and the mismatch is expected output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryCase {
    pub id: CaseId,
    /// Natural-language question both formulations are meant to answer
    pub question: String,
    pub heuristic_sql: String,
    pub baseline_sql: String,
    pub tags: Vec<HeuristicTag>,
    #[serde(default)]
    pub known_broken: bool,
}

impl QueryCase {
    pub fn sql_for(&self, variant: Variant) -> &str {
        match variant {
            Variant::Heuristic => &self.heuristic_sql,
            Variant::Baseline => &self.baseline_sql,
        }
    }
}
