//! Fixture cases mirroring the analytics dataset the harness was built
//! around: agents and cultural spaces, keyed by city and capacity.

use pairql::app::ports::ExecutorError;
use pairql::app::test_support::FakeExecutor;
use pairql::domain::{CaseId, HeuristicTag, QueryCase};

pub const FORTALEZA_HEURISTIC: &str =
    "SELECT DISTINCT nome, email FROM agentes WHERE cidade = 'Fortaleza'";
pub const FORTALEZA_BASELINE: &str = "SELECT nome FROM espacos WHERE cidade = 'Fortaleza'";
pub const CAPACITY_HEURISTIC: &str = "SELECT nome FROM espacos WHERE capacidade = 200";
pub const CAPACITY_BASELINE: &str = "SELECT nome FROM espacos WHERE capacidade / 2 = 100";
pub const GROUP_BY_HEURISTIC: &str =
    "SELECT cidade, COUNT(*) FROM espacos GROUP BY cidade";
pub const GROUP_BY_BASELINE: &str =
    "SELECT cidade, COUNT(*), nome FROM espacos GROUP BY cidade";

pub fn sample_cases() -> Vec<QueryCase> {
    vec![
        // The baseline answers a different question entirely; the source
        // material documents it as wrong, so the pair stays inequivalent.
        QueryCase {
            id: CaseId::new("agents-in-fortaleza"),
            question: "Which agents are based in Fortaleza?".to_string(),
            heuristic_sql: FORTALEZA_HEURISTIC.to_string(),
            baseline_sql: FORTALEZA_BASELINE.to_string(),
            tags: vec![HeuristicTag::DistinctProjection],
            known_broken: true,
        },
        QueryCase {
            id: CaseId::new("capacity-200"),
            question: "Which spaces hold exactly 200 people?".to_string(),
            heuristic_sql: CAPACITY_HEURISTIC.to_string(),
            baseline_sql: CAPACITY_BASELINE.to_string(),
            tags: vec![
                HeuristicTag::ConstantFolding,
                HeuristicTag::IndexFriendlyPredicate,
            ],
            known_broken: false,
        },
        QueryCase {
            id: CaseId::new("group-by-count"),
            question: "How many spaces are there per city?".to_string(),
            heuristic_sql: GROUP_BY_HEURISTIC.to_string(),
            baseline_sql: GROUP_BY_BASELINE.to_string(),
            tags: vec![],
            known_broken: false,
        },
    ]
}

/// Executor over a fixture dataset with two spaces: one of capacity 200
/// and one of capacity 150. Only the 200-capacity space satisfies either
/// capacity formulation.
pub fn sample_executor() -> FakeExecutor {
    FakeExecutor::new()
        .with_rows(
            FORTALEZA_HEURISTIC,
            &["nome", "email"],
            &[
                &["Ana Lima", "ana@exemplo.br"],
                &["Bia Rocha", "bia@exemplo.br"],
            ],
        )
        .with_rows(FORTALEZA_BASELINE, &["nome"], &[&["Dragao do Mar"]])
        .with_rows(CAPACITY_HEURISTIC, &["nome"], &[&["Auditorio Central"]])
        .with_rows(CAPACITY_BASELINE, &["nome"], &[&["Auditorio Central"]])
        .with_rows(
            GROUP_BY_HEURISTIC,
            &["cidade", "count"],
            &[&["Fortaleza", "2"], &["Sobral", "1"]],
        )
        .with_error(
            GROUP_BY_BASELINE,
            ExecutorError::QueryFailed(
                "ERROR:  column \"espacos.nome\" must appear in the GROUP BY clause".to_string(),
            ),
        )
}
