pub mod fixtures;

use std::sync::Arc;

use pairql::app::batch::BatchRunner;
use pairql::app::comparator::Comparator;
use pairql::app::registry::QueryRegistry;
use pairql::app::runner::ExecutionRunner;
use pairql::app::test_support::FakeExecutor;

pub const TEST_DSN: &str = "postgres://localhost:5432/mapa_cultural";

pub fn batch_over(executor: FakeExecutor) -> BatchRunner {
    BatchRunner::new(Comparator::new(ExecutionRunner::new(
        Arc::new(executor),
        TEST_DSN,
    )))
}

pub fn registry() -> QueryRegistry {
    QueryRegistry::from_cases(fixtures::sample_cases()).unwrap()
}
