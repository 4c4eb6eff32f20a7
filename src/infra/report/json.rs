use pairql_domain::ComparisonReport;

/// Machine-readable rendering of comparison reports.
pub struct JsonReporter;

impl JsonReporter {
    pub fn render(reports: &[ComparisonReport]) -> serde_json::Result<String> {
        serde_json::to_string_pretty(reports)
    }
}
