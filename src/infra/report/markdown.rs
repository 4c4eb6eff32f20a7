use pairql_domain::{ComparisonReport, RunSummary, Verdict};

/// Renders comparison reports as a markdown document. Pure formatting;
/// reports are rendered in the order given.
pub struct MarkdownReporter;

impl MarkdownReporter {
    pub fn render(reports: &[ComparisonReport]) -> String {
        let mut doc = String::new();
        doc.push_str("# Query pair comparison\n\n");

        if reports.is_empty() {
            doc.push_str("No cases were run.\n");
            return doc;
        }

        doc.push_str("| case | heuristic | baseline | delta | verdict |\n");
        doc.push_str("|---|---|---|---|---|\n");
        for report in reports {
            doc.push_str(&format!(
                "| `{}` | {} | {} | {} | {} |\n",
                report.case_id,
                Self::format_timing(&report.heuristic),
                Self::format_timing(&report.baseline),
                Self::format_delta(report),
                report.verdict.label(),
            ));
        }

        for report in reports {
            doc.push('\n');
            Self::render_case(&mut doc, report);
        }
        doc
    }

    fn render_case(doc: &mut String, report: &ComparisonReport) {
        doc.push_str(&format!("## {} — {}\n\n", report.case_id, report.question));

        if !report.narrative.is_empty() {
            doc.push_str(&report.narrative);
            doc.push_str("\n\n");
        }

        Self::render_run(doc, "Heuristic", &report.heuristic_sql, &report.heuristic);
        Self::render_run(doc, "Baseline", &report.baseline_sql, &report.baseline);

        match &report.verdict {
            Verdict::Equivalent => {
                doc.push_str("Verdict: equivalent\n");
            }
            Verdict::Mismatch(diff) => {
                doc.push_str(&format!("Verdict: mismatch — {}\n", diff.summary()));
                Self::render_sample(doc, "heuristic", &diff.only_in_heuristic);
                Self::render_sample(doc, "baseline", &diff.only_in_baseline);
            }
            Verdict::Failed { variant, error } => {
                doc.push_str(&format!("Verdict: failed — {variant} run failed: {error}\n"));
            }
        }
    }

    fn render_run(doc: &mut String, label: &str, sql: &str, run: &RunSummary) {
        doc.push_str(&format!(
            "**{}** — {}\n\n```sql\n{}\n```\n\n",
            label,
            Self::format_run(run),
            sql.trim(),
        ));
    }

    fn render_sample(doc: &mut String, side: &str, rows: &[Vec<String>]) {
        if rows.is_empty() {
            return;
        }
        doc.push_str(&format!("\nRows only in {side}:\n\n"));
        for row in rows {
            doc.push_str(&format!("- `{}`\n", row.join(", ")));
        }
    }

    fn format_run(run: &RunSummary) -> String {
        match &run.error {
            Some(error) => format!("failed: {error}"),
            None => {
                let rows = if run.row_count == 1 { "row" } else { "rows" };
                format!("{} ms, {} {}", run.elapsed_ms, run.row_count, rows)
            }
        }
    }

    fn format_timing(run: &RunSummary) -> String {
        if run.error.is_some() {
            "—".to_string()
        } else {
            format!("{} ms", run.elapsed_ms)
        }
    }

    fn format_delta(report: &ComparisonReport) -> String {
        match report.delta_ms() {
            Some(d) if d > 0 => format!("+{d} ms"),
            Some(d) => format!("{d} ms"),
            None => "—".to_string(),
        }
    }
}
