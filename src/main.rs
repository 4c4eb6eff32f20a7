use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, eyre};
use tracing::info;

use pairql::app::batch::BatchRunner;
use pairql::app::comparator::Comparator;
use pairql::app::ports::CaseStore;
use pairql::app::registry::QueryRegistry;
use pairql::app::runner::ExecutionRunner;
use pairql::domain::CaseId;
use pairql::error;
use pairql::infra::adapters::{PsqlExecutor, TomlCaseStore};
use pairql::infra::report::{JsonReporter, MarkdownReporter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute every case (or one) and render a comparison report
    Run {
        /// Path to the TOML case file
        #[arg(long, default_value = "cases.toml")]
        cases: PathBuf,
        /// PostgreSQL DSN; falls back to DATABASE_URL
        #[arg(long)]
        dsn: Option<String>,
        /// Run a single case by id
        #[arg(long)]
        case: Option<String>,
        /// Write the report to this path instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Report output format
        #[arg(long, value_enum, default_value = "markdown")]
        format: ReportFormat,
        /// Per-query timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
        /// Run the two variants of each case concurrently
        #[arg(long)]
        concurrent: bool,
    },
    /// List case ids and questions
    List {
        #[arg(long, default_value = "cases.toml")]
        cases: PathBuf,
    },
    /// Show both formulations of one case
    Show {
        #[arg(long, default_value = "cases.toml")]
        cases: PathBuf,
        id: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ReportFormat {
    Markdown,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    error::install_hooks()?;
    init_tracing();

    match Cli::parse().command {
        Command::Run {
            cases,
            dsn,
            case,
            out,
            format,
            timeout_secs,
            concurrent,
        } => run(&cases, dsn, case, out, format, timeout_secs, concurrent).await,
        Command::List { cases } => list(&cases),
        Command::Show { cases, id } => show(&cases, &id),
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_registry(path: &Path) -> Result<QueryRegistry> {
    let cases = TomlCaseStore::new(path).load()?;
    Ok(QueryRegistry::from_cases(cases)?)
}

async fn run(
    cases: &Path,
    dsn: Option<String>,
    case: Option<String>,
    out: Option<PathBuf>,
    format: ReportFormat,
    timeout_secs: u64,
    concurrent: bool,
) -> Result<()> {
    let dsn = dsn
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .ok_or_else(|| eyre!("no DSN given: pass --dsn or set DATABASE_URL"))?;

    let registry = load_registry(cases)?;
    let runner = ExecutionRunner::new(Arc::new(PsqlExecutor::new(timeout_secs)), dsn);
    let batch = BatchRunner::new(Comparator::new(runner).with_concurrent(concurrent));

    let reports = match case {
        Some(id) => vec![batch.run_case(&registry, &CaseId::new(id)).await?],
        None => batch.run_all(&registry).await?,
    };

    let doc = match format {
        ReportFormat::Markdown => MarkdownReporter::render(&reports),
        ReportFormat::Json => JsonReporter::render(&reports)?,
    };

    match out {
        Some(path) => {
            fs::write(&path, &doc)?;
            info!(path = %path.display(), "report written");
        }
        None => {
            std::io::stdout().lock().write_all(doc.as_bytes())?;
        }
    }
    Ok(())
}

fn list(cases: &Path) -> Result<()> {
    let registry = load_registry(cases)?;
    let mut stdout = std::io::stdout().lock();
    for case in registry.iter() {
        writeln!(stdout, "{}\t{}", case.id, case.question)?;
    }
    Ok(())
}

fn show(cases: &Path, id: &str) -> Result<()> {
    let registry = load_registry(cases)?;
    let case = registry.get(&CaseId::new(id))?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{} — {}\n", case.id, case.question)?;
    writeln!(stdout, "heuristic:\n{}\n", case.heuristic_sql.trim())?;
    writeln!(stdout, "baseline:\n{}", case.baseline_sql.trim())?;
    Ok(())
}
