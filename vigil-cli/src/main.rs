//! Vigil CLI
//!
//! OSINT analyst console: an interactive terminal dashboard plus headless
//! commands over the same session.

mod tui;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use vigil_modules::{Completion, ModuleId, ReportType, ReportsModule, SearchKind, SourceFilter};
use vigil_runtime::{Console, ConsoleConfig, DEFAULT_CONFIG_FILE};

#[derive(Parser)]
#[command(name = "vigil")]
#[command(author, version, about = "Vigil: OSINT analyst console", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1", global = true)]
    verbose: u8,

    /// Configuration file (default: ./vigil.toml when present)
    #[arg(long, env = "VIGIL_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Directory receiving JSON exports
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,

    /// Write logs to a file (the dashboard discards logs otherwise)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive console (default)
    Dashboard,

    /// Run a search against the simulated source
    Search {
        /// The search query
        #[arg(short, long)]
        query: String,

        /// Source category: all, social, web, databases, news, forums
        #[arg(long, default_value = "all")]
        source: SourceFilter,

        /// Entity kind: person, organization, event, location
        #[arg(long, default_value = "person")]
        kind: SearchKind,

        /// Write all results to the export directory
        #[arg(long)]
        export: bool,
    },

    /// List the session targets
    Targets,

    /// List the report catalogue
    Reports {
        /// Only reports of this type
        #[arg(long = "type")]
        report_type: Option<ReportType>,

        /// Match against titles and target names
        #[arg(short, long, default_value = "")]
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Dashboard));

    init_logging(cli.verbose, cli.log_file.as_deref(), interactive)?;

    let config_path = cli.config.clone().or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.exists().then_some(default)
    });
    let mut config = ConsoleConfig::load_or_default(config_path.as_deref())?;
    if let Some(dir) = cli.export_dir {
        config = config.with_export_dir(dir);
    }
    debug!("Config: {:?}", config);

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => {
            tui::run_tui(Console::new(&config)).await?;
        }
        Commands::Search {
            query,
            source,
            kind,
            export,
        } => {
            run_search(&config, query, source, kind, export).await?;
        }
        Commands::Targets => {
            list_targets(&config);
        }
        Commands::Reports { report_type, query } => {
            list_reports(report_type, query);
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let log_level = match verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact();

    // the dashboard owns the terminal, so logs never go to stdout/stderr there
    match log_file {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .init(),
        None if interactive => builder.with_writer(std::io::sink).init(),
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

async fn run_search(
    config: &ConsoleConfig,
    query: String,
    source: SourceFilter,
    kind: SearchKind,
    export: bool,
) -> Result<()> {
    let mut console = Console::new(config);
    console.navigate(ModuleId::Search);
    console.search.query = query;
    console.search.source = source;
    console.search.kind = kind;

    let seq = console.start_search()?;
    println!(
        "🔍 Search #{}: '{}' ({}, {})\n",
        seq,
        console.search.query.trim(),
        source.label(),
        kind.as_str()
    );

    match console.next_completion().await {
        Some(Completion::Applied(_)) => {}
        Some(Completion::Failed(e)) => return Err(e.into()),
        Some(Completion::Stale) | None => bail!("search did not complete"),
    }

    let results = console.search.results();
    if results.is_empty() {
        println!("No results for this source filter.");
        return Ok(());
    }

    println!(
        "{:<4} {:<24} {:<14} {:<16} {:<10} {:>5}",
        "ID", "NAME", "TYPE", "SOURCE", "RELIAB.", "CONF."
    );
    for r in results {
        println!(
            "{:<4} {:<24} {:<14} {:<16} {:<10} {:>4}%",
            r.id,
            r.name,
            r.kind,
            r.source.label(),
            r.reliability.label(),
            r.confidence
        );
    }

    if export {
        let path = console.search.export_all(console.exporter())?;
        println!("\n💾 Exported {} results to {}", results.len(), path.display());
    }

    Ok(())
}

fn list_targets(config: &ConsoleConfig) {
    let console = Console::new(config);
    let store = console.store();

    println!(
        "{:<8} {:<24} {:<22} {:<10} {}",
        "ID", "NAME", "STATUS", "RISK", "UPDATED"
    );
    for t in store.targets() {
        println!(
            "{:<8} {:<24} {:<22} {:<10} {}",
            t.id.to_string(),
            t.name,
            t.status.label(),
            t.risk.label(),
            t.last_update
        );
    }

    let stats = store.stats();
    println!(
        "\n{} targets ({} critical, {} high) | {} active alerts",
        stats.targets, stats.critical_targets, stats.high_risk_targets, stats.alerts
    );
}

fn list_reports(report_type: Option<ReportType>, query: String) {
    let mut reports = ReportsModule::new();
    reports.type_filter = report_type;
    reports.query = query;

    let filtered = reports.filtered();
    if filtered.is_empty() {
        println!("No reports match.");
        return;
    }

    for r in &filtered {
        println!("📄 {} {} [{}]", r.id, r.title, r.kind.label());
        println!(
            "   {} | {} | {} | {} pages | priority {}",
            r.date, r.author, r.status, r.pages, r.priority
        );
        println!("   Targets: {}", r.targets.join(", "));
        println!("   {}\n", r.summary);
    }

    let stats = reports.stats();
    println!(
        "{} of {} reports | {} in progress | {} completed | {} pages on average",
        filtered.len(),
        stats.total,
        stats.in_progress,
        stats.completed,
        stats.avg_pages
    );
}
