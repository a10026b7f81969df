//! @ai:module:intent CLI for the operations dashboard
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use opsboard::{
    config::DashboardConfig,
    metrics::{SlaTargets, Summary},
    records::{NewBillingCorrection, NewIssue, PatientVisit, RecordKind},
    report::{billing_rows, issue_rows, summary_rows, ReportGenerator, BILLING_COLUMNS, ISSUE_COLUMNS},
    service::{Dashboard, WriteOutcome},
    store::{InMemoryStore, OfflineJournal, RecordCache, RecordStoreTrait, SheetsClient},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_CONFIG: &str = "opsboard.toml";

#[derive(Parser)]
#[command(name = "opsboard")]
#[command(about = "Operations dashboard for application issues and billing corrections")]
#[command(version)]
struct Cli {
    /// Path to configuration file (opsboard.toml is used when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Work against an in-memory store instead of the spreadsheet backend
    #[arg(long, global = true)]
    dry_run: bool,

    /// JSON file seeding the in-memory store ({"issues": [...], "billing": [...]})
    #[arg(long, global = true, requires = "dry_run")]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show totals, averages and SLA attainment
    Summary,

    /// List the records of one collection
    List {
        #[arg(value_enum)]
        kind: RecordKind,
    },

    /// Report a new application issue
    AddIssue {
        #[arg(long)]
        reporter: String,

        #[arg(long)]
        department: String,

        #[arg(long)]
        title: String,

        #[arg(long, default_value_t)]
        description: String,
    },

    /// Request a billing correction
    AddBilling {
        #[command(subcommand)]
        correction: BillingCommand,
    },

    /// Mark a record as resolved (index as shown by `list`)
    Resolve {
        #[arg(value_enum)]
        kind: RecordKind,

        index: usize,
    },

    /// Write JSON, Markdown and chart reports
    Report {
        /// Output directory (defaults to paths.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replay writes queued while the store was unreachable
    Sync,

    /// Probe the spreadsheet backend
    Check,

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum BillingCommand {
    /// Discount on a bill
    Discount {
        #[command(flatten)]
        visit: VisitArgs,

        #[arg(long)]
        requested_by: String,

        #[arg(long)]
        reason: String,

        #[arg(long)]
        amount: String,

        #[arg(long, default_value_t)]
        percent: String,

        #[arg(long, default_value_t)]
        month: String,
    },

    /// Correct a billed price
    PriceChange {
        #[arg(long, default_value_t)]
        location: String,

        #[arg(long)]
        bill_no: String,

        #[arg(long, default_value_t)]
        patient_id: String,

        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,
    },

    /// Refund part or all of a bill
    Refund {
        #[command(flatten)]
        visit: VisitArgs,

        #[arg(long)]
        requested_by: String,

        #[arg(long)]
        approved_by: String,

        #[arg(long)]
        amount: String,
    },
}

#[derive(Args)]
struct VisitArgs {
    #[arg(long, default_value_t)]
    location: String,

    #[arg(long)]
    bill_no: String,

    #[arg(long, default_value_t)]
    patient_id: String,

    #[arg(long)]
    patient_name: String,

    #[arg(long, default_value_t)]
    patient_ph: String,

    #[arg(long, default_value_t)]
    doctor: String,

    #[arg(long, default_value_t)]
    service: String,

    #[arg(long, default_value_t)]
    bill_date: String,
}

impl From<VisitArgs> for PatientVisit {
    fn from(args: VisitArgs) -> Self {
        Self {
            location: args.location,
            bill_no: args.bill_no,
            patient_id: args.patient_id,
            patient_name: args.patient_name,
            patient_ph: args.patient_ph,
            doctor: args.doctor,
            service: args.service,
            bill_date: args.bill_date,
        }
    }
}

impl From<BillingCommand> for NewBillingCorrection {
    fn from(command: BillingCommand) -> Self {
        match command {
            BillingCommand::Discount {
                visit,
                requested_by,
                reason,
                amount,
                percent,
                month,
            } => NewBillingCorrection::Discount {
                visit: visit.into(),
                requested_by,
                reason,
                amount,
                percent,
                month,
            },
            BillingCommand::PriceChange {
                location,
                bill_no,
                patient_id,
                from,
                to,
            } => NewBillingCorrection::PriceChange {
                location,
                bill_no,
                patient_id,
                change_from: from,
                change_to: to,
            },
            BillingCommand::Refund {
                visit,
                requested_by,
                approved_by,
                amount,
            } => NewBillingCorrection::Refund {
                visit: visit.into(),
                requested_by,
                approved_by,
                amount,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("opsboard=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    if let Commands::Init { output } = &cli.command {
        return init_config(output);
    }

    let config = load_or_default_config(cli.config.as_deref())?;

    if cli.dry_run {
        let store = match &cli.fixture {
            Some(path) => InMemoryStore::from_fixture(path)
                .with_context(|| format!("Failed to load fixture {}", path.display()))?,
            None => InMemoryStore::new(),
        };
        tracing::info!("Dry run: using in-memory store");

        let dashboard = Dashboard::new(Arc::new(store)).with_targets(config.targets);
        run(dashboard, cli.command, &config).await
    } else {
        let store = SheetsClient::new(&config.store)
            .context("Set store.api_url in the config file or SHEETS_API_URL")?;
        tracing::info!("Using sheets store at {}", store.api_url());

        let mut dashboard = Dashboard::new(Arc::new(store)).with_targets(config.targets);
        match config.paths.journal_path() {
            Some(path) => dashboard = dashboard.with_journal(OfflineJournal::new(path)),
            None => tracing::info!("Offline queueing disabled; writes fail while the store is down"),
        }
        run(dashboard, cli.command, &config).await
    }
}

/// @ai:intent Execute one command against a dashboard
/// @ai:effects network, fs:write, io
async fn run<S: RecordStoreTrait>(
    dashboard: Dashboard<S>,
    command: Commands,
    config: &DashboardConfig,
) -> Result<()> {
    let mut cache = RecordCache::new(config.store.cache_max_age());

    match command {
        Commands::Summary => {
            let summary = dashboard.summary(Some(&mut cache)).await;
            print_summary(&summary, dashboard.targets(), dashboard.pending_count());
        }
        Commands::List { kind } => {
            let records = dashboard.records(kind, Some(&mut cache)).await;
            let rows = match kind {
                RecordKind::Issues => issue_rows(&records),
                RecordKind::Billing => {
                    billing_rows(&records, chrono::Local::now().date_naive())
                }
            };
            let columns = match kind {
                RecordKind::Issues => ISSUE_COLUMNS,
                RecordKind::Billing => BILLING_COLUMNS,
            };
            println!("{} ({}):", kind.sheet_name(), rows.len());
            println!();
            print_table(&columns, &rows);
        }
        Commands::AddIssue {
            reporter,
            department,
            title,
            description,
        } => {
            let issue = NewIssue {
                reporter,
                department,
                title,
                description,
            };
            let outcome = dashboard.create_issue(issue, Some(&mut cache)).await?;
            print_outcome("Issue recorded", &outcome);
            let summary = dashboard.summary(Some(&mut cache)).await;
            print_summary(&summary, dashboard.targets(), dashboard.pending_count());
        }
        Commands::AddBilling { correction } => {
            let outcome = dashboard
                .create_billing(correction.into(), Some(&mut cache))
                .await?;
            print_outcome("Billing correction recorded", &outcome);
            let summary = dashboard.summary(Some(&mut cache)).await;
            print_summary(&summary, dashboard.targets(), dashboard.pending_count());
        }
        Commands::Resolve { kind, index } => {
            let outcome = dashboard.resolve(kind, index, Some(&mut cache)).await?;
            print_outcome(&format!("{} #{} resolved", kind.sheet_name(), index), &outcome);
            let summary = dashboard.summary(Some(&mut cache)).await;
            print_summary(&summary, dashboard.targets(), dashboard.pending_count());
        }
        Commands::Report { output } => {
            let window = config.charts.window(chrono::Local::now().date_naive())?;
            let report = dashboard.report(&window, Some(&mut cache)).await;
            let output_dir = output.unwrap_or_else(|| config.paths.output_dir.clone());

            let written = ReportGenerator::new()
                .generate_all(&report, &output_dir)
                .with_context(|| format!("Failed to write reports to {}", output_dir.display()))?;

            print_summary(&report.summary, report.targets, report.pending_writes);
            println!("Reports:");
            for path in written {
                println!("  {}", path.display());
            }
        }
        Commands::Sync => {
            let report = dashboard.reconcile().await?;
            println!(
                "Applied {} queued write(s), {} remaining",
                report.applied, report.remaining
            );
            if let Some(error) = report.last_error {
                println!("Stopped at: {}", error);
            }
        }
        Commands::Check => {
            let report = dashboard.check_setup().await;
            for probe in &report.probes {
                let mark = if probe.ok { "ok" } else { "FAILED" };
                println!("{:<10} {:<7} {}", probe.sheet, mark, probe.detail);
            }
            if !report.success() {
                anyhow::bail!("Store setup check failed");
            }
        }
        Commands::Init { output } => init_config(&output)?,
    }

    Ok(())
}

fn print_outcome(action: &str, outcome: &WriteOutcome) {
    match outcome {
        WriteOutcome::Synced => println!("{}.", action),
        WriteOutcome::Queued { pending } => println!(
            "{} offline: queued locally ({} pending). Run `opsboard sync` once the store is reachable.",
            action, pending
        ),
        WriteOutcome::Unchanged => println!("Nothing to do: record is already resolved."),
    }
    println!();
}

fn print_summary(summary: &Summary, targets: SlaTargets, pending_writes: usize) {
    println!();
    println!("Operations Dashboard");
    println!("====================");
    println!();

    if pending_writes > 0 {
        println!("Warnings:");
        println!("  {} write(s) queued offline, run `opsboard sync`", pending_writes);
        println!();
    }

    println!(
        "{:<25} {:>10} {:>10}",
        "", "Issues", "Billing"
    );
    println!("{}", "-".repeat(47));
    for [label, issues, billing] in summary_rows(summary, targets) {
        println!("{:<25} {:>10} {:>10}", label, issues, billing);
    }
    println!();
}

/// @ai:intent Print rows under a header, each column sized to its widest cell
/// @ai:effects io
fn print_table(columns: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count()).min(40);
        }
    }

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<w$}", c, w = *w))
        .collect();
    println!("{:<4} {}", "#", header.join("  "));
    println!("{}", "-".repeat(5 + widths.iter().sum::<usize>() + 2 * widths.len()));

    for (index, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<w$}", truncate(cell, *w), w = *w))
            .collect();
        println!("{:<4} {}", index, cells.join("  "));
    }
}

fn truncate(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        return cell.to_string();
    }
    let mut out: String = cell.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn init_config(output: &Path) -> Result<()> {
    let config = DashboardConfig::default();
    config.save(output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

fn load_or_default_config(path: Option<&Path>) -> Result<DashboardConfig> {
    match path {
        Some(p) => DashboardConfig::load(p),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG);

            if default_path.exists() {
                DashboardConfig::load(default_path)
            } else {
                Ok(DashboardConfig::default())
            }
        }
    }
}
