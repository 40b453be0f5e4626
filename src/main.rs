// Command-line front end.
//
// Each subcommand loads the CSV exports it is given, runs the matching part of
// the library and prints a markdown preview. `--out` writes the full result.
use anyhow::{bail, Context, Result};
use attendance_kpi::cache::{DrainSummary, JsonFileStore, KpiService, KpiStore, MemoryStore};
use attendance_kpi::config::{KpiConfig, DEFAULT_CONFIG};
use attendance_kpi::dataset::{Dataset, FileKind, UploadedFile};
use attendance_kpi::group::GroupBy;
use attendance_kpi::reports::{KpiRow, ReportKind};
use attendance_kpi::teams::{self, ActivityGroup};
use attendance_kpi::types::{
    LeaveRecord, OdEmployeeRecord, OdFunctionRecord, OnTimeRecord, WorkHourLostRecord,
    WorkHourRecord,
};
use attendance_kpi::{loader, output, util};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::Tabled;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "attendance-kpi",
    version,
    about = "Attendance and Teams activity KPIs from HR exports"
)]
struct Cli {
    /// JSON file overriding company short codes and column names
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    OnTime,
    WorkHour,
    WorkHourLost,
    Leave,
    Od,
}

impl From<KindArg> for ReportKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::OnTime => ReportKind::OnTime,
            KindArg::WorkHour => ReportKind::WorkHour,
            KindArg::WorkHourLost => ReportKind::WorkHourLost,
            KindArg::Leave => ReportKind::Leave,
            KindArg::Od => ReportKind::Od,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run one attendance report
    Report {
        #[arg(value_enum)]
        kind: KindArg,

        /// Attendance CSV export(s)
        #[arg(short, long = "file", required = true)]
        files: Vec<PathBuf>,

        /// function, company or location; function or employee for od
        #[arg(short, long, default_value = "function")]
        group_by: String,

        /// Read precomputed KPIs from this snapshot when it has them
        #[arg(long)]
        store: Option<PathBuf>,

        /// Write the full report as CSV
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Rows shown in the preview
        #[arg(long, default_value = "10")]
        rows: usize,
    },

    /// Summary figures and per-group series for one dimension
    Dashboard {
        #[arg(short, long = "file", required = true)]
        files: Vec<PathBuf>,

        #[arg(short, long, default_value = "function")]
        group_by: String,

        /// Write the dashboard payload as JSON
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Precompute every report into a JSON snapshot
    Precompute {
        #[arg(short, long = "file", required = true)]
        files: Vec<PathBuf>,

        #[arg(long)]
        store: PathBuf,

        /// Clear the snapshot before computing
        #[arg(long)]
        rebuild: bool,
    },

    /// Teams activity per roster function, company, or per user
    Teams {
        #[arg(long = "teams", required = true)]
        teams_files: Vec<PathBuf>,

        #[arg(long = "roster")]
        roster_files: Vec<PathBuf>,

        /// function, company or users
        #[arg(long, default_value = "function")]
        by: String,

        /// Reporting period of the Teams export
        #[arg(long)]
        from_month: Option<String>,

        #[arg(long)]
        to_month: Option<String>,

        /// Write the result as JSON
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Teams app usage, most used first
    Apps {
        #[arg(short, long = "file", required = true)]
        files: Vec<PathBuf>,

        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendance_kpi=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => KpiConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?,
        None => DEFAULT_CONFIG.clone(),
    };

    match cli.command {
        Commands::Report {
            kind,
            files,
            group_by,
            store,
            out,
            rows,
        } => cmd_report(
            config,
            kind.into(),
            &files,
            &group_by,
            store.as_deref(),
            out.as_deref(),
            rows,
        ),
        Commands::Dashboard {
            files,
            group_by,
            out,
        } => cmd_dashboard(config, &files, &group_by, out.as_deref()),
        Commands::Precompute {
            files,
            store,
            rebuild,
        } => cmd_precompute(config, &files, &store, rebuild),
        Commands::Teams {
            teams_files,
            roster_files,
            by,
            from_month,
            to_month,
            out,
        } => cmd_teams(
            &config,
            &teams_files,
            &roster_files,
            &by,
            (from_month.as_deref(), to_month.as_deref()),
            out.as_deref(),
        ),
        Commands::Apps { files, out } => cmd_apps(&config, &files, out.as_deref()),
    }
}

fn load(kind: FileKind, path: &Path) -> Result<UploadedFile> {
    loader::load_file(kind, path).with_context(|| format!("Failed to load '{}'", path.display()))
}

fn load_into<S: KpiStore>(
    svc: &mut KpiService<S>,
    files: &[PathBuf],
    queue: bool,
) -> Result<()> {
    for path in files {
        let file = load(FileKind::Attendance, path)?;
        println!(
            "Loaded {} ({} rows)",
            file.filename,
            util::format_int(file.rows.len() as u64)
        );
        if queue {
            svc.ingest(file)?;
        } else {
            svc.attach(file)?;
        }
    }
    Ok(())
}

fn show<T, S>(
    svc: &KpiService<S>,
    dimension: &str,
    title: &str,
    out: Option<&Path>,
    rows: usize,
) -> Result<()>
where
    T: KpiRow + Tabled + Clone + Serialize,
    S: KpiStore,
{
    let records: Vec<T> = svc.records(dimension)?;
    let note = format!("by {}", dimension);
    output::preview_table(title, Some(note.as_str()), &records, rows);
    if let Some(path) = out {
        output::write_csv(path, &records)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        println!("(Full table exported to {})", path.display());
    }
    Ok(())
}

fn cmd_report(
    config: KpiConfig,
    kind: ReportKind,
    files: &[PathBuf],
    group_by: &str,
    store: Option<&Path>,
    out: Option<&Path>,
    rows: usize,
) -> Result<()> {
    match store {
        Some(path) => {
            let mut svc = KpiService::new(config, JsonFileStore::open(path)?);
            load_into(&mut svc, files, false)?;
            report_with(&svc, kind, group_by, out, rows)
        }
        None => {
            let mut svc = KpiService::new(config, MemoryStore::new());
            load_into(&mut svc, files, false)?;
            report_with(&svc, kind, group_by, out, rows)
        }
    }
}

fn report_with<S: KpiStore>(
    svc: &KpiService<S>,
    kind: ReportKind,
    dim: &str,
    out: Option<&Path>,
    rows: usize,
) -> Result<()> {
    match (kind, dim) {
        (ReportKind::OnTime, _) => show::<OnTimeRecord, S>(svc, dim, "On-Time Attendance", out, rows),
        (ReportKind::WorkHour, _) => {
            show::<WorkHourRecord, S>(svc, dim, "Work Hour Completion", out, rows)
        }
        (ReportKind::WorkHourLost, _) => {
            show::<WorkHourLostRecord, S>(svc, dim, "Work Hour Lost", out, rows)
        }
        (ReportKind::Leave, _) => show::<LeaveRecord, S>(svc, dim, "Leave Analysis", out, rows),
        (ReportKind::Od, "employee") => {
            show::<OdEmployeeRecord, S>(svc, dim, "OD Days by Employee", out, rows)
        }
        (ReportKind::Od, _) => show::<OdFunctionRecord, S>(svc, dim, "OD Days by Function", out, rows),
    }
}

fn cmd_dashboard(config: KpiConfig, files: &[PathBuf], group_by: &str, out: Option<&Path>) -> Result<()> {
    let group_by: GroupBy = group_by.parse()?;
    let mut svc = KpiService::new(config, MemoryStore::new());
    load_into(&mut svc, files, true)?;
    svc.run_pending();
    let dashboard = svc.dashboard(group_by)?;

    let s = &dashboard.summary;
    println!("\nDashboard by {}", group_by);
    println!(
        "Latest month: {}",
        s.latest_month.as_deref().unwrap_or("(none)")
    );
    println!("Members: {}", util::format_int(s.total_members as u64));
    println!("Avg on-time: {}%", util::format_number(s.avg_on_time, 2));
    println!("Avg completion: {}%", util::format_number(s.avg_completion, 2));
    println!("Avg lost: {}%", util::format_number(s.avg_lost, 2));
    println!("Groups: {}  Months: {}", dashboard.groups.len(), dashboard.months.len());

    if let Some(path) = out {
        output::write_json(path, &dashboard)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        println!("(Dashboard exported to {})", path.display());
    }
    Ok(())
}

fn cmd_precompute(config: KpiConfig, files: &[PathBuf], store: &Path, rebuild: bool) -> Result<()> {
    let store = JsonFileStore::open(store)
        .with_context(|| format!("Failed to open store '{}'", store.display()))?;
    let mut svc = KpiService::new(config, store);
    load_into(&mut svc, files, !rebuild)?;

    if rebuild {
        let summary = svc.rebuild_all()?;
        println!(
            "Rebuilt {} of {} files",
            summary.calculated, summary.total_files
        );
        if summary.calculated < summary.total_files {
            bail!("{} file(s) failed to precompute", summary.total_files - summary.calculated);
        }
        return Ok(());
    }

    let DrainSummary {
        attempted,
        succeeded,
        failed,
    } = svc.run_pending();
    println!("Precomputed {} of {} files", succeeded, attempted);
    info!(store = %svc.store().path().display(), "snapshot written");
    if !failed.is_empty() {
        bail!("precompute failed for file ids {:?}", failed);
    }
    Ok(())
}

fn cmd_teams(
    config: &KpiConfig,
    teams_files: &[PathBuf],
    roster_files: &[PathBuf],
    by: &str,
    period: (Option<&str>, Option<&str>),
    out: Option<&Path>,
) -> Result<()> {
    let mut ds = Dataset::new();
    for path in teams_files {
        ds.insert(load(FileKind::Teams, path)?.with_period(period.0, period.1));
    }
    for path in roster_files {
        ds.insert(load(FileKind::Roster, path)?);
    }

    if by == "users" {
        let listing = teams::user_activity_listing(&ds, None, config)?;
        output::preview_table("Teams Activity by User", None, &listing, 20);
        if let Some(path) = out {
            output::write_json(path, &listing)?;
        }
        return Ok(());
    }

    let group: ActivityGroup = by.parse()?;
    if roster_files.is_empty() {
        bail!("--roster is required to group Teams activity by {}", group);
    }
    let rows = teams::activity_by_group(&ds, group, None, None, config)?;
    output::preview_table(
        &format!("Teams Activity by {}", group),
        None,
        &rows,
        rows.len(),
    );
    if let Some(path) = out {
        output::write_json(path, &rows)?;
    }
    Ok(())
}

fn cmd_apps(config: &KpiConfig, files: &[PathBuf], out: Option<&Path>) -> Result<()> {
    let mut ds = Dataset::new();
    for path in files {
        ds.insert(load(FileKind::TeamsApp, path)?);
    }
    let apps = teams::app_usage(&ds, None, config)?;
    output::preview_table("Teams App Usage", None, &apps, 20);
    if let Some(path) = out {
        output::write_json(path, &apps)?;
    }
    Ok(())
}
