//! Command-line front end: argument model and command dispatch.

use std::{path::PathBuf, sync::Arc};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use tally_config::{Config, ConfigManager};
use tally_core::{
    storage::{ledger_warnings, snapshot_query, LedgerStorage},
    CoreError, MetricRequest, MetricSelector, SummaryService, SystemClock,
};
use tally_domain::{Budget, DateRange, LedgerSnapshot};
use tally_storage_json::JsonLedgerStorage;

use crate::{
    output::{to_json, BudgetRow, Formatter},
    AppError, LONG_VERSION,
};

#[derive(Debug, Parser)]
#[command(
    name = "tally",
    version,
    long_version = LONG_VERSION,
    about = "Balance, monthly medians and year-end projection for ledger budgets"
)]
pub struct Cli {
    /// Base directory holding `config/config.json`
    #[arg(long, global = true, env = "TALLY_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute selected metrics for a budget
    Metrics(MetricsArgs),
    /// Show the year-end projection and its inputs
    #[command(alias = "projection")]
    Project(ProjectArgs),
    /// Summarize a budget's transactions by category
    Summary(SummaryArgs),
    /// List the budgets stored in a ledger
    Budgets(BudgetsArgs),
    /// List ledgers in the configured ledger root
    Ledgers,
}

#[derive(Debug, Args)]
pub struct LedgerTarget {
    /// Ledger name (inside the ledger root) or path to a snapshot file
    #[arg(short, long)]
    pub ledger: String,
}

#[derive(Debug, Args)]
pub struct BudgetTarget {
    #[command(flatten)]
    pub ledger: LedgerTarget,

    /// Budget id or name
    #[arg(short, long)]
    pub budget: String,
}

#[derive(Debug, Args)]
pub struct MetricsArgs {
    #[command(flatten)]
    pub target: BudgetTarget,

    /// Metric to compute; repeat or comma separate. Defaults to all
    #[arg(short, long = "metric")]
    pub metrics: Vec<String>,

    /// Reference date for the projection (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub target: BudgetTarget,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub target: BudgetTarget,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct BudgetsArgs {
    #[command(flatten)]
    pub ledger: LedgerTarget,

    /// Only list active budgets
    #[arg(long)]
    pub active: bool,
}

/// Loads the configuration selected by `--config-dir`, or the platform default.
pub fn load_config(cli: &Cli) -> Result<Config, AppError> {
    let manager = match &cli.config_dir {
        Some(dir) => ConfigManager::with_base_dir(dir.clone())?,
        None => ConfigManager::from_default_location()?,
    };
    Ok(manager.load()?)
}

/// Executes the parsed command and returns the text to print on stdout.
pub async fn run(cli: Cli, config: Config) -> Result<String, AppError> {
    let storage = JsonLedgerStorage::new(config.resolve_ledger_root())?;
    let formatter = Formatter::new(config.color_output && !cli.no_color, config.currency.clone());

    match cli.command {
        Command::Metrics(args) => run_metrics(&storage, &config, &formatter, args).await,
        Command::Project(args) => run_project(&storage, &formatter, args).await,
        Command::Summary(args) => run_summary(&storage, &formatter, args).await,
        Command::Budgets(args) => run_budgets(&storage, &formatter, args).await,
        Command::Ledgers => run_ledgers(&storage),
    }
}

async fn run_metrics(
    storage: &JsonLedgerStorage,
    config: &Config,
    formatter: &Formatter,
    args: MetricsArgs,
) -> Result<String, AppError> {
    let (ledger, budget) = open_budget(storage, &args.target)?;
    let selector = selector_for(&ledger);
    let request = if args.metrics.is_empty() {
        MetricRequest::from_names(&config.default_metrics)
    } else {
        MetricRequest::from_names(&args.metrics)
    };
    info!(budget = %budget.name, ?request, "computing metrics");
    let result = selector.select_as_of(&budget, &request, args.as_of).await?;
    if args.json {
        Ok(to_json(&result)?)
    } else {
        Ok(formatter.metrics_text(&budget, &result))
    }
}

async fn run_project(
    storage: &JsonLedgerStorage,
    formatter: &Formatter,
    args: ProjectArgs,
) -> Result<String, AppError> {
    let (ledger, budget) = open_budget(storage, &args.target)?;
    let selector = selector_for(&ledger);
    let breakdown = selector
        .projection()
        .projection_breakdown(budget.id, budget.start_balance, args.as_of)
        .await?;
    if args.json {
        Ok(to_json(&breakdown)?)
    } else {
        Ok(formatter.projection_text(&budget, &breakdown))
    }
}

async fn run_summary(
    storage: &JsonLedgerStorage,
    formatter: &Formatter,
    args: SummaryArgs,
) -> Result<String, AppError> {
    let (ledger, budget) = open_budget(storage, &args.target)?;
    let range = DateRange::new(args.from, args.to);
    let summary = SummaryService::new(snapshot_query(&ledger))
        .summarize(budget.id, range)
        .await?;
    if args.json {
        Ok(to_json(&summary)?)
    } else {
        Ok(formatter.summary_text(&budget, &summary))
    }
}

async fn run_budgets(
    storage: &JsonLedgerStorage,
    formatter: &Formatter,
    args: BudgetsArgs,
) -> Result<String, AppError> {
    let ledger = open_ledger(storage, &args.ledger)?;
    let selector = selector_for(&ledger);
    let metrics = selector.projection().metrics();
    let mut rows = Vec::new();
    for budget in ledger
        .budgets
        .iter()
        .filter(|budget| !args.active || budget.is_active)
    {
        rows.push(BudgetRow {
            budget,
            transaction_count: ledger.transaction_count(budget.id),
            total_balance: metrics.total_balance(budget.id, budget.start_balance).await?,
        });
    }
    Ok(formatter.budgets_text(&rows))
}

fn run_ledgers(storage: &JsonLedgerStorage) -> Result<String, AppError> {
    let entries = storage.list_ledger_metadata()?;
    if entries.is_empty() {
        return Ok(format!("No ledgers in {}", storage.ledgers_dir().display()));
    }
    Ok(entries
        .iter()
        .map(|entry| {
            format!(
                "{}  {} budgets ({} active), {} transactions",
                entry.slug, entry.budget_count, entry.active_budget_count, entry.transaction_count
            )
        })
        .collect::<Vec<_>>()
        .join("\n"))
}

fn open_ledger(
    storage: &JsonLedgerStorage,
    target: &LedgerTarget,
) -> Result<LedgerSnapshot, AppError> {
    let ledger = storage.load_ledger(&target.ledger)?;
    for warning in ledger_warnings(&ledger) {
        warn!("{warning}");
    }
    Ok(ledger)
}

fn open_budget(
    storage: &JsonLedgerStorage,
    target: &BudgetTarget,
) -> Result<(LedgerSnapshot, Budget), AppError> {
    let ledger = open_ledger(storage, &target.ledger)?;
    let budget = ledger
        .find_budget(&target.budget)
        .cloned()
        .ok_or_else(|| CoreError::BudgetNotFound(target.budget.clone()))?;
    Ok((ledger, budget))
}

fn selector_for(ledger: &LedgerSnapshot) -> MetricSelector {
    MetricSelector::new(snapshot_query(ledger), Arc::new(SystemClock))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_metrics_and_as_of() {
        let cli = Cli::try_parse_from([
            "tally",
            "metrics",
            "--ledger",
            "home",
            "--budget",
            "Household",
            "-m",
            "totalBalance",
            "--metric",
            "netAmount,monthlyIncomeMedian",
            "--as-of",
            "2024-08-01",
        ])
        .expect("parse");
        match cli.command {
            Command::Metrics(args) => {
                assert_eq!(args.metrics.len(), 2);
                assert_eq!(args.as_of, NaiveDate::from_ymd_opt(2024, 8, 1));
                assert_eq!(args.target.budget, "Household");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_summary_date_range() {
        let cli = Cli::try_parse_from([
            "tally", "summary", "-l", "home", "-b", "Household", "--from", "2024-01-01",
        ])
        .expect("parse");
        match cli.command {
            Command::Summary(args) => {
                assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(args.to, None);
                assert!(!args.json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
