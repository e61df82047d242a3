//! TaskRank CLI - priority scoring for to-do items.

mod config;
mod report;

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use taskrank_core::{Task, TaskDraft, TaskId, TaskInput};
use taskrank_scoring::{Scorer, Strategy};
use taskrank_storage::{JsonStorage, Storage, StorageError};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use report::{AnalysisReport, Message, SuggestionReport, TaskFile};

#[derive(Parser)]
#[command(name = "taskrank")]
#[command(about = "Priority scoring for to-do items", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Storage path for TaskRank data
    #[arg(short, long, default_value = ".taskrank", global = true)]
    storage: PathBuf,

    /// Scoring strategy (defaults to the configured one)
    #[arg(long, global = true)]
    strategy: Option<String>,

    /// Reference date for scoring, YYYY-MM-DD (defaults to today)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: NaiveDate,
        /// Estimated hours
        #[arg(long, default_value = "1")]
        hours: f64,
        /// Importance (1-10)
        #[arg(long, default_value = "5")]
        importance: i64,
        /// Ids of tasks this one references
        #[arg(long = "depends-on", value_delimiter = ',')]
        depends_on: Vec<TaskId>,
    },
    /// List tasks
    List,
    /// Show task details
    Show {
        /// Task ID
        id: TaskId,
    },
    /// Update fields of a task
    Update {
        /// Task ID
        id: TaskId,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// New estimated hours
        #[arg(long)]
        hours: Option<f64>,
        /// New importance (1-10)
        #[arg(long)]
        importance: Option<i64>,
        /// Replacement dependency list
        #[arg(long = "depends-on", value_delimiter = ',')]
        depends_on: Option<Vec<TaskId>>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: TaskId,
    },
    /// Delete every task
    Clear,
    /// Score and sort tasks
    Analyze {
        /// JSON file of tasks; stored tasks are used when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Show the tasks to work on first
    Suggest {
        /// JSON file of tasks; stored tasks are used when omitted
        #[arg(long)]
        file: Option<PathBuf>,
        /// Number of suggestions
        #[arg(short)]
        n: Option<usize>,
    },
    /// List available strategies
    Strategies,
}

fn init_logging() {
    // stdout carries JSON output, so logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::load(&cli.storage).await?;
    let mut storage = JsonStorage::new(&config.storage_path).await?;

    match cli.command {
        Commands::Add { title, due, hours, importance, depends_on } => {
            let draft = TaskDraft {
                title,
                due_date: due,
                estimated_hours: hours,
                importance,
                dependencies: depends_on,
            };
            let task = storage.create_task(draft).await?;
            print_json(&task)?;
        }
        Commands::List => {
            let tasks = storage.list_tasks().await?;
            print_json(&tasks)?;
        }
        Commands::Show { id } => {
            let Some(task) = storage.load_task(id).await? else {
                bail!(StorageError::NotFound(id));
            };
            print_json(&task)?;
        }
        Commands::Update { id, title, due, hours, importance, depends_on } => {
            let Some(current) = storage.load_task(id).await? else {
                bail!(StorageError::NotFound(id));
            };
            let draft = TaskDraft {
                title: title.unwrap_or(current.title),
                due_date: due.unwrap_or(current.due_date),
                estimated_hours: hours.unwrap_or(current.estimated_hours),
                importance: importance.unwrap_or(i64::from(current.importance)),
                dependencies: depends_on.unwrap_or(current.dependencies),
            };
            let task = storage.update_task(id, draft).await?;
            print_json(&task)?;
        }
        Commands::Delete { id } => {
            storage.delete_task(id).await?;
            print_json(&Message { message: format!("Deleted task {}", id) })?;
        }
        Commands::Clear => {
            let count = storage.clear_tasks().await?;
            print_json(&serde_json::json!({
                "message": format!("Deleted {} tasks", count),
                "deleted_count": count,
            }))?;
        }
        Commands::Analyze { file } => {
            let (tasks, file_strategy) = load_tasks(&storage, file).await?;
            let report = analysis_report(&tasks, cli.strategy.as_deref(), cli.today, &config, file_strategy)?;
            print_json(&report)?;
        }
        Commands::Suggest { file, n } => {
            let (tasks, file_strategy) = load_tasks(&storage, file).await?;
            if tasks.is_empty() {
                print_json(&Message { message: "No tasks available to suggest".to_string() })?;
                return Ok(());
            }

            let scorer = build_scorer(cli.strategy.as_deref(), cli.today, &config, file_strategy)?;
            let n = n.unwrap_or(config.suggestion_count);
            info!(strategy = %scorer.strategy(), tasks = tasks.len(), n, "Suggesting tasks");
            let suggestions = scorer.suggest(&tasks, n);
            print_json(&SuggestionReport::new(suggestions, scorer.strategy()))?;
        }
        Commands::Strategies => {
            for strategy in Strategy::ALL {
                let w = strategy.weights();
                println!(
                    "  {:<16} urgency {:.2} | importance {:.2} | effort {:.2} | dependencies x{:.1}  {}",
                    strategy.as_str(),
                    w.urgency,
                    w.importance,
                    w.effort,
                    w.dependency_multiplier,
                    strategy.description(),
                );
            }
        }
    }

    Ok(())
}

/// Tasks from a file, or every stored task.
async fn load_tasks(
    storage: &JsonStorage,
    file: Option<PathBuf>,
) -> Result<(Vec<TaskInput>, Option<String>)> {
    match file {
        Some(path) => Ok(TaskFile::read(&path).await?.into_parts()),
        None => {
            let stored = storage.list_tasks().await?;
            Ok((stored.iter().map(Task::to_input).collect(), None))
        }
    }
}

/// Score a batch for `analyze`. An empty batch is rejected before the
/// strategy is looked at.
fn analysis_report(
    tasks: &[TaskInput],
    strategy: Option<&str>,
    today: Option<NaiveDate>,
    config: &Config,
    file_strategy: Option<String>,
) -> Result<AnalysisReport> {
    if tasks.is_empty() {
        bail!("No tasks provided");
    }
    let scorer = build_scorer(strategy, today, config, file_strategy)?;

    info!(strategy = %scorer.strategy(), tasks = tasks.len(), "Analyzing tasks");
    Ok(AnalysisReport::new(scorer.analyze(tasks), scorer.strategy()))
}

/// Strategy precedence: command line, then task file, then config.
fn build_scorer(
    strategy: Option<&str>,
    today: Option<NaiveDate>,
    config: &Config,
    file_strategy: Option<String>,
) -> Result<Scorer> {
    let strategy: Strategy = match strategy.or(file_strategy.as_deref()) {
        Some(name) => name.parse()?,
        None => config.default_strategy,
    };
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    Ok(Scorer::from_strategy(strategy, today))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
