//! Questboard - terminal driver
//!
//! Wires the board to a terminal presenter and runs one command.

use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use questboard::cli::{Cli, Command, get_log_path};
use questboard::config::Config;
use questboard::{
    AnalysisMode, AudioInput, Board, DropTarget, JobOutcome, SideEffectDispatcher, SummaryLevel, Task, TaskError,
    TaskId, TaskStatus, TerminalPresenter, UserStats,
};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(base_url = %config.gateway.base_url, "Questboard loaded config");

    let board = Board::from_config(&config).context("Failed to create gateway")?;
    let dispatcher = SideEffectDispatcher::spawn(&board.bus, Arc::new(TerminalPresenter::new(cli.bell)));

    debug!(command = ?cli.command, "main: dispatching command");
    let result = match cli.command {
        Some(Command::Tasks) | None => cmd_tasks(&board).await,
        Some(Command::Add { title, description }) => cmd_add(&board, &title, description.as_deref()).await,
        Some(Command::Move { id, column }) => cmd_move(&board, id, &column).await,
        Some(Command::Rm { id, yes }) => cmd_rm(&board, id, yes).await,
        Some(Command::Stats) => cmd_stats(&board).await,
        Some(Command::Analyze {
            file,
            mode,
            level,
            accept,
        }) => {
            let mode = mode.unwrap_or(config.analysis.mode);
            let level = level.unwrap_or(config.analysis.summary_level);
            cmd_analyze(&board, file, mode, level, accept).await
        }
    };

    // Let queued notifications print before exiting
    dispatcher.shutdown().await;

    match result? {
        true => Ok(ExitCode::SUCCESS),
        false => Ok(ExitCode::FAILURE),
    }
}

/// Turn a store result into "done / already reported / real error"
///
/// Validation and transport failures were already shown through the error
/// channel; only lookup errors still need reporting.
fn settle<T>(result: Result<T, TaskError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(TaskError::NotFound(id)) => Err(eyre!("No task with id {}", id)),
        Err(e @ TaskError::UnknownColumn(_)) => Err(e.into()),
        Err(e) => {
            debug!(error = %e, "settle: already reported");
            Ok(None)
        }
    }
}

fn print_stats(stats: &UserStats) {
    const WIDTH: usize = 20;
    let filled = ((stats.progress() / 100.0) * WIDTH as f64).round() as usize;
    let bar = format!("{}{}", "#".repeat(filled.min(WIDTH)), "-".repeat(WIDTH - filled.min(WIDTH)));
    println!(
        "{} {}  {}  [{}] {:.0}%  ({} EXP, next level at {})",
        "Level".bold(),
        stats.level.to_string().bold().magenta(),
        stats.title.cyan(),
        bar.green(),
        stats.progress(),
        stats.total_exp,
        stats.next_level_exp_req
    );
}

fn print_board(tasks: &[Task]) {
    for status in TaskStatus::ALL {
        let column: Vec<&Task> = tasks.iter().filter(|t| t.status == status).collect();
        println!("\n{} ({})", status.as_str().to_uppercase().bold(), column.len());
        for task in column {
            let marker = if task.is_done() { "✓".green() } else { "·".normal() };
            println!("  {} {:>4}  {}  {}", marker, task.id, task.title, format!("+{} EXP", task.exp).dimmed());
        }
    }
}

async fn cmd_tasks(board: &Board) -> Result<bool> {
    debug!("cmd_tasks: called");
    let tasks = board.tasks.reload().await.context("Failed to load tasks")?;
    match board.stats.refresh().await {
        Ok(stats) => print_stats(&stats),
        Err(e) => eprintln!("{} Stats unavailable: {}", "✗".red(), e),
    }
    print_board(&tasks);
    Ok(true)
}

async fn cmd_add(board: &Board, title: &str, description: Option<&str>) -> Result<bool> {
    debug!(%title, "cmd_add: called");
    Ok(settle(board.tasks.create_with_description(title, description).await)?.is_some())
}

async fn cmd_move(board: &Board, id: TaskId, column: &str) -> Result<bool> {
    debug!(%id, %column, "cmd_move: called");
    board.tasks.reload().await.context("Failed to load tasks")?;
    Ok(settle(board.tasks.on_drop(id, column).await)?.is_some())
}

async fn cmd_rm(board: &Board, id: TaskId, yes: bool) -> Result<bool> {
    debug!(%id, yes, "cmd_rm: called");
    board.tasks.reload().await.context("Failed to load tasks")?;

    let confirm = move |task: &Task| {
        if yes {
            return true;
        }
        print!("Delete '{}'? [y/N] ", task.title);
        let _ = std::io::stdout().flush();
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    };

    match settle(board.tasks.remove(id, &confirm).await)? {
        Some(true) => Ok(true),
        Some(false) => {
            println!("Kept task {}", id);
            Ok(true)
        }
        None => Ok(false),
    }
}

async fn cmd_stats(board: &Board) -> Result<bool> {
    debug!("cmd_stats: called");
    let stats = board.stats.refresh().await.context("Failed to fetch stats")?;
    print_stats(&stats);
    Ok(true)
}

async fn cmd_analyze(
    board: &Board,
    file: PathBuf,
    mode: AnalysisMode,
    level: SummaryLevel,
    accept: bool,
) -> Result<bool> {
    debug!(?file, %mode, %level, accept, "cmd_analyze: called");
    let audio = AudioInput::from_path(&file)
        .await
        .context(format!("Failed to read {}", file.display()))?;

    let Ok(ticket) = board.jobs.start(audio, mode, level) else {
        // Rejection already went out on the error channel
        return Ok(false);
    };

    let outcome = tokio::select! {
        outcome = ticket.outcome() => outcome,
        _ = tokio::signal::ctrl_c() => {
            info!("cmd_analyze: interrupted, cancelling job");
            board.jobs.cancel();
            JobOutcome::Cancelled
        }
    };

    let result = match outcome {
        JobOutcome::Succeeded(result) => result,
        JobOutcome::Cancelled | JobOutcome::Discarded => return Ok(true),
        JobOutcome::Failed(_) => return Ok(false),
    };

    println!("\n{}\n{}", "Summary".bold(), result.summary);
    if mode == AnalysisMode::Proofread {
        println!("\n{}\n{}", "Transcript".bold(), result.transcript);
    }
    if !result.action_items.is_empty() {
        println!("\n{}", "Action items".bold());
        for item in &result.action_items {
            println!("  - {}", item);
        }
    }

    if accept {
        let mut all_added = true;
        for item in &result.action_items {
            all_added &= settle(board.tasks.accept_action_item(item).await)?.is_some();
        }
        return Ok(all_added);
    }
    Ok(true)
}
