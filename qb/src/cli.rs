//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::{AnalysisMode, SummaryLevel, TaskId};

/// Questboard - gamified task board client
#[derive(Parser)]
#[command(
    name = "qb",
    about = "Gamified task board with cancellable meeting analysis",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Ring the terminal bell for audio cues
    #[arg(long, global = true)]
    pub bell: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the board, one section per column
    Tasks,

    /// Add a task to the todo column
    Add {
        /// Task title
        title: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Move a task to another column (todo, doing, done)
    Move {
        /// Task id
        id: TaskId,

        /// Target column
        column: String,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: TaskId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show level and EXP
    Stats,

    /// Transcribe and summarize an audio file (Ctrl-C cancels)
    Analyze {
        /// Audio file to upload
        file: PathBuf,

        /// Analysis mode (summary, proofread)
        #[arg(short, long)]
        mode: Option<AnalysisMode>,

        /// Summary length (short, standard, long)
        #[arg(short = 'L', long)]
        level: Option<SummaryLevel>,

        /// Add every suggested action item to the board
        #[arg(short, long)]
        accept: bool,
    },
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("questboard")
        .join("logs")
        .join("questboard.log");
    debug!(?path, "get_log_path: returning path");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from(["qb", "analyze", "sync.mp3", "--mode", "proofread", "-L", "long", "--accept"])
            .unwrap();
        match cli.command {
            Some(Command::Analyze {
                file,
                mode,
                level,
                accept,
            }) => {
                assert_eq!(file, PathBuf::from("sync.mp3"));
                assert_eq!(mode, Some(AnalysisMode::Proofread));
                assert_eq!(level, Some(SummaryLevel::Long));
                assert!(accept);
            }
            other => panic!("Expected Analyze, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_move_and_global_flags() {
        let cli = Cli::try_parse_from(["qb", "move", "3", "done", "-l", "debug"]).unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Some(Command::Move { id: 3, ref column }) if column == "done"));
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["qb", "analyze", "a.mp3", "--mode", "poem"]).is_err());
    }

    #[test]
    fn test_log_path_ends_with_app_dir() {
        assert!(get_log_path().ends_with("questboard/logs/questboard.log"));
    }
}
