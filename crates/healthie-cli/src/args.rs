use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use healthie_core::models::Day;

/// Weekly meal and exercise planner for older adults
///
/// Healthie asks a generative service for a seven-day plan with several
/// options per meal and exercise slot, lets you pick among them, explains
/// each day, and revises the plan through a conversation with the
/// assistant. The current plan is kept in a local SQLite database.
#[derive(Parser)]
#[command(version, about, name = "healthie")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/healthie/healthie.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// JSON file with the health profile used for generation and chat
    #[arg(long, global = true)]
    pub profile: Option<PathBuf>,

    /// API key for the generative service
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model used by the generative service
    #[arg(long, global = true, env = "HEALTHIE_MODEL")]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands. Without one, the saved plan is shown.
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a new plan from --profile and save it
    #[command(alias = "g")]
    Generate,
    /// Show the saved plan
    #[command(alias = "s")]
    Show(ShowArgs),
    /// Delete the saved plan
    Clear,
    /// Start an interactive session
    #[command(alias = "i")]
    Session,
}

#[derive(ClapArgs)]
pub struct ShowArgs {
    /// Show a single day (monday, mon, วันจันทร์, ...)
    #[arg(short, long)]
    pub day: Option<Day>,
}
