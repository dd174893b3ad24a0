//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - AI insights for your expenses
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Expense insights, categorization and Q&A backed by OpenRouter or OpenAI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (defaults to ~/.local/share/tally/config/settings.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate spending insights from an expense file
    Insights {
        /// Expense file (.json array or .csv with id,amount,category,description,date)
        #[arg(short, long)]
        file: PathBuf,

        /// Print insights as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest a category for an expense description
    Categorize {
        /// Expense description (e.g. "Uber ride to airport")
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },

    /// Ask a question about your spending
    Ask {
        /// The question
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Expense file used as context
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Show which AI backend is configured
    Status,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        #[arg(long)]
        no_auth: bool,
    },

    /// Manage AI prompts (list available prompts, view override status)
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., generate_insights, categorize_expense)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}
