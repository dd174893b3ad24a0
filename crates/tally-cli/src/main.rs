//! Tally CLI - AI insights for your expenses
//!
//! Usage:
//!   tally insights --file expenses.csv   Generate spending insights
//!   tally categorize "Uber to airport"   Suggest a category
//!   tally ask "Where does it go?" -f F   Ask about your spending
//!   tally serve --port 3000              Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Insights { file, json } => commands::cmd_insights(config, &file, json).await,
        Commands::Categorize { description } => {
            commands::cmd_categorize(config, &description.join(" ")).await
        }
        Commands::Ask { question, file } => {
            commands::cmd_ask(config, &question.join(" "), file.as_deref()).await
        }
        Commands::Status => commands::cmd_status(config),
        Commands::Serve {
            port,
            host,
            no_auth,
        } => commands::cmd_serve(config, &host, port, no_auth).await,
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
    }
}
