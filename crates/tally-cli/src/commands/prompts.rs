//! Prompts-related command implementations

use anyhow::{Context, Result};
use tally_core::prompts::{default_prompts_dir, PromptId, PromptLibrary};

/// List all available prompts and their override status
pub fn cmd_prompts_list() -> Result<()> {
    let library = PromptLibrary::new().context("Failed to load prompts")?;

    println!("Available Prompts:\n");

    println!("{:<25} {:>7}  {}", "ID", "VERSION", "OVERRIDE");
    println!("{}", "-".repeat(50));

    for &id in PromptId::all() {
        let prompt = library.get(id)?;
        let override_status = if prompt.override_path.is_some() {
            "✓ Custom"
        } else {
            "Default"
        };

        println!(
            "{:<25} {:>7}  {}",
            id.as_str(),
            prompt.metadata.version,
            override_status
        );
    }

    println!();
    println!(
        "Override directory: {}",
        default_prompts_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not available)".to_string())
    );

    println!();
    println!("To customize a prompt:");
    println!("  1. Copy the default to the override directory as <id>.md");
    println!("  2. Edit the # System and # User sections");
    println!("  3. Restart the server to use the new prompt");

    Ok(())
}

/// Show the content of a specific prompt
pub fn cmd_prompts_show(prompt_id: &str) -> Result<()> {
    let id: PromptId = match prompt_id.parse() {
        Ok(id) => id,
        Err(_) => {
            eprintln!("Unknown prompt ID: {}", prompt_id);
            eprintln!();
            eprintln!("Available prompts:");
            for id in PromptId::all() {
                eprintln!("  - {}", id.as_str());
            }
            return Ok(());
        }
    };

    let library = PromptLibrary::new().context("Failed to load prompts")?;
    let prompt = library.get(id)?;

    println!("Prompt: {}", prompt.metadata.id);
    println!("Version: {}", prompt.metadata.version);
    match prompt.override_path {
        Some(ref path) => println!("Source: Override ({})", path.display()),
        None => println!("Source: Default"),
    }

    println!();
    println!("--- System ---");
    println!("{}", prompt.system);
    println!();
    println!("--- User ---");
    println!("{}", prompt.user);

    Ok(())
}

/// Show the path where prompt overrides should be placed
pub fn cmd_prompts_path() -> Result<()> {
    match default_prompts_dir() {
        Some(path) => {
            println!("{}", path.display());

            if !path.exists() {
                eprintln!();
                eprintln!("Note: This directory does not exist yet.");
                eprintln!("Create it to start adding custom prompts.");
            }
        }
        None => {
            eprintln!("Could not determine prompts directory.");
            eprintln!("The data directory is not available on this system.");
        }
    }

    Ok(())
}
