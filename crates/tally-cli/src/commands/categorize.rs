//! Categorize command implementation

use std::path::Path;

use anyhow::Result;

use super::open_advisor;

pub async fn cmd_categorize(config: Option<&Path>, description: &str) -> Result<()> {
    let advisor = open_advisor(config)?;
    let category = advisor.categorize(description).await;
    println!("{}", category);
    Ok(())
}
