//! Ask command implementation

use std::path::Path;

use anyhow::{bail, Result};

use super::{open_advisor, read_expenses};

pub async fn cmd_ask(config: Option<&Path>, question: &str, file: Option<&Path>) -> Result<()> {
    if question.trim().is_empty() {
        bail!("Question must not be empty");
    }

    let expenses = match file {
        Some(path) => read_expenses(path)?,
        None => Vec::new(),
    };
    let advisor = open_advisor(config)?;

    let answer = advisor.answer(question, &expenses).await;
    println!("{}", answer);
    Ok(())
}
