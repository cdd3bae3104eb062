//! Reset command handler
//!
//! Deletes the database and rebuilds it from migrations and seed data.

use std::io::{self, BufRead, Write};

use super::seed::print_outcome;
use crate::config::settings::Settings;
use crate::db::{SeedOutcome, reset_database};
use crate::error::{AppError, AppResult};

pub struct ResetCommandHandler {
    config: Settings,
}

impl ResetCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Asks for confirmation on stdin unless `assume_yes`.
    pub async fn execute(&self, assume_yes: bool) -> AppResult<Option<SeedOutcome>> {
        let path = self.config.database.sqlite_path();
        if !assume_yes && !confirm(path, io::stdin().lock(), io::stdout())? {
            println!("Reset cancelled");
            return Ok(None);
        }

        let outcome = reset_database(&self.config.database, &self.config.seed).await?;
        println!("✓ Database {} recreated", path);
        print_outcome(&outcome, &self.config.seed.admin_username);
        Ok(Some(outcome))
    }
}

fn confirm(path: &str, mut input: impl BufRead, mut output: impl Write) -> AppResult<bool> {
    let prompt_error = |e: io::Error| AppError::BadRequest {
        message: format!("Could not read confirmation: {}", e),
    };
    write!(
        output,
        "This deletes {} and every record in it. Type 'yes' to continue: ",
        path
    )
    .and_then(|_| output.flush())
    .map_err(prompt_error)?;

    let mut answer = String::new();
    input.read_line(&mut answer).map_err(prompt_error)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}
