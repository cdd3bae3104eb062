//! Seed command handler

use crate::config::settings::Settings;
use crate::db::{SeedOutcome, seed_store};
use crate::error::AppResult;

pub struct SeedCommandHandler {
    config: Settings,
}

impl SeedCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> AppResult<SeedOutcome> {
        let outcome = seed_store(&self.config.database, &self.config.seed).await?;
        print_outcome(&outcome, &self.config.seed.admin_username);
        Ok(outcome)
    }
}

pub(crate) fn print_outcome(outcome: &SeedOutcome, admin_username: &str) {
    match outcome {
        SeedOutcome::Skipped { existing_users } => {
            println!(
                "✓ Database already has {} user(s); nothing seeded",
                existing_users
            );
        }
        SeedOutcome::Seeded {
            processes,
            runs,
            orphan_runs,
        } => {
            println!("✓ Created admin user '{}'", admin_username);
            println!("✓ Inserted {} process(es) and {} run(s)", processes, runs);
            if *orphan_runs > 0 {
                println!(
                    "! Skipped {} run(s) referencing unknown processes",
                    orphan_runs
                );
            }
        }
    }
}
