//! SQLite record store: pooled async access, embedded migrations and the
//! seed/reset maintenance procedures.

mod migrations;
mod pool;
mod reset;
mod seed;

pub use migrations::{
    MIGRATIONS, establish_sync_connection, pending_migrations, revert_migrations,
    run_migrations,
};
pub use pool::{AsyncDbPool, DbConnection, Store};
pub use reset::reset_database;
pub use seed::{AdminAccount, SeedDataset, SeedOutcome, seed_database, seed_store};
