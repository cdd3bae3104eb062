//! Data access for users, processes and runs.
//!
//! Every repository holds a clone of the pool; bb8 shares its state behind an
//! `Arc`, so cloning is a reference-count bump.

mod process_repo;
mod run_repo;
mod user_repo;

pub use process_repo::{ProcessRepository, like_pattern};
pub use run_repo::RunRepository;
pub use user_repo::UserRepository;

use crate::db::AsyncDbPool;

#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub processes: ProcessRepository,
    pub runs: RunRepository,
}

impl Repositories {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            processes: ProcessRepository::new(pool.clone()),
            runs: RunRepository::new(pool),
        }
    }
}
