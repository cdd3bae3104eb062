//! Business rules between the HTTP handlers and the repositories.

mod auth_service;
mod process_service;

pub use auth_service::AuthService;
pub use process_service::ProcessService;

use crate::repositories::Repositories;

#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub processes: ProcessService,
}

impl Services {
    pub fn new(repos: Repositories) -> Self {
        Self {
            auth: AuthService::new(repos.users),
            processes: ProcessService::new(repos.processes, repos.runs),
        }
    }
}
