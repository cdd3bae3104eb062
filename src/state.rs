//! Application state shared by every handler and middleware.

use std::path::PathBuf;

use crate::auth::Authenticator;
use crate::db::Store;
use crate::repositories::Repositories;
use crate::services::Services;

/// Cloning is cheap: the services and the credential strategy sit behind
/// `Arc`s or pooled handles.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub auth: Authenticator,
    /// Root of the presentation layer served as the router fallback.
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(store: &Store, auth: Authenticator, static_dir: impl Into<PathBuf>) -> Self {
        let repos = Repositories::new(store.pool().clone());
        Self {
            services: Services::new(repos),
            auth,
            static_dir: static_dir.into(),
        }
    }
}
