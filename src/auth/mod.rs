//! Credential lifecycle: minting an artifact at login, checking it on every
//! protected request and revoking it at logout.
//!
//! The storage or signing mechanism is a [`CredentialStrategy`]; the rest of
//! the application only sees the [`Authenticator`] and [`Identity`].

mod authenticator;
mod session;
mod token;

pub use authenticator::{Authenticator, NOT_LOGGED_IN};
pub use session::{SESSION_COOKIE, SessionStrategy};
pub use token::{TOKEN_COOKIE, TokenStrategy};

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::config::CredentialKind;
use crate::error::AppResult;

/// Every credential artifact is valid for this long after issuance.
pub const CREDENTIAL_VALIDITY: SignedDuration = SignedDuration::from_hours(24);

/// The authenticated caller, attached to request extensions by the auth gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i32,
    pub username: String,
}

/// A freshly minted artifact and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedCredential {
    pub value: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Mechanism that turns an [`Identity`] into a cookie value and back.
#[async_trait]
pub trait CredentialStrategy: Send + Sync {
    fn kind(&self) -> CredentialKind;

    /// Name of the cookie carrying the artifact.
    fn cookie_name(&self) -> &'static str;

    async fn issue(&self, identity: &Identity) -> AppResult<IssuedCredential>;

    /// Resolves an artifact, failing with `AppError::Unauthenticated`.
    async fn verify(&self, artifact: &str) -> AppResult<Identity>;

    /// Invalidates an artifact. Revoking an unknown or already revoked
    /// artifact succeeds.
    async fn revoke(&self, artifact: &str);
}
