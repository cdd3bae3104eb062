use async_trait::async_trait;
use dashmap::DashMap;
use jiff::Timestamp;
use rand::Rng;

use super::{CREDENTIAL_VALIDITY, CredentialStrategy, Identity, IssuedCredential};
use crate::config::CredentialKind;
use crate::error::{AppError, AppResult};

pub const SESSION_COOKIE: &str = "sid";

const SESSION_ID_LEN: usize = 48;

#[derive(Debug, Clone)]
struct Session {
    identity: Identity,
    expires_at: Timestamp,
}

/// Server-side sessions keyed by an opaque random handle.
///
/// `DashMap` locks per shard, so a login and a logout on different handles
/// never contend. Sessions live in memory and do not survive a restart.
#[derive(Default)]
pub struct SessionStrategy {
    sessions: DashMap<String, Session>,
}

impl SessionStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included until they are swept.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn sweep_expired(&self, now: Timestamp) {
        self.sessions.retain(|_, session| session.expires_at > now);
    }

    fn generate_id() -> String {
        rand::rng()
            .sample_iter(&rand::distr::Alphanumeric)
            .take(SESSION_ID_LEN)
            .map(char::from)
            .collect()
    }
}

#[async_trait]
impl CredentialStrategy for SessionStrategy {
    fn kind(&self) -> CredentialKind {
        CredentialKind::Session
    }

    fn cookie_name(&self) -> &'static str {
        SESSION_COOKIE
    }

    async fn issue(&self, identity: &Identity) -> AppResult<IssuedCredential> {
        let issued_at = Timestamp::now();
        let expires_at = issued_at + CREDENTIAL_VALIDITY;
        self.sweep_expired(issued_at);

        let id = Self::generate_id();
        self.sessions.insert(
            id.clone(),
            Session {
                identity: identity.clone(),
                expires_at,
            },
        );
        tracing::debug!(username = %identity.username, active = self.sessions.len(), "Session created");

        Ok(IssuedCredential {
            value: id,
            issued_at,
            expires_at,
        })
    }

    async fn verify(&self, artifact: &str) -> AppResult<Identity> {
        let now = Timestamp::now();
        match self.sessions.get(artifact) {
            None => return Err(AppError::unauthenticated("Invalid session")),
            Some(session) if session.expires_at > now => return Ok(session.identity.clone()),
            Some(_) => {}
        }
        // The shard read guard must be gone before removing.
        self.sessions
            .remove_if(artifact, |_, session| session.expires_at <= now);
        Err(AppError::unauthenticated("Session expired"))
    }

    async fn revoke(&self, artifact: &str) {
        if self.sessions.remove(artifact).is_some() {
            tracing::debug!(active = self.sessions.len(), "Session revoked");
        }
    }
}
