use std::sync::Arc;

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::{CREDENTIAL_VALIDITY, CredentialStrategy, Identity, SessionStrategy, TokenStrategy};
use crate::config::{AuthConfig, CredentialKind};
use crate::error::{AppError, AppResult};

/// Reported when the request carries no credential cookie at all.
pub const NOT_LOGGED_IN: &str = "Not logged in";

/// The credential strategy chosen at startup plus the cookie policy around it.
#[derive(Clone)]
pub struct Authenticator {
    strategy: Arc<dyn CredentialStrategy>,
    cookie_secure: bool,
}

impl Authenticator {
    pub fn new(strategy: Arc<dyn CredentialStrategy>, cookie_secure: bool) -> Self {
        Self {
            strategy,
            cookie_secure,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        let strategy: Arc<dyn CredentialStrategy> = match config.strategy {
            CredentialKind::Token => Arc::new(TokenStrategy::new(config.secret.clone())),
            CredentialKind::Session => Arc::new(SessionStrategy::new()),
        };
        Self::new(strategy, config.cookie_secure)
    }

    pub fn kind(&self) -> CredentialKind {
        self.strategy.kind()
    }

    pub fn cookie_name(&self) -> &'static str {
        self.strategy.cookie_name()
    }

    /// Resolves the credential cookie of an inbound request to an identity.
    pub async fn verify_request(&self, headers: &HeaderMap) -> AppResult<Identity> {
        let jar = CookieJar::from_headers(headers);
        let cookie = jar
            .get(self.cookie_name())
            .filter(|cookie| !cookie.value().is_empty())
            .ok_or_else(|| AppError::unauthenticated(NOT_LOGGED_IN))?;
        self.strategy.verify(cookie.value()).await
    }

    /// Mints an artifact for `identity` and stores it in the jar.
    pub async fn login(&self, jar: CookieJar, identity: &Identity) -> AppResult<CookieJar> {
        let issued = self.strategy.issue(identity).await?;
        tracing::info!(
            username = %identity.username,
            strategy = %self.kind(),
            expires_at = %issued.expires_at,
            "Credential issued"
        );

        let cookie = Cookie::build((self.cookie_name(), issued.value))
            .http_only(true)
            .secure(self.cookie_secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(time::Duration::seconds(CREDENTIAL_VALIDITY.as_secs()));
        Ok(jar.add(cookie))
    }

    /// Revokes whatever artifact the jar carries and tells the client to drop
    /// the cookie. Succeeds whether or not a credential was present.
    pub async fn logout(&self, jar: CookieJar) -> CookieJar {
        if let Some(cookie) = jar.get(self.cookie_name()) {
            self.strategy.revoke(cookie.value()).await;
        }

        let removal = Cookie::build((self.cookie_name(), ""))
            .http_only(true)
            .secure(self.cookie_secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(time::Duration::ZERO);
        jar.add(removal)
    }
}
