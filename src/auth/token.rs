use async_trait::async_trait;
use jiff::Timestamp;

use super::{CREDENTIAL_VALIDITY, CredentialStrategy, Identity, IssuedCredential};
use crate::config::CredentialKind;
use crate::error::AppResult;
use crate::utils::jwt::{Claims, decode_token, encode_token};

pub const TOKEN_COOKIE: &str = "token";

/// Stateless strategy: the artifact is an HS256 JWT.
///
/// Logout can only ask the client to drop the cookie; a copied token stays
/// valid until its `exp`.
pub struct TokenStrategy {
    secret: String,
}

impl TokenStrategy {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

#[async_trait]
impl CredentialStrategy for TokenStrategy {
    fn kind(&self) -> CredentialKind {
        CredentialKind::Token
    }

    fn cookie_name(&self) -> &'static str {
        TOKEN_COOKIE
    }

    async fn issue(&self, identity: &Identity) -> AppResult<IssuedCredential> {
        let issued_at = Timestamp::now();
        let claims = Claims::new(
            identity.user_id,
            &identity.username,
            issued_at,
            CREDENTIAL_VALIDITY,
        );
        Ok(IssuedCredential {
            value: encode_token(&claims, &self.secret)?,
            issued_at,
            expires_at: issued_at + CREDENTIAL_VALIDITY,
        })
    }

    async fn verify(&self, artifact: &str) -> AppResult<Identity> {
        let claims = decode_token(artifact, &self.secret)?;
        Ok(Identity {
            user_id: claims.user_id()?,
            username: claims.username,
        })
    }

    async fn revoke(&self, _artifact: &str) {}
}
