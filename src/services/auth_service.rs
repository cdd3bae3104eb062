use crate::auth::Identity;
use crate::error::{AppError, AppResult};
use crate::repositories::UserRepository;
use crate::utils::password::{burn_verification, verify_password};

/// Checks username/password pairs against the stored Argon2 hashes.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
}

impl AuthService {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    /// Returns the identity for a correct pair.
    ///
    /// Unknown usernames and wrong passwords both yield
    /// [`AppError::InvalidCredentials`], and both run one hash verification.
    /// Verification happens on the blocking pool.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<Identity> {
        let user = self.users.find_by_username(username).await?;
        let password = password.to_owned();

        let Some(user) = user else {
            tokio::task::spawn_blocking(move || burn_verification(&password)).await?;
            tracing::info!(username, "Login rejected");
            return Err(AppError::InvalidCredentials);
        };

        let hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await??;
        if !matches {
            tracing::info!(username, "Login rejected");
            return Err(AppError::InvalidCredentials);
        }

        Ok(Identity {
            user_id: user.id,
            username: user.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::seeded_store;

    #[tokio::test]
    async fn test_correct_pair_yields_identity() {
        let (_dir, store) = seeded_store().await;
        let service = AuthService::new(UserRepository::new(store.pool().clone()));

        let identity = service.authenticate("admin", "admin123").await.unwrap();
        assert_eq!(identity.username, "admin");
        assert!(identity.user_id > 0);
    }

    #[tokio::test]
    async fn test_failures_are_indistinguishable() {
        let (_dir, store) = seeded_store().await;
        let service = AuthService::new(UserRepository::new(store.pool().clone()));

        let wrong_password = service.authenticate("admin", "nope").await.unwrap_err();
        let unknown_user = service.authenticate("root", "admin123").await.unwrap_err();
        let wrong_case = service.authenticate("ADMIN", "admin123").await.unwrap_err();

        for err in [&wrong_password, &unknown_user, &wrong_case] {
            assert!(matches!(err, AppError::InvalidCredentials));
        }
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }
}
