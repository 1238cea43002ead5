//! Authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, RoleSlug, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Verify credentials and issue a JWT
    pub async fn login(&self, login: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_login(login)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid login or password".to_string()))?;

        let parsed = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Corrupt password hash".to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AppError::Authentication("Invalid login or password".to_string()))?;

        let now = Utc::now();
        let claims = UserClaims {
            sub: user.login.clone(),
            user_id: user.id,
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.config.jwt_expiration_hours as i64)).timestamp(),
        };
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Token creation failed: {}", e)))?;

        Ok((token, user))
    }

    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Create a user (admin operation)
    pub async fn create_user(&self, data: &CreateUser) -> AppResult<User> {
        let hash = hash_password(&data.password)?;
        self.repository
            .users
            .create(
                &data.login,
                &hash,
                data.name.as_deref(),
                data.role.unwrap_or(RoleSlug::Member),
            )
            .await
    }

    /// Create the initial administrator when the user table is empty
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<()> {
        if self.repository.users.count().await? > 0 {
            return Ok(());
        }

        let hash = hash_password(&self.config.bootstrap_password)?;
        self.repository
            .users
            .create(
                &self.config.bootstrap_login,
                &hash,
                Some("Administrator"),
                RoleSlug::Admin,
            )
            .await?;
        tracing::warn!(
            login = %self.config.bootstrap_login,
            "created bootstrap administrator; change its password"
        );
        Ok(())
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}
