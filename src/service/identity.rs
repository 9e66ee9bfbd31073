//! Identity store: credential checks and password changes

use crate::domain::{ChangePasswordInput, LoginInput, User, UserId};
use crate::error::{AppError, Result};
use crate::repository::UserRepository;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use metrics::counter;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub struct IdentityService<U: UserRepository> {
    repo: Arc<U>,
}

impl<U: UserRepository> IdentityService<U> {
    pub fn new(repo: Arc<U>) -> Self {
        Self { repo }
    }

    /// Check a username/password pair.
    ///
    /// Unknown user, inactive user and wrong password all produce the same
    /// `Unauthorized` error, and all pay for one Argon2 verification.
    pub async fn authenticate(&self, input: LoginInput) -> Result<User> {
        input.validate()?;

        let user = match self.repo.find_by_username(&input.username).await? {
            Some(user) if user.is_active => user,
            Some(_) | None => {
                verify_password(&input.password, dummy_hash());
                counter!("owl_auth_login_total", "result" => "rejected").increment(1);
                warn!(username = %input.username, "Login rejected");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        if !verify_password(&input.password, &user.password) {
            counter!("owl_auth_login_total", "result" => "rejected").increment(1);
            warn!(user_id = %user.id, "Login rejected: bad password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        self.repo.touch_last_login(user.id).await?;
        counter!("owl_auth_login_total", "result" => "success").increment(1);
        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// Load the user behind a verified session.
    pub async fn current_user(&self, user_id: UserId) -> Result<User> {
        match self.repo.find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(AppError::Unauthorized("Session user no longer active".to_string())),
        }
    }

    pub async fn change_password(&self, user_id: UserId, input: ChangePasswordInput) -> Result<()> {
        input.validate()?;

        let user = self.current_user(user_id).await?;
        if !verify_password(&input.current_password, &user.password) {
            return Err(AppError::BadRequest(
                "Current password is incorrect".to_string(),
            ));
        }

        let hash = hash_password(&input.new_password)?;
        self.repo.update_password(user_id, &hash).await?;
        info!(user_id = %user_id, "Password changed");
        Ok(())
    }
}

/// Hash a password into an Argon2 PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Hash verified against when there is no usable account, so rejections take
/// as long as a wrong password.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_password("owl-dummy-password").unwrap_or_default())
}

/// Verify a password against a stored PHC string. A malformed hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
