use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::normalize_email;
use crate::auth::password::hash_password_blocking;
use crate::auth::repo::UserRepository;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct ForgotPasswordParams {
    pub email: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Performed,
    NotPerformed,
}

/// Simulated reset: overwrites the hash directly, no emailed token.
pub struct ForgotPassword {
    users: Arc<dyn UserRepository>,
}

impl ForgotPassword {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    #[instrument(skip_all)]
    pub async fn execute(&self, params: ForgotPasswordParams) -> AppResult<ResetOutcome> {
        if params.new_password != params.confirm_new_password {
            return Err(AppError::validation("New passwords do not match."));
        }
        if params.new_password.trim().is_empty() {
            return Err(AppError::validation("New password is required."));
        }

        // Hash before the lookup so known and unknown emails cost one Argon2 run each.
        let password_hash = hash_password_blocking(params.new_password).await?;

        let email = normalize_email(&params.email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!("password reset requested for unknown email");
            return Ok(ResetOutcome::NotPerformed);
        };

        if !self.users.update_password(user.id, &password_hash).await? {
            warn!(user_id = %user.id, "password reset affected no rows");
            return Ok(ResetOutcome::NotPerformed);
        }

        info!(user_id = %user.id, "password reset");
        Ok(ResetOutcome::Performed)
    }
}
