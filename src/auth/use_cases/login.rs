use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::auth::jwt::JwtKeys;
use crate::auth::password::{verify_dummy, verify_password_blocking};
use crate::auth::repo::UserRepository;
use crate::auth::repo_types::User;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct LoginUserParams {
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutcome {
    pub user: User,
    pub access_token: String,
}

pub struct LoginUser {
    users: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl LoginUser {
    pub fn new(users: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    /// Unknown user and wrong password produce the same error.
    #[instrument(skip_all, fields(username = %params.username))]
    pub async fn execute(&self, params: LoginUserParams) -> AppResult<LoginOutcome> {
        let Some(user) = self.users.find_by_username(&params.username).await? else {
            verify_dummy(params.password).await;
            warn!("login for unknown username");
            return Err(AppError::invalid_credentials());
        };

        let ok = verify_password_blocking(params.password, user.password_hash.clone()).await?;
        if !ok {
            warn!(user_id = %user.id, "login with wrong password");
            return Err(AppError::invalid_credentials());
        }

        let access_token = self.keys.sign(&user)?;
        info!(user_id = %user.id, "user logged in");
        Ok(LoginOutcome { user, access_token })
    }
}
