use std::sync::Arc;

use time::Date;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{is_valid_email, normalize_email};
use crate::auth::password::hash_password_blocking;
use crate::auth::repo::UserRepository;
use crate::auth::repo_types::User;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct RegisterUserParams {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub gender: String,
    pub age: Option<i32>,
    pub date_of_birth: Option<Date>,
    pub email: String,
}

pub struct RegisterUser {
    users: Arc<dyn UserRepository>,
}

impl RegisterUser {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    #[instrument(skip_all, fields(username = %params.username))]
    pub async fn execute(&self, params: RegisterUserParams) -> AppResult<User> {
        if params.password != params.confirm_password {
            return Err(AppError::validation("Passwords do not match."));
        }

        let required = [
            ("Username", &params.username),
            ("Password", &params.password),
            ("First name", &params.first_name),
            ("Last name", &params.last_name),
            ("Address", &params.address),
            ("Gender", &params.gender),
            ("Email", &params.email),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(AppError::validation(format!("{field} is required.")));
        }

        let email = normalize_email(&params.email);
        if !is_valid_email(&email) {
            return Err(AppError::validation("Invalid email address."));
        }

        // Pre-checks give precise messages; the unique constraints on save are authoritative.
        if self.users.find_by_username(&params.username).await?.is_some() {
            warn!("username already taken");
            return Err(AppError::username_taken());
        }
        if self.users.find_by_email(&email).await?.is_some() {
            warn!("email already registered");
            return Err(AppError::email_taken());
        }

        let password_hash = hash_password_blocking(params.password).await?;

        let user = User {
            id: Uuid::new_v4(),
            username: params.username,
            password_hash,
            first_name: params.first_name,
            last_name: params.last_name,
            address: params.address,
            gender: params.gender,
            age: params.age,
            date_of_birth: params.date_of_birth,
            email,
        };

        let saved = self.users.save(&user).await?;
        info!(user_id = %saved.id, "user registered");
        Ok(saved)
    }
}
