use std::sync::Arc;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo::UserRepository;
use crate::auth::use_cases::{ForgotPassword, LoginUser, RegisterUser};
use crate::config::AppConfig;

/// Shared per-process state. Use cases are built once and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub users: Arc<dyn UserRepository>,
    pub register_user: Arc<RegisterUser>,
    pub login_user: Arc<LoginUser>,
    pub forgot_password: Arc<ForgotPassword>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, users: Arc<dyn UserRepository>) -> Self {
        let jwt = JwtKeys::from_secret(&config.jwt.secret);
        Self {
            register_user: Arc::new(RegisterUser::new(users.clone())),
            login_user: Arc::new(LoginUser::new(users.clone(), jwt.clone())),
            forgot_password: Arc::new(ForgotPassword::new(users.clone())),
            config,
            jwt,
            users,
        }
    }

    #[cfg(test)]
    pub fn fake() -> (Self, Arc<crate::auth::memory::InMemoryUserRepository>) {
        let repo = Arc::new(crate::auth::memory::InMemoryUserRepository::new());
        let state = Self::new(Arc::new(crate::config::test_config()), repo.clone());
        (state, repo)
    }
}
