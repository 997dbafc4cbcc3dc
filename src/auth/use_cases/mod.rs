//! Authentication use cases: validation and orchestration over a `UserRepository`.

mod forgot_password;
mod login;
mod register;

pub use forgot_password::{ForgotPassword, ForgotPasswordParams, ResetOutcome};
pub use login::{LoginUser, LoginUserParams};
pub use register::{RegisterUser, RegisterUserParams};

use lazy_static::lazy_static;
use regex::Regex;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
