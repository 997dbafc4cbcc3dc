use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::auth::use_cases::{ForgotPasswordParams, LoginUserParams, RegisterUserParams};

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, keeping only the date.
mod date_or_datetime {
    use serde::{de::Error, Deserialize, Deserializer};
    use time::{
        format_description::well_known::Rfc3339, macros::format_description, Date,
        OffsetDateTime,
    };

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        if let Ok(date) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
            return Ok(Some(date));
        }
        OffsetDateTime::parse(raw, &Rfc3339)
            .map(|dt| Some(dt.date()))
            .map_err(|_| D::Error::custom(format!("invalid dateOfBirth: {raw:?}")))
    }
}

/// Request body for user registration. Missing text fields arrive empty and are
/// reported by the use case.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub gender: String,
    pub age: Option<i32>,
    #[serde(deserialize_with = "date_or_datetime::deserialize")]
    pub date_of_birth: Option<Date>,
    pub email: String,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for the simulated password reset.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

/// Response returned after register, login and profile lookup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUser>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
        }
    }
}

impl From<RegisterRequest> for RegisterUserParams {
    fn from(r: RegisterRequest) -> Self {
        Self {
            username: r.username,
            password: r.password,
            confirm_password: r.confirm_password,
            first_name: r.first_name,
            last_name: r.last_name,
            address: r.address,
            gender: r.gender,
            age: r.age,
            date_of_birth: r.date_of_birth,
            email: r.email,
        }
    }
}

impl From<LoginRequest> for LoginUserParams {
    fn from(r: LoginRequest) -> Self {
        Self {
            username: r.username,
            password: r.password,
        }
    }
}

impl From<ForgotPasswordRequest> for ForgotPasswordParams {
    fn from(r: ForgotPasswordRequest) -> Self {
        Self {
            email: r.email,
            new_password: r.new_password,
            confirm_new_password: r.confirm_new_password,
        }
    }
}
