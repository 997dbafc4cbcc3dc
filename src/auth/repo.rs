use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::auth::repo_types::{User, UserRow};
use crate::error::{AppError, AppResult};

/// Persistence boundary for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user. Unique violations surface as `AppError::Conflict`.
    async fn save(&self, user: &User) -> AppResult<User>;

    /// Overwrite every mutable column of an existing user.
    async fn update(&self, user: &User) -> AppResult<User>;

    /// Replace only the password hash. Returns whether a row was affected.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<bool>;
}

pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, first_name, last_name, address,
                   gender, age, date_of_birth, email
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        debug!(user_id = %id, found = row.is_some(), "find_by_id");
        Ok(row.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, first_name, last_name, address,
                   gender, age, date_of_birth, email
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        debug!(found = row.is_some(), "find_by_username");
        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, first_name, last_name, address,
                   gender, age, date_of_birth, email
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        debug!(found = row.is_some(), "find_by_email");
        Ok(row.map(User::from))
    }

    async fn save(&self, user: &User) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, password_hash, first_name, last_name,
                               address, gender, age, date_of_birth, email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, username, password_hash, first_name, last_name, address,
                      gender, age, date_of_birth, email
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.address)
        .bind(&user.gender)
        .bind(user.age)
        .bind(user.date_of_birth)
        .bind(&user.email)
        .fetch_one(&self.db)
        .await
        .map_err(map_write_error)?;
        debug!(user_id = %row.id, "user row inserted");
        Ok(row.into())
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET username = $2, password_hash = $3, first_name = $4, last_name = $5,
                address = $6, gender = $7, age = $8, date_of_birth = $9, email = $10,
                updated_at = now()
            WHERE id = $1
            RETURNING id, username, password_hash, first_name, last_name, address,
                      gender, age, date_of_birth, email
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.address)
        .bind(&user.gender)
        .bind(user.age)
        .bind(user.date_of_birth)
        .bind(&user.email)
        .fetch_optional(&self.db)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| AppError::NotFound("User not found for update.".into()))?;
        debug!(user_id = %row.id, "user row updated");
        Ok(row.into())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.db)
        .await?;
        debug!(user_id = %id, affected = result.rows_affected(), "update_password");
        Ok(result.rows_affected() > 0)
    }
}

fn map_write_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            conflict_for_constraint(db.constraint())
        }
        _ => AppError::Infrastructure(e),
    }
}

/// The unique constraints are the authoritative uniqueness check; name them back to messages.
pub(crate) fn conflict_for_constraint(constraint: Option<&str>) -> AppError {
    match constraint {
        Some("users_username_key") => AppError::username_taken(),
        Some("users_email_key") => AppError::email_taken(),
        _ => AppError::Conflict("User already exists.".into()),
    }
}
