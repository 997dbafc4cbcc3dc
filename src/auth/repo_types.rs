use sqlx::FromRow;
use time::Date;
use uuid::Uuid;

/// Domain user record. Storage timestamps stay in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String, // Argon2 PHC string
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub gender: String,
    pub age: Option<i32>,
    pub date_of_birth: Option<Date>,
    pub email: String,
}

/// Row of the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub gender: String,
    pub age: Option<i32>,
    pub date_of_birth: Option<Date>,
    pub email: String,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            username: r.username,
            password_hash: r.password_hash,
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
