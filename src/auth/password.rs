use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

use crate::error::{AppError, AppResult};

// Argon2id work factor: memory in KiB, iterations, lanes.
const MEMORY_COST_KIB: u32 = 19 * 1024;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;

lazy_static! {
    // Verified against when a username is unknown so both login failures cost the same.
    // Only ever touched from the blocking pool.
    static ref DUMMY_HASH: Option<String> = hash_password("not-a-real-password").ok();
}

#[cfg(test)]
tokio::task_local! {
    /// Counts Argon2 operations started by the current task.
    pub(crate) static ARGON2_RUNS: std::cell::Cell<usize>;
}

fn note_argon2_run() {
    #[cfg(test)]
    let _ = ARGON2_RUNS.try_with(|c| c.set(c.get() + 1));
}

fn argon2() -> anyhow::Result<Argon2<'static>> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| anyhow::anyhow!("argon2 params: {e}"))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2()?
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    // Parameters are read from the PHC string, so older hashes still verify.
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Hashes on the blocking pool.
pub async fn hash_password_blocking(plain: String) -> AppResult<String> {
    note_argon2_run();
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(AppError::Internal)
}

/// Verifies on the blocking pool.
pub async fn verify_password_blocking(plain: String, hash: String) -> AppResult<bool> {
    note_argon2_run();
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(AppError::Internal)
}

/// Burns one verification against a throwaway hash. The result is ignored.
pub async fn verify_dummy(plain: String) {
    note_argon2_run();
    let _ = tokio::task::spawn_blocking(move || {
        if let Some(hash) = DUMMY_HASH.as_ref() {
            let _ = verify_password(&plain, hash);
        }
    })
    .await;
}

/// Builds the dummy hash ahead of the first unknown-username login.
pub async fn prime_dummy_hash() {
    let _ = tokio::task::spawn_blocking(|| lazy_static::initialize(&DUMMY_HASH)).await;
}
