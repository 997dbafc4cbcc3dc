use anyhow::Context;

const INSECURE_DEFAULT_SECRET: &str = "super_secret_default_key_please_change_this_in_production";

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database = DatabaseConfig {
            host: env_or("DB_HOST", "localhost"),
            port: parse_env("DB_PORT", 5432)?,
            user: env_or("DB_USER", "postgres"),
            password: env_or("DB_PASSWORD", "password"),
            name: env_or("DB_NAME", "base_db"),
            max_connections: parse_env("DB_MAX_CONNECTIONS", 5)?,
        };

        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.trim().is_empty() => s,
            _ => {
                tracing::warn!("JWT_SECRET is not set; using a default, insecure signing key");
                INSECURE_DEFAULT_SECRET.to_string()
            }
        };

        let cors_origins = parse_cors_origins(&env_or("CORS_ORIGINS", "http://localhost:3000"))?;

        Ok(Self {
            database,
            jwt: JwtConfig { secret },
            host: env_or("HOST", "0.0.0.0"),
            port: parse_env("PORT", 4000)?,
            cors_origins,
        })
    }
}

/// Comma-separated origin list. `*` is refused since credentials are allowed.
fn parse_cors_origins(raw: &str) -> anyhow::Result<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();
    if origins.iter().any(|o| o == "*") {
        anyhow::bail!("CORS_ORIGINS must list explicit origins, \"*\" is not allowed");
    }
    Ok(origins)
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        database: DatabaseConfig {
            host: "localhost".into(),
            port: 5432,
            user: "postgres".into(),
            password: "postgres".into(),
            name: "postgres".into(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test-secret".into(),
        },
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".into()],
    }
}
