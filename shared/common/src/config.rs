use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Read an environment variable, falling back to `default` when unset or unparsable.
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

pub fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_string("DATABASE_HOST", "localhost"),
            port: env_or("DATABASE_PORT", 5432),
            username: env_string("DATABASE_USERNAME", "leadbridge_user"),
            password: env_string("DATABASE_PASSWORD", "leadbridge_password"),
            database: env_string("DATABASE_NAME", "leadbridge"),
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
        }
    }

    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: u64,
    pub issuer: String,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env_string("JWT_SECRET", "dev-secret-key-change-in-production"),
            expiration_hours: env_or("JWT_EXPIRATION_HOURS", 7 * 24),
            issuer: env_string("JWT_ISSUER", "leadbridge"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_string("SERVER_HOST", "0.0.0.0"),
            port: env_or("SERVER_PORT", 8001),
            cors_origins: env_string("CORS_ORIGINS", "http://localhost:3000")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}
