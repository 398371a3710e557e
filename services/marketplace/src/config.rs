use std::str::FromStr;

use serde::{Deserialize, Serialize};

use leadbridge_common::{env_or, env_string, AppError, DatabaseConfig, JwtConfig, ServerConfig};

pub const MIN_PAYMENT_CODE_LENGTH: usize = 4;
pub const MAX_PAYMENT_CODE_LENGTH: usize = 9;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(AppError::Validation(format!(
                "Unknown STORAGE_BACKEND '{}', expected 'postgres' or 'memory'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Bookings with well-formed contact details start VERIFIED.
    pub lead_auto_verify: bool,
    pub payment_code_length: usize,
    pub currency: String,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            lead_auto_verify: true,
            payment_code_length: 6,
            currency: "INR".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub storage: StorageBackend,
    pub lifecycle: LifecycleConfig,
}

impl MarketplaceConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let storage = env_string("STORAGE_BACKEND", "postgres").parse()?;
        let payment_code_length: usize = env_or("PAYMENT_CODE_LENGTH", 6);

        Ok(Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            storage,
            lifecycle: LifecycleConfig {
                lead_auto_verify: env_or("LEAD_AUTO_VERIFY", true),
                payment_code_length: payment_code_length
                    .clamp(MIN_PAYMENT_CODE_LENGTH, MAX_PAYMENT_CODE_LENGTH),
                currency: env_string("CURRENCY", "INR"),
            },
        })
    }
}
