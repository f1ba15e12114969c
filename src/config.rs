use std::{env, path::PathBuf, str::FromStr};

use log::{info, warn};
use thiserror::Error;

pub const STORE_VAR: &str = "LOCUS_STORE";
pub const USER_VAR: &str = "LOCUS_USER";
pub const LOG_VAR: &str = "LOCUS_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";
const DEFAULT_USER: u64 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {key} value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

pub struct Config {
    pub store_path: PathBuf,
    pub user_id: u64,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store_path = lookup(STORE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let path = default_store_path();
                info!("{STORE_VAR} not set, using {}", path.display());
                path
            });

        let user_id = try_parse(USER_VAR, lookup(USER_VAR), DEFAULT_USER)?;

        Ok(Self {
            store_path,
            user_id,
        })
    }
}

fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| {
            warn!("no local data directory, storing next to the working directory");
            PathBuf::from(".")
        })
        .join("locus")
        .join("store.json")
}

fn try_parse<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    let Some(value) = value else {
        info!("{key} not set, using default: {default}");
        return Ok(default);
    };

    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value,
        reason: e.to_string(),
    })
}
