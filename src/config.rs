use crate::tickets::{BookSize, CountMode, TicketError};
use std::{env, path::PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PORT value {value:?}: {source}")]
    Port {
        value: String,
        source: std::num::ParseIntError,
    },
    #[error("invalid {key}: {source}")]
    Tickets {
        key: &'static str,
        source: TicketError,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub book_size: BookSize,
    pub count_mode: CountMode,
    pub passcode: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            book_size: BookSize::default(),
            count_mode: CountMode::default(),
            passcode: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match var("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|source| ConfigError::Port { value, source })?,
            None => defaults.port,
        };

        let data_path = var("APP_DATA_PATH").map(PathBuf::from).unwrap_or(defaults.data_path);

        let book_size = match var("TICKET_BOOK_SIZE") {
            Some(value) => value.parse::<BookSize>().map_err(|source| ConfigError::Tickets {
                key: "TICKET_BOOK_SIZE",
                source,
            })?,
            None => defaults.book_size,
        };

        let count_mode = match var("TICKET_COUNT_MODE") {
            Some(value) => value.parse::<CountMode>().map_err(|source| ConfigError::Tickets {
                key: "TICKET_COUNT_MODE",
                source,
            })?,
            None => defaults.count_mode,
        };

        let passcode = normalize_passcode(var("POS_PASSCODE"));
        if passcode.is_none() {
            warn!("POS_PASSCODE not set, shift changes will not require a passcode");
        }

        Ok(Self {
            port,
            data_path,
            book_size,
            count_mode,
            passcode,
        })
    }
}

fn normalize_passcode(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn var(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) => Some(value),
        Err(_) => {
            info!("{key} not set, using default");
            None
        }
    }
}
