use std::env;

use thiserror::Error;

use crate::suggestions::completion::{HttpCompletionConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DB_PATH: &str = "tasks.redb";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Server configuration, read once at boot and handed to whatever needs it.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub db_path: String,
    pub llm_api_key: Option<String>,
    pub llm_endpoint: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

impl Settings {
    pub fn from_env() -> Result<Settings, SettingsError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Settings, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| SettingsError::Invalid { key: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let llm_timeout_secs = match get("LLM_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| SettingsError::Invalid { key: "LLM_TIMEOUT_SECS", value })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Settings {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            db_path: get("TODO_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            llm_api_key: get("GROQ_API_KEY"),
            llm_endpoint: get("LLM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            llm_model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_timeout_secs,
        })
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn completion_config(&self) -> HttpCompletionConfig {
        HttpCompletionConfig {
            endpoint: self.llm_endpoint.clone(),
            api_key: self.llm_api_key.clone(),
            timeout_secs: self.llm_timeout_secs,
        }
    }
}
