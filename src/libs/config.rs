//! Configuration management for taskdue.
//!
//! Settings are stored as pretty-printed JSON (`config.json`) in the
//! application data directory and overlaid with environment variables, which
//! may come from a `.env` file loaded at startup:
//!
//! | Variable            | Overrides              |
//! |---------------------|------------------------|
//! | `TASKDUE_BACKEND`   | `backend`              |
//! | `SUPABASE_URL`      | `supabase.url`         |
//! | `SUPABASE_ANON_KEY` | `supabase.anon_key`    |
//!
//! ```rust,no_run
//! use taskdue::libs::config::Config;
//!
//! let config = Config::read()?;
//! println!("backend: {}", config.backend);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::api::supabase::SupabaseConfig;
use crate::libs::messages::Message;
use crate::{msg_error_anyhow, msg_print};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::str::FromStr;

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const ENV_BACKEND: &str = "TASKDUE_BACKEND";
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";

/// Module selectable in the interactive setup.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

/// Which service stores tasks and authenticates users.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Embedded SQLite database in the data directory.
    #[default]
    Local,
    /// Hosted Supabase project (PostgREST + GoTrue).
    Supabase,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Supabase => write!(f, "supabase"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(BackendKind::Local),
            "supabase" => Ok(BackendKind::Supabase),
            other => Err(msg_error_anyhow!(Message::UnknownBackend(other.to_string()))),
        }
    }
}

/// Settings for sessions issued by the local auth store.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Lifetime of a local session in hours.
    pub ttl_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig { ttl_hours: 24 * 7 }
    }
}

impl SessionConfig {
    /// One year.
    pub const MAX_TTL_HOURS: i64 = 24 * 366;

    pub fn is_valid_ttl(hours: i64) -> bool {
        (1..=Self::MAX_TTL_HOURS).contains(&hours)
    }

    pub fn validate(&self) -> Result<()> {
        if !Self::is_valid_ttl(self.ttl_hours) {
            return Err(msg_error_anyhow!(Message::SessionTtlOutOfRange(Self::MAX_TTL_HOURS)));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub supabase: Option<SupabaseConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionConfig>,
}

impl Config {
    /// Reads the configuration from the platform data directory and applies
    /// environment overrides.
    pub fn read() -> Result<Config> {
        let mut config = Self::read_from(&DataStorage::new())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Reads `config.json` from `storage`, falling back to defaults when the
    /// file does not exist.
    pub fn read_from(storage: &DataStorage) -> Result<Config> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        if let Some(session) = &config.session {
            session.validate()?;
        }
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&DataStorage::new())
    }

    pub fn save_to(&self, storage: &DataStorage) -> Result<()> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Overlays values found through `lookup`. Supabase settings are created
    /// when either variable is present.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup(ENV_BACKEND) {
            self.backend = backend.parse()?;
        }

        let url = lookup(ENV_SUPABASE_URL);
        let anon_key = lookup(ENV_SUPABASE_ANON_KEY);
        if url.is_some() || anon_key.is_some() {
            let mut supabase = self.supabase.clone().unwrap_or_default();
            if let Some(url) = url {
                supabase.url = url;
            }
            if let Some(anon_key) = anon_key {
                supabase.anon_key = anon_key;
            }
            self.supabase = Some(supabase);
        }
        Ok(())
    }

    pub fn session_ttl_hours(&self) -> i64 {
        self.session.clone().unwrap_or_default().ttl_hours
    }

    /// Returns complete Supabase settings or explains what is missing.
    pub fn supabase(&self) -> Result<SupabaseConfig> {
        match &self.supabase {
            Some(supabase) if supabase.is_complete() => Ok(supabase.clone()),
            _ => Err(msg_error_anyhow!(Message::SupabaseNotConfigured)),
        }
    }

    /// Interactive setup wizard seeded with the stored configuration.
    pub fn init() -> Result<Self> {
        let mut config = Self::read_from(&DataStorage::new()).unwrap_or_default();

        let backends = [BackendKind::Local, BackendKind::Supabase];
        let current = backends.iter().position(|b| *b == config.backend).unwrap_or(0);
        let selected = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectBackend.to_string())
            .items(&backends.iter().map(|b| b.to_string()).collect::<Vec<_>>())
            .default(current)
            .interact()?;
        config.backend = backends[selected];

        let modules = vec![
            SupabaseConfig::module(),
            ConfigModule {
                key: "session".to_string(),
                name: "Session".to_string(),
            },
        ];
        let defaults: Vec<bool> = modules
            .iter()
            .map(|module| module.key == "supabase" && config.backend == BackendKind::Supabase)
            .collect();
        let selected_modules = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .defaults(&defaults)
            .interact()?;

        for &selection in &selected_modules {
            match modules[selection].key.as_str() {
                "supabase" => config.supabase = Some(SupabaseConfig::init(&config.supabase)?),
                "session" => {
                    let default = config.session.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleSession);
                    let out_of_range = Message::SessionTtlOutOfRange(SessionConfig::MAX_TTL_HOURS).to_string();
                    config.session = Some(SessionConfig {
                        ttl_hours: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptSessionTtl.to_string())
                            .default(default.ttl_hours)
                            .validate_with(|hours: &i64| {
                                if SessionConfig::is_valid_ttl(*hours) {
                                    Ok(())
                                } else {
                                    Err(out_of_range.clone())
                                }
                            })
                            .interact_text()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
