use crate::errors::ShellError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Connection settings for a store collaborator. Passed explicitly into
/// executor construction; nothing here is read from process-wide state at
/// query time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 27017,
            user: String::new(),
            password: String::new(),
            database: "test".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    host: Option<String>,
    port: Option<u16>,
    user: Option<String>,
    password: Option<String>,
    database: Option<String>,
}

impl StoreConfig {
    /// Loads configuration with explicit precedence: environment variables
    /// override the file, the file overrides defaults.
    ///
    /// # Errors
    /// `Config` when the file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ShellError> {
        let mut cfg = Self::default();
        if let Some(p) = path {
            let text = std::fs::read_to_string(p)
                .map_err(|e| ShellError::Config(format!("{}: {e}", p.display())))?;
            cfg.apply(toml::from_str(&text).map_err(|e| ShellError::Config(e.to_string()))?);
        }
        cfg.apply(Self::from_env());
        Ok(cfg)
    }

    fn from_env() -> PartialConfig {
        PartialConfig {
            host: std::env::var("OPSHELL_HOST").ok(),
            port: std::env::var("OPSHELL_PORT").ok().and_then(|s| s.parse().ok()),
            user: std::env::var("OPSHELL_USER").ok(),
            password: std::env::var("OPSHELL_PASS").ok(),
            database: std::env::var("OPSHELL_DB").ok(),
        }
    }

    fn apply(&mut self, partial: PartialConfig) {
        if let Some(v) = partial.host {
            self.host = v;
        }
        if let Some(v) = partial.port {
            self.port = v;
        }
        if let Some(v) = partial.user {
            self.user = v;
        }
        if let Some(v) = partial.password {
            self.password = v;
        }
        if let Some(v) = partial.database {
            self.database = v;
        }
    }
}
