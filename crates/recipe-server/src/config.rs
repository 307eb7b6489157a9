//! Server configuration read from the environment.

use std::path::PathBuf;

/// Where the server stores data and listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// SQLite database file
    pub db_path: PathBuf,
    /// Interface to bind
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("recipes.db"),
            bind: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Reads `RECIPES_DB_PATH`, `RECIPES_BIND` and `RECIPES_PORT`, keeping the
    /// default for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("RECIPES_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Some(bind) = lookup("RECIPES_BIND") {
            config.bind = bind;
        }
        if let Some(val) = lookup("RECIPES_PORT") {
            match val.parse() {
                Ok(port) => config.port = port,
                Err(_) => tracing::warn!(value = %val, "ignoring unparsable RECIPES_PORT"),
            }
        }

        config
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
