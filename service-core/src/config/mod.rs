use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Config {
    /// Load the shared configuration.
    ///
    /// Sources, lowest precedence first: `configuration.{toml,yaml,json}` in the
    /// working directory, `APP__*` variables, then the bare `PORT` variable.
    /// An empty `PORT` counts as unset.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::build(env::var("PORT").ok())
    }

    fn build(port_override: Option<String>) -> Result<Self, AppError> {
        let port_override = port_override.filter(|port| !port.trim().is_empty());
        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .set_override_option("port", port_override)?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
