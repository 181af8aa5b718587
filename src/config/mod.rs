//! Tries to create an `AppConfig` from config files and the environment.
//! Sources are layered with `figment`, later sources override earlier ones:
//! `base.toml`, `{environment}.toml`, `APP_*` variables and finally the legacy `DB_*`
//! variables.
//!
//! The config is built once at startup and handed to whoever needs it.

mod error;
mod types;

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use tracing::info;

pub use error::{ConfigError, ConfigResult};
pub use types::{AppConfig, DbConfig, Environment, NetConfig, SslMode};

/// Legacy deployment variables, mapped onto `db_config` keys.
const LEGACY_DB_VARS: [(&str, &str); 4] = [
    ("DB_HOST", "db_config.host"),
    ("DB_USER", "db_config.username"),
    ("DB_PASS", "db_config.password"),
    ("DB_NAME", "db_config.db_name"),
];

/// Reads `APP_ENVIRONMENT` (defaults to `local`) and loads the config from `./config`.
pub fn get_config() -> ConfigResult<AppConfig> {
    let base_path = std::env::current_dir()?;
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()?;

    load_config(&base_path.join("config"), environment)
}

pub fn load_config(config_dir: &Path, environment: Environment) -> ConfigResult<AppConfig> {
    info!(
        "{:<20} - {}",
        "Initializing config",
        environment.as_ref().to_lowercase()
    );
    let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

    let mut figment = Figment::new()
        .merge(Toml::file(config_dir.join("base.toml")))
        .merge(Toml::file(config_dir.join(environment_filename)))
        // E.g. `APP_NET_CONFIG__APP_PORT=9000` sets `net_config.app_port`
        .merge(Env::prefixed("APP_").split("__"));

    for (var, key) in LEGACY_DB_VARS {
        if let Ok(value) = std::env::var(var) {
            figment = figment.merge(Serialized::default(key, value));
        }
    }

    Ok(figment.extract()?)
}

// ###################################
// ->   TESTS
// ###################################
