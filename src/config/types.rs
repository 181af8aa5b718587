//! The configuration structs used to build the AppConfig, and their impls.
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::{
    postgres::{PgConnectOptions, PgSslMode},
    ConnectOptions,
};
use strum_macros::AsRefStr;

use crate::config::ConfigError;

const DEFAULT_CONNECT_TIMEOUT_MILLIS: u64 = 5000;

// ###################################
// ->   STRUCTS
// ###################################
#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub net_config: NetConfig,
    pub db_config: DbConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DbConfig {
    pub username: String,
    pub password: SecretString,
    pub port: u16,
    pub host: String,
    pub db_name: String,
    #[serde(default)]
    pub ssl_mode: SslMode,
    #[serde(default = "default_connect_timeout_millis")]
    pub connect_timeout_millis: u64,
}

/// Written in lowercase in the config files, like libpq's `sslmode`.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SslMode {
    Disable,
    #[default]
    Prefer,
    Require,
}

// ###################################
// ->   IMPLs
// ###################################
impl DbConfig {
    /// Options for the pool, connecting to `db_name`.
    pub fn connection_options(&self) -> PgConnectOptions {
        self.connection_options_without_db().database(&self.db_name)
    }

    /// Options for the server only, used to create databases. `~/.pgpass` is never read.
    pub fn connection_options_without_db(&self) -> PgConnectOptions {
        PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(self.password.expose_secret())
            .ssl_mode(self.ssl_mode.into())
            .log_statements(tracing::log::LevelFilter::Trace)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_millis)
    }
}

impl From<SslMode> for PgSslMode {
    fn from(mode: SslMode) -> Self {
        match mode {
            SslMode::Disable => PgSslMode::Disable,
            SslMode::Prefer => PgSslMode::Prefer,
            SslMode::Require => PgSslMode::Require,
        }
    }
}

fn default_connect_timeout_millis() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MILLIS
}

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail(value)),
        }
    }
}

// ###################################
// ->   TESTS
// ###################################
