use crate::{config, database};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("database error: {0}")]
    Database(#[from] database::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
