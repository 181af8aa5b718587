//! The persistence side of subscriptions.

mod subscriber;

pub use subscriber::{SubscribeOutcome, Subscriber, SubscriberStore};

// ###################################
// ->   ERROR
// ###################################
pub type ModelResult<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}
