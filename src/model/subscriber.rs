use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::{info, Instrument};

use crate::{database::DbManager, model::ModelResult, web::types::ValidEmail};

/// A row of the `subscribers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// What happened when we tried to record an email.
#[derive(Debug)]
pub enum SubscribeOutcome {
    Inserted(Subscriber),
    AlreadyPresent,
}

#[derive(Clone, Debug)]
pub struct SubscriberStore {
    db: PgPool,
}

impl SubscriberStore {
    pub fn new(dm: &DbManager) -> Self {
        Self {
            db: dm.db().clone(),
        }
    }

    /// Records `email` unless it is already present.
    ///
    /// The unique constraint on `email` decides the outcome atomically, so concurrent calls
    /// with the same address produce exactly one `Inserted`.
    pub async fn ensure_subscribed(&self, email: &ValidEmail) -> ModelResult<SubscribeOutcome> {
        let q_span = tracing::info_span!("Inserting subscriber into the database");

        let inserted: Option<Subscriber> = sqlx::query_as(
            r#"
            INSERT INTO subscribers (email)
            VALUES ($1)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, created_at
        "#,
        )
        .bind(email.as_ref())
        .fetch_optional(&self.db)
        .instrument(q_span)
        .await?;

        match inserted {
            Some(subscriber) => {
                info!("{:<20} - id: {}", "New subscriber", subscriber.id);
                Ok(SubscribeOutcome::Inserted(subscriber))
            }
            None => {
                info!("{:<20} - nothing inserted", "Already subscribed");
                Ok(SubscribeOutcome::AlreadyPresent)
            }
        }
    }

    pub async fn find_by_email(&self, email: &ValidEmail) -> ModelResult<Option<Subscriber>> {
        let subscriber = sqlx::query_as(
            r#"SELECT id, email, created_at FROM subscribers
        WHERE email = $1"#,
        )
        .bind(email.as_ref())
        .fetch_optional(&self.db)
        .await?;

        Ok(subscriber)
    }

    pub async fn count(&self) -> ModelResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM subscribers")
            .fetch_one(&self.db)
            .await?;

        Ok(count)
    }
}
