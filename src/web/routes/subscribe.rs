use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use tracing::Span;

use crate::{
    model::SubscribeOutcome,
    web::{
        types::{SubscribeRequest, ValidEmail},
        WebResult,
    },
    AppState,
};

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscribeResult {
    Subscribed,
    AlreadySubscribed,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub result: SubscribeResult,
    pub email: ValidEmail,
}

impl SubscribeResponse {
    /// `201 CREATED` for a new row, `200 OK` when the email was already there.
    fn with_status(outcome: &SubscribeOutcome, email: ValidEmail) -> (StatusCode, Json<Self>) {
        let (status, result) = match outcome {
            SubscribeOutcome::Inserted(_) => (StatusCode::CREATED, SubscribeResult::Subscribed),
            SubscribeOutcome::AlreadyPresent => (StatusCode::OK, SubscribeResult::AlreadySubscribed),
        };

        (status, Json(SubscribeResponse { result, email }))
    }
}

/// The body is read as raw bytes: a non-JSON content type or a missing, malformed or
/// non-object body is the same as a missing email and ends in `400`.
#[tracing::instrument(
    name = "Subscribing an email",
    skip(app_state, headers, body),
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn subscribe(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> WebResult<(StatusCode, Json<SubscribeResponse>)> {
    let request = SubscribeRequest::from_body(&headers, &body);
    let email = ValidEmail::try_from(&request)?;
    Span::current().record("subscriber_email", email.as_ref());

    let outcome = app_state.subscriber_store.ensure_subscribed(&email).await?;

    Ok(SubscribeResponse::with_status(&outcome, email))
}
