use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use super::types::DataParsingError;

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("data parsing error: {0}")]
    DataParsing(#[from] DataParsingError),

    #[error("model error: {0}")]
    Model(#[from] crate::model::Error),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::DataParsing(_) => (StatusCode::BAD_REQUEST, InvalidEmail),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, ServiceError),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// The only error information that is ever sent to the client.
#[derive(Debug, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Valid email is required")]
    InvalidEmail,
    #[display("Service Error!")]
    ServiceError,
}
