use std::sync::Arc;

use axum::{
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::web::{log, Error, REQUEST_ID_HEADER};

/// Turns an `Error` stashed by `Error::into_response` into the client-facing JSON body
/// and emits one log line per request.
pub async fn response_mapper(
    req_method: Method,
    uri: Uri,
    headers: HeaderMap,
    resp: Response,
) -> Response {
    let req_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .and_then(|id| Uuid::parse_str(id).ok())
        .unwrap_or_else(Uuid::new_v4);

    let web_error = resp.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    let err_resp = client_status_and_error.as_ref().map(|(status, cl_err)| {
        if status.is_server_error() {
            if let Some(er) = web_error {
                tracing::error!("SERVER ERROR: {er} ID: {req_id}");
            }
        }
        let client_error_body = json!({ "error": cl_err.to_string() });

        (*status, Json(client_error_body)).into_response()
    });

    log::log_request(
        req_id,
        req_method,
        uri,
        resp.status(),
        web_error,
        client_status_and_error,
    );

    err_resp.unwrap_or(resp)
}
