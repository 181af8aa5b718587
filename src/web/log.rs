use axum::http::{Method, StatusCode, Uri};
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use super::error::ClientError;
use crate::web::Error;

pub fn log_request(
    uuid: Uuid,
    req_method: Method,
    uri: Uri,
    status_code: StatusCode,
    web_error: Option<&Error>,
    client_status_and_error: Option<(StatusCode, ClientError)>,
) {
    let logline = LogLine::new(
        uuid,
        req_method,
        uri,
        status_code,
        web_error,
        client_status_and_error,
    );

    debug!("LOGLINE: {}", json!(logline));
}

#[derive(Serialize)]
struct LogLine {
    timestamp: String,
    uuid: String,

    req_method: String,
    uri: String,
    status_code: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    client_error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_error_data: Option<String>,
}

impl LogLine {
    fn new(
        uuid: Uuid,
        req_method: Method,
        uri: Uri,
        status_code: StatusCode,
        web_error: Option<&Error>,
        client_status_and_error: Option<(StatusCode, ClientError)>,
    ) -> Self {
        let client_error_type = client_status_and_error
            .as_ref()
            .map(|(_, ce)| ce.as_ref().to_string());
        // The client status wins over the placeholder status set in `Error::into_response`.
        let status_code = client_status_and_error
            .map(|(sc, _)| sc)
            .unwrap_or(status_code)
            .as_u16();

        LogLine {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uuid: uuid.to_string(),
            req_method: req_method.to_string(),
            uri: uri.to_string(),
            status_code,
            client_error_type,
            web_error_type: web_error.map(|we| we.as_ref().to_string()),
            web_error_data: web_error.map(|we| we.to_string()),
        }
    }
}
