use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderName, Request, Response},
    middleware, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{MakeSpan, OnRequest, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::App;

use super::{midware, routes::routes, REQUEST_ID_HEADER};

/// The core async function returning a future that will serve this application.
///
/// Accepts an `App` holding the `TcpListener` and the `AppState` and sets up a TraceLayer that
/// provides console logging.
///
/// Current implementation might return an IO error from `axum::serve`
pub async fn serve(app: App) -> std::io::Result<()> {
    let App {
        app_state,
        listener,
    } = app;

    axum::serve(listener, app_router(routes(app_state))).await
}

/// Wraps `router` in the middleware stack every response goes through.
fn app_router(router: Router) -> Router {
    let x_request_id: HeaderName = HeaderName::from_static(REQUEST_ID_HEADER);

    router.layer(
        ServiceBuilder::new()
            // Set UUID per request
            .layer(SetRequestIdLayer::new(
                x_request_id.clone(),
                MakeRequestUuid,
            ))
            // Responses go through the stack from the bottom up, so the UUID gets copied onto
            // whatever the response mapper below produced.
            .layer(PropagateRequestIdLayer::new(x_request_id))
            .layer(build_trace_layer())
            // The static frontend lives on another origin.
            .layer(CorsLayer::permissive())
            // Replaces error responses with the client JSON body, reads the UUID from the request.
            .layer(middleware::map_response(midware::response_mapper)),
    )
}

/// A helper function that sets up the `tower_http::TraceLayer` - tracing configuration.
fn build_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    impl MakeSpan<Body> + Clone,
    impl OnRequest<Body> + Clone,
    impl OnResponse<Body> + Clone,
> {
    TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            let uuid = req
                .headers()
                .get(REQUEST_ID_HEADER)
                .map(|uuid| uuid.to_str().unwrap_or("").to_string());

            tracing::error_span!(
                "serve",
                id = uuid,
                method = req.method().to_string(),
                path = req.uri().path()
            )
        })
        .on_request(|req: &Request<Body>, _s: &Span| tracing::info!("START @ {}", req.uri()))
        .on_response(|res: &Response<Body>, latency: Duration, _s: &Span| {
            let st_code = res.status().as_u16();

            if (500..=599).contains(&st_code) {
                tracing::error!("END in: {:?} - STATUS: {st_code}", latency)
            } else {
                tracing::info!("END in: {:?} - STATUS: {st_code}", latency)
            }
        })
}
