pub mod config;
pub mod error;
pub mod handlers;
pub mod validation;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use tts_core::SpeechSynthesizer;

#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup and shared by every request.
    pub synth: Arc<dyn SpeechSynthesizer>,
}

impl AppState {
    pub fn new(synth: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { synth }
    }
}

/// Build the HTTP application: `POST /tts`, CORS preflight on every path, 404 elsewhere.
pub fn router(state: AppState) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(add_request_id))
        .layer(axum::middleware::from_fn(cors))
        .into_inner();

    Router::new()
        .route(
            "/tts",
            post(handlers::tts_endpoint).fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
        // Any non-empty text is accepted, whatever its size.
        .layer(DefaultBodyLimit::disable())
        .layer(middleware_stack)
        .with_state(state)
}

/// Answer preflight requests on any path and let browsers read every response.
async fn cors(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        let headers = response.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );
        return response;
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .entry(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .or_insert(HeaderValue::from_static("*"));
    response
}

// Request ID middleware for tracing
async fn add_request_id(mut request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let header_value = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = &header_value {
        request.headers_mut().insert("x-request-id", value.clone());
    }

    let span = tracing::info_span!("request", request_id = %request_id);
    let mut response = next.run(request).instrument(span).await;
    if let Some(value) = header_value {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}
