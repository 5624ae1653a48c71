//! Axum front for the envelope handlers.
//!
//! `/{function}` adapts a plain HTTP request; `/invoke/{function}` takes the
//! raw envelope JSON the serverless runtime would deliver.

use axum::body::{Body, Bytes};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderName, HeaderValue, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, any, get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::api::{self, Function};
use crate::app::SharedState;
use crate::envelope::{HttpMethod, RequestEnvelope, ResponseEnvelope};
use crate::error::HandlerError;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    let mut router = Router::new()
        .route("/status", get(status_handler))
        .route("/invoke/{function}", post(invoke));

    for function in Function::ALL {
        router = router.route(&format!("/{}", function.name()), function_route(function));
    }

    router
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}

/// Request span without the query string, which can carry an OAuth code.
fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}

async fn status_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Every method goes to the handler, which answers 405 itself.
fn function_route(function: Function) -> MethodRouter<SharedState> {
    any(
        move |State(state): State<SharedState>,
              method: Method,
              RawQuery(query): RawQuery,
              body: Bytes| async move {
            let body = match String::from_utf8(body.to_vec()) {
                Ok(body) => body,
                Err(_) => {
                    return into_http(
                        HandlerError::bad_request("Invalid request body: not valid UTF-8")
                            .into_response(),
                    );
                }
            };
            let request = to_envelope(&method, query.as_deref(), body);
            into_http(api::dispatch(function, state.config(), &request).await)
        },
    )
}

async fn invoke(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    request: Result<Json<RequestEnvelope>, JsonRejection>,
) -> Response {
    let Some(function) = Function::from_name(&name) else {
        tracing::warn!(function = %name, "Unknown function");
        return into_http(ResponseEnvelope::error(
            404,
            &format!("Unknown function: {name}"),
        ));
    };
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return into_http(
                HandlerError::bad_request(format!(
                    "Invalid request envelope: {}",
                    rejection.body_text()
                ))
                .into_response(),
            );
        }
    };
    Json(api::dispatch(function, state.config(), &request).await).into_response()
}

fn to_envelope(method: &Method, query: Option<&str>, body: String) -> RequestEnvelope {
    let mut request = RequestEnvelope::new(HttpMethod::from(method.as_str().to_string()));
    if let Some(query) = query {
        request.query_string_parameters = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
    }
    if !body.is_empty() {
        request.body = Some(body);
    }
    request
}

fn into_http(envelope: ResponseEnvelope) -> Response {
    let mut response = Response::new(Body::from(envelope.body));
    *response.status_mut() =
        StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let headers = response.headers_mut();
    for (name, value) in &envelope.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Dropping invalid response header"),
        }
    }
    response
}
