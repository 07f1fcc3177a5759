//! JSON envelopes shared by every route.
//!
//! Success bodies are `{"status": "ok", ...data}`; errors are
//! `{"status": "error", "error": {"code", "message"}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
struct Success<T> {
    status: &'static str,
    #[serde(flatten)]
    data: T,
}

#[derive(Serialize)]
struct Failure {
    status: &'static str,
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

pub fn success<T: Serialize>(code: StatusCode, data: T) -> Response {
    (code, Json(Success { status: "ok", data })).into_response()
}

pub fn error(code: StatusCode, message: impl Into<String>) -> Response {
    let body = Failure {
        status: "error",
        error: ErrorBody {
            code: code.as_u16(),
            message: message.into(),
        },
    };
    (code, Json(body)).into_response()
}
