//! HTTP protocol adapter.
//!
//! The HTTP transport itself (framing, keep-alive, HTTP/1 vs HTTP/2) belongs
//! to axum/hyper; this module only translates between HTTP requests and the
//! protocol-agnostic domain model.

pub mod server;

pub use server::HttpServer;

use axum::http::StatusCode;

use crate::model::Status;

/// HTTP status code for an abstract status.
///
/// Total by construction: adding a `Status` variant without extending this
/// match is a compile error.
pub fn status_code(status: Status) -> StatusCode {
    match status {
        Status::Ok => StatusCode::OK,
        Status::NotFound => StatusCode::NOT_FOUND,
        Status::Error => StatusCode::INTERNAL_SERVER_ERROR,
        Status::TemporaryRedirection => StatusCode::TEMPORARY_REDIRECT,
        Status::PermanentRedirection => StatusCode::PERMANENT_REDIRECT,
    }
}
