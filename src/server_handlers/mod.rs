pub mod catalog;
pub mod docs;
pub mod generate;
pub mod saved;

pub use catalog::*;
pub use docs::*;
pub use generate::*;
pub use saved::*;

use actix_web::HttpResponse;
use actix_web::error::BlockingError;
use serde_json::json;

use crate::error::ScheduleError;

/// Traduce un `ScheduleError` a la respuesta HTTP `{error, kind}`.
pub fn error_response(err: &ScheduleError) -> HttpResponse {
    let body = json!({"error": err.to_string(), "kind": err.kind()});
    match err {
        ScheduleError::InvalidInput(_) => HttpResponse::BadRequest().json(body),
        ScheduleError::NoResolvableCourses { .. } => HttpResponse::NotFound().json(body),
        _ => {
            tracing::error!(event = "request_failed", kind = err.kind(), error = %err);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

pub(crate) fn bad_body(e: serde_json::Error) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({"error": format!("invalid JSON body: {}", e), "kind": "invalid_input"}))
}

pub(crate) fn blocking_failed(e: BlockingError) -> HttpResponse {
    tracing::error!(event = "blocking_task_failed", error = %e);
    HttpResponse::InternalServerError().json(json!({"error": format!("task join error: {}", e), "kind": "internal"}))
}
