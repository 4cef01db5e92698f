use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::api_json::{OwnerQuery, SavedSchedulesQuery};
use crate::server::AppState;
use crate::storage::NewSavedSchedule;

use super::{bad_body, blocking_failed, error_response};

/// POST /saved-schedules
pub async fn save_schedule_handler(state: web::Data<AppState>, body: web::Json<serde_json::Value>) -> impl Responder {
    let new: NewSavedSchedule = match serde_json::from_value(body.into_inner()) {
        Ok(n) => n,
        Err(e) => return bad_body(e),
    };
    let store = state.store.clone();
    match web::block(move || store.save(&new)).await {
        Ok(Ok(saved)) => HttpResponse::Created().json(saved),
        Ok(Err(e)) => error_response(&e),
        Err(e) => blocking_failed(e),
    }
}

/// GET /saved-schedules?user_id=...&term_id=...
pub async fn list_saved_handler(state: web::Data<AppState>, query: web::Query<SavedSchedulesQuery>) -> impl Responder {
    let q = query.into_inner();
    if q.user_id.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({"error": "user_id query parameter is required", "kind": "invalid_input"}));
    }
    let store = state.store.clone();
    match web::block(move || store.list_for_user(&q.user_id, q.term_id)).await {
        Ok(Ok(schedules)) => HttpResponse::Ok().json(json!({"count": schedules.len(), "schedules": schedules})),
        Ok(Err(e)) => error_response(&e),
        Err(e) => blocking_failed(e),
    }
}

/// DELETE /saved-schedules/{id}?user_id=...
pub async fn delete_saved_handler(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<OwnerQuery>,
) -> impl Responder {
    let id = path.into_inner();
    let owner = query.into_inner().user_id;
    let store = state.store.clone();
    match web::block(move || store.delete(&owner, id)).await {
        Ok(Ok(true)) => HttpResponse::Ok().json(json!({"status": "deleted", "id": id})),
        Ok(Ok(false)) => HttpResponse::NotFound().json(json!({"error": format!("saved schedule {} not found", id), "kind": "not_found"})),
        Ok(Err(e)) => error_response(&e),
        Err(e) => blocking_failed(e),
    }
}
