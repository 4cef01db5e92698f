use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::catalog::{CourseCatalog, DepartmentPayload};
use crate::server::AppState;

use super::{bad_body, blocking_failed, error_response};

/// PUT /catalog/{term_id}/{department}
/// Reemplaza el payload cacheado de un departamento.
pub async fn catalog_upsert_handler(
    state: web::Data<AppState>,
    path: web::Path<(i64, String)>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let (term_id, department) = path.into_inner();
    let payload: DepartmentPayload = match serde_json::from_value(body.into_inner()) {
        Ok(p) => p,
        Err(e) => return bad_body(e),
    };

    let catalog = state.catalog.clone();
    let dept = department.clone();
    let res = web::block(move || catalog.upsert_department(term_id, &dept, &payload)).await;
    match res {
        Ok(Ok(n)) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "term_id": term_id,
            "department": department.trim().to_uppercase(),
            "courses": n
        })),
        Ok(Err(e)) => error_response(&e),
        Err(e) => blocking_failed(e),
    }
}

/// GET /catalog/{term_id}
pub async fn catalog_list_handler(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let term_id = path.into_inner();
    let catalog = state.catalog.clone();
    match web::block(move || catalog.list_departments(term_id)).await {
        Ok(Ok(departments)) => HttpResponse::Ok().json(json!({"term_id": term_id, "departments": departments})),
        Ok(Err(e)) => error_response(&e),
        Err(e) => blocking_failed(e),
    }
}

/// GET /catalog/{term_id}/courses/{course_id}
pub async fn catalog_course_handler(state: web::Data<AppState>, path: web::Path<(i64, String)>) -> impl Responder {
    let (term_id, course_id) = path.into_inner();
    let catalog = state.catalog.clone();
    let id = course_id.clone();
    match web::block(move || catalog.find_course(term_id, &id)).await {
        Ok(Ok(Some(course))) => HttpResponse::Ok().json(course),
        Ok(Ok(None)) => HttpResponse::NotFound().json(json!({
            "error": format!("course {} not found for term {}", course_id, term_id),
            "kind": "not_found"
        })),
        Ok(Err(e)) => error_response(&e),
        Err(e) => blocking_failed(e),
    }
}
