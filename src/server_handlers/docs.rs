use actix_web::{HttpResponse, Responder};
use serde_json::json;

use crate::api_json::GenerateRequest;
use crate::config::MAX_SCHEDULES_LIMIT;

pub async fn ping_handler() -> impl Responder {
    HttpResponse::Ok().body("pong")
}

pub async fn help_handler() -> impl Responder {
    let example = GenerateRequest {
        term_id: 20253,
        courses: vec!["CSCI-104".to_string(), "MATH-225".to_string()],
        max_schedules: Some(5),
        seed: Some(42),
    };

    let help = json!({
        "description": "API para generar horarios sin conflictos. POST /schedules/generate recibe el término y los cursos deseados y devuelve hasta max_schedules horarios distintos.",
        "post_example": example,
        "max_schedules_limit": MAX_SCHEDULES_LIMIT,
        "routes": [
            "GET /ping",
            "GET /help",
            "POST /schedules/generate",
            "PUT /catalog/{term_id}/{department}",
            "GET /catalog/{term_id}",
            "GET /catalog/{term_id}/courses/{course_id}",
            "POST /saved-schedules",
            "GET /saved-schedules?user_id=...&term_id=...",
            "DELETE /saved-schedules/{id}?user_id=..."
        ],
        "note": "Sin 'seed' los resultados varían entre llamadas. Días: M T W H F (o R para jueves)."
    });

    HttpResponse::Ok().json(help)
}
