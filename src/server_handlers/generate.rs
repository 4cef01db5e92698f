use std::time::{Duration, Instant};

use actix_web::{HttpResponse, Responder, web};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use tokio::sync::AcquireError;

use crate::algorithm::{TracingObserver, generate_schedules};
use crate::api_json::{GenerateRequest, GenerateResponse};
use crate::server::AppState;

use super::{bad_body, error_response};

/// POST /schedules/generate
///
/// La búsqueda es CPU-bound: corre en `spawn_blocking`, limitada por el
/// semáforo del estado. `generation_timeout_ms` acota la espera del permiso
/// y la búsqueda juntas; vencido el plazo se responde 503.
pub async fn generate_handler(state: web::Data<AppState>, body: web::Json<serde_json::Value>) -> impl Responder {
    let req: GenerateRequest = match serde_json::from_value(body.into_inner()) {
        Ok(r) => r,
        Err(e) => return bad_body(e),
    };

    let options = match req.search_options(state.config.default_max_schedules) {
        Ok(o) => o,
        Err(e) => return error_response(&e),
    };

    let gate = state.gate.clone();
    let catalog = state.catalog.clone();
    let term_id = req.term_id;
    let start = Instant::now();

    let work = async move {
        let permit = gate.acquire_owned().await?;
        let joined = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let mut rng = match req.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            generate_schedules(&catalog, req.term_id, &req.courses, &options, &mut rng, &mut TracingObserver)
        })
        .await;
        Ok::<_, AcquireError>(joined)
    };

    let deadline = Duration::from_millis(state.config.generation_timeout_ms);
    let joined = match tokio::time::timeout(deadline, work).await {
        Ok(Ok(j)) => j,
        Ok(Err(_)) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": "failed to acquire semaphore", "kind": "internal"}));
        }
        Err(_) => {
            tracing::warn!(event = "generate_timeout", term_id, timeout_ms = state.config.generation_timeout_ms);
            return HttpResponse::ServiceUnavailable()
                .json(json!({"error": "schedule generation timed out", "kind": "timeout"}));
        }
    };

    let outcome = match joined {
        Ok(Ok(o)) => o,
        Ok(Err(e)) => return error_response(&e),
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("task join error: {}", e), "kind": "internal"}));
        }
    };

    tracing::info!(
        event = "generate",
        term_id,
        count = outcome.count(),
        warnings = outcome.warnings.len(),
        duration_ms = start.elapsed().as_millis() as u64
    );
    HttpResponse::Ok().json(GenerateResponse::from(outcome))
}
