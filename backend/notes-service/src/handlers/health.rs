/// Health endpoints backing orchestration probes
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashMap;
use std::time::Instant;

#[derive(Serialize, Clone)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct ComponentCheck {
    status: ComponentStatus,
    message: String,
    latency_ms: u64,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    checks: HashMap<String, ComponentCheck>,
    timestamp: String,
}

/// Liveness probe. Reports the process is up without touching dependencies.
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "notes-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe. Verifies the database answers before traffic is routed.
pub async fn readiness(pool: web::Data<PgPool>) -> HttpResponse {
    let start = Instant::now();
    let result = sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let ready = result.is_ok();
    let check = match result {
        Ok(_) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "PostgreSQL connection successful".to_string(),
            latency_ms,
        },
        Err(e) => ComponentCheck {
            status: ComponentStatus::Unhealthy,
            message: format!("PostgreSQL connection failed: {}", e),
            latency_ms,
        },
    };

    let mut checks = HashMap::new();
    checks.insert("postgresql".to_string(), check);

    let response = ReadinessResponse {
        ready,
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
