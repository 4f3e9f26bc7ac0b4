use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use epimod::sim::{Simulation, TimeGrid};

#[derive(Debug, Deserialize)]
struct RunRequest {
    variant: String,
    params: BTreeMap<String, f64>,
    t_end: Option<f64>,
    samples: Option<usize>,
}

#[tokio::main]
async fn main() {
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/run_simulation", post(run_simulation));

    let addr: SocketAddr = format!("{}:{}", host, port).parse().expect("invalid HOST/PORT");
    println!("[epimod-api] listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.expect("bind failed");
    axum::serve(listener, app).await.expect("server failed");
}

async fn healthz() -> impl IntoResponse {
    Json(json!({"ok": true}))
}

async fn run_simulation(Json(req): Json<RunRequest>) -> impl IntoResponse {
    // Pure CPU work; keep it off the async workers.
    let join = tokio::task::spawn_blocking(move || run_simulation_sync(req));

    match join.await {
        Ok(Ok(body)) => (StatusCode::OK, Json(body)).into_response(),
        Ok(Err((code, body))) => (code, Json(body)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": format!("join error: {e}")})),
        )
            .into_response(),
    }
}

fn run_simulation_sync(req: RunRequest) -> Result<serde_json::Value, (StatusCode, serde_json::Value)> {
    let defaults = TimeGrid::default();
    let grid = TimeGrid::new(
        0.0,
        req.t_end.unwrap_or(defaults.end),
        req.samples.unwrap_or(defaults.samples),
    );

    let sim = Simulation::new(grid);
    let traj = sim
        .run_named(&req.variant, &req.params)
        .map_err(|e| (StatusCode::BAD_REQUEST, json!({"error": e.to_string()})))?;

    let mut series = serde_json::Map::new();
    let mut styles = serde_json::Map::new();
    for s in &traj.series {
        series.insert(s.key.to_string(), json!(s.values));
        styles.insert(s.key.to_string(), json!({"label": s.label, "color": s.color}));
    }

    Ok(json!({
        "variant": traj.variant.as_str(),
        "t": traj.t,
        "series": series,
        "styles": styles,
        "warnings": traj.warnings,
    }))
}
