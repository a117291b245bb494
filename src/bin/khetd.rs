//! khetd: stateless HTTP front-end for the khet engine.
//!
//! Routes:
//!
//! - `GET  /health` — server status
//! - `GET  /seeds` — list bundled seed packs
//! - `POST /infer/forward` — run forward chaining on the request's rules
//! - `POST /infer/backward` — run backward chaining on the request's rules
//!
//! Every inference request carries its own rule text, facts and goals; the
//! server builds a fresh knowledge base per request, so handlers can run
//! concurrently without any shared state.
//!
//! Build and run: `cargo run --features server --bin khetd`

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use khet::atom::Atom;
use khet::graphs::{build_graphs, ChainOutcome, GraphSet};
use khet::infer::{
    run_backward, run_forward, BackwardQuery, BackwardResult, ForwardQuery, ForwardResult,
    IndexMode, Structure,
};
use khet::kb::KnowledgeBase;
use khet::seeds::SeedRegistry;

// ── Request / response types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct ForwardRequest {
    /// Rule lines, e.g. `"a ^ b -> c"`.
    rules: Vec<String>,
    #[serde(default)]
    facts: Vec<String>,
    goals: Vec<String>,
    #[serde(default = "default_structure")]
    structure: Structure,
    #[serde(default = "default_index_mode")]
    index_mode: IndexMode,
    /// Whether to include FPG/RPG descriptors in the response.
    #[serde(default)]
    graphs: bool,
}

#[derive(Deserialize)]
struct BackwardRequest {
    rules: Vec<String>,
    #[serde(default)]
    facts: Vec<String>,
    goals: Vec<String>,
    #[serde(default = "default_index_mode")]
    index_mode: IndexMode,
    #[serde(default)]
    graphs: bool,
}

fn default_structure() -> Structure {
    Structure::Stack
}

fn default_index_mode() -> IndexMode {
    IndexMode::Min
}

#[derive(Serialize)]
struct ForwardResponse {
    #[serde(flatten)]
    result: ForwardResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    graphs: Option<GraphSet>,
}

#[derive(Serialize)]
struct BackwardResponse {
    #[serde(flatten)]
    result: BackwardResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    graphs: Option<GraphSet>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Serialize)]
struct SeedInfo {
    id: String,
    name: String,
    description: String,
    rules: usize,
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn list_seeds() -> Json<Vec<SeedInfo>> {
    let registry = SeedRegistry::bundled();
    let seeds = registry
        .list()
        .map(|pack| SeedInfo {
            id: pack.id.clone(),
            name: pack.name.clone(),
            description: pack.description.clone(),
            rules: pack.rules.len(),
        })
        .collect();
    Json(seeds)
}

async fn infer_forward(
    Json(request): Json<ForwardRequest>,
) -> Result<Json<ForwardResponse>, (StatusCode, String)> {
    let kb = build_kb(&request.rules, &request.facts)?;
    let query = ForwardQuery {
        goals: parse_goals(&request.goals)?,
        structure: request.structure,
        index_mode: request.index_mode,
        initial_facts: None,
    };
    let result = run_forward(&kb, &query);
    let graphs = request
        .graphs
        .then(|| build_graphs(&kb, ChainOutcome::Forward(&result)));
    Ok(Json(ForwardResponse { result, graphs }))
}

async fn infer_backward(
    Json(request): Json<BackwardRequest>,
) -> Result<Json<BackwardResponse>, (StatusCode, String)> {
    let kb = build_kb(&request.rules, &request.facts)?;
    let query = BackwardQuery {
        goals: parse_goals(&request.goals)?,
        index_mode: request.index_mode,
        initial_facts: None,
    };
    let result = run_backward(&kb, &query);
    let graphs = request
        .graphs
        .then(|| build_graphs(&kb, ChainOutcome::Backward(&result)));
    Ok(Json(BackwardResponse { result, graphs }))
}

/// One fresh knowledge base per request.
fn build_kb(rules: &[String], facts: &[String]) -> Result<KnowledgeBase, (StatusCode, String)> {
    let mut kb = KnowledgeBase::named("request");
    kb.load_rules_from_text(&rules.join("\n"))
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    kb.set_facts(facts.iter().filter_map(|f| Atom::new(f)));
    Ok(kb)
}

fn parse_goals(goals: &[String]) -> Result<Vec<Atom>, (StatusCode, String)> {
    let atoms: Vec<Atom> = goals.iter().filter_map(|g| Atom::new(g)).collect();
    if atoms.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "at least one goal is required".to_string(),
        ));
    }
    Ok(atoms)
}

// ── Main ──────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::var("KHET_SERVER_BIND").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("KHET_SERVER_PORT").unwrap_or_else(|_| "8270".to_string());
    let addr = format!("{bind}:{port}");

    let app = Router::new()
        .route("/health", get(health))
        .route("/seeds", get(list_seeds))
        .route("/infer/forward", post(infer_forward))
        .route("/infer/backward", post(infer_backward))
        .layer(CorsLayer::permissive());

    tracing::info!("khetd listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
