//! CR Beam HTTP Server

use axum::{
    extract::Json,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

use crbeam::math::Mat12;
use crbeam::prelude::*;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct EvaluateRequest {
    properties: Properties,
    nodes: Vec<NodeData>,
    /// Total nodal values per step: node A `[DX..RZ]` then node B
    steps: Vec<Vec<f64>>,
    #[serde(default)]
    options: Option<AnalysisOptions>,
}

#[derive(Debug, Deserialize)]
struct NodeData {
    x: f64,
    y: f64,
    z: f64,
    #[serde(default)]
    volume_acceleration: [f64; 3],
}

#[derive(Debug, Serialize)]
struct EvaluateResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<EvaluateResults>,
}

#[derive(Debug, Serialize)]
struct EvaluateResults {
    reference_length: f64,
    steps: Vec<StepResult>,
    /// Global mass in the last evaluated configuration
    mass: Vec<[f64; 12]>,
    /// Rayleigh damping in the last evaluated configuration
    damping: Vec<[f64; 12]>,
}

#[derive(Debug, Serialize)]
struct StepResult {
    tangent: Vec<[f64; 12]>,
    residual: [f64; 12],
    modes: DeformationModes,
    resultants: SectionResultants,
}

fn rows(m: &Mat12) -> Vec<[f64; 12]> {
    m.row_iter()
        .map(|r| {
            let mut row = [0.0; 12];
            for (value, entry) in row.iter_mut().zip(r.iter()) {
                *value = *entry;
            }
            row
        })
        .collect()
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn evaluate(Json(request): Json<EvaluateRequest>) -> impl IntoResponse {
    match run_evaluation(request) {
        Ok(results) => (
            StatusCode::OK,
            Json(EvaluateResponse {
                success: true,
                error: None,
                results: Some(results),
            }),
        ),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(EvaluateResponse {
                success: false,
                error: Some(e.to_string()),
                results: None,
            }),
        ),
    }
}

fn run_evaluation(request: EvaluateRequest) -> BeamResult<EvaluateResults> {
    if request.steps.is_empty() {
        return Err(BeamError::InvalidInput(
            "at least one step of nodal values is required".to_string(),
        ));
    }

    let mut model = BeamModel::new();

    let node_ids: Vec<NodeId> = request
        .nodes
        .iter()
        .map(|n| model.add_node(Node::new(n.x, n.y, n.z).with_volume_acceleration(n.volume_acceleration)))
        .collect();
    let element = model.add_beam(&node_ids, request.properties)?;

    model.check_all()?;
    model.initialize_all()?;

    let mut steps = Vec::with_capacity(request.steps.len());
    for (index, values) in request.steps.iter().enumerate() {
        if values.len() != 12 {
            return Err(BeamError::InvalidInput(format!(
                "step {} has {} nodal values, expected 12",
                index,
                values.len()
            )));
        }

        model.initialize_solution_step();
        for (i, &id) in node_ids.iter().enumerate() {
            let mut displacement = [0.0; 6];
            displacement.copy_from_slice(&values[i * 6..i * 6 + 6]);
            model.node_mut(id)?.set_displacement(displacement);
        }

        let system = model.compute_local_system(element)?;
        let beam = model.element(element)?;
        steps.push(StepResult {
            tangent: system.tangent_rows(),
            residual: system.residual_array(),
            modes: beam.deformation_modes(),
            resultants: SectionResultants::from_local_forces(beam.local_forces()),
        });
    }

    let options = request.options.unwrap_or_default();
    let mass = model.compute_mass(element)?;
    let damping = model.compute_damping(element, &options)?;

    Ok(EvaluateResults {
        reference_length: model.element(element)?.reference_length(),
        steps,
        mass: rows(&mass),
        damping: rows(&damping),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/v1/beam/evaluate", post(evaluate))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8086));
    info!("CR Beam server listening on http://{}", addr);
    info!("  Health check: GET  /health");
    info!("  Evaluate:     POST /api/v1/beam/evaluate");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
