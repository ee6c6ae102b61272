//! Trigger adapters for the oracle workflows.
//!
//! Exposes the bridge simulation behind a signed HTTP trigger and drives
//! the compliance sync from a cron schedule. [`ServiceState`] wires the
//! workflows to their runtime, signer and connectors once at startup.

#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod scheduler;

use auth::{TriggerAuthenticator, SIGNATURE_HEADER};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use oracle_connectors::{ForwarderDeliveryClient, GeminiClient, ReqwestHttpClient, TextGenerator};
use oracle_consensus::{ConsensusRuntime, HttpClient, LocalDon};
use oracle_report::{DeliveryClient, QuorumReportSigner, ReportSigner};
use oracle_types::{OracleError, WorkflowConfig};
use oracle_workflows::{decode_request, BridgeSimulationWorkflow, ComplianceSyncWorkflow};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct ServiceState {
    pub config: Arc<WorkflowConfig>,
    pub runtime: Arc<dyn ConsensusRuntime>,
    pub bridge: Arc<BridgeSimulationWorkflow>,
    pub compliance: Arc<ComplianceSyncWorkflow>,
    pub auth: Arc<TriggerAuthenticator>,
    pub started_at: DateTime<Utc>,
}

impl ServiceState {
    /// Validate the configuration and build the production wiring: one
    /// reqwest transport per node, Ed25519 node keys, Gemini analysis and
    /// the HTTP report forwarder.
    pub fn bootstrap(config: WorkflowConfig) -> Result<Self, ServiceError> {
        config.validate()?;
        let config = Arc::new(config);
        let timeout = Duration::from_secs(config.don.request_timeout_secs);

        let transports = (0..config.don.nodes)
            .map(|_| ReqwestHttpClient::new(timeout).map(|c| Arc::new(c) as Arc<dyn HttpClient>))
            .collect::<Result<Vec<_>, _>>()?;
        let runtime = LocalDon::from_transports(transports, config.don.fault_tolerance())
            .map_err(OracleError::from)?;

        let signer = QuorumReportSigner::from_hex_seeds(&config.don.signing_seeds, config.don.quorum())
            .map_err(OracleError::from)?;

        let destination = &config.compliance.destination_chain;
        let selector = config.chains.resolve(destination).ok_or_else(|| {
            ServiceError::Config(format!("compliance.destination_chain: unknown chain {destination}"))
        })?;
        let forwarder_http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new(timeout)?);
        let delivery = ForwarderDeliveryClient::new(forwarder_http, &config.delivery.forwarder_url, selector);

        let generator = GeminiClient::from_config(&config.analysis);

        Self::from_parts(
            config,
            Arc::new(runtime),
            Arc::new(generator),
            Arc::new(signer),
            Arc::new(delivery),
        )
    }

    pub fn from_parts(
        config: Arc<WorkflowConfig>,
        runtime: Arc<dyn ConsensusRuntime>,
        generator: Arc<dyn TextGenerator>,
        signer: Arc<dyn ReportSigner>,
        delivery: Arc<dyn DeliveryClient>,
    ) -> Result<Self, ServiceError> {
        let auth = TriggerAuthenticator::from_config(&config.auth)?;
        let bridge = BridgeSimulationWorkflow::new(config.clone(), runtime.clone(), generator);
        let compliance = ComplianceSyncWorkflow::new(config.clone(), runtime.clone(), signer, delivery)?;

        Ok(Self {
            config,
            runtime,
            bridge: Arc::new(bridge),
            compliance: Arc::new(compliance),
            auth: Arc::new(auth),
            started_at: Utc::now(),
        })
    }
}

pub fn build_router(state: ServiceState) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/workflows/bridge-simulation", post(bridge_simulation))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Clone, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    nodes: usize,
    quorum: usize,
    uptime_secs: i64,
}

async fn health(State(state): State<ServiceState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "oracle-service",
        version: env!("CARGO_PKG_VERSION"),
        nodes: state.runtime.node_count(),
        quorum: state.runtime.quorum(),
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
    })
}

async fn bridge_simulation(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    state.auth.verify(&body, signature).map_err(|e| {
        tracing::warn!(error = %e, "Rejected bridge simulation trigger");
        ApiError::unauthorized(e.to_string())
    })?;

    let request = decode_request(&body)?;
    let response = state.bridge.run(request).await;
    Ok(Json(response.to_json()))
}

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ServiceError> for OracleError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Config(message) => OracleError::Config(message),
            ServiceError::Oracle(err) => err,
            ServiceError::Io(err) => OracleError::Engine(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Http { status: StatusCode, message: String },
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl ApiError {
    fn unauthorized(message: impl Into<String>) -> Self {
        Self::Http {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }
}

impl From<ApiError> for OracleError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http { message, .. } => OracleError::Validation(message),
            ApiError::Oracle(err) => err,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Http { status, message } => (
                status,
                Json(serde_json::json!({ "status": "error", "message": message })),
            )
                .into_response(),
            ApiError::Oracle(err) => {
                let status = match err {
                    OracleError::Validation(_) | OracleError::Codec(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (
                    status,
                    Json(serde_json::json!({
                        "status": "error",
                        "kind": err.kind(),
                        "message": err.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}
