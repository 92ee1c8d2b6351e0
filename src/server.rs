//! HTTP server exposing the analyze endpoints.
//!
//! This module provides an HTTP server that:
//! - Reports liveness via GET /health
//! - Decodes frames and runs face and gaze rules via POST /analyze/frame
//! - Runs audio rules via POST /analyze/audio
//!
//! # Architecture
//!
//! ```text
//! client ──→ POST /analyze/frame ──→ decode ──→ detect ──→ face + gaze rules ──→ findings
//! client ──→ POST /analyze/audio ──────────────────────────→ audio rules ──────→ findings
//! ```

use crate::config::{Config, DetectorConfig};
use crate::core::{analyze_audio, AnalyzeResponse, FrameAnalyzer, SuppliedGeometry};
use crate::detector::{
    DetectionAdapter, FaceBox, FaceLandmarks, LandmarkCapability, SkinRegionDetector,
};
use crate::signal::{decode_frame, AudioSignal, FrameError};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub host: IpAddr,
    /// Port to bind to (0 for random)
    pub port: u16,
    /// Settings for the built-in face detector
    pub detector: DetectorConfig,
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: IpAddr, port: u16, detector: DetectorConfig) -> Self {
        Self {
            host,
            port,
            detector,
        }
    }

    /// Build from the process configuration, falling back to localhost on a bad host.
    pub fn from_config(config: &Config) -> Self {
        let host = config.host.parse().unwrap_or_else(|e| {
            tracing::warn!("Invalid host '{}': {}, using 127.0.0.1", config.host, e);
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        });
        Self::new(host, config.port, config.detector.clone())
    }
}

/// Shared server state
pub struct ServerState {
    /// Detection and rule evaluation for frames
    analyzer: FrameAnalyzer,
}

impl ServerState {
    /// Create server state with the built-in detectors.
    pub fn new(config: &ServerConfig) -> Self {
        let faces = Arc::new(SkinRegionDetector::new(config.detector.clone()));

        // No face mesh model ships with the engine; gaze rules need client-supplied landmarks.
        let landmarks = LandmarkCapability::Unavailable;
        tracing::info!("Landmark detector unavailable, gaze rules use supplied landmarks only");

        Self::with_analyzer(FrameAnalyzer::new(DetectionAdapter::new(faces, landmarks)))
    }

    /// Create server state around an already constructed analyzer.
    pub fn with_analyzer(analyzer: FrameAnalyzer) -> Self {
        Self { analyzer }
    }
}

/// Frame analysis request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAnalyzeRequest {
    pub session_id: String,
    pub source: String,
    /// Base64 image, optionally prefixed with a data URL header
    pub frame_base64: String,
    /// Face boxes from a client-side detector
    #[serde(default)]
    pub faces: Option<Vec<FaceBox>>,
    /// Face mesh from a client-side landmark extractor
    #[serde(default)]
    pub landmarks: Option<FaceLandmarks>,
}

/// Audio analysis request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAnalyzeRequest {
    pub session_id: String,
    pub source: String,
    #[serde(flatten)]
    pub signal: AudioSignal,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: String, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error,
            code: code.to_string(),
        }),
    )
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /analyze/frame
///
/// Decoding, detection and rule evaluation run on the blocking pool.
async fn analyze_frame(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<FrameAnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    if let Some(faces) = &request.faces {
        faces.iter().try_for_each(FaceBox::validate).map_err(|e| {
            tracing::warn!(session_id = %request.session_id, "Rejected faces: {}", e);
            api_error(
                StatusCode::BAD_REQUEST,
                format!("Invalid faces: {e}"),
                "INVALID_FACES",
            )
        })?;
    }

    if let Some(landmarks) = &request.landmarks {
        landmarks.validate().map_err(|e| {
            tracing::warn!(session_id = %request.session_id, "Rejected landmarks: {}", e);
            api_error(
                StatusCode::BAD_REQUEST,
                format!("Invalid landmarks: {e}"),
                "INVALID_LANDMARKS",
            )
        })?;
    }

    let FrameAnalyzeRequest {
        session_id,
        source,
        frame_base64,
        faces,
        landmarks,
    } = request;
    let supplied = SuppliedGeometry { faces, landmarks };
    let analyzer = state.analyzer.clone();

    let result = tokio::task::spawn_blocking(move || {
        let frame = decode_frame(&frame_base64)?;
        Ok::<_, FrameError>(analyzer.analyze_with(&frame, supplied))
    })
    .await
    .map_err(|e| {
        tracing::error!("Frame analysis task failed: {}", e);
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Frame analysis failed: {e}"),
            "ANALYSIS_ERROR",
        )
    })?;

    let response = result.map_err(|e| {
        tracing::warn!(%session_id, %source, "Rejected frame: {}", e);
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid frame: {e}"),
            "INVALID_FRAME",
        )
    })?;

    tracing::debug!(
        %session_id,
        %source,
        findings = response.findings.len(),
        processing_ms = response.processing_ms,
        "Frame analyzed"
    );
    Ok(Json(response))
}

/// POST /analyze/audio
async fn analyze_audio_handler(Json(request): Json<AudioAnalyzeRequest>) -> Json<AnalyzeResponse> {
    let response = analyze_audio(&request.signal);
    tracing::debug!(
        session_id = %request.session_id,
        source = %request.source,
        findings = response.findings.len(),
        "Audio analyzed"
    );
    Json(response)
}

/// Build the router over shared state.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze/frame", post(analyze_frame))
        .route("/analyze/audio", post(analyze_audio_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the HTTP server with the built-in detectors
pub async fn run(
    config: ServerConfig,
) -> anyhow::Result<(SocketAddr, tokio::sync::oneshot::Sender<()>)> {
    let state = Arc::new(ServerState::new(&config));
    run_with_state(config, state).await
}

/// Run the HTTP server over caller-provided state
pub async fn run_with_state(
    config: ServerConfig,
    state: Arc<ServerState>,
) -> anyhow::Result<(SocketAddr, tokio::sync::oneshot::Sender<()>)> {
    let adapter = state.analyzer.adapter();
    if adapter.landmarks().is_available() {
        tracing::info!(
            "Face detector: {}, landmarks: {:?}",
            adapter.face_detector_name(),
            adapter.landmarks()
        );
    } else {
        tracing::info!(
            "Face detector: {}, no landmark detector",
            adapter.face_detector_name()
        );
    }

    let app = router(state);

    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!("Proctoring engine listening on http://{}", actual_addr);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("Server shutdown signal received");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_addr, shutdown_tx))
}
