use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use axum::{
    body::Body,
    http::header::{HeaderName, HeaderValue, CONTENT_TYPE},
    http::{Method, Request},
    middleware,
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use clap::Parser;
use dotenvy::dotenv;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

use tm_common::matching::ranker::MatchingEngineConfig;

pub mod error;
pub mod handlers;
pub mod store;
pub mod telemetry;

use error::ApiError;
use handlers::{candidates, health, recommendations};
use store::{Directory, InMemoryDirectory};

const SHUTDOWN_DRAIN_GRACE: std::time::Duration = std::time::Duration::from_millis(200);

#[derive(Debug, Clone, Parser)]
#[command(name = "tm-api", about = "HTTP API for the talent matching engine")]
struct Cli {
    /// Server port
    #[arg(long, env = "PORT", default_value_t = 3002)]
    port: u16,

    /// JSON seed catalog standing in for the marketplace data layer
    #[arg(long, env = "TM_SEED_FILE")]
    seed_file: Option<PathBuf>,

    /// Comma separated list of allowed CORS origins
    #[arg(long, env = "TM_CORS_ORIGINS", default_value = "http://localhost:3000")]
    cors_origins: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub seed_file: Option<PathBuf>,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    fn from_cli(cli: Cli) -> Self {
        let cors_origins = cli
            .cors_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self {
            port: cli.port,
            seed_file: cli.seed_file,
            cors_origins,
        }
    }
}

pub struct AppState {
    pub directory: Arc<dyn Directory>,
    pub engine_config: MatchingEngineConfig,
    pub readiness: AtomicBool,
}

pub type SharedState = Arc<AppState>;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

async fn attach_request_id_context(req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    Ok(error::with_request_id(request_id, next.run(req)).await)
}

pub fn create_router(state: SharedState) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");
    let trace_header = request_id_header.clone();

    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request<Body>| {
        let request_id = request
            .headers()
            .get(&trace_header)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    let api_routes = Router::new()
        .route(
            "/candidates/:candidate_id/recommendations",
            get(recommendations::recommend),
        )
        .route("/candidates/rank", post(candidates::rank));

    Router::new()
        .route("/health", get(health::readyz))
        .route("/livez", get(health::livez))
        .route("/readyz", get(health::readyz))
        .nest("/api", api_routes)
        .layer(middleware::from_fn(attach_request_id_context))
        .layer(trace)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(
            request_id_header,
            MakeRequestUuid::default(),
        ))
        .with_state(state)
}

pub fn build_state(directory: Arc<dyn Directory>) -> SharedState {
    Arc::new(AppState {
        directory,
        engine_config: MatchingEngineConfig::default(),
        readiness: AtomicBool::new(true),
    })
}

pub async fn run() -> Result<(), ApiError> {
    dotenv().ok();
    telemetry::init(env!("CARGO_PKG_NAME"));

    let cli = Cli::parse();
    let config = AppConfig::from_cli(cli);

    let directory: Arc<dyn Directory> = match &config.seed_file {
        Some(path) => Arc::new(InMemoryDirectory::from_path(path)?),
        None => Arc::new(InMemoryDirectory::empty()),
    };

    let state = build_state(directory);
    let app = create_router(state.clone()).layer(cors_layer(&config.cors_origins));

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!(%addr, seed = ?config.seed_file, "tm-api listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(())
}

async fn shutdown_signal(state: SharedState) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    state
        .readiness
        .store(false, std::sync::atomic::Ordering::SeqCst);

    // Give load balancers a moment to observe /readyz flip before the
    // listener stops accepting connections.
    tokio::time::sleep(SHUTDOWN_DRAIN_GRACE).await;
}
