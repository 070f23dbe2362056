//! Axum-based API gateway for the Solace chat pipeline. Config-driven via CoreConfig.
//! Chat is wired through handlers::chat; persona and sentiment directives live in solace-core.

mod handlers;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use solace_core::{build_backend, CoreConfig, LlmMode, ResponsePipeline, SentimentClassifier};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<CoreConfig>,
    pub llm_mode: LlmMode,
    pub pipeline: Arc<ResponsePipeline>,
}

/// Pre-flight check: config, credential, classifier artifacts, and port availability.
fn run_verify() -> Result<(), String> {
    print!("Checking configuration... ");
    let config = CoreConfig::load().map_err(|e| format!("Config load failed: {}", e))?;
    let mode = config.validate().map_err(|e| e.to_string())?;
    println!("OK (llm_mode = {}, model = {})", mode.as_str(), config.model);

    print!("Checking classifier artifacts... ");
    let classifier = SentimentClassifier::load(&config.vectorizer_path, &config.classifier_path)
        .map_err(|e| e.to_string())?;
    println!(
        "OK ({} features, classes {:?})",
        classifier.vectorizer().n_features(),
        classifier.model().classes()
    );

    print!("Checking generation backend... ");
    let backend = build_backend(&config).map_err(|e| e.to_string())?;
    println!("OK ({})", backend.name());

    print!("Checking {}:{}... ", config.host, config.port);
    match std::net::TcpListener::bind((config.host.as_str(), config.port)) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => {
            return Err(format!("Port {} BLOCKED: {}", config.port, e));
        }
    }

    println!("\n✅ SUCCESS: All systems GO. Ready to start gateway.");
    Ok(())
}

fn build_cors(config: &CoreConfig) -> CorsLayer {
    let origins = config.cors_origin_list();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

fn build_app(state: AppState) -> Router {
    let cors = build_cors(&state.config);
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat::chat))
        .layer(cors)
        .with_state(state)
}

fn fail_startup(what: &str, e: impl std::fmt::Display) -> ! {
    tracing::error!("{}: {}", what, e);
    eprintln!("[solace-gateway] {}: {}", what, e);
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    // Load .env first so OPENROUTER_API_KEY is visible to CoreConfig::load.
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[solace-gateway] .env not loaded: {} (using system environment)", e);
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--verify") {
        match run_verify() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("❌ PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CoreConfig::load().unwrap_or_else(|e| fail_startup("Config load failed", e));
    let llm_mode = config
        .validate()
        .unwrap_or_else(|e| fail_startup("Config invalid", e));

    let classifier = SentimentClassifier::load(&config.vectorizer_path, &config.classifier_path)
        .unwrap_or_else(|e| fail_startup("Classifier load failed", e));
    let backend = build_backend(&config).unwrap_or_else(|e| fail_startup("Backend setup failed", e));
    tracing::info!(
        llm_mode = llm_mode.as_str(),
        backend = backend.name(),
        model = %config.model,
        "Generation backend ready"
    );

    let pipeline = ResponsePipeline::from_config(&config, Arc::new(classifier), backend);
    let state = AppState {
        config: Arc::new(config),
        llm_mode,
        pipeline: Arc::new(pipeline),
    };
    let host = state.config.host.clone();
    let port = state.config.port;
    let app_name = state.config.app_name.clone();
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .unwrap_or_else(|e| fail_startup("Bind failed", e));
    tracing::info!("{} listening on {}:{}", app_name, host, port);

    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Ctrl+C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown initiated (Ctrl+C received)");
    });
    if let Err(e) = server.await {
        tracing::error!("Server error: {}", e);
    }
    tracing::info!("✓ Graceful shutdown complete");
}
