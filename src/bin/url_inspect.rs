//! URL 专用精简服务：仅 `GET /` 与 `POST /url`，不执行 OCR。
//!
//! 与主服务共用配置、错误信封与提取流程；响应中没有 text_extracted 字段。

use std::time::Instant;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde_json::json;
use tower_http::compression::CompressionLayer;

use imgext_backend::cors::build_cors_layer;
use imgext_backend::features::extract::acquire;
use imgext_backend::features::extract::service::{self, OcrMode};
use imgext_backend::features::extract::types::{API_VERSION, DEVELOPER, ExtractResponse, UrlExtractRequest};
use imgext_backend::request_id::request_id_middleware;
use imgext_backend::{AppConfig, AppError, AppState, ShutdownManager};

async fn docs_index() -> Json<serde_json::Value> {
    Json(json!({
        "API": "Image Metadata Extractor (URL only)",
        "routes": {
            "/": "Show API docs",
            "/url": "POST JSON { 'url': 'http://...jpg' } → metadata + info"
        },
        "developer": DEVELOPER,
        "version": API_VERSION
    }))
}

async fn extract_url(
    State(state): State<AppState>,
    Json(req): Json<UrlExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let started = Instant::now();
    let url = req
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(AppError::MissingUrl)?;
    let bytes = acquire::from_url(url).await?;
    let response = service::extract(&state, bytes, None, OcrMode::Disabled, started).await?;
    Ok(Json(response))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imgext_backend=info,url_inspect=info,tower_http=info".into()),
        )
        .init();

    if let Err(e) = AppConfig::init_global() {
        tracing::error!("Config init failed: {}", e);
        std::process::exit(1);
    }
    let config = AppConfig::global();

    let shutdown_manager = ShutdownManager::new();
    shutdown_manager.start_signal_handler();

    let app_state = AppState::new(config);

    let mut app = Router::new()
        .route("/", get(docs_index))
        .route("/url", post(extract_url))
        .with_state(app_state);

    app = app.layer(axum::middleware::from_fn(request_id_middleware));
    if let Some(cors) = build_cors_layer(&config.cors) {
        app = app.layer(cors);
    }
    app = app.layer(CompressionLayer::new());
    app = app.layer(axum::extract::DefaultBodyLimit::max(
        config.limits.max_body_bytes,
    ));

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Bind address failed {}: {}", addr, e);
            std::process::exit(1);
        });

    tracing::info!("URL inspect server: http://{}", addr);

    let graceful = axum::serve(listener, app).with_graceful_shutdown(async move {
        let reason = shutdown_manager.wait_for_shutdown().await;
        tracing::info!("接收到退出信号: {:?}，开始优雅关闭HTTP服务器...", reason);
    });

    if let Err(e) = graceful.await {
        tracing::error!("服务器运行错误: {}", e);
        std::process::exit(1);
    }
}
