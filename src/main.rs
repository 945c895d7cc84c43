use axum::{Router, routing::get};
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use imgext_backend::cors::build_cors_layer;
use imgext_backend::features::extract::create_extract_router;
use imgext_backend::features::extract::handler::docs_index;
use imgext_backend::features::health::handler::health_check;
use imgext_backend::openapi::ApiDoc;
use imgext_backend::request_id::request_id_middleware;
use imgext_backend::{AppConfig, AppState, ShutdownManager};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imgext_backend=info,tower_http=info".into()),
        )
        .init();

    // Load config
    if let Err(e) = AppConfig::init_global() {
        tracing::error!("Config init failed: {}", e);
        std::process::exit(1);
    }
    let config = AppConfig::global();

    // 创建优雅退出管理器并挂载信号处理
    let shutdown_manager = ShutdownManager::new();
    shutdown_manager.start_signal_handler();

    // Shared state
    let app_state = AppState::new(config);

    // Routes
    let mut app = Router::new()
        .route("/", get(docs_index))
        .route("/health", get(health_check))
        .merge(create_extract_router())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // 全局 request_id 中间件
    app = app.layer(axum::middleware::from_fn(request_id_middleware));

    if let Some(cors) = build_cors_layer(&config.cors) {
        app = app.layer(cors);
    }

    // 响应均为 JSON，启用 gzip/brotli 压缩降低带宽占用
    app = app.layer(CompressionLayer::new());

    // multipart 与 base64 负载都可能较大，按配置约束请求体上限
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

    tracing::info!("Server: http://{}", addr);
    tracing::info!("Docs: http://{}/docs", addr);
    tracing::info!("Health: http://{}/health", addr);

    // 运行服务器直到收到退出信号
    let graceful = axum::serve(listener, app).with_graceful_shutdown(async move {
        let reason = shutdown_manager.wait_for_shutdown().await;
        tracing::info!("接收到退出信号: {:?}，开始优雅关闭HTTP服务器...", reason);
    });

    if let Err(e) = graceful.await {
        tracing::error!("服务器运行错误: {}", e);
        std::process::exit(1);
    }

    tracing::info!("服务器已优雅关闭");
}
