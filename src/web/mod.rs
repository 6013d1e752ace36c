pub mod handlers;
pub mod ui;

use crate::utils::error::BreedError;
use crate::{models::ModelManager, Config, Result};
use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
};

/// 启动HTTP服务；模型加载失败不会中止启动，服务以降级状态继续
pub async fn serve(config: Config) -> Result<()> {
    ModelManager::init(config.clone())?;
    if let Err(e) = crate::models::health_check() {
        tracing::warn!("Starting in degraded mode: {}", e);
    }

    let addr: SocketAddr = config.bind_addr.parse().map_err(|e| {
        BreedError::Config(format!("Invalid bind address {}: {}", config.bind_addr, e))
    })?;

    let app = create_app(config).await;

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  POST /breed        - JSON base64 upload");
    tracing::info!("  POST /breed/upload - Multipart file upload");
    tracing::info!("  GET  /             - Web UI");
    tracing::info!("  GET  /health       - Health check");
    tracing::info!("  GET  /api/info     - Service information");

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| BreedError::Internal(format!("Failed to bind to address {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| BreedError::Internal(format!("Server failed to start: {}", e)))?;

    Ok(())
}

/// 组装路由和中间件栈；测试直接挂接返回的Router
pub async fn create_app(config: Config) -> Router {
    Router::new()
        // 分类API
        .route("/breed", post(handlers::breed_json_handler))
        .route("/breed/upload", post(handlers::breed_upload_handler))
        // Web UI
        .route("/", get(ui::index_handler))
        // 系统端点
        .route("/health", get(health_handler))
        .route("/api/info", get(info_handler))
        // 中间件：请求体限制 -> 超时 -> CORS
        .layer(RequestBodyLimitLayer::new(config.server_config.max_request_size))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server_config.request_timeout,
        )))
        .layer(CorsLayer::permissive())
        .with_state(config)
}

/// 健康检查端点；模型降级时返回503和记录的失败详情
async fn health_handler() -> Result<Json<serde_json::Value>> {
    crate::models::health_check()?;

    Ok(Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    })))
}

/// 服务信息端点
async fn info_handler() -> Result<Json<serde_json::Value>> {
    let stats = crate::models::get_model_stats()?;

    Ok(Json(json!({
        "service": "ONNX Dog Breed Classification Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "model": stats,
        "features": {
            "dual_upload_modes": true,
            "web_ui": true,
            "one_shot_cli": true,
            "top_k_predictions": true
        }
    })))
}
