use crate::{
    breed::{BreedResult, ClassifyOptions, ClassifyPipeline, ClassifyStatus},
    utils::error::BreedError,
    Config, Result,
};
use axum::{
    extract::{Multipart, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tokio::sync::mpsc;

/// JSON请求体（base64模式）
#[derive(Debug, Deserialize)]
pub struct BreedJsonRequest {
    /// Base64编码的图像数据
    pub image: String,

    /// 返回的候选犬种数量（默认3）
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// JSON成功响应格式；错误响应由 BreedError 的 IntoResponse 生成同构信封
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: String,
    pub request_id: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            timestamp: chrono::Utc::now().to_rfc3339(),
            request_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// 开发模式下启动进度监控任务，把流水线阶段写进日志
fn spawn_status_logger(
    config: &Config,
    request_id: &str,
) -> Option<mpsc::UnboundedSender<ClassifyStatus>> {
    if !config.dev_mode {
        return None;
    }

    let (status_tx, mut status_rx) = mpsc::unbounded_channel::<ClassifyStatus>();
    let monitor_id = request_id.to_string();

    tokio::spawn(async move {
        while let Some(status) = status_rx.recv().await {
            tracing::debug!(
                "Classify progress [{}]: {:?} - {:.1}% - {}",
                monitor_id,
                status.stage,
                status.progress * 100.0,
                status.message
            );
        }
    });

    Some(status_tx)
}

/// JSON base64上传处理器
pub async fn breed_json_handler(
    State(config): State<Config>,
    Json(request): Json<BreedJsonRequest>,
) -> Result<Json<ApiResponse<BreedResult>>> {
    let start_time = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    tracing::info!(
        "Processing JSON classify request: request_id={}, top_k={:?}",
        request_id,
        request.top_k
    );

    // 验证请求参数
    if request.image.is_empty() {
        return Err(BreedError::InvalidInput("Empty image data".to_string()));
    }

    let options = ClassifyOptions {
        top_k: request.top_k,
    };
    let status_tx = spawn_status_logger(&config, &request_id);

    // 执行分类流水线
    let result = ClassifyPipeline::process_base64(&request.image, options, status_tx).await?;

    tracing::info!(
        "JSON classify completed: request_id={}, top={}, time={:.3}s",
        request_id,
        result.top.breed,
        start_time.elapsed().as_secs_f32()
    );

    Ok(Json(ApiResponse::success(result)))
}

/// Multipart文件上传处理器
pub async fn breed_upload_handler(
    State(config): State<Config>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<BreedResult>>> {
    let start_time = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    tracing::info!(
        "Processing multipart classify request: request_id={}",
        request_id
    );

    let mut image_data: Option<axum::body::Bytes> = None;
    let mut options = ClassifyOptions::default();

    // 解析multipart数据
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        BreedError::InvalidInput(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or("unknown").to_string();

        match field_name.as_str() {
            "file" => {
                // 验证内容类型
                if let Some(content_type) = field.content_type() {
                    if !content_type.starts_with("image/") {
                        return Err(BreedError::UnsupportedFormat(content_type.to_string()));
                    }
                }

                let data = field.bytes().await.map_err(|e| {
                    BreedError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;

                if data.is_empty() {
                    return Err(BreedError::InvalidInput("Empty file".to_string()));
                }

                tracing::debug!("Received file: {} bytes", data.len());
                image_data = Some(data);
            }
            "top_k" => {
                let value = field.text().await.unwrap_or_default();
                if let Ok(top_k) = value.parse::<usize>() {
                    options.top_k = Some(top_k);
                }
            }
            _ => {
                tracing::debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    // 验证必需的图像数据
    let image_data = image_data
        .ok_or_else(|| BreedError::InvalidInput("No image file provided".to_string()))?;

    let status_tx = spawn_status_logger(&config, &request_id);

    // 执行分类流水线
    let result = ClassifyPipeline::process_bytes(image_data, options, status_tx).await?;

    tracing::info!(
        "Upload classify completed: request_id={}, top={}, time={:.3}s",
        request_id,
        result.top.breed,
        start_time.elapsed().as_secs_f32()
    );

    Ok(Json(ApiResponse::success(result)))
}
