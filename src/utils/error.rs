use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BreedError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Breed inference failed: {0}")]
    Inference(String),

    #[error("Prediction shape mismatch: model produced {0} scores, label table has {1} entries")]
    ShapeMismatch(usize, usize),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0} bytes, max allowed: {1} bytes")]
    FileTooLarge(usize, usize),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("ORT error: {0}")]
    Ort(#[from] ort::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl BreedError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BreedError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            BreedError::FileTooLarge(_, _) => StatusCode::PAYLOAD_TOO_LARGE,
            BreedError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            BreedError::Base64(_) => StatusCode::BAD_REQUEST,
            BreedError::Json(_) => StatusCode::BAD_REQUEST,
            BreedError::ImageDecode(_) => StatusCode::BAD_REQUEST,
            BreedError::ModelLoad(_) => StatusCode::SERVICE_UNAVAILABLE,
            BreedError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            BreedError::ModelLoad(_) => "MODEL_LOAD_ERROR",
            BreedError::Inference(_) => "INFERENCE_ERROR",
            BreedError::ShapeMismatch(_, _) => "SHAPE_MISMATCH",
            BreedError::InvalidInput(_) => "INVALID_INPUT",
            BreedError::FileTooLarge(_, _) => "FILE_TOO_LARGE",
            BreedError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            BreedError::Config(_) => "CONFIG_ERROR",
            BreedError::Io(_) => "IO_ERROR",
            BreedError::Json(_) => "JSON_ERROR",
            BreedError::Base64(_) => "BASE64_DECODE_ERROR",
            BreedError::ImageDecode(_) => "IMAGE_DECODE_ERROR",
            BreedError::Ort(_) => "ORT_ERROR",
            BreedError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for BreedError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = serde_json::json!({
            "success": false,
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            },
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "request_id": uuid::Uuid::new_v4().to_string(),
        });

        tracing::error!("Request failed: {} ({})", self, status);

        (status, axum::Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_model_maps_to_service_unavailable() {
        let err = BreedError::ModelLoad("missing dog_breed.onnx".to_string());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.error_code(), "MODEL_LOAD_ERROR");
    }

    #[test]
    fn client_side_errors_map_to_4xx() {
        let cases = [
            (
                BreedError::InvalidInput("empty image data".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                BreedError::UnsupportedFormat("image/tiff".into()),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (
                BreedError::FileTooLarge(30_000_000, 20_971_520),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code(), status);
        }
    }

    #[test]
    fn shape_mismatch_is_internal_and_descriptive() {
        let err = BreedError::ShapeMismatch(1000, 120);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let message = err.to_string();
        assert!(message.contains("1000"));
        assert!(message.contains("120"));
    }
}
