use crate::{
    breed::types::{
        BreedResult, ClassifyOptions, ClassifyStage, ClassifyStatus, ModelInfo, DEFAULT_TOP_K,
    },
    breed::PredictionRanker,
    image::{preprocessing::IMAGE_SIZE, ImageLoader, ImagePreprocessor},
    models::{get_classifier, get_labels},
    utils::error::BreedError,
    Result,
};
use image::DynamicImage;
use std::path::Path;
use std::time::Instant;
use tokio::sync::mpsc;

/// 犬种分类流水线
pub struct ClassifyPipeline;

impl ClassifyPipeline {
    /// 处理base64图像
    pub async fn process_base64(
        base64_data: &str,
        options: ClassifyOptions,
        status_tx: Option<mpsc::UnboundedSender<ClassifyStatus>>,
    ) -> Result<BreedResult> {
        let start_time = Instant::now();

        if let Some(ref tx) = status_tx {
            let _ = tx.send(ClassifyStatus::new(
                ClassifyStage::Decoding,
                0.1,
                "Loading image from base64",
            ));
        }

        let image = ImageLoader::from_base64(base64_data)?;

        Self::process_image(image, options, status_tx, start_time).await
    }

    /// 处理上传字节流
    pub async fn process_bytes(
        bytes: axum::body::Bytes,
        options: ClassifyOptions,
        status_tx: Option<mpsc::UnboundedSender<ClassifyStatus>>,
    ) -> Result<BreedResult> {
        let start_time = Instant::now();

        if let Some(ref tx) = status_tx {
            let _ = tx.send(ClassifyStatus::new(
                ClassifyStage::Decoding,
                0.1,
                "Loading image from upload",
            ));
        }

        let image = ImageLoader::from_bytes(bytes)?;

        Self::process_image(image, options, status_tx, start_time).await
    }

    /// 处理本地文件（命令行单次分类）
    pub async fn process_path(
        path: &Path,
        options: ClassifyOptions,
        status_tx: Option<mpsc::UnboundedSender<ClassifyStatus>>,
    ) -> Result<BreedResult> {
        let start_time = Instant::now();

        if let Some(ref tx) = status_tx {
            let _ = tx.send(ClassifyStatus::new(
                ClassifyStage::Decoding,
                0.1,
                "Loading image from file",
            ));
        }

        let image = ImageLoader::from_path(path)?;

        Self::process_image(image, options, status_tx, start_time).await
    }

    /// 核心流水线：预处理 -> 前向推理 -> 排序
    pub async fn process_image(
        image: DynamicImage,
        options: ClassifyOptions,
        status_tx: Option<mpsc::UnboundedSender<ClassifyStatus>>,
        start_time: Instant,
    ) -> Result<BreedResult> {
        // 降级状态下尽早失败，不浪费预处理开销
        let classifier = get_classifier()?;
        let labels = get_labels()?;

        if let Some(ref tx) = status_tx {
            let _ = tx.send(ClassifyStatus::new(
                ClassifyStage::Preprocessing,
                0.3,
                "Preparing 224x224 input tensor",
            ));
        }

        // 预处理和前向推理都是CPU密集操作，移出异步reactor
        let inference_tx = status_tx.clone();
        let scores = tokio::task::spawn_blocking(move || -> Result<Vec<f32>> {
            let input = ImagePreprocessor::preprocess(&image)?;

            if let Some(ref tx) = inference_tx {
                let _ = tx.send(ClassifyStatus::new(
                    ClassifyStage::Inference,
                    0.5,
                    "Running model forward pass",
                ));
            }

            classifier.predict(input)
        })
        .await
        .map_err(|e| BreedError::Internal(format!("Inference task failed: {}", e)))??;

        if let Some(ref tx) = status_tx {
            let _ = tx.send(ClassifyStatus::new(
                ClassifyStage::Ranking,
                0.9,
                "Ranking predictions",
            ));
        }

        if scores.len() != labels.len() {
            tracing::warn!(
                "Model output width {} disagrees with label table width {}",
                scores.len(),
                labels.len()
            );
        }

        let top_k = options.top_k.unwrap_or(DEFAULT_TOP_K);
        let ranked = PredictionRanker::rank(&scores, &labels, top_k)?;

        let total_time = start_time.elapsed();
        let result = BreedResult {
            processing_time: total_time.as_secs_f32(),
            top: ranked.top,
            predictions: ranked.predictions,
            model_info: Some(ModelInfo {
                num_classes: labels.len(),
                input_width: IMAGE_SIZE,
                input_height: IMAGE_SIZE,
            }),
        };

        if let Some(ref tx) = status_tx {
            let _ = tx.send(ClassifyStatus::new(
                ClassifyStage::Completed,
                1.0,
                &format!(
                    "Top prediction: {} ({:.2}%)",
                    result.top.breed, result.top.confidence
                ),
            ));
        }

        tracing::info!(
            "Breed classification completed: top={} confidence={:.2}% total_time={:.3}s",
            result.top.breed,
            result.top.confidence,
            total_time.as_secs_f32()
        );

        Ok(result)
    }
}
