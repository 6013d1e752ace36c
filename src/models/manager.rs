use crate::image::preprocessing::IMAGE_SIZE;
use crate::labels::LabelTable;
use crate::models::{BreedClassifier, BreedModel};
use crate::utils::error::BreedError;
use crate::{Config, Result};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// 全局模型管理器单例。初始化后不再变化，会话自身带锁。
pub struct ModelManager {
    model: Option<Arc<dyn BreedModel>>,
    labels: Option<Arc<LabelTable>>,
    load_error: Option<String>,
    config: Config,
}

static MODEL_MANAGER: OnceCell<Arc<ModelManager>> = OnceCell::new();

impl ModelManager {
    /// 初始化全局模型管理器。重复调用直接复用已有实例，
    /// 模型产物在进程生命周期内最多读取一次。
    /// 模型加载失败不会中止进程：失败详情被记录，服务以降级状态继续运行。
    pub fn init(config: Config) -> Result<()> {
        if MODEL_MANAGER.get().is_some() {
            tracing::debug!("Model manager already initialized, reusing instance");
            return Ok(());
        }

        MODEL_MANAGER.get_or_init(|| {
            tracing::info!("Initializing model manager...");

            let manager = match Self::load_artifacts(&config) {
                Ok((model, labels)) => {
                    tracing::info!(
                        "Model manager initialized with {} breed classes",
                        labels.len()
                    );
                    ModelManager {
                        model: Some(model),
                        labels: Some(labels),
                        load_error: None,
                        config: config.clone(),
                    }
                }
                Err(e) => {
                    tracing::error!("Breed model initialization failed: {}", e);
                    tracing::error!("Service will run in degraded mode, classification is unavailable");
                    // 记录不带变体前缀的失败详情
                    let detail = match e {
                        BreedError::ModelLoad(message) => message,
                        other => other.to_string(),
                    };
                    ModelManager {
                        model: None,
                        labels: None,
                        load_error: Some(detail),
                        config: config.clone(),
                    }
                }
            };

            Arc::new(manager)
        });

        Ok(())
    }

    /// 用注入的模型和标签初始化（测试及替代后端用）
    pub fn init_with_parts(
        model: Arc<dyn BreedModel>,
        labels: LabelTable,
        config: Config,
    ) -> Result<()> {
        if MODEL_MANAGER.get().is_some() {
            tracing::debug!("Model manager already initialized, reusing instance");
            return Ok(());
        }

        MODEL_MANAGER.get_or_init(|| {
            tracing::info!(
                "Initializing model manager with injected model ({} breed classes)",
                labels.len()
            );
            Arc::new(ModelManager {
                model: Some(model),
                labels: Some(Arc::new(labels)),
                load_error: None,
                config,
            })
        });

        Ok(())
    }

    fn load_artifacts(config: &Config) -> Result<(Arc<dyn BreedModel>, Arc<LabelTable>)> {
        let labels = LabelTable::load(&config.labels_path())?;
        let classifier = BreedClassifier::load(config)?;
        Ok((Arc::new(classifier), Arc::new(labels)))
    }

    /// 获取全局模型管理器实例
    pub fn instance() -> Result<Arc<ModelManager>> {
        MODEL_MANAGER
            .get()
            .cloned()
            .ok_or_else(|| BreedError::Internal("Model manager not initialized".to_string()))
    }

    /// 获取分类模型引用；降级状态下返回记录的加载错误
    pub fn model(&self) -> Result<Arc<dyn BreedModel>> {
        self.model.as_ref().map(Arc::clone).ok_or_else(|| {
            BreedError::ModelLoad(
                self.load_error
                    .clone()
                    .unwrap_or_else(|| "Breed model not loaded".to_string()),
            )
        })
    }

    /// 获取标签表引用；降级状态下返回记录的加载错误
    pub fn labels(&self) -> Result<Arc<LabelTable>> {
        self.labels.as_ref().map(Arc::clone).ok_or_else(|| {
            BreedError::ModelLoad(
                self.load_error
                    .clone()
                    .unwrap_or_else(|| "Breed labels not loaded".to_string()),
            )
        })
    }

    /// 模型是否就绪
    pub fn is_ready(&self) -> bool {
        self.model.is_some() && self.labels.is_some()
    }

    /// 获取配置引用
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 模型健康检查：就绪返回 Ok，降级状态返回记录的失败详情
    pub fn health_check(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(BreedError::ModelLoad(
                self.load_error
                    .clone()
                    .unwrap_or_else(|| "Breed model not loaded".to_string()),
            ))
        }
    }

    /// 获取模型统计信息
    pub fn get_stats(&self) -> ModelStats {
        ModelStats {
            model_ready: self.is_ready(),
            load_error: self.load_error.clone(),
            num_classes: self.labels.as_ref().map(|labels| labels.len()),
            input_width: IMAGE_SIZE,
            input_height: IMAGE_SIZE,
            intra_threads: self.config.onnx_config.intra_threads,
            optimization_level: self.config.onnx_config.optimization_level,
        }
    }
}

/// 模型统计信息
#[derive(Debug, Clone, serde::Serialize)]
pub struct ModelStats {
    pub model_ready: bool,
    pub load_error: Option<String>,
    pub num_classes: Option<usize>,
    pub input_width: u32,
    pub input_height: u32,
    pub intra_threads: usize,
    pub optimization_level: i32,
}

/// 便捷函数：获取分类模型
pub fn get_classifier() -> Result<Arc<dyn BreedModel>> {
    ModelManager::instance()?.model()
}

/// 便捷函数：获取标签表
pub fn get_labels() -> Result<Arc<LabelTable>> {
    ModelManager::instance()?.labels()
}

/// 便捷函数：检查模型健康状态
pub fn health_check() -> Result<()> {
    ModelManager::instance()?.health_check()
}

/// 便捷函数：获取模型统计信息
pub fn get_model_stats() -> Result<ModelStats> {
    Ok(ModelManager::instance()?.get_stats())
}
