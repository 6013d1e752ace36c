pub mod classifier;
pub mod manager;

pub use classifier::BreedClassifier;
pub use manager::{ModelManager, ModelStats};

// Re-export convenience functions from manager
pub use manager::{get_classifier, get_labels, get_model_stats, health_check};

use crate::Result;
use ndarray::Array4;

/// 犬种模型统一接口：输入 NHWC (1,224,224,3) 张量，输出逐类别得分向量。
/// 生产实现是 ONNX 会话，测试可注入任意实现。
pub trait BreedModel: Send + Sync {
    fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>>;
}
