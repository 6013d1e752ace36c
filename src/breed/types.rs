use serde::{Deserialize, Serialize};

/// 默认返回的候选犬种数量
pub const DEFAULT_TOP_K: usize = 3;

/// 分类处理选项
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifyOptions {
    /// 返回的候选犬种数量（默认3，自动压到 [1, 类别数]）
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// 单个候选犬种
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreedPrediction {
    /// 类别索引
    pub class_index: usize,

    /// 犬种名称
    pub breed: String,

    /// 置信度（百分比，0-100）
    pub confidence: f32,
}

/// 排序后的预测结果
#[derive(Debug, Clone)]
pub struct RankedPredictions {
    /// 最优预测
    pub top: BreedPrediction,

    /// 按置信度降序的候选列表
    pub predictions: Vec<BreedPrediction>,
}

/// 完整分类结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreedResult {
    /// 总耗时（秒）
    pub processing_time: f32,

    /// 最优预测
    pub top: BreedPrediction,

    /// 按置信度降序的候选列表
    pub predictions: Vec<BreedPrediction>,

    /// 模型信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_info: Option<ModelInfo>,
}

impl BreedResult {
    /// 渲染为带缩进的JSON（命令行输出用）
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(crate::utils::error::BreedError::Json)
    }
}

/// 模型信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub num_classes: usize,
    pub input_width: u32,
    pub input_height: u32,
}

/// 分类处理阶段
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClassifyStage {
    Decoding,
    Preprocessing,
    Inference,
    Ranking,
    Completed,
}

/// 分类处理状态
#[derive(Debug, Clone)]
pub struct ClassifyStatus {
    /// 当前处理阶段
    pub stage: ClassifyStage,

    /// 进度百分比 (0.0 - 1.0)
    pub progress: f32,

    /// 状态消息
    pub message: String,
}

impl ClassifyStatus {
    pub fn new(stage: ClassifyStage, progress: f32, message: &str) -> Self {
        Self {
            stage,
            progress,
            message: message.to_string(),
        }
    }
}
