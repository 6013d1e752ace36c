use crate::models::BreedModel;
use crate::utils::error::BreedError;
use crate::{Config, Result};
use ndarray::Array4;
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
    inputs,
};
use parking_lot::Mutex;
use std::sync::Arc;

pub struct BreedClassifier {
    session: Arc<Mutex<Session>>,
    input_name: String,  // 动态发现的输入名称
    output_name: String, // 动态发现的输出名称
}

impl BreedClassifier {
    pub fn load(config: &Config) -> Result<Self> {
        let model_path = config.model_path();

        if !model_path.exists() {
            return Err(BreedError::ModelLoad(
                format!("Breed model not found: {}", model_path.display())
            ));
        }

        tracing::info!("Loading breed classification model from: {}", model_path.display());

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(config.onnx_config.intra_threads)?
            .commit_from_file(&model_path)?;

        // 动态发现输入/输出名称（Keras 导出的 ONNX 图名称不固定）
        let input_name = if session.inputs.is_empty() {
            return Err(BreedError::ModelLoad(
                "Breed model has no inputs".to_string()
            ));
        } else {
            session.inputs[0].name.clone()
        };

        let output_name = if session.outputs.is_empty() {
            return Err(BreedError::ModelLoad(
                "Breed model has no outputs".to_string()
            ));
        } else {
            let output_name = session.outputs[0].name.clone();
            tracing::info!("Breed model graph: '{}' -> '{}'", input_name, output_name);

            // 记录所有可用输出用于调试
            for (i, output) in session.outputs.iter().enumerate() {
                tracing::debug!("Breed model output[{}]: '{}'", i, output.name);
            }

            output_name
        };

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            output_name,
        })
    }
}

impl BreedModel for BreedClassifier {
    /// 单张图片前向推理
    fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>> {
        let input_tensor = Tensor::from_array(input)?;

        let predictions = {
            let mut session = self.session.lock();
            let outputs = session.run(inputs![self.input_name.as_str() => input_tensor])?;

            // 使用动态发现的输出名称
            match outputs.get(&self.output_name) {
                Some(output) => output.try_extract_array::<f32>()?.into_owned(),
                None => {
                    // 提供详细的错误诊断信息
                    let available_outputs: Vec<String> = outputs.keys().map(|s| s.to_string()).collect();
                    return Err(BreedError::Inference(format!(
                        "Breed model output '{}' not found. Available outputs: {:?}",
                        self.output_name, available_outputs
                    )));
                }
            }
        };

        // 期望 (1, num_classes)；部分导出工具会挤掉 batch 维度
        let scores: Vec<f32> = match predictions.shape() {
            [1, _] | [_] => predictions.iter().copied().collect(),
            shape => {
                return Err(BreedError::Inference(format!(
                    "Unexpected breed model output shape: {:?}",
                    shape
                )));
            }
        };

        if scores.is_empty() {
            return Err(BreedError::Inference(
                "Breed model produced an empty score vector".to_string()
            ));
        }

        Ok(scores)
    }
}
