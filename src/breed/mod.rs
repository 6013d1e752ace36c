pub mod pipeline;
pub mod ranking;
pub mod types;

pub use pipeline::ClassifyPipeline;
pub use ranking::PredictionRanker;
pub use types::{
    BreedPrediction, BreedResult, ClassifyOptions, ClassifyStage, ClassifyStatus, ModelInfo,
    RankedPredictions,
};
