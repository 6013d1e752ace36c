pub mod config;
pub mod labels;
pub mod models;
pub mod image;
pub mod breed;
pub mod web;
pub mod utils;

// 重新导出主要类型
pub use config::Config;
pub use breed::BreedResult;
pub use utils::error::BreedError;

pub type Result<T> = std::result::Result<T, BreedError>;
