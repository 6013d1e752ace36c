use anyhow::Result;
use std::path::PathBuf;

/// 上传图片大小上限（HTTP 请求体限制与图片加载器共用）
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    /// 服务器绑定地址
    pub bind_addr: String,

    /// 模型文件目录
    pub models_dir: PathBuf,

    /// 开发模式
    pub dev_mode: bool,

    /// ONNX Runtime配置
    pub onnx_config: OnnxConfig,

    /// 服务器配置
    pub server_config: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct OnnxConfig {
    /// CPU线程数
    pub intra_threads: usize,

    /// 优化级别
    pub optimization_level: i32,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 请求超时时间（秒）
    pub request_timeout: u64,

    /// 最大请求体大小（字节）
    pub max_request_size: usize,
}

impl Config {
    pub fn new(bind_addr: String, models_dir: String, dev_mode: bool) -> Result<Self> {
        let cpu_cores = num_cpus::get();

        let onnx_config = OnnxConfig {
            intra_threads: (cpu_cores * 3 / 4).max(1), // 使用75%的CPU核心
            optimization_level: 3, // 最高优化级别
        };

        let server_config = ServerConfig {
            request_timeout: if dev_mode { 300 } else { 60 }, // 开发模式更长超时
            max_request_size: MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            bind_addr,
            models_dir: PathBuf::from(models_dir),
            dev_mode,
            onnx_config,
            server_config,
        })
    }

    /// 获取犬种分类模型路径
    pub fn model_path(&self) -> PathBuf {
        self.models_dir.join("dog_breed.onnx")
    }

    /// 获取类别标签文件路径
    pub fn labels_path(&self) -> PathBuf {
        self.models_dir.join("dog_breed_labels.txt")
    }
}
