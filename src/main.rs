use anyhow::Result;
use clap::Parser;
use onnx_breed::breed::{ClassifyOptions, ClassifyPipeline};
use onnx_breed::models::ModelManager;
use onnx_breed::{config::Config, web::serve};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "onnx-breed")]
#[command(about = "High-performance ONNX-powered dog breed classification service")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0:5006")]
    bind: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Model directory path
    #[arg(long, default_value = "models")]
    models_dir: String,

    /// Enable development mode
    #[arg(long)]
    dev: bool,

    /// Classify a local image and print JSON instead of serving
    #[arg(long, value_name = "IMAGE")]
    classify: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志系统
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&args.log_level))
        )
        .with_target(false)
        .init();

    // 创建配置
    let config = Config::new(args.bind, args.models_dir, args.dev)?;

    // 单次分类模式：不启动服务器，直接走同一条流水线
    if let Some(image_path) = args.classify {
        ModelManager::init(config)?;

        let result =
            ClassifyPipeline::process_path(&image_path, ClassifyOptions::default(), None).await?;
        println!("{}", result.to_json_pretty()?);

        return Ok(());
    }

    tracing::info!("Starting ONNX dog breed classification service...");
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Models directory: {}", config.models_dir.display());

    // 启动服务器
    serve(config).await?;

    Ok(())
}
