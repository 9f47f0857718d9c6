use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use eol_timeline::cli::{self, Cli};
use eol_timeline::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载环境变量
    dotenv::dotenv().ok();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "eol_timeline=info".to_string()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env();
    let cli = Cli::parse();

    info!("🚀 EOL Timeline 启动，数据目录: {:?}", config.data_dir);

    if let Err(e) = cli::run(cli, &config).await {
        // 目录列表抓取失败等致命错误走这里，非零退出
        error!("执行失败: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
