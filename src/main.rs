//! A股资金面交互终端
//!
//! 拉取沪深北三市成交额和当日成交额排名，按板块聚合后输出到终端
//! 数据来源：东方财富行情接口

mod cli;      // 交互与输出
mod config;   // 配置加载
mod error;    // 错误类型
mod models;   // 数据模型定义
mod services; // 行情获取与汇总

use env_logger::Env;
use tokio::io::BufReader;

use crate::cli::Session;
use crate::config::AppConfig;
use crate::services::client::MarketClient;

/// 应用程序入口
///
/// 单线程运行时，所有请求依次发出；Ctrl+C 立即退出
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let (config, source) = AppConfig::load();

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::Builder::from_env(Env::default().default_filter_or(config.log.level.as_str()))
        .init();
    source.log();

    let client = MarketClient::new(&config.api)?;
    let input = BufReader::new(tokio::io::stdin());
    let mut session = Session::new(&client, &config, input, std::io::stdout());

    tokio::select! {
        result = session.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            log::info!("收到 Ctrl+C 信号");
            println!("\n程序已退出。");
            // 阻塞中的标准输入读取无法取消，直接结束进程
            std::process::exit(0);
        }
    }

    Ok(())
}
