//! 配置模块
//!
//! 支持从 JSON 文件加载配置，文件不存在时全部使用默认值

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 行情接口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// 日K线接口
    #[serde(default = "default_kline_url")]
    pub kline_url: String,
    /// 成交额排名接口
    #[serde(default = "default_clist_url")]
    pub clist_url: String,
    /// 请求头 User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// 请求超时时间（秒），不设置则不超时
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// 连接超时时间（秒）
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

/// 终端输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// 是否输出颜色
    #[serde(default = "default_color")]
    pub color: bool,
    /// 表格最大宽度，不设置则不限制
    #[serde(default)]
    pub max_width: Option<u16>,
}

/// 交互提示默认值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// 默认天数
    #[serde(default = "default_days")]
    pub default_days: usize,
    /// 默认板块数量
    #[serde(default = "default_sectors")]
    pub default_sectors: usize,
    /// 默认个股数量
    #[serde(default = "default_stocks")]
    pub default_stocks: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub log: LogConfig,
}

// 默认值函数
fn default_kline_url() -> String { "http://push2his.eastmoney.com/api/qt/stock/kline/get".to_string() }
fn default_clist_url() -> String { "http://82.push2.eastmoney.com/api/qt/clist/get".to_string() }
fn default_user_agent() -> String { "Mozilla/5.0".to_string() }
fn default_color() -> bool { true }
fn default_days() -> usize { 7 }
fn default_sectors() -> usize { 5 }
fn default_stocks() -> usize { 10 }
fn default_log_level() -> String { "warn".to_string() }

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            kline_url: default_kline_url(),
            clist_url: default_clist_url(),
            user_agent: default_user_agent(),
            timeout_secs: None,
            connect_timeout_secs: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            max_width: None,
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            default_days: default_days(),
            default_sectors: default_sectors(),
            default_stocks: default_stocks(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值
    ///
    /// 日志级别来自配置本身，因此加载结果在日志初始化后再由 [`ConfigSource::log`] 输出
    pub fn load() -> (Self, ConfigSource) {
        let config_paths = ["config.json", "config/config.json"];
        let mut failure = None;

        for path in config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => return (config, ConfigSource::File(path)),
                    Err(e) => failure = Some((path, e.to_string())),
                }
            }
        }

        let source = match failure {
            Some((path, error)) => ConfigSource::Fallback { path, error },
            None => ConfigSource::Default,
        };
        (Self::default(), source)
    }
}

/// 配置来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(&'static str),
    Default,
    Fallback { path: &'static str, error: String },
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => log::info!("从 {} 加载配置成功", path),
            ConfigSource::Default => log::info!("使用默认配置"),
            ConfigSource::Fallback { path, error } => {
                log::warn!("加载配置文件 {} 失败: {}，使用默认配置", path, error)
            }
        }
    }
}
