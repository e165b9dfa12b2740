//! 错误类型
//!
//! 区分网络失败、响应异常和用户输入错误，调用方据此选择提示信息

use thiserror::Error;

/// 行情数据获取错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// 连接失败、超时等传输层错误
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),

    /// 服务端返回非 2xx 状态
    #[error("接口返回异常状态: {0}")]
    Status(reqwest::StatusCode),

    /// 响应无法解析
    #[error("响应格式错误: {0}")]
    Malformed(String),

    /// 响应中没有数据
    #[error("接口未返回数据: {0}")]
    Empty(String),

    /// 快照行缺少约定字段
    #[error("第 {row} 行缺少字段 {field}")]
    MissingField { field: &'static str, row: usize },

    /// 请求参数不合法，未发出请求
    #[error("请求参数无效: {0}")]
    InvalidRequest(String),
}

/// 错误大类，供交互层选择提示文案
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Network,
    Payload,
    Request,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Network(_) | FetchError::Status(_) => FetchErrorKind::Network,
            FetchError::Malformed(_) | FetchError::Empty(_) | FetchError::MissingField { .. } => {
                FetchErrorKind::Payload
            }
            FetchError::InvalidRequest(_) => FetchErrorKind::Request,
        }
    }
}

/// 交互输入错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("请输入有效的数字！")]
    NotANumber(String),
}
