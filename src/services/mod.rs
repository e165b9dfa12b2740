//! 业务逻辑服务模块
//!
//! 封装行情获取和汇总逻辑

pub mod client;   // HTTP 客户端
pub mod common;   // 接口常量和辅助函数
pub mod kline;    // 日K线获取
pub mod scanner;  // 成交额排名扫描
pub mod turnover; // 三市成交额汇总
