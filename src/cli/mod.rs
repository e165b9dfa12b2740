//! 交互终端
//!
//! 提示输入、调用汇总服务并渲染表格

pub mod render;
pub mod session;

pub use session::Session;
