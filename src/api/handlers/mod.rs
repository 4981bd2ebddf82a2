//! Handlers 模块
//!
//! HTTP 请求处理程序。

pub mod plan_handler;
pub mod program_handler;

pub use plan_handler::*;
pub use program_handler::*;
