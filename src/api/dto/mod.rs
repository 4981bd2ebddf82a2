//! DTO 模块
//!
//! 数据传输对象，用于 API 请求和响应的序列化。

pub mod plan_dto;
pub mod program_dto;

pub use plan_dto::*;
pub use program_dto::*;
