//! Routes 模块
//!
//! 定义 API 路由。

pub mod plan_routes;
pub mod program_routes;
