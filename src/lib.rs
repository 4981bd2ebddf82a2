//! Curriculum Advisor - 硕士项目选课顾问服务
//!
//! 解析项目学习计划文本，按知识领域给课程打标签，
//! 再根据学生自评分在每学期的选修学分预算内推荐选修课。

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod services;
