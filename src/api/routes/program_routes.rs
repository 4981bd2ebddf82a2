//! Program Routes
//!
//! 定义项目、课程和知识领域相关的 API 路由。

use crate::api::handlers::program_handler::*;
use axum::{
    Router,
    routing::{get, put},
};

use crate::api::app_state::AppState;

/// 创建项目路由器
pub fn create_program_router() -> Router<AppState> {
    Router::new()
        .route("/programs", get(list_programs))
        .route("/programs/:program/courses", get(list_courses))
        .route("/programs/:program/curriculum", put(reload_curriculum))
        .route("/knowledge-areas", get(list_knowledge_areas))
}
