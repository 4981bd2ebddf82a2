//! Plan Routes

use crate::api::handlers::plan_handler::*;
use axum::{Router, routing::post};

use crate::api::app_state::AppState;

/// 创建学习计划路由器
pub fn create_plan_router() -> Router<AppState> {
    Router::new().route("/plans", post(create_plan))
}
