//! 学习计划 DTO

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::plan::PlanDocument;
use crate::services::recommender::{RecommendOptions, Strategy};

/// 生成学习计划请求
///
/// `scores` 与 `ratings` 二选一：前者按领域名评分，后者按领域顺序评分。
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlanRequest {
    /// 项目标识
    pub program: String,
    /// 领域 → 0..=5 评分
    pub scores: Option<BTreeMap<String, u8>>,
    /// 按 `/knowledge-areas` 返回顺序的评分
    pub ratings: Option<Vec<u8>>,
    /// broaden / deepen
    pub strategy: Strategy,
    /// 每学期最多推荐的课程数
    pub max_per_semester: Option<usize>,
}

impl PlanRequest {
    pub fn options(&self) -> RecommendOptions {
        RecommendOptions {
            strategy: self.strategy,
            max_per_semester: self.max_per_semester,
        }
    }
}

/// 学习计划响应
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    pub plan: PlanDocument,
    /// 面向对话前端的纯文本渲染
    pub text: String,
}

impl From<PlanDocument> for PlanResponse {
    fn from(plan: PlanDocument) -> Self {
        let text = plan.to_string();
        Self { plan, text }
    }
}
