//! 知识领域数据模型

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 知识领域
///
/// 既用于学生自评，也用于通过关键词给课程打标签。
/// 关键词在加载时已经规范化（小写、去变音符号）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeArea {
    /// 领域标识，例如 "math"
    pub id: String,
    /// 规范化后的同义关键词
    pub keywords: BTreeSet<String>,
}

/// 多个领域共享的关键词（配置警告）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordOverlap {
    pub keyword: String,
    pub areas: Vec<String>,
}
