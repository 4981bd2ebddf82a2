//! 项目与课程 DTO

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::course::{Course, CourseKind, Program};
use crate::models::knowledge_area::KnowledgeArea;
use crate::services::advisor::ProgramSummary;
use crate::services::parser::ParseWarning;

/// 项目列表响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ProgramListResponse {
    pub programs: Vec<ProgramSummary>,
}

/// 课程查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CourseQueryParams {
    /// 学期序号
    pub semester: Option<u32>,
    /// core / elective
    pub kind: Option<String>,
}

/// 课程响应
#[derive(Debug, Serialize, Deserialize)]
pub struct CourseResponse {
    pub name: String,
    pub code: Option<String>,
    pub semester: u32,
    pub credits: u32,
    pub workload_hours: Option<u32>,
    pub kind: CourseKind,
    pub knowledge_areas: BTreeSet<String>,
    pub unverified: bool,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            name: course.name,
            code: course.code,
            semester: course.semester,
            credits: course.credits,
            workload_hours: course.workload_hours,
            kind: course.kind,
            knowledge_areas: course.knowledge_areas,
            unverified: course.unverified,
        }
    }
}

/// 课程列表响应
#[derive(Debug, Serialize, Deserialize)]
pub struct CourseListResponse {
    pub program: Program,
    pub courses: Vec<CourseResponse>,
    pub total: usize,
}

/// 知识领域响应
#[derive(Debug, Serialize, Deserialize)]
pub struct KnowledgeAreaListResponse {
    /// 评分时使用的领域顺序
    pub rating_order: Vec<String>,
    pub areas: Vec<KnowledgeArea>,
}

/// 课程表重新加载响应
#[derive(Debug, Serialize, Deserialize)]
pub struct CurriculumReloadResponse {
    pub program: Program,
    pub warnings: Vec<ParseWarning>,
    /// 警告的可读形式
    pub messages: Vec<String>,
}

impl CurriculumReloadResponse {
    pub fn new(program: Program, warnings: Vec<ParseWarning>) -> Self {
        let messages = warnings.iter().map(ToString::to_string).collect();
        Self {
            program,
            warnings,
            messages,
        }
    }
}
