//! 课程数据模型
//!
//! 课程表解析的产物：项目、课程、课程表。

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// 硕士项目
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Program {
    /// 人工智能
    Ai,
    /// 基于 AI 的产品开发
    AiProduct,
}

impl Program {
    /// 所有项目（稳定顺序）
    pub const ALL: [Program; 2] = [Program::Ai, Program::AiProduct];

    pub fn as_str(&self) -> &'static str {
        match self {
            Program::Ai => "ai",
            Program::AiProduct => "ai_product",
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Program {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ai" => Ok(Program::Ai),
            "ai_product" | "ai-product" => Ok(Program::AiProduct),
            other => Err(format!("unknown program '{}'", other)),
        }
    }
}

/// 课程类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseKind {
    /// 必修
    Core,
    /// 选修
    Elective,
}

impl FromStr for CourseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "core" | "compulsory" => Ok(CourseKind::Core),
            "elective" => Ok(CourseKind::Elective),
            other => Err(format!("unknown course kind '{}'", other)),
        }
    }
}

/// 课程
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Course {
    /// 课程名称
    pub name: String,
    /// 所属项目
    pub program: Program,
    /// 学期（从 1 开始）
    pub semester: u32,
    /// 学分（ЗЕТ）；缺失时为配置的回退值
    pub credits: u32,
    /// 必修/选修
    pub kind: CourseKind,
    /// 关键词匹配到的知识领域
    #[serde(default)]
    pub knowledge_areas: BTreeSet<String>,
    /// 课程编号（来源文档中的行首编号）
    #[serde(default)]
    pub code: Option<String>,
    /// 学时
    #[serde(default)]
    pub workload_hours: Option<u32>,
    /// 来源中缺少学分
    #[serde(default)]
    pub unverified: bool,
}

impl Course {
    pub fn new(name: &str, program: Program, semester: u32, credits: u32, kind: CourseKind) -> Self {
        Self {
            name: name.to_string(),
            program,
            semester,
            credits,
            kind,
            knowledge_areas: BTreeSet::new(),
            code: None,
            workload_hours: None,
            unverified: false,
        }
    }

    /// 设置知识领域
    pub fn with_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.knowledge_areas = areas.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_elective(&self) -> bool {
        self.kind == CourseKind::Elective
    }
}

/// 一个项目的完整课程表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curriculum {
    pub program: Program,
    /// 项目名称（来源文档中的 "ОП ..." 行，或配置中的名称）
    pub title: String,
    /// 学制（学期数）
    pub duration_semesters: u32,
    /// 文档顺序的课程列表
    pub courses: Vec<Course>,
}

impl Curriculum {
    pub fn electives(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter().filter(|c| c.is_elective())
    }

    pub fn courses_by_semester(&self, semester: u32) -> impl Iterator<Item = &Course> {
        self.courses.iter().filter(move |c| c.semester == semester)
    }

    pub fn core_by_semester(&self, semester: u32) -> impl Iterator<Item = &Course> {
        self.courses_by_semester(semester)
            .filter(|c| c.kind == CourseKind::Core)
    }

    pub fn electives_by_semester(&self, semester: u32) -> impl Iterator<Item = &Course> {
        self.courses_by_semester(semester).filter(|c| c.is_elective())
    }

    /// 按课程编号查找
    pub fn find_by_code(&self, code: &str) -> Option<&Course> {
        self.courses
            .iter()
            .find(|c| c.code.as_deref() == Some(code))
    }

    /// 学期总学分
    pub fn semester_credits(&self, semester: u32) -> u32 {
        self.courses_by_semester(semester).map(|c| c.credits).sum()
    }

    /// 学期总学时
    pub fn semester_workload(&self, semester: u32) -> u32 {
        self.courses_by_semester(semester)
            .filter_map(|c| c.workload_hours)
            .sum()
    }
}
