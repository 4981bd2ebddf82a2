//! 学习计划数据模型
//!
//! `StudyPlan` 是推荐引擎的输出，`PlanDocument` 是交给对话前端的最终文档。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::course::{Course, Program};

/// 学期 → 选修学分上限
pub type SemesterBudgets = BTreeMap<u32, u32>;

/// 项目元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramInfo {
    pub program: Program,
    pub title: String,
    pub duration_semesters: u32,
    /// 每学期的选修学分上限
    pub elective_budgets: SemesterBudgets,
}

impl ProgramInfo {
    pub fn budget(&self, semester: u32) -> u32 {
        self.elective_budgets.get(&semester).copied().unwrap_or(0)
    }
}

/// 被选中的选修课及其理由
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedCourse {
    pub course: Course,
    /// 相关性得分
    pub score: u32,
    pub justification: String,
}

/// 单个学期的计划
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterPlan {
    pub semester: u32,
    /// 选修学分上限
    pub budget: u32,
    /// 按推荐顺序排列的选修课
    pub electives: Vec<PlannedCourse>,
    /// 本学期必修课（不占选修预算）
    pub core: Vec<Course>,
}

impl SemesterPlan {
    pub fn selected_credits(&self) -> u32 {
        self.electives.iter().map(|p| p.course.credits).sum()
    }
}

/// 学习计划
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub program: Program,
    /// 按学期升序
    pub semesters: Vec<SemesterPlan>,
}

impl StudyPlan {
    pub fn semester(&self, semester: u32) -> Option<&SemesterPlan> {
        self.semesters.iter().find(|s| s.semester == semester)
    }

    /// 所有被选中的选修课，按学期和推荐顺序
    pub fn selected(&self) -> impl Iterator<Item = &PlannedCourse> {
        self.semesters.iter().flat_map(|s| s.electives.iter())
    }
}

/// 计划文档中的一门课
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub name: String,
    pub credits: u32,
    pub score: u32,
    pub knowledge_areas: Vec<String>,
    pub justification: String,
    pub unverified: bool,
}

/// 计划文档中的一个学期
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSection {
    pub semester: u32,
    pub electives: Vec<PlanEntry>,
    pub core: Vec<String>,
    pub selected_credits: u32,
    pub budget: u32,
}

/// 最终学习计划文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDocument {
    pub id: String,
    pub program: Program,
    pub title: String,
    pub duration_semesters: u32,
    pub sections: Vec<PlanSection>,
    pub total_selected_credits: u32,
    pub total_budget: u32,
    pub generated_at: DateTime<Utc>,
}

impl fmt::Display for PlanDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.title, self.program)?;
        for section in &self.sections {
            writeln!(
                f,
                "Semester {}: {}/{} elective credits",
                section.semester, section.selected_credits, section.budget
            )?;
            for core in &section.core {
                writeln!(f, "  [core] {}", core)?;
            }
            for entry in &section.electives {
                let marker = if entry.unverified { "?" } else { "" };
                writeln!(
                    f,
                    "  • {} ({}{} cr): {}",
                    entry.name, entry.credits, marker, entry.justification
                )?;
            }
        }
        write!(
            f,
            "Total: {}/{} elective credits",
            self.total_selected_credits, self.total_budget
        )
    }
}
