//! 选课顾问服务
//!
//! 组合知识领域注册表、课程目录和项目元数据，是 HTTP 层与启动流程唯一的入口。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::course::{Course, CourseKind, Program};
use crate::models::knowledge_area::KnowledgeArea;
use crate::models::plan::{PlanDocument, ProgramInfo, SemesterBudgets};
use crate::models::student_profile::StudentProfile;
use crate::services::assembler::assemble;
use crate::services::catalog::CourseCatalog;
use crate::services::parser::ParseWarning;
use crate::services::recommender::{RecommendOptions, recommend_with};
use crate::services::registry::KnowledgeAreaRegistry;

/// 项目概览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub program: Program,
    pub title: String,
    pub duration_semesters: u32,
    pub elective_budgets: SemesterBudgets,
    pub course_count: usize,
    pub elective_count: usize,
    /// 课程目录快照版本，未加载时为 0
    pub catalog_version: u64,
}

/// 课程查询条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseFilter {
    pub semester: Option<u32>,
    pub kind: Option<CourseKind>,
}

impl CourseFilter {
    fn matches(&self, course: &Course) -> bool {
        self.semester.is_none_or(|s| course.semester == s)
            && self.kind.is_none_or(|k| course.kind == k)
    }
}

#[async_trait]
pub trait AdvisorService: Send + Sync {
    /// 所有已配置的项目
    async fn programs(&self) -> Result<Vec<ProgramSummary>>;

    /// 查询某项目的课程
    async fn courses(&self, program: Program, filter: CourseFilter) -> Result<Vec<Course>>;

    /// 知识领域，顺序即评分顺序
    async fn knowledge_areas(&self) -> Result<Vec<KnowledgeArea>>;

    /// 按领域顺序的评分构造学生画像
    async fn profile_from_ratings(&self, program: Program, ratings: &[u8]) -> Result<StudentProfile>;

    /// 生成学习计划文档
    async fn plan(&self, profile: &StudentProfile, options: &RecommendOptions) -> Result<PlanDocument>;

    /// 重新解析项目的课程表文本并替换快照，返回解析警告
    async fn reload_curriculum(&self, program: Program, source: &str) -> Result<Vec<ParseWarning>>;
}

pub struct AdvisorServiceImpl {
    registry: Arc<KnowledgeAreaRegistry>,
    catalog: Arc<CourseCatalog>,
    programs: BTreeMap<Program, ProgramInfo>,
}

impl AdvisorServiceImpl {
    pub fn new(
        registry: Arc<KnowledgeAreaRegistry>,
        catalog: Arc<CourseCatalog>,
        programs: BTreeMap<Program, ProgramInfo>,
    ) -> Self {
        Self {
            registry,
            catalog,
            programs,
        }
    }

    fn program_info(&self, program: Program) -> Result<&ProgramInfo> {
        self.programs
            .get(&program)
            .ok_or_else(|| AppError::NotFound(format!("program '{}' is not configured", program)))
    }
}

#[async_trait]
impl AdvisorService for AdvisorServiceImpl {
    async fn programs(&self) -> Result<Vec<ProgramSummary>> {
        let snapshot = self.catalog.snapshot();

        Ok(self
            .programs
            .values()
            .map(|info| {
                let courses = snapshot.courses(info.program);
                ProgramSummary {
                    program: info.program,
                    title: snapshot
                        .curriculum(info.program)
                        .map(|c| c.title.clone())
                        .unwrap_or_else(|| info.title.clone()),
                    duration_semesters: info.duration_semesters,
                    elective_budgets: info.elective_budgets.clone(),
                    course_count: courses.len(),
                    elective_count: courses.iter().filter(|c| c.is_elective()).count(),
                    catalog_version: snapshot.version,
                }
            })
            .collect())
    }

    async fn courses(&self, program: Program, filter: CourseFilter) -> Result<Vec<Course>> {
        self.program_info(program)?;
        let snapshot = self.catalog.snapshot();

        Ok(snapshot
            .courses(program)
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn knowledge_areas(&self) -> Result<Vec<KnowledgeArea>> {
        Ok(self.registry.areas().cloned().collect())
    }

    async fn profile_from_ratings(&self, program: Program, ratings: &[u8]) -> Result<StudentProfile> {
        self.program_info(program)?;
        Ok(StudentProfile::from_ratings(
            program,
            self.registry.area_ids(),
            ratings,
        )?)
    }

    async fn plan(&self, profile: &StudentProfile, options: &RecommendOptions) -> Result<PlanDocument> {
        let info = self.program_info(profile.program)?;
        let snapshot = self.catalog.snapshot();

        let plan = recommend_with(
            profile,
            snapshot.courses(profile.program),
            &self.registry,
            &info.elective_budgets,
            options,
        )?;

        let mut info = info.clone();
        if let Some(curriculum) = snapshot.curriculum(profile.program) {
            info.title = curriculum.title.clone();
        }

        let document = assemble(&info, &plan);
        debug!(
            "Plan {} for {} (snapshot v{}): {}/{} elective credits",
            document.id,
            profile.program,
            snapshot.version,
            document.total_selected_credits,
            document.total_budget
        );
        Ok(document)
    }

    async fn reload_curriculum(&self, program: Program, source: &str) -> Result<Vec<ParseWarning>> {
        let info = self.program_info(program)?;
        let warnings = self.catalog.load(info, source)?;
        info!(
            "Curriculum for {} reloaded with {} warnings",
            program,
            warnings.len()
        );
        Ok(warnings)
    }
}

/// 创建选课顾问服务
pub fn create_advisor_service(
    registry: Arc<KnowledgeAreaRegistry>,
    catalog: Arc<CourseCatalog>,
    programs: BTreeMap<Program, ProgramInfo>,
) -> Box<dyn AdvisorService> {
    Box::new(AdvisorServiceImpl::new(registry, catalog, programs))
}
