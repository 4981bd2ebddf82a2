//! 学习计划组装
//!
//! 把推荐结果与项目元数据合成最终文档，只做汇总，不含业务规则。

use chrono::Utc;
use uuid::Uuid;

use crate::models::plan::{PlanDocument, PlanEntry, PlanSection, ProgramInfo, StudyPlan};

pub fn assemble(info: &ProgramInfo, plan: &StudyPlan) -> PlanDocument {
    let sections: Vec<PlanSection> = plan
        .semesters
        .iter()
        .map(|semester| PlanSection {
            semester: semester.semester,
            electives: semester
                .electives
                .iter()
                .map(|planned| PlanEntry {
                    name: planned.course.name.clone(),
                    credits: planned.course.credits,
                    score: planned.score,
                    knowledge_areas: planned.course.knowledge_areas.iter().cloned().collect(),
                    justification: planned.justification.clone(),
                    unverified: planned.course.unverified,
                })
                .collect(),
            core: semester.core.iter().map(|c| c.name.clone()).collect(),
            selected_credits: semester.selected_credits(),
            budget: semester.budget,
        })
        .collect();

    PlanDocument {
        id: Uuid::new_v4().to_string(),
        program: info.program,
        title: info.title.clone(),
        duration_semesters: info.duration_semesters,
        total_selected_credits: sections.iter().map(|s| s.selected_credits).sum(),
        total_budget: sections.iter().map(|s| s.budget).sum(),
        sections,
        generated_at: Utc::now(),
    }
}
