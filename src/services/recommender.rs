//! 推荐引擎
//!
//! 根据学生自评分给选修课打分，按学期排序后在学分预算内贪心选课。
//! 选课是启发式的，不是最优装箱：放不下的课程被跳过，继续尝试后面更小的课程。

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use crate::error::ProfileError;
use crate::models::course::Course;
use crate::models::plan::{PlannedCourse, SemesterBudgets, SemesterPlan, StudyPlan};
use crate::models::student_profile::{MAX_SCORE, StudentProfile};
use crate::services::registry::KnowledgeAreaRegistry;

/// 打分策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// 补短板：得分 = Σ (5 - 自评分)
    #[default]
    Broaden,
    /// 强化优势：得分 = Σ 自评分
    Deepen,
}

/// 推荐选项
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendOptions {
    pub strategy: Strategy,
    /// 每学期最多推荐的选修课数量
    pub max_per_semester: Option<usize>,
}

/// 计算一门课的相关性得分；未匹配任何已知领域的课程得 0 分
pub fn relevance(
    profile: &StudentProfile,
    course: &Course,
    registry: &KnowledgeAreaRegistry,
    strategy: Strategy,
) -> u32 {
    known_areas(course, registry)
        .map(|area| {
            let score = profile.score(area).unwrap_or(0).min(MAX_SCORE);
            match strategy {
                Strategy::Broaden => u32::from(MAX_SCORE - score),
                Strategy::Deepen => u32::from(score),
            }
        })
        .sum()
}

/// 使用默认选项生成学习计划
pub fn recommend(
    profile: &StudentProfile,
    courses: &[Course],
    registry: &KnowledgeAreaRegistry,
    budgets: &SemesterBudgets,
) -> Result<StudyPlan, ProfileError> {
    recommend_with(profile, courses, registry, budgets, &RecommendOptions::default())
}

/// 生成学习计划
///
/// 画像缺少任何已注册领域的评分时返回 `ProfileError::Incomplete`。
/// 没有选修课的学期得到空计划。
pub fn recommend_with(
    profile: &StudentProfile,
    courses: &[Course],
    registry: &KnowledgeAreaRegistry,
    budgets: &SemesterBudgets,
    options: &RecommendOptions,
) -> Result<StudyPlan, ProfileError> {
    profile.check_complete(registry.area_ids())?;

    let program_courses: Vec<&Course> = courses
        .iter()
        .filter(|c| c.program == profile.program)
        .collect();

    let semesters: BTreeSet<u32> = budgets
        .keys()
        .copied()
        .chain(program_courses.iter().map(|c| c.semester))
        .collect();

    let mut plan = StudyPlan {
        program: profile.program,
        semesters: Vec::with_capacity(semesters.len()),
    };

    for semester in semesters {
        let budget = budgets.get(&semester).copied().unwrap_or(0);

        let mut candidates: Vec<PlannedCourse> = program_courses
            .iter()
            .filter(|c| c.semester == semester && c.is_elective())
            .map(|course| PlannedCourse {
                score: relevance(profile, course, registry, options.strategy),
                justification: justify(profile, course, registry, options.strategy),
                course: (*course).clone(),
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.course.name.cmp(&b.course.name))
                .then_with(|| a.course.credits.cmp(&b.course.credits))
        });

        let mut remaining = budget;
        let mut taken: HashSet<String> = HashSet::new();
        let mut electives = Vec::new();
        for candidate in candidates {
            if options
                .max_per_semester
                .is_some_and(|max| electives.len() >= max)
            {
                break;
            }
            if taken.contains(&candidate.course.name) {
                continue;
            }
            if candidate.course.credits > remaining {
                debug!(
                    "Skipping '{}' in semester {}: {} credits, {} remaining",
                    candidate.course.name, semester, candidate.course.credits, remaining
                );
                continue;
            }
            remaining -= candidate.course.credits;
            taken.insert(candidate.course.name.clone());
            electives.push(candidate);
        }

        let core = program_courses
            .iter()
            .filter(|c| c.semester == semester && !c.is_elective())
            .map(|c| (*c).clone())
            .collect();

        debug!(
            "Semester {}: selected {} electives ({} of {} credits)",
            semester,
            electives.len(),
            budget - remaining,
            budget
        );

        plan.semesters.push(SemesterPlan {
            semester,
            budget,
            electives,
            core,
        });
    }

    Ok(plan)
}

fn known_areas<'a>(
    course: &'a Course,
    registry: &'a KnowledgeAreaRegistry,
) -> impl Iterator<Item = &'a str> {
    course
        .knowledge_areas
        .iter()
        .map(String::as_str)
        .filter(|area| registry.contains(area))
}

fn justify(
    profile: &StudentProfile,
    course: &Course,
    registry: &KnowledgeAreaRegistry,
    strategy: Strategy,
) -> String {
    let parts: Vec<String> = known_areas(course, registry)
        .map(|area| {
            let score = profile.score(area).unwrap_or(0).min(MAX_SCORE);
            match strategy {
                Strategy::Broaden => {
                    format!("{} (rated {}/{}, gap {})", area, score, MAX_SCORE, MAX_SCORE - score)
                }
                Strategy::Deepen => format!("{} (rated {}/{})", area, score, MAX_SCORE),
            }
        })
        .collect();

    let mut text = if parts.is_empty() {
        "no matching knowledge area; included as filler".to_string()
    } else {
        match strategy {
            Strategy::Broaden => format!("fills gaps in {}", parts.join(", ")),
            Strategy::Deepen => format!("builds on {}", parts.join(", ")),
        }
    };
    if course.unverified {
        text.push_str("; credit value unverified");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::course::{CourseKind, Program};
    use serde_json::json;

    fn registry() -> KnowledgeAreaRegistry {
        KnowledgeAreaRegistry::load(&json!({
            "math": ["алгебра"],
            "programming": ["python"],
        }))
        .unwrap()
    }

    fn profile(math: u8, programming: u8) -> StudentProfile {
        StudentProfile::new(Program::Ai)
            .with_score("math", math)
            .unwrap()
            .with_score("programming", programming)
            .unwrap()
    }

    fn elective(name: &str, semester: u32, credits: u32, areas: &[&str]) -> Course {
        Course::new(name, Program::Ai, semester, credits, CourseKind::Elective)
            .with_areas(areas.iter().copied())
    }

    fn budgets(entries: &[(u32, u32)]) -> SemesterBudgets {
        entries.iter().copied().collect()
    }

    fn selected_names(plan: &StudyPlan, semester: u32) -> Vec<String> {
        plan.semester(semester)
            .map(|s| s.electives.iter().map(|p| p.course.name.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_gap_scenario_budget_three() {
        let courses = vec![
            elective("A", 1, 3, &["math"]),
            elective("B", 1, 3, &["programming"]),
        ];
        let plan = recommend(&profile(1, 4), &courses, &registry(), &budgets(&[(1, 3)])).unwrap();

        assert_eq!(selected_names(&plan, 1), vec!["A"]);
        assert_eq!(plan.semester(1).unwrap().electives[0].score, 4);
    }

    #[test]
    fn test_gap_scenario_budget_six() {
        let courses = vec![
            elective("B", 1, 3, &["programming"]),
            elective("A", 1, 3, &["math"]),
        ];
        let plan = recommend(&profile(1, 4), &courses, &registry(), &budgets(&[(1, 6)])).unwrap();

        let semester = plan.semester(1).unwrap();
        assert_eq!(selected_names(&plan, 1), vec!["A", "B"]);
        assert_eq!(semester.electives[1].score, 1);
        assert_eq!(semester.selected_credits(), 6);
    }

    #[test]
    fn test_missing_rating_is_incomplete() {
        let profile = StudentProfile::new(Program::Ai).with_score("math", 1).unwrap();
        let err = recommend(&profile, &[], &registry(), &budgets(&[(1, 3)])).unwrap_err();
        assert_eq!(
            err,
            ProfileError::Incomplete {
                missing: vec!["programming".to_string()]
            }
        );
    }

    #[test]
    fn test_fully_strong_student_scores_zero() {
        let courses = vec![
            elective("A", 1, 3, &["math"]),
            elective("B", 1, 3, &["math", "programming"]),
            elective("C", 2, 3, &[]),
        ];
        let registry = registry();
        let strong = profile(5, 5);
        for course in &courses {
            assert_eq!(relevance(&strong, course, &registry, Strategy::Broaden), 0);
        }
    }

    #[test]
    fn test_ties_break_by_name_not_input_order() {
        let registry = registry();
        let budget = budgets(&[(1, 6)]);
        let forward = vec![
            elective("Beta", 1, 3, &["math"]),
            elective("Alpha", 1, 3, &["math"]),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = recommend(&profile(2, 2), &forward, &registry, &budget).unwrap();
        let b = recommend(&profile(2, 2), &reversed, &registry, &budget).unwrap();

        assert_eq!(selected_names(&a, 1), vec!["Alpha", "Beta"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_oversized_course_is_skipped_not_aborting() {
        let courses = vec![
            elective("Big", 1, 6, &["math", "programming"]),
            elective("Small", 1, 2, &["math"]),
            elective("Filler", 1, 1, &[]),
        ];
        let plan = recommend(&profile(0, 0), &courses, &registry(), &budgets(&[(1, 4)])).unwrap();

        assert_eq!(selected_names(&plan, 1), vec!["Small", "Filler"]);
        assert!(plan.semester(1).unwrap().selected_credits() <= 4);
    }

    #[test]
    fn test_selected_credits_never_exceed_budget() {
        let courses: Vec<Course> = (1..=12)
            .map(|i| elective(&format!("Course {:02}", i), 1 + i % 3, i % 5 + 1, &["math"]))
            .collect();
        let budget = budgets(&[(1, 7), (2, 4), (3, 0)]);
        let plan = recommend(&profile(3, 1), &courses, &registry(), &budget).unwrap();

        for semester in &plan.semesters {
            assert!(semester.selected_credits() <= semester.budget);
        }
        assert!(plan.semester(3).unwrap().electives.is_empty());
    }

    #[test]
    fn test_recommend_is_idempotent() {
        let courses = vec![
            elective("A", 1, 3, &["math"]),
            elective("B", 1, 2, &["programming"]),
            elective("C", 2, 4, &["math", "programming"]),
        ];
        let registry = registry();
        let budget = budgets(&[(1, 5), (2, 4)]);
        let first = recommend(&profile(1, 3), &courses, &registry, &budget).unwrap();
        let second = recommend(&profile(1, 3), &courses, &registry, &budget).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_semester_without_electives_is_empty_plan() {
        let courses = vec![Course::new("Core", Program::Ai, 2, 6, CourseKind::Core)];
        let plan = recommend(&profile(1, 1), &courses, &registry(), &budgets(&[(1, 6)])).unwrap();

        assert!(plan.semester(1).unwrap().electives.is_empty());
        let second = plan.semester(2).unwrap();
        assert!(second.electives.is_empty());
        assert_eq!(second.core.len(), 1);
        assert_eq!(second.budget, 0);
    }

    #[test]
    fn test_other_program_courses_are_ignored() {
        let mut other = elective("Other", 1, 1, &["math"]);
        other.program = Program::AiProduct;
        let plan = recommend(&profile(0, 0), &[other], &registry(), &budgets(&[(1, 6)])).unwrap();
        assert!(plan.semester(1).unwrap().electives.is_empty());
    }

    #[test]
    fn test_deepen_strategy_prefers_strengths() {
        let courses = vec![
            elective("A", 1, 3, &["math"]),
            elective("B", 1, 3, &["programming"]),
        ];
        let options = RecommendOptions {
            strategy: Strategy::Deepen,
            max_per_semester: Some(1),
        };
        let plan = recommend_with(
            &profile(1, 4),
            &courses,
            &registry(),
            &budgets(&[(1, 6)]),
            &options,
        )
        .unwrap();

        assert_eq!(selected_names(&plan, 1), vec!["B"]);
        assert!(plan.semester(1).unwrap().electives[0]
            .justification
            .contains("programming (rated 4/5)"));
    }

    #[test]
    fn test_justification_names_areas_and_gap() {
        let courses = vec![
            elective("A", 1, 3, &["math"]),
            elective("Z", 1, 1, &[]),
        ];
        let plan = recommend(&profile(1, 4), &courses, &registry(), &budgets(&[(1, 6)])).unwrap();
        let electives = &plan.semester(1).unwrap().electives;

        assert_eq!(electives[0].justification, "fills gaps in math (rated 1/5, gap 4)");
        assert!(electives[1].justification.contains("filler"));
    }
}
