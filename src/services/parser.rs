//! 课程表解析服务
//!
//! 把外部抓取到的项目学习计划文本（PDF 提取后的逐行文本）解析为课程列表。
//! 解析是纯函数：相同输入总是得到相同输出，保持文档顺序。
//!
//! 识别的结构：
//! - `ОП <名称>`：项目名称
//! - `<N> семестр` / `Семестр <N>` / `Semester <N>`：学期段落
//! - `Обязательные дисциплины` / `Core`：必修段落；
//!   `Пул выборных дисциплин` / `Выборные дисциплины` / `Elective`：选修段落
//! - `<编号><课程名> <学分> [<学时>]`：课程行

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

use crate::error::ParseError;
use crate::models::course::{Course, CourseKind, Curriculum};
use crate::models::plan::ProgramInfo;

/// 一个学分对应的学时
pub const HOURS_PER_CREDIT: u32 = 36;

/// 单个数字不超过该值时视为学分，否则视为学时
const MAX_PLAIN_CREDITS: u32 = 30;

static PROGRAM_TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ОП\s+(.+)$").unwrap());

/// 学期标题只在行首识别，课程名中的 "семестр" 不算
static SEMESTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(\d{1,2})\s*(?:-?[йы]\s*)?семестр\b|семестр\s*(\d{1,2})\b|semester\s*(\d{1,2})\b)")
        .unwrap()
});

static COURSE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+)\s*|[-•*]\s+)([^\d\s].*?)(?:\s+(\d+)(?:\s+(\d+))?)?$").unwrap()
});

/// 同一学期重名课程的处理策略
///
/// 课程名比较不区分大小写：`Статистика` 与 `статистика` 视为同一门课。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// 保留最后一次出现
    #[default]
    LastWriteWins,
    /// 保留第一次出现
    FirstWriteWins,
}

/// 解析容错策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserPolicy {
    /// 缺失学分时使用的值（课程同时标记为 unverified）
    pub missing_credit_fallback: u32,
    /// 必修/选修标记缺失或矛盾时的课程类型
    pub ambiguous_kind: CourseKind,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for ParserPolicy {
    fn default() -> Self {
        Self {
            missing_credit_fallback: 0,
            ambiguous_kind: CourseKind::Elective,
            duplicate_policy: DuplicatePolicy::LastWriteWins,
        }
    }
}

/// 解析警告：单条记录的问题不会中断解析
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    MissingCredits { line: usize, course: String },
    AmbiguousKind { line: usize, course: String, assumed: CourseKind },
    DuplicateCourse { line: usize, course: String, semester: u32 },
    SemesterOutOfRange { line: usize, course: String, semester: u32 },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::MissingCredits { line, course } => {
                write!(f, "line {}: '{}' has no credit value", line, course)
            }
            ParseWarning::AmbiguousKind { line, course, assumed } => write!(
                f,
                "line {}: '{}' has no clear core/elective marker, assumed {:?}",
                line, course, assumed
            ),
            ParseWarning::DuplicateCourse { line, course, semester } => write!(
                f,
                "line {}: '{}' appears more than once in semester {}",
                line, course, semester
            ),
            ParseWarning::SemesterOutOfRange { line, course, semester } => write!(
                f,
                "line {}: '{}' is in semester {} outside the program duration",
                line, course, semester
            ),
        }
    }
}

/// 解析结果
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCurriculum {
    pub curriculum: Curriculum,
    pub warnings: Vec<ParseWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Core,
    Elective,
    Ambiguous,
}

/// 课程表解析器
#[derive(Debug, Clone, Default)]
pub struct CurriculumParser {
    policy: ParserPolicy,
}

impl CurriculumParser {
    pub fn new(policy: ParserPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ParserPolicy {
        &self.policy
    }

    /// 解析一个项目的课程表文本
    pub fn parse(&self, info: &ProgramInfo, source: &str) -> Result<ParsedCurriculum, ParseError> {
        let program = info.program;
        if source.trim().is_empty() {
            return Err(ParseError::EmptySource(program.to_string()));
        }

        let mut title: Option<String> = None;
        let mut semester: Option<u32> = None;
        let mut section: Option<Section> = None;
        let mut saw_semester = false;

        let mut slots: Vec<Option<Course>> = Vec::new();
        let mut seen: HashMap<(u32, String), usize> = HashMap::new();
        let mut warnings = Vec::new();

        for (index, raw) in source.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if title.is_none() {
                if let Some(caps) = PROGRAM_TITLE.captures(line) {
                    title = Some(caps[1].trim().to_string());
                    continue;
                }
            }

            if let Some(n) = semester_number(line) {
                semester = Some(n);
                section = None;
                saw_semester = true;
                continue;
            }

            // 带学分的编号行总是课程行，即使名称里含有标记词；
            // 不带学分的编号行只有在不像段落标题时才算课程
            let course_line = COURSE_LINE
                .captures(line)
                .filter(|caps| caps.get(3).is_some() || section_marker(line).is_none());
            let Some(caps) = course_line else {
                if let Some(marker) = section_marker(line) {
                    section = Some(marker);
                }
                continue;
            };
            let Some(current) = semester else {
                continue;
            };

            let name = clean_name(&caps[2]);
            if name.is_empty() {
                continue;
            }

            if current == 0 || current > info.duration_semesters {
                warnings.push(ParseWarning::SemesterOutOfRange {
                    line: line_no,
                    course: name,
                    semester: current,
                });
                continue;
            }

            let first = caps.get(3).and_then(|m| m.as_str().parse::<u32>().ok());
            let second = caps.get(4).and_then(|m| m.as_str().parse::<u32>().ok());
            let (credits, hours) = decode_credits(first, second);

            let kind = match section {
                Some(Section::Core) => CourseKind::Core,
                Some(Section::Elective) => CourseKind::Elective,
                Some(Section::Ambiguous) | None => {
                    warnings.push(ParseWarning::AmbiguousKind {
                        line: line_no,
                        course: name.clone(),
                        assumed: self.policy.ambiguous_kind,
                    });
                    self.policy.ambiguous_kind
                }
            };

            let mut course = Course::new(&name, program, current, 0, kind);
            course.code = caps.get(1).map(|m| m.as_str().to_string());
            course.workload_hours = hours;
            match credits {
                Some(credits) => course.credits = credits,
                None => {
                    warnings.push(ParseWarning::MissingCredits {
                        line: line_no,
                        course: name.clone(),
                    });
                    course.credits = self.policy.missing_credit_fallback;
                    course.unverified = true;
                }
            }

            let key = (current, name.to_lowercase());
            match seen.get(&key).copied() {
                Some(previous) => {
                    warnings.push(ParseWarning::DuplicateCourse {
                        line: line_no,
                        course: name,
                        semester: current,
                    });
                    if self.policy.duplicate_policy == DuplicatePolicy::LastWriteWins {
                        slots[previous] = None;
                        seen.insert(key, slots.len());
                        slots.push(Some(course));
                    }
                }
                None => {
                    seen.insert(key, slots.len());
                    slots.push(Some(course));
                }
            }
        }

        if !saw_semester {
            return Err(ParseError::NoSemesterSections(program.to_string()));
        }

        for warning in &warnings {
            warn!(program = %program, "{}", warning);
        }

        let courses: Vec<Course> = slots.into_iter().flatten().collect();
        debug!(
            "Parsed {} courses for program {} ({} warnings)",
            courses.len(),
            program,
            warnings.len()
        );

        Ok(ParsedCurriculum {
            curriculum: Curriculum {
                program,
                title: title.unwrap_or_else(|| info.title.clone()),
                duration_semesters: info.duration_semesters,
                courses,
            },
            warnings,
        })
    }
}

fn semester_number(line: &str) -> Option<u32> {
    let caps = SEMESTER.captures(line)?;
    (1..=3)
        .filter_map(|i| caps.get(i))
        .find_map(|m| m.as_str().parse().ok())
}

fn section_marker(line: &str) -> Option<Section> {
    let lower = line.to_lowercase();
    let core = lower.contains("обязательн") || lower.starts_with("core");
    let elective = lower.contains("выборн")
        || lower.contains("элективн")
        || lower.starts_with("elective");

    match (core, elective) {
        (true, true) => Some(Section::Ambiguous),
        (true, false) => Some(Section::Core),
        (false, true) => Some(Section::Elective),
        (false, false) => None,
    }
}

fn clean_name(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(|c: char| c == ',' || c == ';' || c == ':' || c == '.')
        .trim()
        .to_string()
}

/// 解读课程行末尾的数字，返回 (学分, 学时)
///
/// PDF 提取常把两列粘在一起，例如 `3108` 表示 3 学分 108 学时。
fn decode_credits(first: Option<u32>, second: Option<u32>) -> (Option<u32>, Option<u32>) {
    match (first, second) {
        (Some(credits), Some(hours)) => (Some(credits).filter(|c| *c > 0), Some(hours)),
        (Some(n), None) => {
            if let Some(split) = split_glued(n) {
                return (Some(split.0), Some(split.1));
            }
            if n == 0 {
                (None, None)
            } else if n <= MAX_PLAIN_CREDITS {
                (Some(n), None)
            } else if n % HOURS_PER_CREDIT == 0 {
                (Some(n / HOURS_PER_CREDIT), Some(n))
            } else {
                (None, Some(n))
            }
        }
        _ => (None, None),
    }
}

fn split_glued(n: u32) -> Option<(u32, u32)> {
    let digits = n.to_string();
    (1..digits.len()).find_map(|at| {
        let (head, tail) = digits.split_at(at);
        if tail.starts_with('0') {
            return None;
        }
        let credits: u32 = head.parse().ok()?;
        let hours: u32 = tail.parse().ok()?;
        (credits > 0 && credits.checked_mul(HOURS_PER_CREDIT) == Some(hours)).then_some((credits, hours))
    })
}
