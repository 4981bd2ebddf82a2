//! 核心数据模型模块
//!
//! 定义课程顾问的核心数据结构：Course, Curriculum, KnowledgeArea,
//! StudentProfile, StudyPlan, PlanDocument。

pub mod course;
pub mod knowledge_area;
pub mod plan;
pub mod student_profile;

pub use course::*;
pub use knowledge_area::*;
pub use plan::*;
pub use student_profile::*;
