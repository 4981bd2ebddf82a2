//! 服务模块

pub mod advisor;
pub mod assembler;
pub mod catalog;
pub mod parser;
pub mod recommender;
pub mod registry;

pub use advisor::{
    AdvisorService, AdvisorServiceImpl, CourseFilter, ProgramSummary, create_advisor_service,
};
pub use assembler::assemble;
pub use catalog::{CatalogSnapshot, CourseCatalog};
pub use parser::{CurriculumParser, DuplicatePolicy, ParseWarning, ParsedCurriculum, ParserPolicy};
pub use recommender::{RecommendOptions, Strategy, recommend, recommend_with, relevance};
pub use registry::KnowledgeAreaRegistry;
