//! 课程目录
//!
//! 持有所有项目课程表的当前快照。重新解析总是生成新快照，再整体替换；
//! 读者拿到的 `Arc<CatalogSnapshot>` 在整个推荐调用期间保持不变。

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::error::ParseError;
use crate::models::course::{Course, Curriculum, Program};
use crate::models::plan::ProgramInfo;
use crate::services::parser::{CurriculumParser, ParseWarning};
use crate::services::registry::KnowledgeAreaRegistry;

/// 不可变的课程目录快照
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    /// 每次替换递增
    pub version: u64,
    pub loaded_at: DateTime<Utc>,
    curricula: BTreeMap<Program, Arc<Curriculum>>,
}

impl CatalogSnapshot {
    fn empty() -> Self {
        Self {
            version: 0,
            loaded_at: Utc::now(),
            curricula: BTreeMap::new(),
        }
    }

    pub fn curriculum(&self, program: Program) -> Option<&Curriculum> {
        self.curricula.get(&program).map(Arc::as_ref)
    }

    /// 项目的课程；未加载时为空
    pub fn courses(&self, program: Program) -> &[Course] {
        self.curriculum(program)
            .map(|c| c.courses.as_slice())
            .unwrap_or(&[])
    }

    pub fn programs(&self) -> impl Iterator<Item = Program> + '_ {
        self.curricula.keys().copied()
    }
}

/// 课程目录
pub struct CourseCatalog {
    registry: Arc<KnowledgeAreaRegistry>,
    parser: CurriculumParser,
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl CourseCatalog {
    pub fn new(registry: Arc<KnowledgeAreaRegistry>, parser: CurriculumParser) -> Self {
        Self {
            registry,
            parser,
            current: RwLock::new(Arc::new(CatalogSnapshot::empty())),
        }
    }

    /// 当前快照；锁只在复制指针时持有
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// 解析课程表文本并替换该项目的课程表
    ///
    /// 解析失败时保留上一份快照。
    pub fn load(&self, info: &ProgramInfo, source: &str) -> Result<Vec<ParseWarning>, ParseError> {
        let parsed = self.parser.parse(info, source)?;
        self.install(parsed.curriculum);
        Ok(parsed.warnings)
    }

    /// 给课程打上知识领域标签后装入新快照
    pub fn install(&self, curriculum: Curriculum) -> Arc<CatalogSnapshot> {
        let courses = curriculum
            .courses
            .into_iter()
            .map(|course| self.registry.tag(course))
            .collect::<Vec<_>>();
        let tagged = Arc::new(Curriculum {
            courses,
            ..curriculum
        });

        let mut current = self.current.write();
        let mut curricula = current.curricula.clone();
        let program = tagged.program;
        let course_count = tagged.courses.len();
        curricula.insert(program, tagged);

        let next = Arc::new(CatalogSnapshot {
            version: current.version + 1,
            loaded_at: Utc::now(),
            curricula,
        });
        *current = Arc::clone(&next);

        info!(
            "Catalog snapshot v{} installed: {} courses for {}",
            next.version, course_count, program
        );
        next
    }
}

impl std::fmt::Debug for CourseCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourseCatalog")
            .field("version", &self.snapshot().version)
            .field("parser", &self.parser)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::course::CourseKind;
    use serde_json::json;

    fn catalog() -> CourseCatalog {
        let registry = KnowledgeAreaRegistry::load(&json!({
            "math": ["алгебра"],
            "programming": ["python"],
        }))
        .unwrap();
        CourseCatalog::new(Arc::new(registry), CurriculumParser::default())
    }

    fn info() -> ProgramInfo {
        ProgramInfo {
            program: Program::Ai,
            title: "AI".to_string(),
            duration_semesters: 4,
            elective_budgets: BTreeMap::new(),
        }
    }

    #[test]
    fn test_load_tags_courses() {
        let catalog = catalog();
        let warnings = catalog
            .load(&info(), "1 семестр\nВыборные\n1Линейная алгебра 3\n2Python для анализа данных 3\n")
            .unwrap();
        assert!(warnings.is_empty());

        let snapshot = catalog.snapshot();
        let courses = snapshot.courses(Program::Ai);
        assert_eq!(courses.len(), 2);
        assert!(courses[0].knowledge_areas.contains("math"));
        assert!(courses[1].knowledge_areas.contains("programming"));
        assert_eq!(courses[1].kind, CourseKind::Elective);
    }

    #[test]
    fn test_reader_keeps_its_snapshot_across_swap() {
        let catalog = catalog();
        catalog
            .load(&info(), "1 семестр\nВыборные\n1Алгебра 3\n")
            .unwrap();
        let held = catalog.snapshot();

        catalog
            .load(&info(), "1 семестр\nВыборные\n1Python 3\n2Алгебра 3\n")
            .unwrap();

        assert_eq!(held.courses(Program::Ai).len(), 1);
        assert_eq!(catalog.snapshot().courses(Program::Ai).len(), 2);
        assert_eq!(catalog.snapshot().version, held.version + 1);
    }

    #[test]
    fn test_failed_parse_keeps_previous_snapshot() {
        let catalog = catalog();
        catalog
            .load(&info(), "1 семестр\nВыборные\n1Алгебра 3\n")
            .unwrap();

        assert!(catalog.load(&info(), "no structure here").is_err());
        assert_eq!(catalog.snapshot().courses(Program::Ai).len(), 1);
        assert_eq!(catalog.snapshot().version, 1);
    }

    #[test]
    fn test_programs_are_independent() {
        let catalog = catalog();
        catalog
            .load(&info(), "1 семестр\nВыборные\n1Алгебра 3\n")
            .unwrap();
        let product = ProgramInfo {
            program: Program::AiProduct,
            ..info()
        };
        catalog
            .load(&product, "1 семестр\nВыборные\n1Python 3\n")
            .unwrap();

        let snapshot = catalog.snapshot();
        assert_eq!(snapshot.programs().collect::<Vec<_>>(), Program::ALL.to_vec());
        assert_eq!(snapshot.courses(Program::Ai)[0].name, "Алгебра");
    }

    #[test]
    fn test_concurrent_readers_see_whole_snapshots() {
        let catalog = Arc::new(catalog());
        catalog
            .load(&info(), "1 семестр\nВыборные\n1Алгебра 3\n2Python 3\n")
            .unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let snapshot = catalog.snapshot();
                        let len = snapshot.courses(Program::Ai).len();
                        assert!(len == 2 || len == 3, "partial snapshot: {}", len);
                    }
                })
            })
            .collect();

        for _ in 0..50 {
            catalog
                .load(&info(), "1 семестр\nВыборные\n1Алгебра 3\n2Python 3\n3Статистика 2\n")
                .unwrap();
            catalog
                .load(&info(), "1 семестр\nВыборные\n1Алгебра 3\n2Python 3\n")
                .unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
