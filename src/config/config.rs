use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::models::course::Program;
use crate::models::plan::{ProgramInfo, SemesterBudgets};
use crate::services::parser::ParserPolicy;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化（JSON）日志格式
    pub structured: bool,
    /// 日志文件目录，按天滚动
    pub log_dir: Option<PathBuf>,
}

/// 单个项目的配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProgramConfig {
    /// 项目名称
    pub title: String,
    /// 学制（学期数）
    pub duration_semesters: u32,
    /// 按学期覆盖的选修学分上限，键为学期序号
    pub elective_credits: BTreeMap<String, u32>,
    /// 未单独配置的学期使用的选修学分上限
    pub default_elective_credits: u32,
    /// 课程表文本文件
    pub source: Option<PathBuf>,
}

impl ProgramConfig {
    /// 展开为项目元数据；学期键无法解析时返回该键
    pub fn info(&self, program: Program) -> Result<ProgramInfo, String> {
        let mut budgets: SemesterBudgets = (1..=self.duration_semesters)
            .map(|semester| (semester, self.default_elective_credits))
            .collect();

        for (key, credits) in &self.elective_credits {
            let semester: u32 = key.trim().parse().map_err(|_| key.clone())?;
            budgets.insert(semester, *credits);
        }

        Ok(ProgramInfo {
            program,
            title: self.title.clone(),
            duration_semesters: self.duration_semesters,
            elective_budgets: budgets,
        })
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 课程表解析容错策略
    pub curriculum: ParserPolicy,
    /// 项目配置，键为项目标识（ai / ai_product）
    pub programs: BTreeMap<String, ProgramConfig>,
    /// 知识领域 → 关键词，原样交给注册表校验
    pub knowledge_areas: Value,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 8080,
            },
            logging: LoggingConfig {
                level: "debug".into(),
                structured: false,
                log_dir: None,
            },
            curriculum: ParserPolicy::default(),
            programs: BTreeMap::from([
                (
                    Program::Ai.to_string(),
                    ProgramConfig {
                        title: "Искусственный интеллект".into(),
                        duration_semesters: 4,
                        elective_credits: BTreeMap::new(),
                        default_elective_credits: 9,
                        source: Some(PathBuf::from("data/ai.txt")),
                    },
                ),
                (
                    Program::AiProduct.to_string(),
                    ProgramConfig {
                        title: "Управление ИИ-продуктами/AI Product".into(),
                        duration_semesters: 4,
                        elective_credits: BTreeMap::new(),
                        default_elective_credits: 9,
                        source: Some(PathBuf::from("data/ai_product.txt")),
                    },
                ),
            ]),
            knowledge_areas: json!({
                "math": ["математика", "алгебра", "математический анализ", "статистика", "вероятность", "оптимизация"],
                "programming": ["программирование", "python", "алгоритмы", "разработка", "backend", "инженерия"],
                "ai": ["машинное обучение", "глубокое обучение", "нейронные сети", "искусственный интеллект", "компьютерное зрение", "nlp"],
                "data": ["данные", "анализ данных", "базы данных", "sql", "big data", "визуализация"],
                "product": ["продукт", "продуктовый", "менеджмент", "управление", "стартап", "маркетинг"],
            }),
            app_name: "curriculum-advisor".into(),
            environment: "development".into(),
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.server.host = "0.0.0.0".into();
        config.logging.level = "info".into();
        config.logging.structured = true;
        config.logging.log_dir = Some(PathBuf::from("./logs"));
        config
    }
}
