use crate::config::config::AppConfig;
use crate::error::ConfigError;
use crate::models::course::Program;
use crate::models::plan::ProgramInfo;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 环境变量前缀，`__` 分隔嵌套层级，例如 `ADVISOR_SERVER__PORT`
pub const ENV_PREFIX: &str = "ADVISOR_";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 搜索路径：
    /// 1. ./config.yaml
    /// 2. 环境变量
    pub fn load() -> Result<AppConfig, ConfigError> {
        Self::load_from(default_config_path())
    }

    /// 从指定路径加载配置
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
        let figment = Figment::new()
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Ok(figment.extract()?)
    }

    /// 验证配置，返回展开后的项目元数据
    pub fn validate(config: &AppConfig) -> Result<BTreeMap<Program, ProgramInfo>, ConfigError> {
        if config.server.port == 0 {
            return Err(ConfigError::Invalid(
                "server.port must be greater than 0".to_string(),
            ));
        }

        if config.programs.is_empty() {
            return Err(ConfigError::Invalid("no programs configured".to_string()));
        }

        let mut infos = BTreeMap::new();
        for (key, program_config) in &config.programs {
            let program: Program = key.parse().map_err(ConfigError::Invalid)?;

            if program_config.duration_semesters == 0 {
                return Err(ConfigError::Invalid(format!(
                    "programs.{}.duration_semesters must be greater than 0",
                    key
                )));
            }

            let info = program_config.info(program).map_err(|bad| {
                ConfigError::Invalid(format!(
                    "programs.{}.elective_credits has non-numeric semester '{}'",
                    key, bad
                ))
            })?;

            if let Some(semester) = info
                .elective_budgets
                .keys()
                .find(|s| **s == 0 || **s > info.duration_semesters)
            {
                return Err(ConfigError::Invalid(format!(
                    "programs.{}.elective_credits names semester {} outside 1..={}",
                    key, semester, info.duration_semesters
                )));
            }

            infos.insert(program, info);
        }

        Ok(infos)
    }
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.yaml")
}

/// 检查配置文件是否存在
pub fn config_exists() -> bool {
    default_config_path().exists()
}
