//! 错误处理模块
//!
//! 定义应用程序的错误类型和错误处理逻辑。
//!
//! 领域错误分三类：配置错误（启动期致命）、解析错误（按来源可恢复）、
//! 学生画像错误（按请求可恢复）。`AppError` 汇总它们并映射为 HTTP 响应。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 配置错误（启动期，致命）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `knowledge_areas` 不是 area → 关键词列表的映射
    #[error("knowledge_areas must be a mapping of area name to a list of keywords: {0}")]
    MalformedKnowledgeAreas(String),

    /// 某个知识领域没有任何关键词
    #[error("knowledge area '{0}' has no keywords")]
    EmptyKeywords(String),

    /// 配置文件无法读取或反序列化
    #[error("failed to load configuration: {0}")]
    Load(String),

    /// 配置值不合法
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Load(e.to_string())
    }
}

/// 课程表解析错误
///
/// 仅在文档顶层结构无法识别时返回；单条记录的问题以警告形式记录。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("curriculum source for '{0}' is empty")]
    EmptySource(String),

    #[error("no semester sections found in curriculum source for '{0}'")]
    NoSemesterSections(String),
}

/// 学生画像错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// 缺少某些知识领域的评分，前端需要重新询问
    #[error("profile is missing ratings for: {}", .missing.join(", "))]
    Incomplete { missing: Vec<String> },

    #[error("profile rates unknown knowledge area '{0}'")]
    UnknownArea(String),

    #[error("rating {score} for '{area}' is outside 0..=5")]
    ScoreOutOfRange { area: String, score: u8 },

    #[error("expected {expected} ratings, got {actual}")]
    RatingCount { expected: usize, actual: usize },
}

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 课程表解析错误
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),

    /// 学生画像错误
    #[error("画像错误: {0}")]
    Profile(#[from] ProfileError),

    /// 资源不存在
    #[error("资源不存在: {0}")]
    NotFound(String),

    /// 参数验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),
}

/// Axum response implementation for AppError
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = (&self).into();
        let mut body = ErrorResponse::new(&code, &self.to_string());
        if let AppError::Profile(ProfileError::Incomplete { missing }) = &self {
            body = body.with_details(&missing.join(","));
        }
        (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(body),
        )
            .into_response()
    }
}

/// 错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,
    /// 错误消息
    pub message: String,
    /// 详细信息
    pub details: Option<String>,
}

impl ErrorResponse {
    /// 创建新错误响应
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// 添加详细信息
    pub fn with_details(mut self, details: &str) -> Self {
        self.details = Some(details.to_string());
        self
    }
}

/// HTTP 状态码映射
impl From<&AppError> for (u16, String) {
    fn from(err: &AppError) -> (u16, String) {
        match err {
            AppError::NotFound(_) => (404, "NOT_FOUND".to_string()),
            AppError::Validation(_) => (400, "BAD_REQUEST".to_string()),
            AppError::Profile(ProfileError::Incomplete { .. }) => {
                (422, "PROFILE_INCOMPLETE".to_string())
            }
            AppError::Profile(_) => (400, "BAD_REQUEST".to_string()),
            AppError::Parse(_) => (422, "PARSE_ERROR".to_string()),
            AppError::Config(_) => (500, "CONFIG_ERROR".to_string()),
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_incomplete_maps_to_422() {
        let err = AppError::from(ProfileError::Incomplete {
            missing: vec!["programming".to_string()],
        });
        let (status, code): (u16, String) = (&err).into();
        assert_eq!(status, 422);
        assert_eq!(code, "PROFILE_INCOMPLETE");
        assert!(err.to_string().contains("programming"));
    }

    #[test]
    fn test_parse_error_maps_to_422() {
        let err = AppError::from(ParseError::NoSemesterSections("ai".to_string()));
        let (status, code): (u16, String) = (&err).into();
        assert_eq!(status, 422);
        assert_eq!(code, "PARSE_ERROR");
    }

    #[test]
    fn test_status_mapping_for_request_errors() {
        let cases = [
            (AppError::NotFound("program 'x'".to_string()), 404, "NOT_FOUND"),
            (AppError::Validation("scores or ratings".to_string()), 400, "BAD_REQUEST"),
            (
                AppError::from(ProfileError::UnknownArea("design".to_string())),
                400,
                "BAD_REQUEST",
            ),
            (
                AppError::from(ConfigError::EmptyKeywords("math".to_string())),
                500,
                "CONFIG_ERROR",
            ),
        ];
        for (err, status, code) in cases {
            let mapped: (u16, String) = (&err).into();
            assert_eq!(mapped, (status, code.to_string()), "{}", err);
        }
    }

    #[test]
    fn test_error_response_details() {
        let response = ErrorResponse::new("BAD_REQUEST", "bad").with_details("x");
        assert_eq!(response.details.as_deref(), Some("x"));
    }
}
