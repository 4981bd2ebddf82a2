use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::program_dto::*},
    error::AppError,
    models::course::{CourseKind, Program},
    services::advisor::CourseFilter,
};

/// 解析路径中的项目标识，未知项目视为不存在
pub(crate) fn parse_program(raw: &str) -> Result<Program, AppError> {
    raw.parse::<Program>().map_err(AppError::NotFound)
}

pub async fn list_programs(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    debug!("Listing programs");

    let programs = state.advisor.programs().await?;
    Ok(Json(ProgramListResponse { programs }))
}

pub async fn list_courses(
    State(state): State<AppState>,
    Path(program): Path<String>,
    Query(params): Query<CourseQueryParams>,
) -> Result<impl IntoResponse, AppError> {
    debug!(
        "Listing courses: program={}, semester={:?}, kind={:?}",
        program, params.semester, params.kind
    );

    let program = parse_program(&program)?;
    let kind = params
        .kind
        .as_deref()
        .map(str::parse::<CourseKind>)
        .transpose()
        .map_err(AppError::Validation)?;

    let filter = CourseFilter {
        semester: params.semester,
        kind,
    };
    let courses: Vec<CourseResponse> = state
        .advisor
        .courses(program, filter)
        .await?
        .into_iter()
        .map(CourseResponse::from)
        .collect();

    Ok(Json(CourseListResponse {
        program,
        total: courses.len(),
        courses,
    }))
}

pub async fn reload_curriculum(
    State(state): State<AppState>,
    Path(program): Path<String>,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    debug!("Reloading curriculum for {} ({} bytes)", program, body.len());

    let program = parse_program(&program)?;
    let warnings = state.advisor.reload_curriculum(program, &body).await?;

    Ok(Json(CurriculumReloadResponse::new(program, warnings)))
}

pub async fn list_knowledge_areas(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Listing knowledge areas");

    let areas = state.advisor.knowledge_areas().await?;
    let rating_order = areas.iter().map(|a| a.id.clone()).collect();

    Ok(Json(KnowledgeAreaListResponse {
        rating_order,
        areas,
    }))
}
