use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::plan_dto::*, handlers::program_handler::parse_program},
    error::AppError,
    models::student_profile::StudentProfile,
};

pub async fn create_plan(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!(
        "Creating plan: program={}, strategy={:?}",
        request.program, request.strategy
    );

    let program = parse_program(&request.program)?;

    let profile = match (&request.scores, &request.ratings) {
        (Some(scores), None) => {
            let mut profile = StudentProfile::new(program);
            for (area, score) in scores {
                profile.rate(area, *score)?;
            }
            profile
        }
        (None, Some(ratings)) => state.advisor.profile_from_ratings(program, ratings).await?,
        (Some(_), Some(_)) => {
            return Err(AppError::Validation(
                "provide either scores or ratings, not both".to_string(),
            ));
        }
        (None, None) => {
            return Err(AppError::Validation(
                "scores or ratings are required".to_string(),
            ));
        }
    };

    let document = state.advisor.plan(&profile, &request.options()).await?;

    Ok((StatusCode::CREATED, Json(PlanResponse::from(document))))
}
