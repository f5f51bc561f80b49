use axum::{Json, Router, extract::Path, routing::get};
use uuid::Uuid;

use super::dto::{EnrollmentListResponse, ProgressResponse, ScoreListResponse};
use crate::error::AppResult;
use crate::extractor::AuthUser;
use crate::repositories::EnrollmentRepository;
use crate::services::progress::{enrollment_progress, enrollment_scores};
use crate::static_service::database;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/enrollments", get(my_enrollments))
        .route("/api/enrollments/{enrollment_id}/progress", get(get_progress))
        .route("/api/enrollments/{enrollment_id}/scores", get(get_scores))
}

/// Enrollments of the current user
#[utoipa::path(
    get,
    path = "/api/enrollments",
    responses(
        (status = 200, description = "Enrollments retrieved", body = EnrollmentListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
pub async fn my_enrollments(AuthUser(user): AuthUser) -> AppResult<Json<EnrollmentListResponse>> {
    let enrollments = EnrollmentRepository::new(database()?)
        .find_by_user(user.id)
        .await?;

    Ok(Json(EnrollmentListResponse {
        total: enrollments.len(),
        enrollments: enrollments.into_iter().map(Into::into).collect(),
    }))
}

/// Required versus submitted items of an enrollment
#[utoipa::path(
    get,
    path = "/api/enrollments/{enrollment_id}/progress",
    params(("enrollment_id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Progress retrieved", body = ProgressResponse),
        (status = 403, description = "Neither the student nor the instructor"),
        (status = 404, description = "Enrollment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
pub async fn get_progress(
    AuthUser(user): AuthUser,
    Path(enrollment_id): Path<Uuid>,
) -> AppResult<Json<ProgressResponse>> {
    let (enrollment, progress) = enrollment_progress(database()?, &user, enrollment_id).await?;

    Ok(Json(ProgressResponse {
        enrollment: enrollment.into(),
        progress,
    }))
}

/// Per-meeting score rows of an enrollment
#[utoipa::path(
    get,
    path = "/api/enrollments/{enrollment_id}/scores",
    params(("enrollment_id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Scores retrieved", body = ScoreListResponse),
        (status = 403, description = "Neither the student nor the instructor"),
        (status = 404, description = "Enrollment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
pub async fn get_scores(
    AuthUser(user): AuthUser,
    Path(enrollment_id): Path<Uuid>,
) -> AppResult<Json<ScoreListResponse>> {
    let scores = enrollment_scores(database()?, &user, enrollment_id).await?;

    Ok(Json(ScoreListResponse {
        total: scores.len(),
        scores: scores.into_iter().map(Into::into).collect(),
    }))
}
