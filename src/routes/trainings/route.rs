use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
};
use sea_orm::{ConnectionTrait, SqlErr};
use uuid::Uuid;

use super::dto::{
    CreateTrainingRequest, DeleteTrainingResponse, TrainingListResponse, TrainingQuery,
    TrainingResponse, UpdateTrainingRequest,
};
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::entities::training;
use crate::error::{AppError, AppResult};
use crate::extractor::AuthUser;
use crate::repositories::{EnrollmentRepository, MeetingRepository, TrainingRepository, TrainingUpdate};
use crate::routes::enrollments::dto::{EnrollmentListResponse, EnrollmentResponse};
use crate::routes::meetings::dto::{CreateMeetingRequest, MeetingListResponse, MeetingResponse};
use crate::services::grading::ensure_training_owner;
use crate::static_service::database;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/trainings", get(list_trainings).post(create_training))
        .route(
            "/api/trainings/{training_id}",
            get(get_training).put(update_training).delete(delete_training),
        )
        .route("/api/trainings/{training_id}/enroll", post(enroll))
        .route("/api/trainings/{training_id}/enrollments", get(list_enrollments))
        .route(
            "/api/trainings/{training_id}/meetings",
            get(list_meetings).post(create_meeting),
        )
}

pub(crate) async fn find_training<C: ConnectionTrait>(
    db: &C,
    training_id: Uuid,
) -> AppResult<training::Model> {
    TrainingRepository::new(db)
        .find_by_id(training_id)
        .await?
        .ok_or_else(|| AppError::not_found("Training"))
}

pub(crate) fn required_text(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Create a training (instructors only)
#[utoipa::path(
    post,
    path = "/api/trainings",
    request_body = CreateTrainingRequest,
    responses(
        (status = 201, description = "Training created", body = TrainingResponse),
        (status = 400, description = "Missing title"),
        (status = 403, description = "Forbidden - instructors only")
    ),
    security(("bearer_auth" = [])),
    tag = "Trainings"
)]
pub async fn create_training(
    auth: AuthUser,
    Json(payload): Json<CreateTrainingRequest>,
) -> AppResult<(StatusCode, Json<TrainingResponse>)> {
    auth.require_role(RoleEnum::Instructor)?;
    let title = required_text(&payload.title, "Title")?;

    let db = database()?;
    let training = TrainingRepository::new(db)
        .create(auth.0.id, title, payload.description, payload.image)
        .await?;

    tracing::info!(training_id = %training.id, instructor_id = %auth.0.id, "Training created");

    Ok((StatusCode::CREATED, Json(training.into())))
}

/// List trainings
#[utoipa::path(
    get,
    path = "/api/trainings",
    params(TrainingQuery),
    responses(
        (status = 200, description = "Trainings retrieved", body = TrainingListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Trainings"
)]
pub async fn list_trainings(
    AuthUser(_user): AuthUser,
    Query(query): Query<TrainingQuery>,
) -> AppResult<Json<TrainingListResponse>> {
    let db = database()?;
    let repo = TrainingRepository::new(db);

    let trainings = match query.instructor_id {
        Some(instructor_id) => repo.find_by_instructor(instructor_id).await?,
        None => repo.find_all().await?,
    };

    Ok(Json(TrainingListResponse {
        total: trainings.len(),
        trainings: trainings.into_iter().map(Into::into).collect(),
    }))
}

/// Get a training by id
#[utoipa::path(
    get,
    path = "/api/trainings/{training_id}",
    params(("training_id" = Uuid, Path, description = "Training ID")),
    responses(
        (status = 200, description = "Training retrieved", body = TrainingResponse),
        (status = 404, description = "Training not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Trainings"
)]
pub async fn get_training(
    AuthUser(_user): AuthUser,
    Path(training_id): Path<Uuid>,
) -> AppResult<Json<TrainingResponse>> {
    let training = find_training(database()?, training_id).await?;
    Ok(Json(training.into()))
}

/// Update a training (owning instructor only)
#[utoipa::path(
    put,
    path = "/api/trainings/{training_id}",
    params(("training_id" = Uuid, Path, description = "Training ID")),
    request_body = UpdateTrainingRequest,
    responses(
        (status = 200, description = "Training updated", body = TrainingResponse),
        (status = 403, description = "Not the owning instructor"),
        (status = 404, description = "Training not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Trainings"
)]
pub async fn update_training(
    AuthUser(user): AuthUser,
    Path(training_id): Path<Uuid>,
    Json(payload): Json<UpdateTrainingRequest>,
) -> AppResult<Json<TrainingResponse>> {
    let db = database()?;
    let training = find_training(db, training_id).await?;
    ensure_training_owner(&user, &training)?;

    let title = payload
        .title
        .as_deref()
        .map(|t| required_text(t, "Title"))
        .transpose()?;

    let training = TrainingRepository::new(db)
        .update(
            training,
            TrainingUpdate {
                title,
                description: payload.description,
                image: payload.image,
            },
        )
        .await?;

    Ok(Json(training.into()))
}

/// Delete a training with everything under it (owning instructor only)
#[utoipa::path(
    delete,
    path = "/api/trainings/{training_id}",
    params(("training_id" = Uuid, Path, description = "Training ID")),
    responses(
        (status = 200, description = "Training deleted", body = DeleteTrainingResponse),
        (status = 403, description = "Not the owning instructor"),
        (status = 404, description = "Training not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Trainings"
)]
pub async fn delete_training(
    AuthUser(user): AuthUser,
    Path(training_id): Path<Uuid>,
) -> AppResult<Json<DeleteTrainingResponse>> {
    let db = database()?;
    let training = find_training(db, training_id).await?;
    ensure_training_owner(&user, &training)?;

    TrainingRepository::new(db).delete(training).await?;
    tracing::info!(training_id = %training_id, "Training deleted");

    Ok(Json(DeleteTrainingResponse {
        message: "Training deleted".to_string(),
    }))
}

/// Enroll the current student in a training
#[utoipa::path(
    post,
    path = "/api/trainings/{training_id}/enroll",
    params(("training_id" = Uuid, Path, description = "Training ID")),
    responses(
        (status = 201, description = "Enrolled", body = EnrollmentResponse),
        (status = 403, description = "Forbidden - students only"),
        (status = 404, description = "Training not found"),
        (status = 409, description = "Already enrolled")
    ),
    security(("bearer_auth" = [])),
    tag = "Trainings"
)]
pub async fn enroll(
    auth: AuthUser,
    Path(training_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<EnrollmentResponse>)> {
    auth.require_role(RoleEnum::Student)?;
    let db = database()?;
    let training = find_training(db, training_id).await?;
    let repo = EnrollmentRepository::new(db);

    let already = || AppError::Conflict("Already enrolled in this training".to_string());

    if repo
        .find_by_training_and_user(training.id, auth.0.id)
        .await?
        .is_some()
    {
        return Err(already());
    }

    // A concurrent enroll can still slip past the read above
    let enrollment = repo.create(training.id, auth.0.id).await.map_err(|e| {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => already(),
            _ => AppError::Database(e),
        }
    })?;

    tracing::info!(
        training_user_id = %enrollment.id,
        training_id = %training.id,
        user_id = %auth.0.id,
        "Student enrolled"
    );

    Ok((StatusCode::CREATED, Json(enrollment.into())))
}

/// Enrollments of a training (owning instructor only)
#[utoipa::path(
    get,
    path = "/api/trainings/{training_id}/enrollments",
    params(("training_id" = Uuid, Path, description = "Training ID")),
    responses(
        (status = 200, description = "Enrollments retrieved", body = EnrollmentListResponse),
        (status = 403, description = "Not the owning instructor"),
        (status = 404, description = "Training not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Trainings"
)]
pub async fn list_enrollments(
    AuthUser(user): AuthUser,
    Path(training_id): Path<Uuid>,
) -> AppResult<Json<EnrollmentListResponse>> {
    let db = database()?;
    let training = find_training(db, training_id).await?;
    ensure_training_owner(&user, &training)?;

    let enrollments = EnrollmentRepository::new(db)
        .find_by_training(training.id)
        .await?;

    Ok(Json(EnrollmentListResponse {
        total: enrollments.len(),
        enrollments: enrollments.into_iter().map(Into::into).collect(),
    }))
}

/// Meetings of a training, in order
#[utoipa::path(
    get,
    path = "/api/trainings/{training_id}/meetings",
    params(("training_id" = Uuid, Path, description = "Training ID")),
    responses(
        (status = 200, description = "Meetings retrieved", body = MeetingListResponse),
        (status = 404, description = "Training not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Trainings"
)]
pub async fn list_meetings(
    AuthUser(_user): AuthUser,
    Path(training_id): Path<Uuid>,
) -> AppResult<Json<MeetingListResponse>> {
    let db = database()?;
    let training = find_training(db, training_id).await?;

    let meetings = MeetingRepository::new(db)
        .find_by_training(training.id)
        .await?;

    Ok(Json(MeetingListResponse {
        total: meetings.len(),
        meetings: meetings.into_iter().map(Into::into).collect(),
    }))
}

/// Add a meeting to a training (owning instructor only)
#[utoipa::path(
    post,
    path = "/api/trainings/{training_id}/meetings",
    params(("training_id" = Uuid, Path, description = "Training ID")),
    request_body = CreateMeetingRequest,
    responses(
        (status = 201, description = "Meeting created", body = MeetingResponse),
        (status = 403, description = "Not the owning instructor"),
        (status = 404, description = "Training not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Trainings"
)]
pub async fn create_meeting(
    AuthUser(user): AuthUser,
    Path(training_id): Path<Uuid>,
    Json(payload): Json<CreateMeetingRequest>,
) -> AppResult<(StatusCode, Json<MeetingResponse>)> {
    let db = database()?;
    let training = find_training(db, training_id).await?;
    ensure_training_owner(&user, &training)?;
    let title = required_text(&payload.title, "Title")?;

    let meeting = MeetingRepository::new(db)
        .create(
            training.id,
            title,
            payload.description,
            payload.position.unwrap_or_default(),
            payload.scheduled_at,
        )
        .await?;

    tracing::info!(meeting_id = %meeting.id, training_id = %training.id, "Meeting created");

    Ok((StatusCode::CREATED, Json(meeting.into())))
}
