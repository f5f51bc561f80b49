//! Read side of an enrollment: how far along it is and its meeting scores.

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::entities::{score, training, training_user, user};
use crate::error::{AppError, AppResult};
use crate::repositories::{EnrollmentRepository, ScoreRepository, TrainingRepository};
use crate::services::completion::{Progress, collect_requirements};

/// An enrollment with the training it belongs to, visible to its student
/// and to the training's instructor.
pub async fn visible_enrollment<C: ConnectionTrait>(
    conn: &C,
    actor: &user::Model,
    training_user_id: Uuid,
) -> AppResult<(training_user::Model, training::Model)> {
    let enrollment = EnrollmentRepository::new(conn)
        .find_by_id(training_user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Enrollment"))?;
    let training = TrainingRepository::new(conn)
        .find_by_id(enrollment.training_id)
        .await?
        .ok_or_else(|| AppError::not_found("Training"))?;

    if enrollment.user_id != actor.id && training.instructor_id != actor.id {
        return Err(AppError::Forbidden(
            "This enrollment belongs to someone else".to_string(),
        ));
    }

    Ok((enrollment, training))
}

pub async fn enrollment_progress<C: ConnectionTrait>(
    conn: &C,
    actor: &user::Model,
    training_user_id: Uuid,
) -> AppResult<(training_user::Model, Progress)> {
    let (enrollment, training) = visible_enrollment(conn, actor, training_user_id).await?;
    let requirements = collect_requirements(conn, training.id, enrollment.id).await?;
    Ok((enrollment, requirements.progress()))
}

pub async fn enrollment_scores<C: ConnectionTrait>(
    conn: &C,
    actor: &user::Model,
    training_user_id: Uuid,
) -> AppResult<Vec<score::Model>> {
    let (enrollment, _) = visible_enrollment(conn, actor, training_user_id).await?;
    Ok(ScoreRepository::new(conn)
        .find_by_enrollment(enrollment.id)
        .await?)
}
