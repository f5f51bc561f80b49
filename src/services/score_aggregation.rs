//! Per-(enrollment, meeting) score rows.
//!
//! Every write goes through [`record_component`], which upserts the row, locks
//! it and rewrites it inside the caller's transaction, so grading a module and
//! a quiz of the same meeting concurrently cannot lose either update.

use sea_orm::{ConnectionTrait, DbErr};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::score;
use crate::repositories::{ScoreRepository, SubmissionRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScoreComponent {
    Module,
    Quiz,
    Task,
}

/// Rounded average of the three components, on the 0..=100 scale.
pub fn total_score(module_score: i32, quiz_score: i32, task_score: i32) -> i32 {
    rounded_mean(&[module_score, quiz_score, task_score])
}

/// Mean rounded half away from zero; 0 for an empty slice.
pub fn rounded_mean(values: &[i32]) -> i32 {
    if values.is_empty() {
        return 0;
    }
    let sum: i64 = values.iter().map(|v| i64::from(*v)).sum();
    (sum as f64 / values.len() as f64).round() as i32
}

/// Sets one component of the (enrollment, meeting) row and recomputes the
/// total. The other two components are left as stored.
pub async fn record_component<C: ConnectionTrait>(
    conn: &C,
    training_user_id: Uuid,
    meeting_id: Uuid,
    component: ScoreComponent,
    value: i32,
) -> Result<score::Model, DbErr> {
    let repo = ScoreRepository::new(conn);

    repo.ensure_row(training_user_id, meeting_id).await?;
    let row = repo
        .lock_row(training_user_id, meeting_id)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("score row".to_string()))?;

    let (mut module_score, mut quiz_score, mut task_score) =
        (row.module_score, row.quiz_score, row.task_score);
    match component {
        ScoreComponent::Module => module_score = value,
        ScoreComponent::Quiz => quiz_score = value,
        ScoreComponent::Task => task_score = value,
    }
    let total = total_score(module_score, quiz_score, task_score);

    let saved = repo
        .save_components(row, module_score, quiz_score, task_score, total)
        .await?;

    tracing::debug!(
        training_user_id = %training_user_id,
        meeting_id = %meeting_id,
        component = ?component,
        value,
        total,
        "Score component recorded"
    );

    Ok(saved)
}

/// Recomputes a component from the graded submissions of that kind in the
/// meeting, so a meeting with several quizzes gets their average.
pub async fn refresh_component<C: ConnectionTrait>(
    conn: &C,
    training_user_id: Uuid,
    meeting_id: Uuid,
    component: ScoreComponent,
) -> Result<score::Model, DbErr> {
    let submissions = SubmissionRepository::new(conn);
    let scores = match component {
        ScoreComponent::Module => {
            submissions
                .module_scores_in_meeting(training_user_id, meeting_id)
                .await?
        }
        ScoreComponent::Quiz => {
            submissions
                .quiz_scores_in_meeting(training_user_id, meeting_id)
                .await?
        }
        ScoreComponent::Task => {
            submissions
                .task_scores_in_meeting(training_user_id, meeting_id)
                .await?
        }
    };

    record_component(
        conn,
        training_user_id,
        meeting_id,
        component,
        rounded_mean(&scores),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_rounded_average() {
        assert_eq!(total_score(85, 90, 95), 90);
        assert_eq!(total_score(100, 0, 0), 33);
        assert_eq!(total_score(100, 100, 0), 67);
        assert_eq!(total_score(0, 0, 0), 0);
    }

    #[test]
    fn test_rounded_mean_rounds_half_away_from_zero() {
        assert_eq!(rounded_mean(&[70, 71]), 71);
        assert_eq!(rounded_mean(&[70, 70, 71]), 70);
        assert_eq!(rounded_mean(&[]), 0);
    }
}
