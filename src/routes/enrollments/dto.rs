use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::EnrollmentStatus;
use crate::entities::{score, training_user};
use crate::services::completion::Progress;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub id: Uuid,
    pub training_id: Uuid,
    pub user_id: Uuid,
    pub status: EnrollmentStatus,
    pub final_score: Option<i32>,
    pub enrolled_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

impl From<training_user::Model> for EnrollmentResponse {
    fn from(enrollment: training_user::Model) -> Self {
        Self {
            id: enrollment.id,
            training_id: enrollment.training_id,
            user_id: enrollment.user_id,
            status: enrollment.status,
            final_score: enrollment.final_score,
            enrolled_at: enrollment.enrolled_at,
            completed_at: enrollment.completed_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentListResponse {
    pub total: usize,
    pub enrollments: Vec<EnrollmentResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProgressResponse {
    pub enrollment: EnrollmentResponse,
    pub progress: Progress,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub meeting_id: Uuid,
    pub module_score: i32,
    pub quiz_score: i32,
    pub task_score: i32,
    pub total_score: i32,
    pub updated_at: NaiveDateTime,
}

impl From<score::Model> for ScoreResponse {
    fn from(score: score::Model) -> Self {
        Self {
            meeting_id: score.meeting_id,
            module_score: score.module_score,
            quiz_score: score.quiz_score,
            task_score: score.task_score,
            total_score: score.total_score,
            updated_at: score.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreListResponse {
    pub total: usize,
    pub scores: Vec<ScoreResponse>,
}
