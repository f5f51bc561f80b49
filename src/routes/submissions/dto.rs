use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{module_submission, task_submission};
use crate::routes::certificates::dto::CertificateResponse;
use crate::routes::enrollments::dto::ScoreResponse;
use crate::services::grading::GradingOutcome;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    #[schema(example = "Borrowing lets a function use a value without owning it.")]
    pub answer: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    /// Chosen option index per question, in question order
    #[schema(example = json!([0, 2, 1]))]
    pub answers: Vec<usize>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmissionRequest {
    pub training_user_id: Uuid,
    #[schema(minimum = 0, maximum = 100, example = 90)]
    pub score: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub item_id: Uuid,
    pub training_user_id: Uuid,
    pub answer: Option<String>,
    pub score: Option<i32>,
    pub submitted_at: NaiveDateTime,
    pub graded_at: Option<NaiveDateTime>,
}

impl From<module_submission::Model> for SubmissionResponse {
    fn from(submission: module_submission::Model) -> Self {
        Self {
            id: submission.id,
            item_id: submission.module_id,
            training_user_id: submission.training_user_id,
            answer: submission.answer,
            score: submission.score,
            submitted_at: submission.submitted_at,
            graded_at: submission.graded_at,
        }
    }
}

impl From<task_submission::Model> for SubmissionResponse {
    fn from(submission: task_submission::Model) -> Self {
        Self {
            id: submission.id,
            item_id: submission.task_id,
            training_user_id: submission.training_user_id,
            answer: submission.answer,
            score: submission.score,
            submitted_at: submission.submitted_at,
            graded_at: submission.graded_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradingResponse {
    pub meeting_score: ScoreResponse,
    /// The enrollment was completed by this call
    pub completed: bool,
    pub final_score: Option<i32>,
    pub certificate: Option<CertificateResponse>,
}

impl From<GradingOutcome> for GradingResponse {
    fn from(outcome: GradingOutcome) -> Self {
        let today = Utc::now().date_naive();
        Self {
            meeting_score: outcome.score.into(),
            completed: outcome.completed,
            final_score: outcome.final_score,
            certificate: outcome
                .certificate
                .map(|c| CertificateResponse::new(c, today)),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GradedSubmissionResponse {
    pub submission: SubmissionResponse,
    pub grading: GradingResponse,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultResponse {
    pub submission_id: Uuid,
    pub quiz_id: Uuid,
    pub correct: usize,
    pub total: usize,
    pub score: i32,
    pub grading: GradingResponse,
}
