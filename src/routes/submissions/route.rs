use axum::{Json, Router, extract::Path, routing::post};
use uuid::Uuid;

use super::dto::{
    GradedSubmissionResponse, QuizResultResponse, ScoreSubmissionRequest, SubmissionResponse,
    SubmitAnswerRequest, SubmitQuizRequest,
};
use crate::config::APP_CONFIG;
use crate::error::{AppError, AppResult};
use crate::extractor::AuthUser;
use crate::services::certificate::CertificatePolicy;
use crate::services::certificate_renderer::CertificateRenderer;
use crate::services::grading::{self, GradingOutcome};
use crate::static_service::database;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/modules/{module_id}/submit", post(submit_module))
        .route("/api/modules/{module_id}/score", post(score_module))
        .route("/api/quizzes/{quiz_id}/submit", post(submit_quiz))
        .route("/api/tasks/{task_id}/submit", post(submit_task))
        .route("/api/tasks/{task_id}/score", post(score_task))
}

fn non_empty_answer(answer: String) -> AppResult<String> {
    if answer.trim().is_empty() {
        return Err(AppError::Validation("Answer must not be empty".to_string()));
    }
    Ok(answer)
}

async fn finish(mut outcome: GradingOutcome) -> AppResult<GradingOutcome> {
    if outcome.certificate.is_some() {
        let renderer = CertificateRenderer::from_config(&APP_CONFIG);
        grading::render_certificate(database()?, &renderer, &mut outcome).await;
    }
    Ok(outcome)
}

/// Answer a module (enrolled students)
#[utoipa::path(
    post,
    path = "/api/modules/{module_id}/submit",
    params(("module_id" = Uuid, Path, description = "Module ID")),
    request_body = SubmitAnswerRequest,
    responses(
        (status = 200, description = "Answer stored", body = SubmissionResponse),
        (status = 403, description = "Not enrolled"),
        (status = 404, description = "Module not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Submissions"
)]
pub async fn submit_module(
    AuthUser(user): AuthUser,
    Path(module_id): Path<Uuid>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> AppResult<Json<SubmissionResponse>> {
    let answer = non_empty_answer(payload.answer)?;
    let submission = grading::submit_module(database()?, &user, module_id, answer).await?;
    Ok(Json(submission.into()))
}

/// Grade a module submission (owning instructor only)
#[utoipa::path(
    post,
    path = "/api/modules/{module_id}/score",
    params(("module_id" = Uuid, Path, description = "Module ID")),
    request_body = ScoreSubmissionRequest,
    responses(
        (status = 200, description = "Submission graded", body = GradedSubmissionResponse),
        (status = 400, description = "Score outside 0..=100"),
        (status = 403, description = "Not the owning instructor"),
        (status = 404, description = "Module, enrollment or submission not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Submissions"
)]
pub async fn score_module(
    AuthUser(user): AuthUser,
    Path(module_id): Path<Uuid>,
    Json(payload): Json<ScoreSubmissionRequest>,
) -> AppResult<Json<GradedSubmissionResponse>> {
    let policy = CertificatePolicy::from_config(&APP_CONFIG);
    let graded = grading::score_module(
        database()?,
        &user,
        module_id,
        payload.training_user_id,
        payload.score,
        &policy,
    )
    .await?;
    let outcome = finish(graded.outcome).await?;

    Ok(Json(GradedSubmissionResponse {
        submission: graded.submission.into(),
        grading: outcome.into(),
    }))
}

/// Answer a quiz; it is scored immediately (enrolled students)
#[utoipa::path(
    post,
    path = "/api/quizzes/{quiz_id}/submit",
    params(("quiz_id" = Uuid, Path, description = "Quiz ID")),
    request_body = SubmitQuizRequest,
    responses(
        (status = 200, description = "Quiz scored", body = QuizResultResponse),
        (status = 400, description = "Wrong number of answers"),
        (status = 403, description = "Not enrolled"),
        (status = 404, description = "Quiz not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Submissions"
)]
pub async fn submit_quiz(
    AuthUser(user): AuthUser,
    Path(quiz_id): Path<Uuid>,
    Json(payload): Json<SubmitQuizRequest>,
) -> AppResult<Json<QuizResultResponse>> {
    let policy = CertificatePolicy::from_config(&APP_CONFIG);
    let result =
        grading::submit_quiz(database()?, &user, quiz_id, payload.answers, &policy).await?;
    let outcome = finish(result.outcome).await?;

    Ok(Json(QuizResultResponse {
        submission_id: result.submission.id,
        quiz_id: result.submission.quiz_id,
        correct: result.correct,
        total: result.total,
        score: result.submission.score.unwrap_or_default(),
        grading: outcome.into(),
    }))
}

/// Answer a task (enrolled students)
#[utoipa::path(
    post,
    path = "/api/tasks/{task_id}/submit",
    params(("task_id" = Uuid, Path, description = "Task ID")),
    request_body = SubmitAnswerRequest,
    responses(
        (status = 200, description = "Answer stored", body = SubmissionResponse),
        (status = 403, description = "Not enrolled"),
        (status = 404, description = "Task not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Submissions"
)]
pub async fn submit_task(
    AuthUser(user): AuthUser,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> AppResult<Json<SubmissionResponse>> {
    let answer = non_empty_answer(payload.answer)?;
    let submission = grading::submit_task(database()?, &user, task_id, answer).await?;
    Ok(Json(submission.into()))
}

/// Grade a task submission (owning instructor only)
#[utoipa::path(
    post,
    path = "/api/tasks/{task_id}/score",
    params(("task_id" = Uuid, Path, description = "Task ID")),
    request_body = ScoreSubmissionRequest,
    responses(
        (status = 200, description = "Submission graded", body = GradedSubmissionResponse),
        (status = 400, description = "Score outside 0..=100"),
        (status = 403, description = "Not the owning instructor"),
        (status = 404, description = "Task, enrollment or submission not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Submissions"
)]
pub async fn score_task(
    AuthUser(user): AuthUser,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<ScoreSubmissionRequest>,
) -> AppResult<Json<GradedSubmissionResponse>> {
    let policy = CertificatePolicy::from_config(&APP_CONFIG);
    let graded = grading::score_task(
        database()?,
        &user,
        task_id,
        payload.training_user_id,
        payload.score,
        &policy,
    )
    .await?;
    let outcome = finish(graded.outcome).await?;

    Ok(Json(GradedSubmissionResponse {
        submission: graded.submission.into(),
        grading: outcome.into(),
    }))
}
