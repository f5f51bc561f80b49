use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use super::dto::{
    CreateModuleRequest, CreateQuizRequest, CreateTaskRequest, MeetingDetailResponse,
    ModuleResponse, QuizResponse, TaskResponse,
};
use crate::entities::quiz::QuizQuestion;
use crate::entities::{meeting, training, user};
use crate::error::{AppError, AppResult};
use crate::extractor::AuthUser;
use crate::repositories::{ContentRepository, MeetingRepository};
use crate::routes::trainings::route::{find_training, required_text};
use crate::services::grading::ensure_training_owner;
use crate::static_service::database;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/meetings/{meeting_id}", get(get_meeting))
        .route("/api/meetings/{meeting_id}/modules", post(create_module))
        .route("/api/meetings/{meeting_id}/quizzes", post(create_quiz))
        .route("/api/meetings/{meeting_id}/tasks", post(create_task))
}

async fn find_meeting(meeting_id: Uuid) -> AppResult<(meeting::Model, training::Model)> {
    let db = database()?;
    let meeting = MeetingRepository::new(db)
        .find_by_id(meeting_id)
        .await?
        .ok_or_else(|| AppError::not_found("Meeting"))?;
    let training = find_training(db, meeting.training_id).await?;
    Ok((meeting, training))
}

async fn owned_meeting(user: &user::Model, meeting_id: Uuid) -> AppResult<meeting::Model> {
    let (meeting, training) = find_meeting(meeting_id).await?;
    ensure_training_owner(user, &training)?;
    Ok(meeting)
}

/// Each question needs at least two options and an answer that points at one.
pub fn validate_questions(questions: &[QuizQuestion]) -> AppResult<()> {
    if questions.is_empty() {
        return Err(AppError::Validation(
            "A quiz needs at least one question".to_string(),
        ));
    }
    for (index, question) in questions.iter().enumerate() {
        if question.options.len() < 2 {
            return Err(AppError::Validation(format!(
                "Question {} needs at least two options",
                index + 1
            )));
        }
        if question.answer >= question.options.len() {
            return Err(AppError::Validation(format!(
                "Question {} has an answer outside its options",
                index + 1
            )));
        }
    }
    Ok(())
}

/// Meeting with its modules, quizzes and tasks
///
/// Correct quiz answers are only included for the training's instructor.
#[utoipa::path(
    get,
    path = "/api/meetings/{meeting_id}",
    params(("meeting_id" = Uuid, Path, description = "Meeting ID")),
    responses(
        (status = 200, description = "Meeting retrieved", body = MeetingDetailResponse),
        (status = 404, description = "Meeting not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Meetings"
)]
pub async fn get_meeting(
    AuthUser(user): AuthUser,
    Path(meeting_id): Path<Uuid>,
) -> AppResult<Json<MeetingDetailResponse>> {
    let (meeting, training) = find_meeting(meeting_id).await?;
    let reveal_answers = ensure_training_owner(&user, &training).is_ok();

    let content = ContentRepository::new(database()?);
    let modules = content.modules_of_meeting(meeting.id).await?;
    let quizzes = content.quizzes_of_meeting(meeting.id).await?;
    let tasks = content.tasks_of_meeting(meeting.id).await?;

    let quizzes = quizzes
        .into_iter()
        .map(|quiz| {
            let questions = quiz.parsed_questions().map_err(|e| {
                AppError::Internal(format!("Quiz {} has malformed questions: {}", quiz.id, e))
            })?;
            Ok(QuizResponse::from_model(quiz, questions, reveal_answers))
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(MeetingDetailResponse {
        meeting: meeting.into(),
        modules: modules.into_iter().map(Into::into).collect(),
        quizzes,
        tasks: tasks.into_iter().map(Into::into).collect(),
    }))
}

/// Add a reading module to a meeting (owning instructor only)
#[utoipa::path(
    post,
    path = "/api/meetings/{meeting_id}/modules",
    params(("meeting_id" = Uuid, Path, description = "Meeting ID")),
    request_body = CreateModuleRequest,
    responses(
        (status = 201, description = "Module created", body = ModuleResponse),
        (status = 403, description = "Not the owning instructor"),
        (status = 404, description = "Meeting not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Meetings"
)]
pub async fn create_module(
    AuthUser(user): AuthUser,
    Path(meeting_id): Path<Uuid>,
    Json(payload): Json<CreateModuleRequest>,
) -> AppResult<(StatusCode, Json<ModuleResponse>)> {
    let meeting = owned_meeting(&user, meeting_id).await?;
    let title = required_text(&payload.title, "Title")?;

    let module = ContentRepository::new(database()?)
        .create_module(
            meeting.id,
            title,
            payload.content,
            payload.position.unwrap_or_default(),
        )
        .await?;

    tracing::info!(module_id = %module.id, meeting_id = %meeting.id, "Module created");

    Ok((StatusCode::CREATED, Json(module.into())))
}

/// Add a multiple choice quiz to a meeting (owning instructor only)
#[utoipa::path(
    post,
    path = "/api/meetings/{meeting_id}/quizzes",
    params(("meeting_id" = Uuid, Path, description = "Meeting ID")),
    request_body = CreateQuizRequest,
    responses(
        (status = 201, description = "Quiz created", body = QuizResponse),
        (status = 400, description = "Invalid questions"),
        (status = 403, description = "Not the owning instructor"),
        (status = 404, description = "Meeting not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Meetings"
)]
pub async fn create_quiz(
    AuthUser(user): AuthUser,
    Path(meeting_id): Path<Uuid>,
    Json(payload): Json<CreateQuizRequest>,
) -> AppResult<(StatusCode, Json<QuizResponse>)> {
    let meeting = owned_meeting(&user, meeting_id).await?;
    let title = required_text(&payload.title, "Title")?;
    validate_questions(&payload.questions)?;

    let questions = serde_json::to_value(&payload.questions)
        .map_err(|e| AppError::Internal(format!("Failed to encode questions: {}", e)))?;

    let quiz = ContentRepository::new(database()?)
        .create_quiz(
            meeting.id,
            title,
            questions,
            payload.position.unwrap_or_default(),
        )
        .await?;

    tracing::info!(quiz_id = %quiz.id, meeting_id = %meeting.id, "Quiz created");

    Ok((
        StatusCode::CREATED,
        Json(QuizResponse::from_model(quiz, payload.questions, true)),
    ))
}

/// Add a graded task to a meeting (owning instructor only)
#[utoipa::path(
    post,
    path = "/api/meetings/{meeting_id}/tasks",
    params(("meeting_id" = Uuid, Path, description = "Meeting ID")),
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 403, description = "Not the owning instructor"),
        (status = 404, description = "Meeting not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Meetings"
)]
pub async fn create_task(
    AuthUser(user): AuthUser,
    Path(meeting_id): Path<Uuid>,
    Json(payload): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<TaskResponse>)> {
    let meeting = owned_meeting(&user, meeting_id).await?;
    let title = required_text(&payload.title, "Title")?;

    let task = ContentRepository::new(database()?)
        .create_task(
            meeting.id,
            title,
            payload.instructions,
            payload.position.unwrap_or_default(),
            payload.due_at,
        )
        .await?;

    tracing::info!(task_id = %task.id, meeting_id = %meeting.id, "Task created");

    Ok((StatusCode::CREATED, Json(task.into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: usize, answer: usize) -> QuizQuestion {
        QuizQuestion {
            question: "Pick one".to_string(),
            options: (0..options).map(|i| format!("option {i}")).collect(),
            answer,
        }
    }

    #[test]
    fn test_validate_questions() {
        assert!(validate_questions(&[question(3, 2)]).is_ok());
        assert!(validate_questions(&[]).is_err());
        assert!(validate_questions(&[question(1, 0)]).is_err());
        assert!(validate_questions(&[question(3, 0), question(2, 2)]).is_err());
    }
}
