use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::quiz::QuizQuestion;
use crate::entities::{meeting, module, quiz, task};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetingRequest {
    #[schema(example = "Week 1: Ownership")]
    pub title: String,
    pub description: Option<String>,
    pub position: Option<i32>,
    pub scheduled_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingResponse {
    pub id: Uuid,
    pub training_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
    pub scheduled_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<meeting::Model> for MeetingResponse {
    fn from(meeting: meeting::Model) -> Self {
        Self {
            id: meeting.id,
            training_id: meeting.training_id,
            title: meeting.title,
            description: meeting.description,
            position: meeting.position,
            scheduled_at: meeting.scheduled_at,
            created_at: meeting.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeetingListResponse {
    pub total: usize,
    pub meetings: Vec<MeetingResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateModuleRequest {
    pub title: String,
    pub content: String,
    pub position: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    pub title: String,
    pub questions: Vec<QuizQuestion>,
    pub position: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub instructions: String,
    pub position: Option<i32>,
    pub due_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleResponse {
    pub id: Uuid,
    pub meeting_id: Uuid,
    pub title: String,
    pub content: String,
    pub position: i32,
}

impl From<module::Model> for ModuleResponse {
    fn from(module: module::Model) -> Self {
        Self {
            id: module.id,
            meeting_id: module.meeting_id,
            title: module.title,
            content: module.content,
            position: module.position,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionView {
    pub question: String,
    pub options: Vec<String>,
    /// Only shown to the training's instructor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub id: Uuid,
    pub meeting_id: Uuid,
    pub title: String,
    pub position: i32,
    pub questions: Vec<QuizQuestionView>,
}

impl QuizResponse {
    pub fn from_model(quiz: quiz::Model, questions: Vec<QuizQuestion>, reveal_answers: bool) -> Self {
        Self {
            id: quiz.id,
            meeting_id: quiz.meeting_id,
            title: quiz.title,
            position: quiz.position,
            questions: questions
                .into_iter()
                .map(|q| QuizQuestionView {
                    question: q.question,
                    options: q.options,
                    answer: reveal_answers.then_some(q.answer),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub meeting_id: Uuid,
    pub title: String,
    pub instructions: String,
    pub position: i32,
    pub due_at: Option<NaiveDateTime>,
}

impl From<task::Model> for TaskResponse {
    fn from(task: task::Model) -> Self {
        Self {
            id: task.id,
            meeting_id: task.meeting_id,
            title: task.title,
            instructions: task.instructions,
            position: task.position,
            due_at: task.due_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeetingDetailResponse {
    pub meeting: MeetingResponse,
    pub modules: Vec<ModuleResponse>,
    pub quizzes: Vec<QuizResponse>,
    pub tasks: Vec<TaskResponse>,
}
