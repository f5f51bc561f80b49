use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::entities::quiz::QuizQuestion;
use crate::entities::sea_orm_active_enums::{CertificateStatus, EnrollmentStatus, RoleEnum};
use crate::routes::{auth, certificates, enrollments, health, meetings, submissions, trainings};
use crate::services::completion::Progress;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LMS Service API",
        description = "Trainings, grading, completion tracking and certificates"
    ),
    paths(
        health::route::health,
        auth::route::register,
        auth::route::login,
        auth::route::logout,
        trainings::route::create_training,
        trainings::route::list_trainings,
        trainings::route::get_training,
        trainings::route::update_training,
        trainings::route::delete_training,
        trainings::route::enroll,
        trainings::route::list_enrollments,
        trainings::route::list_meetings,
        trainings::route::create_meeting,
        meetings::route::get_meeting,
        meetings::route::create_module,
        meetings::route::create_quiz,
        meetings::route::create_task,
        submissions::route::submit_module,
        submissions::route::score_module,
        submissions::route::submit_quiz,
        submissions::route::submit_task,
        submissions::route::score_task,
        enrollments::route::my_enrollments,
        enrollments::route::get_progress,
        enrollments::route::get_scores,
        certificates::route::my_certificates,
        certificates::route::get_certificate,
    ),
    components(schemas(
        RoleEnum,
        EnrollmentStatus,
        CertificateStatus,
        QuizQuestion,
        Progress,
        health::route::HealthResponse,
        auth::dto::RegisterRequest,
        auth::dto::LoginRequest,
        auth::dto::UserResponse,
        auth::dto::AuthResponse,
        auth::dto::LogoutResponse,
        trainings::dto::CreateTrainingRequest,
        trainings::dto::UpdateTrainingRequest,
        trainings::dto::TrainingResponse,
        trainings::dto::TrainingListResponse,
        trainings::dto::DeleteTrainingResponse,
        meetings::dto::CreateMeetingRequest,
        meetings::dto::MeetingResponse,
        meetings::dto::MeetingListResponse,
        meetings::dto::CreateModuleRequest,
        meetings::dto::CreateQuizRequest,
        meetings::dto::CreateTaskRequest,
        meetings::dto::ModuleResponse,
        meetings::dto::QuizQuestionView,
        meetings::dto::QuizResponse,
        meetings::dto::TaskResponse,
        meetings::dto::MeetingDetailResponse,
        submissions::dto::SubmitAnswerRequest,
        submissions::dto::SubmitQuizRequest,
        submissions::dto::ScoreSubmissionRequest,
        submissions::dto::SubmissionResponse,
        submissions::dto::GradingResponse,
        submissions::dto::GradedSubmissionResponse,
        submissions::dto::QuizResultResponse,
        enrollments::dto::EnrollmentResponse,
        enrollments::dto::EnrollmentListResponse,
        enrollments::dto::ProgressResponse,
        enrollments::dto::ScoreResponse,
        enrollments::dto::ScoreListResponse,
        certificates::dto::CertificateResponse,
        certificates::dto::CertificateListResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Authentication", description = "Registration and bearer tokens"),
        (name = "Trainings", description = "Trainings, enrollment and meetings"),
        (name = "Meetings", description = "Meeting content"),
        (name = "Submissions", description = "Answers and grading"),
        (name = "Enrollments", description = "Progress and scores"),
        (name = "Certificates", description = "Issued certificates")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_grading_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/modules/{module_id}/score"));
        assert!(doc.paths.paths.contains_key("/api/quizzes/{quiz_id}/submit"));
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("bearer_auth"))
        );
    }
}
