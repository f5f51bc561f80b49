//! Submission and grading flows.
//!
//! Each call is one transaction covering the authorisation reads, the
//! submission write, the score row update, the completion check and the
//! certificate insert. Rendering the certificate image is left to
//! [`render_certificate`] once the transaction has committed.

use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::entities::quiz::QuizQuestion;
use crate::entities::sea_orm_active_enums::{EnrollmentStatus, RoleEnum};
use crate::entities::{
    certificate, meeting, module_submission, quiz_submission, score, task_submission, training,
    training_user, user,
};
use crate::error::{AppError, AppResult};
use crate::repositories::{
    ContentRepository, EnrollmentRepository, MeetingRepository, SubmissionRepository,
    TrainingRepository,
};
use crate::services::certificate::{CertificatePolicy, ensure_image};
use crate::services::certificate_renderer::CertificateRenderer;
use crate::services::completion::{Completion, check_completion};
use crate::services::score_aggregation::{ScoreComponent, refresh_component};

pub const MIN_ITEM_SCORE: i32 = 0;
pub const MAX_ITEM_SCORE: i32 = 100;

/// What a grading call changed.
#[derive(Debug, Clone)]
pub struct GradingOutcome {
    pub score: score::Model,
    /// The enrollment moved to `completed` during this call
    pub completed: bool,
    pub final_score: Option<i32>,
    pub certificate: Option<certificate::Model>,
}

impl GradingOutcome {
    fn new(score: score::Model, completion: Completion) -> Self {
        match completion {
            Completion::Completed {
                final_score,
                certificate,
            } => Self {
                score,
                completed: true,
                final_score: Some(final_score),
                certificate,
            },
            _ => Self {
                score,
                completed: false,
                final_score: None,
                certificate: None,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModuleGrade {
    pub submission: module_submission::Model,
    pub outcome: GradingOutcome,
}

#[derive(Debug, Clone)]
pub struct TaskGrade {
    pub submission: task_submission::Model,
    pub outcome: GradingOutcome,
}

#[derive(Debug, Clone)]
pub struct QuizResult {
    pub submission: quiz_submission::Model,
    pub correct: usize,
    pub total: usize,
    pub outcome: GradingOutcome,
}

pub fn validate_item_score(score: i32) -> AppResult<()> {
    if (MIN_ITEM_SCORE..=MAX_ITEM_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Score must be between {MIN_ITEM_SCORE} and {MAX_ITEM_SCORE}"
        )))
    }
}

/// Counts correct answers and scores them as `round(correct * 100 / questions)`.
pub fn score_quiz(questions: &[QuizQuestion], answers: &[usize]) -> AppResult<(usize, i32)> {
    if answers.len() != questions.len() {
        return Err(AppError::Validation(format!(
            "Expected {} answers, got {}",
            questions.len(),
            answers.len()
        )));
    }
    if questions.is_empty() {
        return Ok((0, 0));
    }

    let correct = questions
        .iter()
        .zip(answers)
        .filter(|(question, answer)| question.answer == **answer)
        .count();
    let score = ((correct as f64 * 100.0) / questions.len() as f64).round() as i32;

    Ok((correct, score))
}

/// Meeting and training an item belongs to.
async fn load_meeting<C: ConnectionTrait>(
    conn: &C,
    meeting_id: Uuid,
) -> AppResult<(meeting::Model, training::Model)> {
    let meeting = MeetingRepository::new(conn)
        .find_by_id(meeting_id)
        .await?
        .ok_or_else(|| AppError::not_found("Meeting"))?;
    let training = TrainingRepository::new(conn)
        .find_by_id(meeting.training_id)
        .await?
        .ok_or_else(|| AppError::not_found("Training"))?;
    Ok((meeting, training))
}

pub fn ensure_training_owner(actor: &user::Model, training: &training::Model) -> AppResult<()> {
    if actor.role == RoleEnum::Instructor && training.instructor_id == actor.id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only the instructor of this training can do that".to_string(),
        ))
    }
}

/// Takes the row lock of the enrollment a grading call works on.
///
/// Must be the first statement of the transaction: everything read after it
/// sees the submissions committed by earlier calls for the same enrollment.
async fn lock_enrollment<C: ConnectionTrait>(
    conn: &C,
    training_user_id: Uuid,
) -> AppResult<Option<training_user::Model>> {
    Ok(EnrollmentRepository::new(conn)
        .lock_by_id(training_user_id)
        .await?)
}

/// The enrollment being graded, which must belong to the item's training.
fn graded_enrollment(
    locked: Option<training_user::Model>,
    training_id: Uuid,
) -> AppResult<training_user::Model> {
    locked
        .filter(|enrollment| enrollment.training_id == training_id)
        .ok_or_else(|| AppError::not_found("Enrollment"))
}

/// Dropped students can no longer hand anything in.
fn ensure_accepting_submissions(enrollment: &training_user::Model) -> AppResult<()> {
    if enrollment.status == EnrollmentStatus::Dropped {
        return Err(AppError::Forbidden(
            "This enrollment has been dropped".to_string(),
        ));
    }
    Ok(())
}

/// The actor's own enrollment in the training.
async fn student_enrollment<C: ConnectionTrait>(
    conn: &C,
    actor: &user::Model,
    training_id: Uuid,
) -> AppResult<training_user::Model> {
    if actor.role != RoleEnum::Student {
        return Err(AppError::Forbidden(
            "Only students can submit answers".to_string(),
        ));
    }
    let enrollment = EnrollmentRepository::new(conn)
        .find_by_training_and_user(training_id, actor.id)
        .await?
        .ok_or_else(|| AppError::Forbidden("You are not enrolled in this training".to_string()))?;
    ensure_accepting_submissions(&enrollment)?;
    Ok(enrollment)
}

async fn aggregate_and_check<C: ConnectionTrait>(
    conn: &C,
    enrollment_id: Uuid,
    meeting_id: Uuid,
    component: ScoreComponent,
    policy: &CertificatePolicy,
) -> AppResult<GradingOutcome> {
    let score = refresh_component(conn, enrollment_id, meeting_id, component).await?;
    let completion =
        check_completion(conn, enrollment_id, policy, Utc::now().date_naive()).await?;
    Ok(GradingOutcome::new(score, completion))
}

/// Instructor grades a student's module submission.
pub async fn score_module(
    db: &DatabaseConnection,
    actor: &user::Model,
    module_id: Uuid,
    training_user_id: Uuid,
    score: i32,
    policy: &CertificatePolicy,
) -> AppResult<ModuleGrade> {
    validate_item_score(score)?;
    let txn = db.begin().await?;
    let locked = lock_enrollment(&txn, training_user_id).await?;

    let module = ContentRepository::new(&txn)
        .find_module(module_id)
        .await?
        .ok_or_else(|| AppError::not_found("Module"))?;
    let (meeting, training) = load_meeting(&txn, module.meeting_id).await?;
    ensure_training_owner(actor, &training)?;
    let enrollment = graded_enrollment(locked, training.id)?;

    let submissions = SubmissionRepository::new(&txn);
    let submission = submissions
        .find_module_submission(module.id, enrollment.id)
        .await?
        .ok_or_else(|| AppError::not_found("Module submission"))?;
    let submission = submissions.grade_module_submission(submission, score).await?;

    let outcome =
        aggregate_and_check(&txn, enrollment.id, meeting.id, ScoreComponent::Module, policy)
            .await?;
    txn.commit().await?;

    tracing::info!(
        module_id = %module_id,
        training_user_id = %training_user_id,
        score,
        completed = outcome.completed,
        "Module graded"
    );

    Ok(ModuleGrade {
        submission,
        outcome,
    })
}

/// Instructor grades a student's task submission.
pub async fn score_task(
    db: &DatabaseConnection,
    actor: &user::Model,
    task_id: Uuid,
    training_user_id: Uuid,
    score: i32,
    policy: &CertificatePolicy,
) -> AppResult<TaskGrade> {
    validate_item_score(score)?;
    let txn = db.begin().await?;
    let locked = lock_enrollment(&txn, training_user_id).await?;

    let task = ContentRepository::new(&txn)
        .find_task(task_id)
        .await?
        .ok_or_else(|| AppError::not_found("Task"))?;
    let (meeting, training) = load_meeting(&txn, task.meeting_id).await?;
    ensure_training_owner(actor, &training)?;
    let enrollment = graded_enrollment(locked, training.id)?;

    let submissions = SubmissionRepository::new(&txn);
    let submission = submissions
        .find_task_submission(task.id, enrollment.id)
        .await?
        .ok_or_else(|| AppError::not_found("Task submission"))?;
    let submission = submissions.grade_task_submission(submission, score).await?;

    let outcome =
        aggregate_and_check(&txn, enrollment.id, meeting.id, ScoreComponent::Task, policy).await?;
    txn.commit().await?;

    tracing::info!(
        task_id = %task_id,
        training_user_id = %training_user_id,
        score,
        completed = outcome.completed,
        "Task graded"
    );

    Ok(TaskGrade {
        submission,
        outcome,
    })
}

/// Student answers a quiz. The attempt is scored immediately and replaces
/// any earlier attempt.
pub async fn submit_quiz(
    db: &DatabaseConnection,
    actor: &user::Model,
    quiz_id: Uuid,
    answers: Vec<usize>,
    policy: &CertificatePolicy,
) -> AppResult<QuizResult> {
    let quiz = ContentRepository::new(db)
        .find_quiz(quiz_id)
        .await?
        .ok_or_else(|| AppError::not_found("Quiz"))?;
    let (meeting, training) = load_meeting(db, quiz.meeting_id).await?;
    let enrollment = student_enrollment(db, actor, training.id).await?;

    let txn = db.begin().await?;
    let enrollment = lock_enrollment(&txn, enrollment.id)
        .await?
        .ok_or_else(|| AppError::Forbidden("You are not enrolled in this training".to_string()))?;
    ensure_accepting_submissions(&enrollment)?;

    let questions = quiz
        .parsed_questions()
        .map_err(|e| AppError::Internal(format!("Quiz {} has malformed questions: {}", quiz.id, e)))?;
    let (correct, score) = score_quiz(&questions, &answers)?;

    let submission = SubmissionRepository::new(&txn)
        .upsert_quiz_attempt(quiz.id, enrollment.id, serde_json::json!(answers), score)
        .await?;

    let outcome =
        aggregate_and_check(&txn, enrollment.id, meeting.id, ScoreComponent::Quiz, policy).await?;
    txn.commit().await?;

    tracing::info!(
        quiz_id = %quiz_id,
        training_user_id = %enrollment.id,
        correct,
        score,
        completed = outcome.completed,
        "Quiz submitted"
    );

    Ok(QuizResult {
        submission,
        correct,
        total: questions.len(),
        outcome,
    })
}

/// Student answers a module. Answering alone never completes a training;
/// the instructor's grade does.
pub async fn submit_module(
    db: &DatabaseConnection,
    actor: &user::Model,
    module_id: Uuid,
    answer: String,
) -> AppResult<module_submission::Model> {
    let module = ContentRepository::new(db)
        .find_module(module_id)
        .await?
        .ok_or_else(|| AppError::not_found("Module"))?;
    let (_, training) = load_meeting(db, module.meeting_id).await?;
    let enrollment = student_enrollment(db, actor, training.id).await?;

    let submission = SubmissionRepository::new(db)
        .upsert_module_answer(module.id, enrollment.id, answer)
        .await?;

    tracing::info!(module_id = %module_id, training_user_id = %enrollment.id, "Module answered");
    Ok(submission)
}

pub async fn submit_task(
    db: &DatabaseConnection,
    actor: &user::Model,
    task_id: Uuid,
    answer: String,
) -> AppResult<task_submission::Model> {
    let task = ContentRepository::new(db)
        .find_task(task_id)
        .await?
        .ok_or_else(|| AppError::not_found("Task"))?;
    let (_, training) = load_meeting(db, task.meeting_id).await?;
    let enrollment = student_enrollment(db, actor, training.id).await?;

    let submission = SubmissionRepository::new(db)
        .upsert_task_answer(task.id, enrollment.id, answer)
        .await?;

    tracing::info!(task_id = %task_id, training_user_id = %enrollment.id, "Task answered");
    Ok(submission)
}

/// Renders the image of a certificate issued by a grading call. Failures
/// are logged and leave the committed certificate without an image; it is
/// rendered again the next time it is read.
pub async fn render_certificate(
    db: &DatabaseConnection,
    renderer: &CertificateRenderer,
    outcome: &mut GradingOutcome,
) {
    let Some(certificate) = outcome.certificate.take() else {
        return;
    };

    let fallback = certificate.clone();
    outcome.certificate = Some(match ensure_image(db, renderer, certificate).await {
        Ok(rendered) => rendered,
        Err(err) => {
            tracing::error!(
                certificate_id = %fallback.id,
                "Failed to render certificate image: {:#}",
                err
            );
            fallback
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(answer: usize) -> QuizQuestion {
        QuizQuestion {
            question: "Which one?".to_string(),
            options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            answer,
        }
    }

    #[test]
    fn test_score_bounds() {
        assert!(validate_item_score(0).is_ok());
        assert!(validate_item_score(100).is_ok());
        assert!(matches!(
            validate_item_score(101),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_item_score(-1),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_quiz_score_rounds_percentage() {
        let questions = vec![question(0), question(1), question(2)];

        assert_eq!(score_quiz(&questions, &[0, 1, 2]).unwrap(), (3, 100));
        assert_eq!(score_quiz(&questions, &[0, 1, 0]).unwrap(), (2, 67));
        assert_eq!(score_quiz(&questions, &[0, 0, 0]).unwrap(), (1, 33));
        assert_eq!(score_quiz(&questions, &[2, 2, 0]).unwrap(), (0, 0));
    }

    #[test]
    fn test_quiz_answer_count_must_match() {
        let questions = vec![question(0), question(1)];
        assert!(matches!(
            score_quiz(&questions, &[0]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_only_owning_instructor_is_owner() {
        let now = Utc::now().naive_utc();
        let instructor = user::Model {
            id: Uuid::new_v4(),
            email: "i@example.com".to_string(),
            name: "Instructor".to_string(),
            password: String::new(),
            role: RoleEnum::Instructor,
            token: None,
            created_at: now,
            updated_at: now,
        };
        let training = training::Model {
            id: Uuid::new_v4(),
            title: "Rust".to_string(),
            description: String::new(),
            image: None,
            instructor_id: instructor.id,
            created_at: now,
            updated_at: now,
        };
        let other = user::Model {
            id: Uuid::new_v4(),
            ..instructor.clone()
        };

        assert!(ensure_training_owner(&instructor, &training).is_ok());
        assert!(matches!(
            ensure_training_owner(&other, &training),
            Err(AppError::Forbidden(_))
        ));
    }
}
