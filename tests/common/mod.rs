#![allow(dead_code)]

use lms_service::entities::quiz::QuizQuestion;
use lms_service::entities::sea_orm_active_enums::RoleEnum;
use lms_service::entities::{meeting, module, quiz, task, training, training_user, user};
use lms_service::repositories::{
    ContentRepository, EnrollmentRepository, MeetingRepository, TrainingRepository,
    UserRepository,
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tempfile::TempDir;
use uuid::Uuid;

/// Fresh in-memory database with every migration applied.
///
/// A single pooled connection keeps the in-memory database alive and makes
/// concurrent transactions queue behind each other.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("in-memory sqlite should connect");
    Migrator::up(&db, None)
        .await
        .expect("migrations should apply");
    db
}

/// File-backed database in WAL mode with a pool of several connections, so
/// concurrent calls really run in parallel transactions.
///
/// Keep the returned directory alive for as long as the connection is used.
pub async fn setup_shared_db() -> (DatabaseConnection, TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("lms.db").display());

    // journal mode is stored in the file, set it before the pool opens
    let bootstrap = Database::connect(url.clone())
        .await
        .expect("file sqlite should connect");
    bootstrap
        .execute_unprepared("PRAGMA journal_mode=WAL")
        .await
        .expect("WAL mode");
    Migrator::up(&bootstrap, None)
        .await
        .expect("migrations should apply");
    bootstrap.close().await.expect("close bootstrap connection");

    let mut options = ConnectOptions::new(url);
    options
        .max_connections(8)
        .min_connections(1)
        .sqlx_logging(false);
    // sqlx gives every pooled connection a 5s busy timeout, so writers queue
    let db = Database::connect(options)
        .await
        .expect("file sqlite pool should connect");
    (db, dir)
}

pub async fn create_user(db: &DatabaseConnection, name: &str, role: RoleEnum) -> user::Model {
    UserRepository::new(db)
        .create(
            format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4()),
            name.to_string(),
            "not-a-real-hash".to_string(),
            role,
            None,
        )
        .await
        .expect("user insert")
}

/// Questions whose correct option is always index 0.
pub fn quiz_questions(count: usize) -> Vec<QuizQuestion> {
    (0..count)
        .map(|i| QuizQuestion {
            question: format!("Question {}", i + 1),
            options: vec!["right".to_string(), "wrong".to_string(), "also wrong".to_string()],
            answer: 0,
        })
        .collect()
}

/// Answers with `correct` right choices followed by wrong ones.
pub fn quiz_answers(total: usize, correct: usize) -> Vec<usize> {
    (0..total).map(|i| if i < correct { 0 } else { 1 }).collect()
}

/// One training with one meeting holding a module, a quiz and a task.
pub struct Course {
    pub instructor: user::Model,
    pub training: training::Model,
    pub meeting: meeting::Model,
    pub module: module::Model,
    pub quiz: quiz::Model,
    pub task: task::Model,
}

pub async fn seed_course(db: &DatabaseConnection, question_count: usize) -> Course {
    let instructor = create_user(db, "Instructor", RoleEnum::Instructor).await;
    let training = TrainingRepository::new(db)
        .create(
            instructor.id,
            "Rust for Backend Engineers".to_string(),
            "Async Rust and databases".to_string(),
            None,
        )
        .await
        .expect("training insert");
    let meeting = MeetingRepository::new(db)
        .create(training.id, "Week 1".to_string(), None, 1, None)
        .await
        .expect("meeting insert");

    let content = ContentRepository::new(db);
    let module = content
        .create_module(meeting.id, "Ownership".to_string(), "Read chapter 4".to_string(), 1)
        .await
        .expect("module insert");
    let questions = serde_json::to_value(quiz_questions(question_count)).expect("questions json");
    let quiz = content
        .create_quiz(meeting.id, "Ownership quiz".to_string(), questions, 2)
        .await
        .expect("quiz insert");
    let task = content
        .create_task(
            meeting.id,
            "Refactor a borrow".to_string(),
            "Fix the borrow checker errors".to_string(),
            3,
            None,
        )
        .await
        .expect("task insert");

    Course {
        instructor,
        training,
        meeting,
        module,
        quiz,
        task,
    }
}

pub async fn enroll_student(
    db: &DatabaseConnection,
    training_id: Uuid,
    name: &str,
) -> (user::Model, training_user::Model) {
    let student = create_user(db, name, RoleEnum::Student).await;
    let enrollment = EnrollmentRepository::new(db)
        .create(training_id, student.id)
        .await
        .expect("enrollment insert");
    (student, enrollment)
}
