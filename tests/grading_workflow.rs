mod common;

use chrono::{Datelike, Utc};
use common::{
    create_user, enroll_student, quiz_answers, quiz_questions, seed_course, setup_db,
    setup_shared_db,
};
use lms_service::entities::{certificate, training_user};
use lms_service::entities::sea_orm_active_enums::{CertificateStatus, EnrollmentStatus, RoleEnum};
use lms_service::error::AppError;
use lms_service::repositories::{
    CertificateRepository, ContentRepository, EnrollmentRepository, MeetingRepository,
    ScoreRepository, TrainingRepository,
};
use lms_service::services::certificate::{CertificatePolicy, CERTIFICATE_SERIAL_DIGITS};
use lms_service::services::certificate_renderer::CertificateRenderer;
use lms_service::services::completion::{Completion, check_completion};
use lms_service::services::grading;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set, SqlErr};

#[tokio::test]
async fn test_full_course_completes_with_certificate() {
    let db = setup_db().await;
    let course = seed_course(&db, 10).await;
    let (student, enrollment) = enroll_student(&db, course.training.id, "Ana").await;
    let policy = CertificatePolicy::default();

    grading::submit_module(&db, &student, course.module.id, "notes".to_string())
        .await
        .unwrap();
    grading::submit_task(&db, &student, course.task.id, "patch".to_string())
        .await
        .unwrap();

    let module = grading::score_module(
        &db,
        &course.instructor,
        course.module.id,
        enrollment.id,
        85,
        &policy,
    )
    .await
    .unwrap();
    assert!(!module.outcome.completed, "quiz is still missing");

    let task = grading::score_task(
        &db,
        &course.instructor,
        course.task.id,
        enrollment.id,
        95,
        &policy,
    )
    .await
    .unwrap();
    assert!(!task.outcome.completed);

    let quiz = grading::submit_quiz(&db, &student, course.quiz.id, quiz_answers(10, 9), &policy)
        .await
        .unwrap();

    assert_eq!(quiz.correct, 9);
    assert_eq!(quiz.submission.score, Some(90));
    assert!(quiz.outcome.completed);
    assert_eq!(quiz.outcome.final_score, Some(90));
    assert_eq!(quiz.outcome.score.module_score, 85);
    assert_eq!(quiz.outcome.score.quiz_score, 90);
    assert_eq!(quiz.outcome.score.task_score, 95);
    assert_eq!(quiz.outcome.score.total_score, 90);

    let issued = quiz.outcome.certificate.expect("certificate issued");
    assert_eq!(issued.user_id, student.id);
    assert_eq!(issued.training_id, course.training.id);
    assert_eq!(issued.final_score, 90);
    assert_eq!(issued.status, CertificateStatus::Active);
    assert_eq!(issued.expiry_date, policy.expiry_for(issued.issued_date));
    assert!(issued.image_path.is_none());

    let enrollment = EnrollmentRepository::new(&db)
        .find_by_id(enrollment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Completed);
    assert_eq!(enrollment.final_score, Some(90));
    assert!(enrollment.completed_at.is_some());
}

#[tokio::test]
async fn test_low_final_score_completes_without_certificate() {
    let db = setup_db().await;
    let course = seed_course(&db, 3).await;
    let (student, enrollment) = enroll_student(&db, course.training.id, "Bruno").await;
    let policy = CertificatePolicy::default();

    grading::submit_module(&db, &student, course.module.id, "?".to_string())
        .await
        .unwrap();
    grading::submit_task(&db, &student, course.task.id, "?".to_string())
        .await
        .unwrap();

    let quiz = grading::submit_quiz(&db, &student, course.quiz.id, quiz_answers(3, 0), &policy)
        .await
        .unwrap();

    assert!(quiz.outcome.completed);
    assert_eq!(quiz.outcome.final_score, Some(0));
    assert!(quiz.outcome.certificate.is_none());

    let certificates = certificate::Entity::find().count(&db).await.unwrap();
    assert_eq!(certificates, 0);

    let enrollment = EnrollmentRepository::new(&db)
        .find_by_id(enrollment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Completed);
}

#[tokio::test]
async fn test_answering_modules_and_tasks_alone_does_not_complete() {
    let db = setup_db().await;
    let course = seed_course(&db, 2).await;
    let (student, enrollment) = enroll_student(&db, course.training.id, "Carla").await;

    grading::submit_module(&db, &student, course.module.id, "a".to_string())
        .await
        .unwrap();
    grading::submit_task(&db, &student, course.task.id, "b".to_string())
        .await
        .unwrap();

    let enrollment = EnrollmentRepository::new(&db)
        .find_by_id(enrollment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Enrolled);
}

#[tokio::test]
async fn test_recheck_after_completion_is_a_no_op() {
    let db = setup_db().await;
    let course = seed_course(&db, 1).await;
    let (student, enrollment) = enroll_student(&db, course.training.id, "Dario").await;
    let policy = CertificatePolicy::default();

    grading::submit_module(&db, &student, course.module.id, "a".to_string())
        .await
        .unwrap();
    grading::submit_task(&db, &student, course.task.id, "b".to_string())
        .await
        .unwrap();
    let first = grading::submit_quiz(&db, &student, course.quiz.id, vec![0], &policy)
        .await
        .unwrap();
    let issued = first.outcome.certificate.expect("certificate issued");

    let today = Utc::now().date_naive();
    let again = check_completion(&db, enrollment.id, &policy, today)
        .await
        .unwrap();
    assert_eq!(again, Completion::AlreadyClosed(EnrollmentStatus::Completed));
    assert!(!again.transitioned());

    // Resubmitting after completion keeps the one certificate
    let resubmitted = grading::submit_quiz(&db, &student, course.quiz.id, vec![0], &policy)
        .await
        .unwrap();
    assert!(!resubmitted.outcome.completed);

    let certificates = CertificateRepository::new(&db)
        .find_by_user(student.id)
        .await
        .unwrap();
    assert_eq!(certificates.len(), 1);
    assert_eq!(certificates[0].id, issued.id);
}

#[tokio::test]
async fn test_concurrent_grading_issues_one_certificate() {
    let (db, _dir) = setup_shared_db().await;
    let course = seed_course(&db, 1).await;
    let (student, enrollment) = enroll_student(&db, course.training.id, "Eva").await;
    let policy = CertificatePolicy::default();

    grading::submit_module(&db, &student, course.module.id, "a".to_string())
        .await
        .unwrap();
    grading::submit_task(&db, &student, course.task.id, "b".to_string())
        .await
        .unwrap();

    let (quiz, module, task) = tokio::join!(
        grading::submit_quiz(&db, &student, course.quiz.id, vec![0], &policy),
        grading::score_module(
            &db,
            &course.instructor,
            course.module.id,
            enrollment.id,
            100,
            &policy,
        ),
        grading::score_task(
            &db,
            &course.instructor,
            course.task.id,
            enrollment.id,
            100,
            &policy,
        ),
    );
    let completions = [
        quiz.unwrap().outcome.completed,
        module.unwrap().outcome.completed,
        task.unwrap().outcome.completed,
    ];
    assert_eq!(completions.iter().filter(|c| **c).count(), 1);

    let certificates = CertificateRepository::new(&db)
        .find_by_user(student.id)
        .await
        .unwrap();
    assert_eq!(certificates.len(), 1);

    let enrollment = EnrollmentRepository::new(&db)
        .find_by_id(enrollment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Completed);
}

#[tokio::test]
async fn test_components_of_one_meeting_are_kept_apart() {
    let db = setup_db().await;
    let course = seed_course(&db, 4).await;
    let (student, enrollment) = enroll_student(&db, course.training.id, "Gina").await;
    let policy = CertificatePolicy::default();

    grading::submit_module(&db, &student, course.module.id, "a".to_string())
        .await
        .unwrap();
    grading::score_module(
        &db,
        &course.instructor,
        course.module.id,
        enrollment.id,
        80,
        &policy,
    )
    .await
    .unwrap();
    let quiz = grading::submit_quiz(&db, &student, course.quiz.id, quiz_answers(4, 4), &policy)
        .await
        .unwrap();

    assert_eq!(quiz.outcome.score.module_score, 80);
    assert_eq!(quiz.outcome.score.quiz_score, 100);
    assert_eq!(quiz.outcome.score.task_score, 0);
    assert_eq!(quiz.outcome.score.total_score, 60);

    let rows = ScoreRepository::new(&db)
        .find_by_enrollment(enrollment.id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].meeting_id, course.meeting.id);
}

#[tokio::test]
async fn test_duplicate_enrollment_violates_unique_index() {
    let db = setup_db().await;
    let course = seed_course(&db, 1).await;
    let (student, _) = enroll_student(&db, course.training.id, "Hugo").await;

    let err = EnrollmentRepository::new(&db)
        .create(course.training.id, student.id)
        .await
        .unwrap_err();

    assert!(matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_))
    ));
}

#[tokio::test]
async fn test_only_the_owning_instructor_can_grade() {
    let db = setup_db().await;
    let course = seed_course(&db, 1).await;
    let (student, enrollment) = enroll_student(&db, course.training.id, "Iris").await;
    let stranger = create_user(&db, "Stranger", RoleEnum::Instructor).await;
    let policy = CertificatePolicy::default();

    grading::submit_module(&db, &student, course.module.id, "a".to_string())
        .await
        .unwrap();

    let err = grading::score_module(&db, &stranger, course.module.id, enrollment.id, 50, &policy)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = grading::score_module(&db, &student, course.module.id, enrollment.id, 50, &policy)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = grading::score_module(
        &db,
        &course.instructor,
        course.module.id,
        enrollment.id,
        150,
        &policy,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_grading_requires_an_existing_submission() {
    let db = setup_db().await;
    let course = seed_course(&db, 1).await;
    let (_, enrollment) = enroll_student(&db, course.training.id, "Joao").await;
    let policy = CertificatePolicy::default();

    let err = grading::score_task(
        &db,
        &course.instructor,
        course.task.id,
        enrollment.id,
        70,
        &policy,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Nothing of the failed call was kept
    let rows = ScoreRepository::new(&db)
        .find_by_enrollment(enrollment.id)
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_students_outside_the_training_cannot_submit() {
    let db = setup_db().await;
    let course = seed_course(&db, 2).await;
    let outsider = create_user(&db, "Outsider", RoleEnum::Student).await;
    let policy = CertificatePolicy::default();

    let err = grading::submit_quiz(&db, &outsider, course.quiz.id, vec![0, 0], &policy)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = grading::submit_module(&db, &outsider, course.module.id, "a".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_wrong_answer_count_is_rejected() {
    let db = setup_db().await;
    let course = seed_course(&db, 3).await;
    let (student, _) = enroll_student(&db, course.training.id, "Karla").await;

    let err = grading::submit_quiz(
        &db,
        &student,
        course.quiz.id,
        vec![0],
        &CertificatePolicy::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_empty_training_completes_without_certificate() {
    let db = setup_db().await;
    let instructor = create_user(&db, "Empty", RoleEnum::Instructor).await;
    let training = TrainingRepository::new(&db)
        .create(instructor.id, "Nothing yet".to_string(), String::new(), None)
        .await
        .unwrap();
    let (_, enrollment) = enroll_student(&db, training.id, "Leo").await;

    let completion = check_completion(
        &db,
        enrollment.id,
        &CertificatePolicy::default(),
        Utc::now().date_naive(),
    )
    .await
    .unwrap();

    assert_eq!(
        completion,
        Completion::Completed {
            final_score: 0,
            certificate: None
        }
    );
}

#[tokio::test]
async fn test_unknown_enrollment_is_not_found() {
    let db = setup_db().await;
    let completion = check_completion(
        &db,
        uuid::Uuid::new_v4(),
        &CertificatePolicy::default(),
        Utc::now().date_naive(),
    )
    .await
    .unwrap();

    assert_eq!(completion, Completion::NotFound);
}

#[tokio::test]
async fn test_certificate_number_layout() {
    let db = setup_db().await;
    let course = seed_course(&db, 1).await;
    let (student, _) = enroll_student(&db, course.training.id, "Mara").await;
    let policy = CertificatePolicy {
        prefix: "ACME".to_string(),
        ..CertificatePolicy::default()
    };

    grading::submit_module(&db, &student, course.module.id, "a".to_string())
        .await
        .unwrap();
    grading::submit_task(&db, &student, course.task.id, "b".to_string())
        .await
        .unwrap();
    let quiz = grading::submit_quiz(&db, &student, course.quiz.id, vec![0], &policy)
        .await
        .unwrap();
    let issued = quiz.outcome.certificate.expect("certificate issued");

    let parts: Vec<&str> = issued.certificate_number.split('/').collect();
    assert_eq!(parts.len(), 5);
    assert_eq!(parts[0], "ACME");
    assert_eq!(parts[1], format!("{:04}", issued.issued_date.year()));
    assert_eq!(parts[2], format!("{:02}", issued.issued_date.month()));
    assert_eq!(parts[3], format!("{:02}", issued.issued_date.day()));
    assert_eq!(parts[4].len(), CERTIFICATE_SERIAL_DIGITS as usize);
    assert!(parts[4].chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn test_failed_render_keeps_the_certificate() {
    let db = setup_db().await;
    let course = seed_course(&db, 1).await;
    let (student, _) = enroll_student(&db, course.training.id, "Nina").await;
    let policy = CertificatePolicy::default();

    grading::submit_module(&db, &student, course.module.id, "a".to_string())
        .await
        .unwrap();
    grading::submit_task(&db, &student, course.task.id, "b".to_string())
        .await
        .unwrap();
    let mut outcome = grading::submit_quiz(&db, &student, course.quiz.id, vec![0], &policy)
        .await
        .unwrap()
        .outcome;

    let dir = tempfile::tempdir().unwrap();
    let renderer = CertificateRenderer {
        template_path: dir.path().join("missing.png"),
        font_path: dir.path().join("missing.ttf"),
        output_dir: dir.path().join("out"),
        public_prefix: "/certificates".to_string(),
    };
    grading::render_certificate(&db, &renderer, &mut outcome).await;

    let kept = outcome.certificate.expect("certificate still returned");
    assert!(kept.image_path.is_none());

    let stored = CertificateRepository::new(&db)
        .find_by_id(kept.id)
        .await
        .unwrap()
        .expect("certificate row survives");
    assert!(stored.image_path.is_none());
}

#[tokio::test]
async fn test_two_module_course_waits_for_the_quiz() {
    let db = setup_db().await;
    let course = seed_course(&db, 2).await;
    let second_module = lms_service::repositories::ContentRepository::new(&db)
        .create_module(
            course.meeting.id,
            "Borrowing".to_string(),
            "Read chapter 4.2".to_string(),
            2,
        )
        .await
        .unwrap();
    let (student, enrollment) = enroll_student(&db, course.training.id, "Olivia").await;
    let policy = CertificatePolicy::default();

    for module_id in [course.module.id, second_module.id] {
        grading::submit_module(&db, &student, module_id, "done".to_string())
            .await
            .unwrap();
    }
    grading::submit_task(&db, &student, course.task.id, "done".to_string())
        .await
        .unwrap();

    let pending = check_completion(&db, enrollment.id, &policy, Utc::now().date_naive())
        .await
        .unwrap();
    assert_eq!(pending, Completion::Incomplete { missing: 1 });

    let status = EnrollmentRepository::new(&db)
        .find_by_id(enrollment.id)
        .await
        .unwrap()
        .unwrap()
        .status;
    assert_eq!(status, EnrollmentStatus::Enrolled);

    let quiz = grading::submit_quiz(&db, &student, course.quiz.id, vec![0, 0], &policy)
        .await
        .unwrap();
    assert!(quiz.outcome.completed);
    assert!(quiz.outcome.certificate.is_some());

    let certificates = certificate::Entity::find().count(&db).await.unwrap();
    assert_eq!(certificates, 1);
}

#[tokio::test]
async fn test_last_two_quizzes_submitted_together_complete_the_enrollment() {
    let (db, _dir) = setup_shared_db().await;
    let policy = CertificatePolicy::default();
    let instructor = create_user(&db, "Instructor", RoleEnum::Instructor).await;
    let training = TrainingRepository::new(&db)
        .create(
            instructor.id,
            "Two week course".to_string(),
            "One quiz per week".to_string(),
            None,
        )
        .await
        .unwrap();

    let meetings = MeetingRepository::new(&db);
    let content = ContentRepository::new(&db);
    let questions = serde_json::to_value(quiz_questions(1)).unwrap();
    let mut quiz_ids = Vec::new();
    for week in 1..=2 {
        let meeting = meetings
            .create(training.id, format!("Week {week}"), None, week, None)
            .await
            .unwrap();
        let quiz = content
            .create_quiz(meeting.id, format!("Quiz {week}"), questions.clone(), 1)
            .await
            .unwrap();
        quiz_ids.push(quiz.id);
    }

    for round in 0..20 {
        let (student, enrollment) =
            enroll_student(&db, training.id, &format!("Student{round}")).await;

        let (first, second) = tokio::join!(
            grading::submit_quiz(&db, &student, quiz_ids[0], vec![0], &policy),
            grading::submit_quiz(&db, &student, quiz_ids[1], vec![0], &policy),
        );
        let completions = [first.unwrap().outcome, second.unwrap().outcome]
            .into_iter()
            .filter(|outcome| outcome.completed)
            .count();
        assert_eq!(completions, 1, "round {round}");

        let enrollment = EnrollmentRepository::new(&db)
            .find_by_id(enrollment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::Completed, "round {round}");
        assert_eq!(enrollment.final_score, Some(100));
    }
}

#[tokio::test]
async fn test_dropped_students_cannot_submit() {
    let db = setup_db().await;
    let course = seed_course(&db, 1).await;
    let (student, enrollment) = enroll_student(&db, course.training.id, "Nils").await;
    let policy = CertificatePolicy::default();

    let mut dropped: training_user::ActiveModel = enrollment.clone().into();
    dropped.status = Set(EnrollmentStatus::Dropped);
    dropped.update(&db).await.unwrap();

    let err = grading::submit_quiz(&db, &student, course.quiz.id, vec![0], &policy)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let err = grading::submit_task(&db, &student, course.task.id, "late".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let scores = ScoreRepository::new(&db)
        .find_by_enrollment(enrollment.id)
        .await
        .unwrap();
    assert!(scores.is_empty());
}
