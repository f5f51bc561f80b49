mod common;

use chrono::NaiveDate;
use common::{create_user, enroll_student, seed_course, setup_db, setup_shared_db};
use lms_service::entities::sea_orm_active_enums::RoleEnum;
use lms_service::error::AppError;
use lms_service::services::certificate::{CertificatePolicy, IssueCertificate, issue_certificate};
use lms_service::services::progress::{enrollment_progress, enrollment_scores};

#[tokio::test]
async fn test_parallel_issue_returns_one_certificate() {
    let (db, _dir) = setup_shared_db().await;
    let course = seed_course(&db, 1).await;
    let (student, _) = enroll_student(&db, course.training.id, "Olga").await;
    let policy = CertificatePolicy::default();
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    let request = IssueCertificate {
        user_id: student.id,
        training_id: course.training.id,
        final_score: 77,
    };

    let results = futures::future::join_all(
        (0..5).map(|_| issue_certificate(&db, &request, &policy, today)),
    )
    .await;

    let ids: Vec<_> = results
        .into_iter()
        .map(|r| r.expect("issue succeeds").id)
        .collect();
    assert!(ids.iter().all(|id| *id == ids[0]));
}

#[tokio::test]
async fn test_reissue_keeps_the_original_certificate() {
    let db = setup_db().await;
    let course = seed_course(&db, 1).await;
    let (student, _) = enroll_student(&db, course.training.id, "Pia").await;
    let policy = CertificatePolicy::default();
    let request = IssueCertificate {
        user_id: student.id,
        training_id: course.training.id,
        final_score: 80,
    };

    let first = issue_certificate(
        &db,
        &request,
        &policy,
        NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
    )
    .await
    .unwrap();
    let second = issue_certificate(
        &db,
        &IssueCertificate {
            final_score: 99,
            ..request.clone()
        },
        &policy,
        NaiveDate::from_ymd_opt(2026, 5, 6).unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(first, second);
    assert_eq!(second.final_score, 80);
    assert_eq!(
        second.expiry_date,
        NaiveDate::from_ymd_opt(2031, 1, 2).unwrap()
    );
    assert!(second.certificate_number.starts_with("LMS/2026/01/02/"));
}

#[tokio::test]
async fn test_progress_is_visible_to_student_and_instructor_only() {
    let db = setup_db().await;
    let course = seed_course(&db, 2).await;
    let (student, enrollment) = enroll_student(&db, course.training.id, "Quim").await;
    let stranger = create_user(&db, "Rui", RoleEnum::Student).await;

    lms_service::services::grading::submit_module(
        &db,
        &student,
        course.module.id,
        "a".to_string(),
    )
    .await
    .unwrap();

    let (_, progress) = enrollment_progress(&db, &student, enrollment.id)
        .await
        .unwrap();
    assert_eq!(progress.required, 3);
    assert_eq!(progress.submitted, 1);
    assert_eq!(progress.percent, 33);

    let (_, progress) = enrollment_progress(&db, &course.instructor, enrollment.id)
        .await
        .unwrap();
    assert_eq!(progress.submitted, 1);

    let err = enrollment_scores(&db, &stranger, enrollment.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_rendered_image_is_stored_on_the_certificate() {
    use lms_service::services::certificate::ensure_image;
    use lms_service::services::certificate_renderer::{CertificateRenderer, certificate_file_name};
    use std::path::Path;

    let db = setup_db().await;
    let course = seed_course(&db, 1).await;
    let (student, _) = enroll_student(&db, course.training.id, "Sara").await;
    let issued = issue_certificate(
        &db,
        &IssueCertificate {
            user_id: student.id,
            training_id: course.training.id,
            final_score: 91,
        },
        &CertificatePolicy::default(),
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
    )
    .await
    .unwrap();

    let assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
    let out = tempfile::tempdir().unwrap();
    let renderer = CertificateRenderer {
        template_path: assets.join("certificate_template.png"),
        font_path: assets.join("fonts/certificate.ttf"),
        output_dir: out.path().to_path_buf(),
        public_prefix: "/certificates".to_string(),
    };

    let rendered = ensure_image(&db, &renderer, issued.clone()).await.unwrap();

    let file_name = certificate_file_name(&issued.certificate_number);
    assert_eq!(
        rendered.image_path.as_deref(),
        Some(format!("/certificates/{file_name}").as_str())
    );
    let image = image::open(out.path().join(&file_name)).unwrap();
    assert_eq!((image.width(), image.height()), (1600, 1131));

    // A second call leaves the stored image alone
    let again = ensure_image(&db, &renderer, rendered.clone()).await.unwrap();
    assert_eq!(again, rendered);
}
