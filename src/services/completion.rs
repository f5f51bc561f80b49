//! Training completion.
//!
//! An enrollment is complete once every module, quiz and task of every
//! meeting of its training has a submission that was answered or scored.
//! Item scores do not matter here; only the final score gates the
//! certificate.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use sea_orm::{ConnectionTrait, DbErr};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::certificate;
use crate::entities::sea_orm_active_enums::EnrollmentStatus;
use crate::repositories::{
    ContentRepository, EnrollmentRepository, MeetingRepository, ScoreRepository,
    SubmissionRepository,
};
use crate::services::certificate::{CertificatePolicy, IssueCertificate, issue_certificate};
use crate::services::score_aggregation::rounded_mean;

/// Result of a completion check.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// No enrollment with that id.
    NotFound,
    /// The enrollment is already completed or dropped.
    AlreadyClosed(EnrollmentStatus),
    Incomplete { missing: usize },
    Completed {
        final_score: i32,
        certificate: Option<certificate::Model>,
    },
}

impl Completion {
    /// Whether this check moved the enrollment to `completed`.
    pub fn transitioned(&self) -> bool {
        matches!(self, Completion::Completed { .. })
    }

    pub fn certificate(&self) -> Option<&certificate::Model> {
        match self {
            Completion::Completed { certificate, .. } => certificate.as_ref(),
            _ => None,
        }
    }
}

/// Required and submitted item ids of one enrollment.
#[derive(Debug, Clone, Default)]
pub struct Requirements {
    pub required: HashSet<Uuid>,
    pub submitted: HashSet<Uuid>,
}

impl Requirements {
    pub fn is_complete(&self) -> bool {
        is_complete(&self.required, &self.submitted)
    }

    pub fn missing(&self) -> usize {
        self.required.difference(&self.submitted).count()
    }

    pub fn progress(&self) -> Progress {
        let required = self.required.len();
        let done = required - self.missing();
        let percent = if required == 0 {
            100
        } else {
            ((done as f64 / required as f64) * 100.0).round() as u8
        };
        Progress {
            required,
            submitted: done,
            percent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Progress {
    pub required: usize,
    pub submitted: usize,
    pub percent: u8,
}

/// Every required id has a submission.
pub fn is_complete(required: &HashSet<Uuid>, submitted: &HashSet<Uuid>) -> bool {
    required.is_subset(submitted)
}

/// Collects the item ids a training requires and those the enrollment has
/// answered or been scored on.
pub async fn collect_requirements<C: ConnectionTrait>(
    conn: &C,
    training_id: Uuid,
    training_user_id: Uuid,
) -> Result<Requirements, DbErr> {
    let meeting_ids: Vec<Uuid> = MeetingRepository::new(conn)
        .find_by_training(training_id)
        .await?
        .into_iter()
        .map(|m| m.id)
        .collect();

    let mut required = HashSet::new();
    if !meeting_ids.is_empty() {
        let content = ContentRepository::new(conn);
        required.extend(content.module_ids_of_meetings(&meeting_ids).await?);
        required.extend(content.quiz_ids_of_meetings(&meeting_ids).await?);
        required.extend(content.task_ids_of_meetings(&meeting_ids).await?);
    }

    let submissions = SubmissionRepository::new(conn);
    let mut submitted = HashSet::new();
    submitted.extend(submissions.submitted_module_ids(training_user_id).await?);
    submitted.extend(submissions.submitted_quiz_ids(training_user_id).await?);
    submitted.extend(submissions.submitted_task_ids(training_user_id).await?);

    Ok(Requirements {
        required,
        submitted,
    })
}

/// Checks one enrollment and, when every item is submitted, marks it
/// completed and issues the certificate if the final score qualifies.
///
/// Meant to run inside the transaction of the grading call that triggered
/// it. Only database errors are returned.
pub async fn check_completion<C: ConnectionTrait>(
    conn: &C,
    training_user_id: Uuid,
    policy: &CertificatePolicy,
    today: NaiveDate,
) -> Result<Completion, DbErr> {
    let enrollments = EnrollmentRepository::new(conn);

    let Some(enrollment) = enrollments.find_by_id(training_user_id).await? else {
        tracing::warn!(training_user_id = %training_user_id, "Completion check for unknown enrollment");
        return Ok(Completion::NotFound);
    };

    if enrollment.status != EnrollmentStatus::Enrolled {
        return Ok(Completion::AlreadyClosed(enrollment.status));
    }

    let requirements =
        collect_requirements(conn, enrollment.training_id, enrollment.id).await?;
    if !requirements.is_complete() {
        let missing = requirements.missing();
        tracing::debug!(training_user_id = %training_user_id, missing, "Enrollment not complete yet");
        return Ok(Completion::Incomplete { missing });
    }

    let totals: Vec<i32> = ScoreRepository::new(conn)
        .find_by_enrollment(enrollment.id)
        .await?
        .into_iter()
        .map(|s| s.total_score)
        .collect();
    let final_score = rounded_mean(&totals);

    let user_id = enrollment.user_id;
    let training_id = enrollment.training_id;
    enrollments
        .mark_completed(enrollment, final_score, Utc::now().naive_utc())
        .await?;

    tracing::info!(
        training_user_id = %training_user_id,
        training_id = %training_id,
        user_id = %user_id,
        final_score,
        "Enrollment completed"
    );

    let certificate = if policy.qualifies(final_score) {
        let request = IssueCertificate {
            user_id,
            training_id,
            final_score,
        };
        Some(issue_certificate(conn, &request, policy, today).await?)
    } else {
        tracing::info!(
            training_user_id = %training_user_id,
            final_score,
            min_score = policy.min_score,
            "Final score below certificate threshold"
        );
        None
    };

    Ok(Completion::Completed {
        final_score,
        certificate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_partial_submission_is_not_complete() {
        let items = ids(4);
        let required: HashSet<Uuid> = items.iter().copied().collect();
        let submitted: HashSet<Uuid> = items[..3].iter().copied().collect();

        assert!(!is_complete(&required, &submitted));
    }

    #[test]
    fn test_all_submitted_is_complete_even_with_extras() {
        let items = ids(3);
        let required: HashSet<Uuid> = items.iter().copied().collect();
        let mut submitted = required.clone();
        submitted.insert(Uuid::new_v4());

        assert!(is_complete(&required, &submitted));
    }

    #[test]
    fn test_progress_counts_only_required_items() {
        let items = ids(4);
        let requirements = Requirements {
            required: items.iter().copied().collect(),
            submitted: [items[0], Uuid::new_v4()].into_iter().collect(),
        };

        let progress = requirements.progress();
        assert_eq!(progress.required, 4);
        assert_eq!(progress.submitted, 1);
        assert_eq!(progress.percent, 25);
        assert_eq!(requirements.missing(), 3);
    }

    #[test]
    fn test_completion_transitioned_flag() {
        assert!(
            Completion::Completed {
                final_score: 80,
                certificate: None
            }
            .transitioned()
        );
        assert!(!Completion::NotFound.transitioned());
        assert!(!Completion::Incomplete { missing: 1 }.transitioned());
        assert!(!Completion::AlreadyClosed(EnrollmentStatus::Completed).transitioned());
    }
}
