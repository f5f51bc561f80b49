//! Certificate issuance.
//!
//! Issuing a certificate writes a row inside the caller's transaction.
//! Rendering the PNG happens afterwards through [`attach_image`], so a failed
//! render never rolls back grading and a rolled back transaction never leaves
//! a file behind.

use anyhow::Context;
use chrono::{Datelike, Months, NaiveDate, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Set};
use uuid::Uuid;

use crate::config::Config;
use crate::entities::certificate;
use crate::entities::sea_orm_active_enums::CertificateStatus;
use crate::repositories::{CertificateRepository, TrainingRepository, UserRepository};
use crate::services::certificate_renderer::CertificateRenderer;
use crate::utils::random::generate_random_digits;

/// Digits of the random tail of a certificate number
pub const CERTIFICATE_SERIAL_DIGITS: u32 = 13;

#[derive(Debug, Clone)]
pub struct CertificatePolicy {
    pub prefix: String,
    pub validity_years: u32,
    pub min_score: i32,
}

impl CertificatePolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            prefix: config.certificate_prefix.clone(),
            validity_years: config.certificate_validity_years,
            min_score: config.certificate_min_score,
        }
    }

    pub fn qualifies(&self, final_score: i32) -> bool {
        final_score >= self.min_score
    }

    pub fn expiry_for(&self, issued: NaiveDate) -> NaiveDate {
        // Feb 29 + N years saturates to Feb 28
        self.validity_years
            .checked_mul(12)
            .and_then(|months| issued.checked_add_months(Months::new(months)))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl Default for CertificatePolicy {
    fn default() -> Self {
        Self {
            prefix: "LMS".to_string(),
            validity_years: 5,
            min_score: 5,
        }
    }
}

/// `<PREFIX>/<yyyy>/<mm>/<dd>/<13-digit serial>`
pub fn format_certificate_number(prefix: &str, issued: NaiveDate, serial: &str) -> String {
    format!(
        "{}/{:04}/{:02}/{:02}/{}",
        prefix,
        issued.year(),
        issued.month(),
        issued.day(),
        serial
    )
}

#[derive(Debug, Clone)]
pub struct IssueCertificate {
    pub user_id: Uuid,
    pub training_id: Uuid,
    pub final_score: i32,
}

/// Returns the certificate of (training, user), creating it on first call.
///
/// The insert is `ON CONFLICT DO NOTHING` against the unique
/// (training_id, user_id) index followed by a read, so concurrent callers
/// all get the row that won.
pub async fn issue_certificate<C: ConnectionTrait>(
    conn: &C,
    request: &IssueCertificate,
    policy: &CertificatePolicy,
    today: NaiveDate,
) -> Result<certificate::Model, DbErr> {
    let repo = CertificateRepository::new(conn);

    if let Some(existing) = repo
        .find_by_training_and_user(request.training_id, request.user_id)
        .await?
    {
        tracing::debug!(certificate_id = %existing.id, "Certificate already issued");
        return Ok(existing);
    }

    let certificate_number = format_certificate_number(
        &policy.prefix,
        today,
        &generate_random_digits(CERTIFICATE_SERIAL_DIGITS),
    );

    let row = certificate::ActiveModel {
        id: Set(Uuid::new_v4()),
        training_id: Set(request.training_id),
        user_id: Set(request.user_id),
        certificate_number: Set(certificate_number.clone()),
        issued_date: Set(today),
        expiry_date: Set(policy.expiry_for(today)),
        final_score: Set(request.final_score),
        status: Set(CertificateStatus::Active),
        image_path: Set(None),
        created_at: Set(Utc::now().naive_utc()),
    };

    if repo.insert_if_absent(row).await? {
        tracing::info!(
            training_id = %request.training_id,
            user_id = %request.user_id,
            certificate_number = %certificate_number,
            "Certificate issued"
        );
    }

    repo.find_by_training_and_user(request.training_id, request.user_id)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("certificate".to_string()))
}

/// Renders the PNG for a certificate without one and stores its path.
///
/// Errors are returned to the caller, which decides whether they matter;
/// the certificate row itself is never touched on failure.
pub async fn attach_image(
    db: &DatabaseConnection,
    renderer: &CertificateRenderer,
    certificate: certificate::Model,
    recipient_name: &str,
    training_title: &str,
) -> anyhow::Result<certificate::Model> {
    if certificate.image_path.is_some() {
        return Ok(certificate);
    }

    let image_path = renderer
        .render_async(&certificate, recipient_name, training_title)
        .await?;

    let updated = CertificateRepository::new(db)
        .set_image_path(certificate, image_path)
        .await?;

    Ok(updated)
}

/// [`attach_image`] with the recipient name and training title looked up.
pub async fn ensure_image(
    db: &DatabaseConnection,
    renderer: &CertificateRenderer,
    certificate: certificate::Model,
) -> anyhow::Result<certificate::Model> {
    if certificate.image_path.is_some() {
        return Ok(certificate);
    }

    let recipient = UserRepository::new(db)
        .find_by_id(certificate.user_id)
        .await?
        .context("Certificate holder no longer exists")?;
    let training = TrainingRepository::new(db)
        .find_by_id(certificate.training_id)
        .await?
        .context("Certificate training no longer exists")?;

    attach_image(db, renderer, certificate, &recipient.name, &training.title).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_number_format() {
        let issued = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        let number = format_certificate_number("LMS", issued, "0000000004242");
        assert_eq!(number, "LMS/2026/03/07/0000000004242");
    }

    #[test]
    fn test_expiry_adds_validity_years() {
        let policy = CertificatePolicy::default();
        let issued = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(
            policy.expiry_for(issued),
            NaiveDate::from_ymd_opt(2031, 10, 18).unwrap()
        );
    }

    #[test]
    fn test_expiry_from_leap_day() {
        let policy = CertificatePolicy {
            validity_years: 1,
            ..CertificatePolicy::default()
        };
        let issued = NaiveDate::from_ymd_opt(2028, 2, 29).unwrap();
        assert_eq!(
            policy.expiry_for(issued),
            NaiveDate::from_ymd_opt(2029, 2, 28).unwrap()
        );
    }

    #[test]
    fn test_huge_validity_saturates() {
        let policy = CertificatePolicy {
            validity_years: u32::MAX,
            ..CertificatePolicy::default()
        };
        let issued = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(policy.expiry_for(issued), NaiveDate::MAX);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let policy = CertificatePolicy::default();
        assert!(policy.qualifies(5));
        assert!(!policy.qualifies(4));
    }
}
