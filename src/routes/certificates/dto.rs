use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::certificate;
use crate::entities::sea_orm_active_enums::CertificateStatus;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateResponse {
    pub id: Uuid,
    pub training_id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "LMS/2026/10/18/0000000004242")]
    pub certificate_number: String,
    pub issued_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub final_score: i32,
    pub status: CertificateStatus,
    pub expired: bool,
    /// Public path of the rendered image, absent until rendering succeeds
    pub image_url: Option<String>,
}

impl CertificateResponse {
    pub fn new(certificate: certificate::Model, today: NaiveDate) -> Self {
        let expired = certificate.is_expired(today);
        Self {
            id: certificate.id,
            training_id: certificate.training_id,
            user_id: certificate.user_id,
            certificate_number: certificate.certificate_number,
            issued_date: certificate.issued_date,
            expiry_date: certificate.expiry_date,
            final_score: certificate.final_score,
            status: certificate.status,
            expired,
            image_url: certificate.image_path,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CertificateListResponse {
    pub total: usize,
    pub certificates: Vec<CertificateResponse>,
}
