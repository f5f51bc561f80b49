use axum::{Json, Router, extract::Path, routing::get};
use chrono::Utc;
use uuid::Uuid;

use super::dto::{CertificateListResponse, CertificateResponse};
use crate::config::APP_CONFIG;
use crate::error::{AppError, AppResult};
use crate::extractor::AuthUser;
use crate::repositories::CertificateRepository;
use crate::routes::trainings::route::find_training;
use crate::services::certificate::ensure_image;
use crate::services::certificate_renderer::CertificateRenderer;
use crate::static_service::database;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/certificates", get(my_certificates))
        .route("/api/certificates/{certificate_id}", get(get_certificate))
}

/// Certificates held by the current user
#[utoipa::path(
    get,
    path = "/api/certificates",
    responses(
        (status = 200, description = "Certificates retrieved", body = CertificateListResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Certificates"
)]
pub async fn my_certificates(AuthUser(user): AuthUser) -> AppResult<Json<CertificateListResponse>> {
    let certificates = CertificateRepository::new(database()?)
        .find_by_user(user.id)
        .await?;
    let today = Utc::now().date_naive();

    Ok(Json(CertificateListResponse {
        total: certificates.len(),
        certificates: certificates
            .into_iter()
            .map(|c| CertificateResponse::new(c, today))
            .collect(),
    }))
}

/// Certificate by id, visible to its holder and the training's instructor
///
/// A certificate whose image failed to render earlier is rendered again here.
#[utoipa::path(
    get,
    path = "/api/certificates/{certificate_id}",
    params(("certificate_id" = Uuid, Path, description = "Certificate ID")),
    responses(
        (status = 200, description = "Certificate retrieved", body = CertificateResponse),
        (status = 403, description = "Neither the holder nor the instructor"),
        (status = 404, description = "Certificate not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Certificates"
)]
pub async fn get_certificate(
    AuthUser(user): AuthUser,
    Path(certificate_id): Path<Uuid>,
) -> AppResult<Json<CertificateResponse>> {
    let db = database()?;
    let certificate = CertificateRepository::new(db)
        .find_by_id(certificate_id)
        .await?
        .ok_or_else(|| AppError::not_found("Certificate"))?;

    if certificate.user_id != user.id {
        let training = find_training(db, certificate.training_id).await?;
        if training.instructor_id != user.id {
            return Err(AppError::Forbidden(
                "This certificate belongs to someone else".to_string(),
            ));
        }
    }

    let certificate = if certificate.image_path.is_none() {
        let renderer = CertificateRenderer::from_config(&APP_CONFIG);
        let fallback = certificate.clone();
        ensure_image(db, &renderer, certificate)
            .await
            .unwrap_or_else(|err| {
                tracing::warn!(
                    certificate_id = %certificate_id,
                    "Certificate image still unavailable: {:#}",
                    err
                );
                fallback
            })
    } else {
        certificate
    };

    Ok(Json(CertificateResponse::new(certificate, Utc::now().date_naive())))
}
