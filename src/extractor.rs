use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::entities::{sea_orm_active_enums::RoleEnum, user};
use crate::error::AppError;
use crate::repositories::UserRepository;
use crate::static_service::database;

/// The user owning the bearer token of the request.
pub struct AuthUser(pub user::Model);

impl AuthUser {
    pub fn require_role(&self, role: RoleEnum) -> Result<(), AppError> {
        if self.0.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "This action requires the {:?} role",
                role
            )))
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Unauthorized("Missing bearer token".to_string()))?;

        let db = database()?;
        let user = UserRepository::new(db)
            .find_by_token(bearer.token())
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(AuthUser(user))
    }
}
