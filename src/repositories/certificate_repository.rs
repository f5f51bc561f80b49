use crate::entities::certificate;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

pub struct CertificateRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CertificateRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(
        &self,
        certificate_id: Uuid,
    ) -> Result<Option<certificate::Model>, DbErr> {
        certificate::Entity::find_by_id(certificate_id)
            .one(self.db)
            .await
    }

    pub async fn find_by_training_and_user(
        &self,
        training_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<certificate::Model>, DbErr> {
        certificate::Entity::find()
            .filter(certificate::Column::TrainingId.eq(training_id))
            .filter(certificate::Column::UserId.eq(user_id))
            .one(self.db)
            .await
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<certificate::Model>, DbErr> {
        certificate::Entity::find()
            .filter(certificate::Column::UserId.eq(user_id))
            .order_by_desc(certificate::Column::IssuedDate)
            .all(self.db)
            .await
    }

    /// Inserts unless (training_id, user_id) already holds a certificate.
    /// Returns whether a row was written.
    pub async fn insert_if_absent(&self, row: certificate::ActiveModel) -> Result<bool, DbErr> {
        let inserted = certificate::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([certificate::Column::TrainingId, certificate::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(inserted > 0)
    }

    pub async fn set_image_path(
        &self,
        certificate: certificate::Model,
        image_path: String,
    ) -> Result<certificate::Model, DbErr> {
        let mut active_model: certificate::ActiveModel = certificate.into();
        active_model.image_path = Set(Some(image_path));
        active_model.update(self.db).await
    }
}
