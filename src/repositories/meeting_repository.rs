use crate::entities::meeting;
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

pub struct MeetingRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MeetingRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, meeting_id: Uuid) -> Result<Option<meeting::Model>, DbErr> {
        meeting::Entity::find_by_id(meeting_id).one(self.db).await
    }

    pub async fn find_by_training(&self, training_id: Uuid) -> Result<Vec<meeting::Model>, DbErr> {
        meeting::Entity::find()
            .filter(meeting::Column::TrainingId.eq(training_id))
            .order_by_asc(meeting::Column::Position)
            .order_by_asc(meeting::Column::CreatedAt)
            .all(self.db)
            .await
    }

    pub async fn create(
        &self,
        training_id: Uuid,
        title: String,
        description: Option<String>,
        position: i32,
        scheduled_at: Option<NaiveDateTime>,
    ) -> Result<meeting::Model, DbErr> {
        let meeting_model = meeting::ActiveModel {
            id: Set(Uuid::new_v4()),
            training_id: Set(training_id),
            title: Set(title),
            description: Set(description),
            position: Set(position),
            scheduled_at: Set(scheduled_at),
            created_at: Set(Utc::now().naive_utc()),
        };

        meeting_model.insert(self.db).await
    }
}
