use crate::entities::training;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

pub struct TrainingRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TrainingRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_all(&self) -> Result<Vec<training::Model>, DbErr> {
        training::Entity::find()
            .order_by_desc(training::Column::CreatedAt)
            .all(self.db)
            .await
    }

    pub async fn find_by_instructor(
        &self,
        instructor_id: Uuid,
    ) -> Result<Vec<training::Model>, DbErr> {
        training::Entity::find()
            .filter(training::Column::InstructorId.eq(instructor_id))
            .order_by_desc(training::Column::CreatedAt)
            .all(self.db)
            .await
    }

    pub async fn find_by_id(&self, training_id: Uuid) -> Result<Option<training::Model>, DbErr> {
        training::Entity::find_by_id(training_id).one(self.db).await
    }

    pub async fn create(
        &self,
        instructor_id: Uuid,
        title: String,
        description: String,
        image: Option<String>,
    ) -> Result<training::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let training_model = training::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(title),
            description: Set(description),
            image: Set(image),
            instructor_id: Set(instructor_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        training_model.insert(self.db).await
    }

    pub async fn update(
        &self,
        training: training::Model,
        updates: TrainingUpdate,
    ) -> Result<training::Model, DbErr> {
        let mut active_model: training::ActiveModel = training.into();

        if let Some(title) = updates.title {
            active_model.title = Set(title);
        }
        if let Some(description) = updates.description {
            active_model.description = Set(description);
        }
        if let Some(image) = updates.image {
            active_model.image = Set(Some(image));
        }

        active_model.updated_at = Set(Utc::now().naive_utc());
        active_model.update(self.db).await
    }

    /// Meetings, content, enrollments, submissions, scores and certificates
    /// go with it through the foreign key cascades.
    pub async fn delete(&self, training: training::Model) -> Result<DeleteResult, DbErr> {
        let active_model: training::ActiveModel = training.into();
        active_model.delete(self.db).await
    }
}

pub struct TrainingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}
