use crate::entities::sea_orm_active_enums::EnrollmentStatus;
use crate::entities::training_user;
use chrono::{NaiveDateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

pub struct EnrollmentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EnrollmentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(
        &self,
        training_user_id: Uuid,
    ) -> Result<Option<training_user::Model>, DbErr> {
        training_user::Entity::find_by_id(training_user_id)
            .one(self.db)
            .await
    }

    /// Reads the enrollment and holds its row lock until the transaction ends.
    ///
    /// Grading calls take this lock before anything else so that completion
    /// checks of one enrollment run one after another.
    pub async fn lock_by_id(
        &self,
        training_user_id: Uuid,
    ) -> Result<Option<training_user::Model>, DbErr> {
        if self.db.get_database_backend() == DbBackend::Sqlite {
            // no row locks in SQLite; a write takes the database write lock
            training_user::Entity::update_many()
                .col_expr(
                    training_user::Column::Status,
                    Expr::col(training_user::Column::Status).into(),
                )
                .filter(training_user::Column::Id.eq(training_user_id))
                .exec(self.db)
                .await?;
        }

        training_user::Entity::find_by_id(training_user_id)
            .lock_exclusive()
            .one(self.db)
            .await
    }

    pub async fn find_by_training_and_user(
        &self,
        training_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<training_user::Model>, DbErr> {
        training_user::Entity::find()
            .filter(training_user::Column::TrainingId.eq(training_id))
            .filter(training_user::Column::UserId.eq(user_id))
            .one(self.db)
            .await
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<training_user::Model>, DbErr> {
        training_user::Entity::find()
            .filter(training_user::Column::UserId.eq(user_id))
            .order_by_desc(training_user::Column::EnrolledAt)
            .all(self.db)
            .await
    }

    pub async fn find_by_training(
        &self,
        training_id: Uuid,
    ) -> Result<Vec<training_user::Model>, DbErr> {
        training_user::Entity::find()
            .filter(training_user::Column::TrainingId.eq(training_id))
            .order_by_asc(training_user::Column::EnrolledAt)
            .all(self.db)
            .await
    }

    pub async fn create(
        &self,
        training_id: Uuid,
        user_id: Uuid,
    ) -> Result<training_user::Model, DbErr> {
        let enrollment = training_user::ActiveModel {
            id: Set(Uuid::new_v4()),
            training_id: Set(training_id),
            user_id: Set(user_id),
            status: Set(EnrollmentStatus::Enrolled),
            final_score: Set(None),
            enrolled_at: Set(Utc::now().naive_utc()),
            completed_at: Set(None),
        };

        enrollment.insert(self.db).await
    }

    pub async fn mark_completed(
        &self,
        enrollment: training_user::Model,
        final_score: i32,
        completed_at: NaiveDateTime,
    ) -> Result<training_user::Model, DbErr> {
        let mut active_model: training_user::ActiveModel = enrollment.into();
        active_model.status = Set(EnrollmentStatus::Completed);
        active_model.final_score = Set(Some(final_score));
        active_model.completed_at = Set(Some(completed_at));
        active_model.update(self.db).await
    }
}
