use crate::entities::score;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

pub struct ScoreRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ScoreRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// All per-meeting score rows of an enrollment
    pub async fn find_by_enrollment(
        &self,
        training_user_id: Uuid,
    ) -> Result<Vec<score::Model>, DbErr> {
        score::Entity::find()
            .filter(score::Column::TrainingUserId.eq(training_user_id))
            .order_by_asc(score::Column::UpdatedAt)
            .all(self.db)
            .await
    }

    pub async fn find_by_enrollment_and_meeting(
        &self,
        training_user_id: Uuid,
        meeting_id: Uuid,
    ) -> Result<Option<score::Model>, DbErr> {
        score::Entity::find()
            .filter(score::Column::TrainingUserId.eq(training_user_id))
            .filter(score::Column::MeetingId.eq(meeting_id))
            .one(self.db)
            .await
    }

    /// Creates the zeroed row for (enrollment, meeting) unless one exists.
    pub async fn ensure_row(&self, training_user_id: Uuid, meeting_id: Uuid) -> Result<(), DbErr> {
        let row = score::ActiveModel {
            id: Set(Uuid::new_v4()),
            training_user_id: Set(training_user_id),
            meeting_id: Set(meeting_id),
            module_score: Set(0),
            quiz_score: Set(0),
            task_score: Set(0),
            total_score: Set(0),
            updated_at: Set(Utc::now().naive_utc()),
        };

        score::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([score::Column::TrainingUserId, score::Column::MeetingId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(())
    }

    /// Reads the row with `FOR UPDATE`; SQLite ignores the clause and relies
    /// on its single writer.
    pub async fn lock_row(
        &self,
        training_user_id: Uuid,
        meeting_id: Uuid,
    ) -> Result<Option<score::Model>, DbErr> {
        score::Entity::find()
            .filter(score::Column::TrainingUserId.eq(training_user_id))
            .filter(score::Column::MeetingId.eq(meeting_id))
            .lock_exclusive()
            .one(self.db)
            .await
    }

    pub async fn save_components(
        &self,
        row: score::Model,
        module_score: i32,
        quiz_score: i32,
        task_score: i32,
        total_score: i32,
    ) -> Result<score::Model, DbErr> {
        let mut active_model: score::ActiveModel = row.into();
        active_model.module_score = Set(module_score);
        active_model.quiz_score = Set(quiz_score);
        active_model.task_score = Set(task_score);
        active_model.total_score = Set(total_score);
        active_model.updated_at = Set(Utc::now().naive_utc());
        active_model.update(self.db).await
    }
}
