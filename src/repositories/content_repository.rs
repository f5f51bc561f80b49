use crate::entities::{module, quiz, task};
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde_json::Value;
use uuid::Uuid;

/// Modules, quizzes and tasks of meetings.
pub struct ContentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ContentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_module(&self, module_id: Uuid) -> Result<Option<module::Model>, DbErr> {
        module::Entity::find_by_id(module_id).one(self.db).await
    }

    pub async fn find_quiz(&self, quiz_id: Uuid) -> Result<Option<quiz::Model>, DbErr> {
        quiz::Entity::find_by_id(quiz_id).one(self.db).await
    }

    pub async fn find_task(&self, task_id: Uuid) -> Result<Option<task::Model>, DbErr> {
        task::Entity::find_by_id(task_id).one(self.db).await
    }

    pub async fn modules_of_meeting(&self, meeting_id: Uuid) -> Result<Vec<module::Model>, DbErr> {
        module::Entity::find()
            .filter(module::Column::MeetingId.eq(meeting_id))
            .order_by_asc(module::Column::Position)
            .all(self.db)
            .await
    }

    pub async fn quizzes_of_meeting(&self, meeting_id: Uuid) -> Result<Vec<quiz::Model>, DbErr> {
        quiz::Entity::find()
            .filter(quiz::Column::MeetingId.eq(meeting_id))
            .order_by_asc(quiz::Column::Position)
            .all(self.db)
            .await
    }

    pub async fn tasks_of_meeting(&self, meeting_id: Uuid) -> Result<Vec<task::Model>, DbErr> {
        task::Entity::find()
            .filter(task::Column::MeetingId.eq(meeting_id))
            .order_by_asc(task::Column::Position)
            .all(self.db)
            .await
    }

    pub async fn module_ids_of_meetings(&self, meeting_ids: &[Uuid]) -> Result<Vec<Uuid>, DbErr> {
        module::Entity::find()
            .select_only()
            .column(module::Column::Id)
            .filter(module::Column::MeetingId.is_in(meeting_ids.iter().copied()))
            .into_tuple()
            .all(self.db)
            .await
    }

    pub async fn quiz_ids_of_meetings(&self, meeting_ids: &[Uuid]) -> Result<Vec<Uuid>, DbErr> {
        quiz::Entity::find()
            .select_only()
            .column(quiz::Column::Id)
            .filter(quiz::Column::MeetingId.is_in(meeting_ids.iter().copied()))
            .into_tuple()
            .all(self.db)
            .await
    }

    pub async fn task_ids_of_meetings(&self, meeting_ids: &[Uuid]) -> Result<Vec<Uuid>, DbErr> {
        task::Entity::find()
            .select_only()
            .column(task::Column::Id)
            .filter(task::Column::MeetingId.is_in(meeting_ids.iter().copied()))
            .into_tuple()
            .all(self.db)
            .await
    }

    pub async fn create_module(
        &self,
        meeting_id: Uuid,
        title: String,
        content: String,
        position: i32,
    ) -> Result<module::Model, DbErr> {
        module::ActiveModel {
            id: Set(Uuid::new_v4()),
            meeting_id: Set(meeting_id),
            title: Set(title),
            content: Set(content),
            position: Set(position),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(self.db)
        .await
    }

    pub async fn create_quiz(
        &self,
        meeting_id: Uuid,
        title: String,
        questions: Value,
        position: i32,
    ) -> Result<quiz::Model, DbErr> {
        quiz::ActiveModel {
            id: Set(Uuid::new_v4()),
            meeting_id: Set(meeting_id),
            title: Set(title),
            questions: Set(questions),
            position: Set(position),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(self.db)
        .await
    }

    pub async fn create_task(
        &self,
        meeting_id: Uuid,
        title: String,
        instructions: String,
        position: i32,
        due_at: Option<NaiveDateTime>,
    ) -> Result<task::Model, DbErr> {
        task::ActiveModel {
            id: Set(Uuid::new_v4()),
            meeting_id: Set(meeting_id),
            title: Set(title),
            instructions: Set(instructions),
            position: Set(position),
            due_at: Set(due_at),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(self.db)
        .await
    }
}
