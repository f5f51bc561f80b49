//! `SeaORM` Entity for quiz_submissions table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quiz_submissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub training_user_id: Uuid,
    pub answers: Option<Json>,
    pub score: Option<i32>,
    pub submitted_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quiz::Entity",
        from = "Column::QuizId",
        to = "super::quiz::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Quiz,
    #[sea_orm(
        belongs_to = "super::training_user::Entity",
        from = "Column::TrainingUserId",
        to = "super::training_user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    TrainingUser,
}

impl Related<super::quiz::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quiz.def()
    }
}

impl Related<super::training_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrainingUser.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
