//! `SeaORM` Entity for scores table
//!
//! One row per (enrollment, meeting) holding the graded component scores and
//! their combined `total_score`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scores")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub training_user_id: Uuid,
    pub meeting_id: Uuid,
    pub module_score: i32,
    pub quiz_score: i32,
    pub task_score: i32,
    pub total_score: i32,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::training_user::Entity",
        from = "Column::TrainingUserId",
        to = "super::training_user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    TrainingUser,
    #[sea_orm(
        belongs_to = "super::meeting::Entity",
        from = "Column::MeetingId",
        to = "super::meeting::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Meeting,
}

impl Related<super::training_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrainingUser.def()
    }
}

impl Related<super::meeting::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meeting.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
