//! `SeaORM` Entity for task_submissions table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "task_submissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub task_id: Uuid,
    pub training_user_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub answer: Option<String>,
    pub score: Option<i32>,
    pub submitted_at: DateTime,
    pub graded_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::task::Entity",
        from = "Column::TaskId",
        to = "super::task::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Task,
    #[sea_orm(
        belongs_to = "super::training_user::Entity",
        from = "Column::TrainingUserId",
        to = "super::training_user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    TrainingUser,
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl Related<super::training_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrainingUser.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
