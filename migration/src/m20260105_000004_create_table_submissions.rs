use sea_orm_migration::prelude::*;

use super::m20260105_000002_create_table_trainings::TrainingUsers;
use super::m20260105_000003_create_table_training_content::{Modules, Quizzes, Tasks};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModuleSubmissions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ModuleSubmissions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ModuleSubmissions::ModuleId).uuid().not_null())
                    .col(ColumnDef::new(ModuleSubmissions::TrainingUserId).uuid().not_null())
                    .col(ColumnDef::new(ModuleSubmissions::Answer).text().null())
                    .col(ColumnDef::new(ModuleSubmissions::Score).integer().null())
                    .col(ColumnDef::new(ModuleSubmissions::SubmittedAt).timestamp().not_null())
                    .col(ColumnDef::new(ModuleSubmissions::GradedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_module_submissions_module")
                            .from_tbl(ModuleSubmissions::Table)
                            .from_col(ModuleSubmissions::ModuleId)
                            .to_tbl(Modules::Table)
                            .to_col(Modules::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_module_submissions_training_user")
                            .from_tbl(ModuleSubmissions::Table)
                            .from_col(ModuleSubmissions::TrainingUserId)
                            .to_tbl(TrainingUsers::Table)
                            .to_col(TrainingUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_module_submissions_module_training_user")
                    .table(ModuleSubmissions::Table)
                    .col(ModuleSubmissions::ModuleId)
                    .col(ModuleSubmissions::TrainingUserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuizSubmissions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(QuizSubmissions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(QuizSubmissions::QuizId).uuid().not_null())
                    .col(ColumnDef::new(QuizSubmissions::TrainingUserId).uuid().not_null())
                    .col(ColumnDef::new(QuizSubmissions::Answers).json().null())
                    .col(ColumnDef::new(QuizSubmissions::Score).integer().null())
                    .col(ColumnDef::new(QuizSubmissions::SubmittedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quiz_submissions_quiz")
                            .from_tbl(QuizSubmissions::Table)
                            .from_col(QuizSubmissions::QuizId)
                            .to_tbl(Quizzes::Table)
                            .to_col(Quizzes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quiz_submissions_training_user")
                            .from_tbl(QuizSubmissions::Table)
                            .from_col(QuizSubmissions::TrainingUserId)
                            .to_tbl(TrainingUsers::Table)
                            .to_col(TrainingUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_quiz_submissions_quiz_training_user")
                    .table(QuizSubmissions::Table)
                    .col(QuizSubmissions::QuizId)
                    .col(QuizSubmissions::TrainingUserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TaskSubmissions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TaskSubmissions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TaskSubmissions::TaskId).uuid().not_null())
                    .col(ColumnDef::new(TaskSubmissions::TrainingUserId).uuid().not_null())
                    .col(ColumnDef::new(TaskSubmissions::Answer).text().null())
                    .col(ColumnDef::new(TaskSubmissions::Score).integer().null())
                    .col(ColumnDef::new(TaskSubmissions::SubmittedAt).timestamp().not_null())
                    .col(ColumnDef::new(TaskSubmissions::GradedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_submissions_task")
                            .from_tbl(TaskSubmissions::Table)
                            .from_col(TaskSubmissions::TaskId)
                            .to_tbl(Tasks::Table)
                            .to_col(Tasks::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_submissions_training_user")
                            .from_tbl(TaskSubmissions::Table)
                            .from_col(TaskSubmissions::TrainingUserId)
                            .to_tbl(TrainingUsers::Table)
                            .to_col(TrainingUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_task_submissions_task_training_user")
                    .table(TaskSubmissions::Table)
                    .col(TaskSubmissions::TaskId)
                    .col(TaskSubmissions::TrainingUserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TaskSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuizSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ModuleSubmissions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ModuleSubmissions {
    Table,
    Id,
    ModuleId,
    TrainingUserId,
    Answer,
    Score,
    SubmittedAt,
    GradedAt,
}

#[derive(DeriveIden)]
enum QuizSubmissions {
    Table,
    Id,
    QuizId,
    TrainingUserId,
    Answers,
    Score,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum TaskSubmissions {
    Table,
    Id,
    TaskId,
    TrainingUserId,
    Answer,
    Score,
    SubmittedAt,
    GradedAt,
}
