use sea_orm_migration::prelude::*;

use super::m20260105_000002_create_table_trainings::{Meetings, TrainingUsers};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Scores::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Scores::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Scores::TrainingUserId).uuid().not_null())
                    .col(ColumnDef::new(Scores::MeetingId).uuid().not_null())
                    .col(ColumnDef::new(Scores::ModuleScore).integer().not_null().default(0))
                    .col(ColumnDef::new(Scores::QuizScore).integer().not_null().default(0))
                    .col(ColumnDef::new(Scores::TaskScore).integer().not_null().default(0))
                    .col(ColumnDef::new(Scores::TotalScore).integer().not_null().default(0))
                    .col(ColumnDef::new(Scores::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scores_training_user")
                            .from_tbl(Scores::Table)
                            .from_col(Scores::TrainingUserId)
                            .to_tbl(TrainingUsers::Table)
                            .to_col(TrainingUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scores_meeting")
                            .from_tbl(Scores::Table)
                            .from_col(Scores::MeetingId)
                            .to_tbl(Meetings::Table)
                            .to_col(Meetings::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Upserts in score aggregation conflict on this index
        manager
            .create_index(
                Index::create()
                    .name("uq_scores_training_user_meeting")
                    .table(Scores::Table)
                    .col(Scores::TrainingUserId)
                    .col(Scores::MeetingId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Scores::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Scores {
    Table,
    Id,
    TrainingUserId,
    MeetingId,
    ModuleScore,
    QuizScore,
    TaskScore,
    TotalScore,
    UpdatedAt,
}
