use sea_orm_migration::prelude::*;

use super::m20260105_000001_create_table_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trainings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trainings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Trainings::Title).string().not_null())
                    .col(ColumnDef::new(Trainings::Description).text().not_null())
                    .col(ColumnDef::new(Trainings::Image).string().null())
                    .col(ColumnDef::new(Trainings::InstructorId).uuid().not_null())
                    .col(ColumnDef::new(Trainings::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Trainings::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trainings_instructor")
                            .from_tbl(Trainings::Table)
                            .from_col(Trainings::InstructorId)
                            .to_tbl(Users::Table)
                            .to_col(Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TrainingUsers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TrainingUsers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TrainingUsers::TrainingId).uuid().not_null())
                    .col(ColumnDef::new(TrainingUsers::UserId).uuid().not_null())
                    .col(ColumnDef::new(TrainingUsers::Status).string_len(16).not_null())
                    .col(ColumnDef::new(TrainingUsers::FinalScore).integer().null())
                    .col(ColumnDef::new(TrainingUsers::EnrolledAt).timestamp().not_null())
                    .col(ColumnDef::new(TrainingUsers::CompletedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_training_users_training")
                            .from_tbl(TrainingUsers::Table)
                            .from_col(TrainingUsers::TrainingId)
                            .to_tbl(Trainings::Table)
                            .to_col(Trainings::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_training_users_user")
                            .from_tbl(TrainingUsers::Table)
                            .from_col(TrainingUsers::UserId)
                            .to_tbl(Users::Table)
                            .to_col(Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One enrollment per (training, user)
        manager
            .create_index(
                Index::create()
                    .name("uq_training_users_training_user")
                    .table(TrainingUsers::Table)
                    .col(TrainingUsers::TrainingId)
                    .col(TrainingUsers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Meetings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Meetings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Meetings::TrainingId).uuid().not_null())
                    .col(ColumnDef::new(Meetings::Title).string().not_null())
                    .col(ColumnDef::new(Meetings::Description).text().null())
                    .col(ColumnDef::new(Meetings::Position).integer().not_null().default(0))
                    .col(ColumnDef::new(Meetings::ScheduledAt).timestamp().null())
                    .col(ColumnDef::new(Meetings::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meetings_training")
                            .from_tbl(Meetings::Table)
                            .from_col(Meetings::TrainingId)
                            .to_tbl(Trainings::Table)
                            .to_col(Trainings::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_meetings_training_id")
                    .table(Meetings::Table)
                    .col(Meetings::TrainingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Meetings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TrainingUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trainings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Trainings {
    Table,
    Id,
    Title,
    Description,
    Image,
    InstructorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum TrainingUsers {
    Table,
    Id,
    TrainingId,
    UserId,
    Status,
    FinalScore,
    EnrolledAt,
    CompletedAt,
}

#[derive(DeriveIden)]
pub enum Meetings {
    Table,
    Id,
    TrainingId,
    Title,
    Description,
    Position,
    ScheduledAt,
    CreatedAt,
}
