use sea_orm_migration::prelude::*;

use super::m20260105_000002_create_table_trainings::Meetings;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Modules::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Modules::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Modules::MeetingId).uuid().not_null())
                    .col(ColumnDef::new(Modules::Title).string().not_null())
                    .col(ColumnDef::new(Modules::Content).text().not_null())
                    .col(ColumnDef::new(Modules::Position).integer().not_null().default(0))
                    .col(ColumnDef::new(Modules::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_modules_meeting")
                            .from_tbl(Modules::Table)
                            .from_col(Modules::MeetingId)
                            .to_tbl(Meetings::Table)
                            .to_col(Meetings::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Quizzes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Quizzes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Quizzes::MeetingId).uuid().not_null())
                    .col(ColumnDef::new(Quizzes::Title).string().not_null())
                    .col(ColumnDef::new(Quizzes::Questions).json().not_null())
                    .col(ColumnDef::new(Quizzes::Position).integer().not_null().default(0))
                    .col(ColumnDef::new(Quizzes::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quizzes_meeting")
                            .from_tbl(Quizzes::Table)
                            .from_col(Quizzes::MeetingId)
                            .to_tbl(Meetings::Table)
                            .to_col(Meetings::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tasks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tasks::MeetingId).uuid().not_null())
                    .col(ColumnDef::new(Tasks::Title).string().not_null())
                    .col(ColumnDef::new(Tasks::Instructions).text().not_null())
                    .col(ColumnDef::new(Tasks::Position).integer().not_null().default(0))
                    .col(ColumnDef::new(Tasks::DueAt).timestamp().null())
                    .col(ColumnDef::new(Tasks::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_meeting")
                            .from_tbl(Tasks::Table)
                            .from_col(Tasks::MeetingId)
                            .to_tbl(Meetings::Table)
                            .to_col(Meetings::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Quizzes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Modules::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Modules {
    Table,
    Id,
    MeetingId,
    Title,
    Content,
    Position,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Quizzes {
    Table,
    Id,
    MeetingId,
    Title,
    Questions,
    Position,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Tasks {
    Table,
    Id,
    MeetingId,
    Title,
    Instructions,
    Position,
    DueAt,
    CreatedAt,
}
