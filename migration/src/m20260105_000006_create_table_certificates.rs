use sea_orm_migration::prelude::*;

use super::m20260105_000001_create_table_users::Users;
use super::m20260105_000002_create_table_trainings::Trainings;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Certificates::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Certificates::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Certificates::TrainingId).uuid().not_null())
                    .col(ColumnDef::new(Certificates::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Certificates::CertificateNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Certificates::IssuedDate).date().not_null())
                    .col(ColumnDef::new(Certificates::ExpiryDate).date().not_null())
                    .col(ColumnDef::new(Certificates::FinalScore).integer().not_null())
                    .col(ColumnDef::new(Certificates::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Certificates::ImagePath).string().null())
                    .col(ColumnDef::new(Certificates::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_certificates_training")
                            .from_tbl(Certificates::Table)
                            .from_col(Certificates::TrainingId)
                            .to_tbl(Trainings::Table)
                            .to_col(Trainings::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_certificates_user")
                            .from_tbl(Certificates::Table)
                            .from_col(Certificates::UserId)
                            .to_tbl(Users::Table)
                            .to_col(Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one certificate per (training, user); issuance relies on it
        manager
            .create_index(
                Index::create()
                    .name("uq_certificates_training_user")
                    .table(Certificates::Table)
                    .col(Certificates::TrainingId)
                    .col(Certificates::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_certificates_user_id")
                    .table(Certificates::Table)
                    .col(Certificates::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_certificates_user_id")
                    .table(Certificates::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("uq_certificates_training_user")
                    .table(Certificates::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Certificates::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Certificates {
    Table,
    Id,
    TrainingId,
    UserId,
    CertificateNumber,
    IssuedDate,
    ExpiryDate,
    FinalScore,
    Status,
    ImagePath,
    CreatedAt,
}
