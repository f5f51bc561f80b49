pub use sea_orm_migration::prelude::*;

mod m20260105_000001_create_table_users;
mod m20260105_000002_create_table_trainings;
mod m20260105_000003_create_table_training_content;
mod m20260105_000004_create_table_submissions;
mod m20260105_000005_create_table_scores;
mod m20260105_000006_create_table_certificates;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000001_create_table_users::Migration),
            Box::new(m20260105_000002_create_table_trainings::Migration),
            Box::new(m20260105_000003_create_table_training_content::Migration),
            Box::new(m20260105_000004_create_table_submissions::Migration),
            Box::new(m20260105_000005_create_table_scores::Migration),
            Box::new(m20260105_000006_create_table_certificates::Migration),
        ]
    }
}
