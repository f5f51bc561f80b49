pub mod sea_orm_active_enums;

pub mod certificate;
pub mod meeting;
pub mod module;
pub mod module_submission;
pub mod quiz;
pub mod quiz_submission;
pub mod score;
pub mod task;
pub mod task_submission;
pub mod training;
pub mod training_user;
pub mod user;
