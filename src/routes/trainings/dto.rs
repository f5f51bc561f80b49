use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::training;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrainingRequest {
    #[schema(example = "Rust for Backend Engineers")]
    pub title: String,

    #[schema(example = "Eight weekly meetings on async Rust and databases")]
    pub description: String,

    pub image: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrainingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TrainingQuery {
    /// Only trainings taught by this instructor
    pub instructor_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrainingResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub instructor_id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<training::Model> for TrainingResponse {
    fn from(training: training::Model) -> Self {
        Self {
            id: training.id,
            title: training.title,
            description: training.description,
            image: training.image,
            instructor_id: training.instructor_id,
            created_at: training.created_at,
            updated_at: training.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrainingListResponse {
    pub total: usize,
    pub trainings: Vec<TrainingResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteTrainingResponse {
    pub message: String,
}
