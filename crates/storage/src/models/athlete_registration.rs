use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// An athlete entered in a competition. Any row here blocks deleting the competition.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AthleteRegistration {
    pub athlete_id: Uuid,
    pub competition_id: Uuid,
    pub registered_at: chrono::NaiveDateTime,
}
