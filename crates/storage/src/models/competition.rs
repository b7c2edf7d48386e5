use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Competition {
    pub competition_id: Uuid,
    pub name: String,
    pub competition_date: NaiveDate,
    pub location: Option<String>,
    pub created_at: NaiveDateTime,
}
