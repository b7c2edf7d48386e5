use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Athlete;

pub struct AthleteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AthleteRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new athlete
    pub async fn create(&self, first_name: &str, last_name: &str) -> Result<Athlete> {
        let athlete = sqlx::query_as::<_, Athlete>(
            r#"
            INSERT INTO athletes (first_name, last_name)
            VALUES ($1, $2)
            RETURNING athlete_id, first_name, last_name, created_at
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_one(self.pool)
        .await?;

        Ok(athlete)
    }

    /// Find athlete by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Athlete>> {
        let athlete = sqlx::query_as::<_, Athlete>(
            r#"
            SELECT athlete_id, first_name, last_name, created_at
            FROM athletes
            WHERE athlete_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(athlete)
    }
}
