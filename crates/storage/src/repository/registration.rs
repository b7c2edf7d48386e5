use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::AthleteRegistration;

/// Athlete entries in competitions
pub struct RegistrationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RegistrationRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register an athlete to a competition
    pub async fn register(
        &self,
        athlete_id: Uuid,
        competition_id: Uuid,
    ) -> Result<AthleteRegistration> {
        let registration = sqlx::query_as::<_, AthleteRegistration>(
            r#"
            INSERT INTO athlete_competitions (athlete_id, competition_id)
            VALUES ($1, $2)
            RETURNING athlete_id, competition_id, registered_at
            "#,
        )
        .bind(athlete_id)
        .bind(competition_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_unique_violation() {
                return StorageError::ConstraintViolation(
                    "Athlete is already registered to this competition".to_string(),
                );
            }
            if err.is_foreign_key_violation() {
                return StorageError::ConstraintViolation(
                    "Unknown athlete or competition".to_string(),
                );
            }
            err
        })?;

        Ok(registration)
    }

    /// Remove a registration, returns whether one existed
    pub async fn unregister(&self, athlete_id: Uuid, competition_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM athlete_competitions
            WHERE athlete_id = $1 AND competition_id = $2
            "#,
        )
        .bind(athlete_id)
        .bind(competition_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List registrations for a competition, oldest first
    pub async fn list_for_competition(
        &self,
        competition_id: Uuid,
    ) -> Result<Vec<AthleteRegistration>> {
        let registrations = sqlx::query_as::<_, AthleteRegistration>(
            r#"
            SELECT athlete_id, competition_id, registered_at
            FROM athlete_competitions
            WHERE competition_id = $1
            ORDER BY registered_at
            "#,
        )
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        Ok(registrations)
    }
}
