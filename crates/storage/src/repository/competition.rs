use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::dto::competition::CompetitionDraft;
use crate::error::{Result, StorageError};
use crate::models::Competition;

/// Outcome of [`CompetitionRepository::save`].
///
/// `NotFound` is returned when an update targets an identifier with no row.
/// Nothing is written in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(Competition),
    Updated(Competition),
    NotFound(Uuid),
}

impl SaveOutcome {
    /// The stored record, if one was written
    pub fn into_competition(self) -> Option<Competition> {
        match self {
            Self::Created(c) | Self::Updated(c) => Some(c),
            Self::NotFound(_) => None,
        }
    }
}

/// Repository for Competition database operations
pub struct CompetitionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompetitionRepository<'a> {
    /// Create a new CompetitionRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all competitions, most recent date first
    pub async fn list(&self) -> Result<Vec<Competition>> {
        let competitions = sqlx::query_as::<_, Competition>(
            r#"
            SELECT competition_id, name, competition_date, location, created_at
            FROM competitions
            ORDER BY competition_date DESC, created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(competitions)
    }

    /// Get a competition by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Competition>> {
        let competition = sqlx::query_as::<_, Competition>(
            r#"
            SELECT competition_id, name, competition_date, location, created_at
            FROM competitions
            WHERE competition_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(competition)
    }

    /// Insert the draft when it has no identifier, otherwise update the existing row.
    ///
    /// Updates read the row, overwrite name, date and location, and write it back.
    /// There is no optimistic concurrency check.
    pub async fn save(&self, draft: &CompetitionDraft) -> Result<SaveOutcome> {
        let mut tx = self.pool.begin().await?;

        let outcome = match draft.competition_id {
            None => {
                let created = sqlx::query_as::<_, Competition>(
                    r#"
                    INSERT INTO competitions (name, competition_date, location)
                    VALUES ($1, $2, $3)
                    RETURNING competition_id, name, competition_date, location, created_at
                    "#,
                )
                .bind(&draft.name)
                .bind(draft.competition_date)
                .bind(&draft.location)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_write_error)?;

                SaveOutcome::Created(created)
            }
            Some(id) => {
                let existing = sqlx::query_as::<_, Competition>(
                    r#"
                    SELECT competition_id, name, competition_date, location, created_at
                    FROM competitions
                    WHERE competition_id = $1
                    FOR UPDATE
                    "#,
                )
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

                match existing {
                    None => SaveOutcome::NotFound(id),
                    Some(mut existing) => {
                        existing.name = draft.name.clone();
                        existing.competition_date = draft.competition_date;
                        existing.location = draft.location.clone();

                        let updated = sqlx::query_as::<_, Competition>(
                            r#"
                            UPDATE competitions
                            SET
                                name = $2,
                                competition_date = $3,
                                location = $4
                            WHERE competition_id = $1
                            RETURNING competition_id, name, competition_date, location, created_at
                            "#,
                        )
                        .bind(existing.competition_id)
                        .bind(&existing.name)
                        .bind(existing.competition_date)
                        .bind(&existing.location)
                        .fetch_one(&mut *tx)
                        .await
                        .map_err(map_write_error)?;

                        SaveOutcome::Updated(updated)
                    }
                }
            }
        };

        tx.commit().await?;

        Ok(outcome)
    }

    /// Delete a competition by ID.
    ///
    /// Returns `false` when no such competition exists. Refuses with
    /// [`StorageError::HasDependents`] while athletes are registered.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        // Row lock conflicts with the key-share lock taken by new registrations.
        let locked = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT competition_id
            FROM competitions
            WHERE competition_id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            tx.commit().await?;
            return Ok(false);
        }

        let registrations = count_registrations(&mut *tx, id).await?;
        if registrations > 0 {
            return Err(StorageError::HasDependents {
                competition_id: id,
                registrations,
            });
        }

        let result = sqlx::query(
            r#"
            DELETE FROM competitions
            WHERE competition_id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_foreign_key_violation() {
                return StorageError::ConstraintViolation(
                    "Competition still has registered athletes".to_string(),
                );
            }
            err
        })?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of athlete registrations referencing the competition
    pub async fn count_dependents(&self, id: Uuid) -> Result<i64> {
        count_registrations(self.pool, id).await
    }

    /// Whether at least one athlete is registered to the competition
    pub async fn has_dependents(&self, id: Uuid) -> Result<bool> {
        Ok(self.count_dependents(id).await? > 0)
    }
}

async fn count_registrations<'e, E>(executor: E, competition_id: Uuid) -> Result<i64>
where
    E: PgExecutor<'e>,
{
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM athlete_competitions
        WHERE competition_id = $1
        "#,
    )
    .bind(competition_id)
    .fetch_one(executor)
    .await?;

    Ok(count)
}

fn map_write_error(e: sqlx::Error) -> StorageError {
    let err = StorageError::from(e);
    if err.is_check_violation() {
        return StorageError::ConstraintViolation("Competition name must not be blank".to_string());
    }
    err
}
