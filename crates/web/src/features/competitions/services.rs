use async_trait::async_trait;
use sqlx::PgPool;
use storage::{
    Database,
    dto::competition::{CompetitionDraft, DependentsResponse},
    error::Result,
    models::Competition,
    repository::competition::{CompetitionRepository, SaveOutcome},
};
use uuid::Uuid;

/// The data-access operations the competition screen depends on.
#[async_trait]
pub trait CompetitionStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Competition>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Competition>>;

    async fn save(&self, draft: &CompetitionDraft) -> Result<SaveOutcome>;

    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn has_dependents(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
impl CompetitionStore for Database {
    async fn list(&self) -> Result<Vec<Competition>> {
        list_competitions(self.pool()).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Competition>> {
        get_competition(self.pool(), id).await
    }

    async fn save(&self, draft: &CompetitionDraft) -> Result<SaveOutcome> {
        save_competition(self.pool(), draft).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        delete_competition(self.pool(), id).await
    }

    async fn has_dependents(&self, id: Uuid) -> Result<bool> {
        CompetitionRepository::new(self.pool()).has_dependents(id).await
    }
}

/// List all competitions
pub async fn list_competitions(pool: &PgPool) -> Result<Vec<Competition>> {
    let repo = CompetitionRepository::new(pool);
    repo.list().await
}

/// Get competition by ID
pub async fn get_competition(pool: &PgPool, id: Uuid) -> Result<Option<Competition>> {
    let repo = CompetitionRepository::new(pool);
    repo.find_by_id(id).await
}

/// Insert or update a competition
pub async fn save_competition(pool: &PgPool, draft: &CompetitionDraft) -> Result<SaveOutcome> {
    let repo = CompetitionRepository::new(pool);
    repo.save(draft).await
}

/// Delete a competition
pub async fn delete_competition(pool: &PgPool, id: Uuid) -> Result<bool> {
    let repo = CompetitionRepository::new(pool);
    repo.delete(id).await
}

/// Registration count for a competition
pub async fn competition_dependents(pool: &PgPool, id: Uuid) -> Result<DependentsResponse> {
    let repo = CompetitionRepository::new(pool);
    let registrations = repo.count_dependents(id).await?;

    Ok(DependentsResponse {
        competition_id: id,
        has_dependents: registrations > 0,
        registrations,
    })
}
