use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::competition::{CompetitionResponse, DependentsResponse, SaveCompetitionRequest},
    repository::competition::SaveOutcome,
};
use uuid::Uuid;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/competitions",
    responses(
        (status = 200, description = "List all competitions, most recent first", body = Vec<CompetitionResponse>)
    ),
    tag = "competitions"
)]
pub async fn list_competitions(
    State(db): State<Database>,
) -> Result<Json<Vec<CompetitionResponse>>, WebError> {
    let competitions = services::list_competitions(db.pool()).await?;

    let response: Vec<CompetitionResponse> = competitions
        .into_iter()
        .map(CompetitionResponse::from)
        .collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{id}",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Competition found", body = CompetitionResponse),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn get_competition(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let competition = services::get_competition(db.pool(), id)
        .await?
        .ok_or(WebError::NotFound)?;

    Ok(Json(CompetitionResponse::from(competition)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions",
    request_body = SaveCompetitionRequest,
    responses(
        (status = 201, description = "Competition created", body = CompetitionResponse),
        (status = 200, description = "Competition updated", body = CompetitionResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Competition to update not found")
    ),
    tag = "competitions"
)]
pub async fn save_competition(
    State(db): State<Database>,
    Json(req): Json<SaveCompetitionRequest>,
) -> Result<Response, WebError> {
    save(&db, req).await
}

#[utoipa::path(
    put,
    path = "/api/competitions/{id}",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    request_body = SaveCompetitionRequest,
    responses(
        (status = 200, description = "Competition updated", body = CompetitionResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn update_competition(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(mut req): Json<SaveCompetitionRequest>,
) -> Result<Response, WebError> {
    req.competition_id = Some(id);
    save(&db, req).await
}

#[utoipa::path(
    delete,
    path = "/api/competitions/{id}",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    responses(
        (status = 204, description = "Competition deleted, or did not exist"),
        (status = 409, description = "Athletes are registered to the competition")
    ),
    tag = "competitions"
)]
pub async fn delete_competition(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    if services::delete_competition(db.pool(), id).await? {
        tracing::info!(competition_id = %id, "Competition deleted");
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/competitions/{id}/dependents",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Registration count for the competition", body = DependentsResponse)
    ),
    tag = "competitions"
)]
pub async fn get_competition_dependents(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<DependentsResponse>, WebError> {
    let dependents = services::competition_dependents(db.pool(), id).await?;

    Ok(Json(dependents))
}

async fn save(db: &Database, req: SaveCompetitionRequest) -> Result<Response, WebError> {
    let draft = req.into_draft()?;

    match services::save_competition(db.pool(), &draft).await? {
        SaveOutcome::Created(competition) => {
            tracing::info!(competition_id = %competition.competition_id, "Competition created");
            Ok((
                StatusCode::CREATED,
                Json(CompetitionResponse::from(competition)),
            )
                .into_response())
        }
        SaveOutcome::Updated(competition) => {
            tracing::info!(competition_id = %competition.competition_id, "Competition updated");
            Ok(Json(CompetitionResponse::from(competition)).into_response())
        }
        SaveOutcome::NotFound(_) => Err(WebError::NotFound),
    }
}
