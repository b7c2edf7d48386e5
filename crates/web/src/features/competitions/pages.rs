use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use storage::{Database, dto::competition::SaveCompetitionRequest};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

use super::view::{
    render::render,
    screen::{CompetitionScreen, DELETED_MESSAGE, Dialog, Notice, SAVED_MESSAGE},
};

/// Success notice carried across the redirect that follows a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flash {
    Saved,
    Deleted,
}

impl Flash {
    fn notice(self) -> Notice {
        match self {
            Self::Saved => Notice::success(SAVED_MESSAGE),
            Self::Deleted => Notice::success(DELETED_MESSAGE),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub flash: Option<Flash>,
}

/// Raw `application/x-www-form-urlencoded` body of the competition form
#[derive(Debug, Default, Deserialize)]
pub struct CompetitionFormInput {
    #[serde(default)]
    pub competition_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub competition_date: String,
    #[serde(default)]
    pub location: String,
}

impl CompetitionFormInput {
    /// Bind the submitted fields onto a save request. An unparseable date is
    /// treated as missing so it surfaces as a field error.
    pub fn into_request(self) -> WebResult<SaveCompetitionRequest> {
        let competition_id = match self.competition_id.trim() {
            "" => None,
            id => Some(
                Uuid::parse_str(id)
                    .map_err(|_| WebError::BadRequest("Invalid competition id".to_string()))?,
            ),
        };

        let competition_date =
            NaiveDate::parse_from_str(self.competition_date.trim(), "%Y-%m-%d").ok();

        Ok(SaveCompetitionRequest {
            competition_id,
            name: self.name,
            competition_date,
            location: Some(self.location),
        })
    }
}

pub async fn index() -> Redirect {
    Redirect::to("/competitions")
}

pub async fn list_page(
    State(db): State<Database>,
    Query(query): Query<ListQuery>,
) -> Html<String> {
    let mut screen = CompetitionScreen::load(&db).await;
    if screen.notice.is_none() {
        screen.notice = query.flash.map(Flash::notice);
    }

    Html(render(&screen))
}

pub async fn new_page(State(db): State<Database>) -> Html<String> {
    let mut screen = CompetitionScreen::load(&db).await;
    screen.open_new();

    Html(render(&screen))
}

pub async fn edit_page(State(db): State<Database>, Path(id): Path<Uuid>) -> Html<String> {
    let mut screen = CompetitionScreen::load(&db).await;
    screen.open_edit(id);

    Html(render(&screen))
}

pub async fn save_page(
    State(db): State<Database>,
    Form(input): Form<CompetitionFormInput>,
) -> WebResult<Response> {
    let request = input.into_request()?;

    let mut screen = CompetitionScreen::load(&db).await;
    if screen.save(&db, request).await {
        return Ok(Redirect::to("/competitions?flash=saved").into_response());
    }

    Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(render(&screen))).into_response())
}

pub async fn delete_page(State(db): State<Database>, Path(id): Path<Uuid>) -> Html<String> {
    let mut screen = CompetitionScreen::load(&db).await;
    screen.request_delete(&db, id).await;

    Html(render(&screen))
}

/// Runs the dependency check again before deleting.
pub async fn confirm_delete_page(State(db): State<Database>, Path(id): Path<Uuid>) -> Response {
    let mut screen = CompetitionScreen::load(&db).await;
    screen.request_delete(&db, id).await;

    if matches!(screen.dialog, Some(Dialog::ConfirmDelete(_))) && screen.confirm_delete(&db).await
    {
        return Redirect::to("/competitions?flash=deleted").into_response();
    }

    let status = match &screen.dialog {
        Some(Dialog::DeleteBlocked(_)) => StatusCode::CONFLICT,
        _ => StatusCode::OK,
    };

    (status, Html(render(&screen))).into_response()
}
