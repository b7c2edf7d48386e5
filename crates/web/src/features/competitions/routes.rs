use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{
    delete_competition, get_competition, get_competition_dependents, list_competitions,
    save_competition, update_competition,
};
use super::pages::{
    confirm_delete_page, delete_page, edit_page, index, list_page, new_page, save_page,
};

/// JSON API, nested under `/api/competitions`
pub fn api_routes() -> Router<Database> {
    Router::new()
        .route("/", get(list_competitions).post(save_competition))
        .route(
            "/:id",
            get(get_competition)
                .put(update_competition)
                .delete(delete_competition),
        )
        .route("/:id/dependents", get(get_competition_dependents))
}

/// Server-rendered competition screen
pub fn page_routes() -> Router<Database> {
    Router::new()
        .route("/", get(index))
        .route("/competitions", get(list_page).post(save_page))
        .route("/competitions/new", get(new_page))
        .route("/competitions/:id/edit", get(edit_page))
        .route(
            "/competitions/:id/delete",
            get(delete_page).post(confirm_delete_page),
        )
}
