use std::sync::Arc;

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use log::{debug, error, warn};

use crate::{error::ClassifyErr, state::AppState};

/// Body of every failed classification.
pub const ERROR_BODY: &str = "Error";

/// Query pairs of `/classify`, kept in order so a repeated key resolves to its first value.
type QueryPairs = Vec<(String, String)>;

/// The first value of `name`: bill length `blmm`, bill depth `bdmm`, flipper length `flmm` or
/// body mass `bmg`.
fn required<'a>(
    pairs: &'a [(String, String)],
    name: &'static str,
) -> Result<&'a str, ClassifyErr> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .ok_or(ClassifyErr::MissingParam(name))
}

pub async fn home(State(state): State<Arc<AppState>>) -> Response {
    match state.templates.home() {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            error!("failed to render the landing page: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Reads the measurements from the query string, whatever the method, and renders the predicted
/// species. Every failure answers `200 Error`.
pub async fn classify(
    State(state): State<Arc<AppState>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Response {
    match try_classify(&state, query) {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            warn!("classification failed: {e}");
            (StatusCode::OK, ERROR_BODY).into_response()
        }
    }
}

fn try_classify(
    state: &AppState,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<String, ClassifyErr> {
    let Query(pairs) = query.map_err(|e| ClassifyErr::BadQuery(e.body_text()))?;

    let variety = state.classifier.classify(
        required(&pairs, "blmm")?,
        required(&pairs, "bdmm")?,
        required(&pairs, "flmm")?,
        required(&pairs, "bmg")?,
    )?;
    debug!(variety = variety; "classified");

    Ok(state.templates.output(variety)?)
}
