//! Request handlers.

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::templates;
use super::AppState;
use crate::error::Error;
use crate::filters::{
    parse_date, ComparisonOperator, FilterBehaviour, FilterEdit, FilterName, PickerState,
    Selections,
};
use crate::highlight::{HighlightedResult, ResultBlock};
use crate::query::{DerivedUrl, QueryContext};

/// Error response: HTTP 400 with a JSON message.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(Error::InvalidRequest(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!("Rejected request: {}", self.0);
        let body = serde_json::json!({ "error": self.0.to_string() });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

pub async fn health() -> &'static str {
    "ok"
}

/// Filter panel state as the page reads it.
///
/// Control values arrive as the raw labels the page holds and are parsed
/// after extraction, so unlisted labels surface as [`Error`]s.
#[derive(Debug, Deserialize)]
pub struct FilterLinksRequest {
    /// Query string the results page was rendered with.
    #[serde(default)]
    pub query: String,
    pub behaviour: String,
    pub filter: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub comparison: Option<String>,
    #[serde(default)]
    pub date_comparison: Option<String>,
    /// Wire names read from the rendered remove controls. When absent,
    /// links are built for every filter applied in `query`.
    #[serde(default)]
    pub remove: Option<Vec<String>>,
}

impl FilterLinksRequest {
    fn selections(&self) -> crate::error::Result<Selections> {
        let comparison = |label: &Option<String>| {
            label
                .as_deref()
                .map(str::parse::<ComparisonOperator>)
                .transpose()
        };
        Ok(Selections {
            value: self.value.clone(),
            date: self.date.as_deref().map(parse_date).transpose()?,
            comparison: comparison(&self.comparison)?,
            date_comparison: comparison(&self.date_comparison)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct FilterLinksResponse {
    pub apply: DerivedUrl,
    pub remove: BTreeMap<String, DerivedUrl>,
    pub picker: PickerView,
}

/// Visibility flags for the picker controls.
#[derive(Debug, Serialize)]
pub struct PickerView {
    pub state: &'static str,
    pub filter: Option<FilterName>,
    pub generic_comparison: bool,
    pub date_comparison: bool,
    pub clear_comparisons: bool,
}

impl From<PickerState> for PickerView {
    fn from(state: PickerState) -> Self {
        Self {
            state: state.label(),
            filter: state.active_value_picker(),
            generic_comparison: state.shows_generic_comparison(),
            date_comparison: state.shows_date_comparison(),
            clear_comparisons: state.clears_comparisons(),
        }
    }
}

pub async fn filter_links(
    State(state): State<AppState>,
    payload: Result<Json<FilterLinksRequest>, JsonRejection>,
) -> Result<Json<FilterLinksResponse>, ApiError> {
    let Json(request) = payload?;
    let context = QueryContext::parse(&request.query)?;
    let behaviour: FilterBehaviour = request.behaviour.parse()?;
    let filter: FilterName = request.filter.parse()?;
    let edit = FilterEdit::from_selections(behaviour, filter, &request.selections()?)?;

    let apply = state.links.apply(&context, &edit);
    let remove = match request.remove {
        Some(names) => names
            .into_iter()
            .map(|name| {
                let url = state.links.remove(&context, &name);
                (name, url)
            })
            .collect(),
        None => state
            .links
            .remove_all(&context)
            .into_iter()
            .map(|(applied, url)| (applied.filter.wire_name().to_string(), url))
            .collect(),
    };

    Ok(Json(FilterLinksResponse {
        apply,
        remove,
        picker: PickerState::for_selection(behaviour, filter).into(),
    }))
}

pub async fn filter_panel(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let context = QueryContext::parse(query.as_deref().unwrap_or(""))?;
    let chips = state.links.remove_all(&context);
    let html = templates::filter_chips(&chips);
    Ok(([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response())
}

#[derive(Debug, Deserialize)]
pub struct HighlightRequest {
    pub results: Vec<ResultBlock>,
    pub id: String,
    #[serde(default)]
    pub terms: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HighlightResponse {
    pub result: Option<HighlightedResult>,
    /// Rendered result block, when a result matched.
    pub html: Option<String>,
}

pub async fn highlight_result(
    State(state): State<AppState>,
    payload: Result<Json<HighlightRequest>, JsonRejection>,
) -> Result<Json<HighlightResponse>, ApiError> {
    let Json(request) = payload?;
    let result = state
        .highlighter
        .highlight_result(&request.results, &request.id, &request.terms);
    let html = result.as_ref().map(templates::result_block);
    Ok(Json(HighlightResponse { result, html }))
}
