//! Axum handlers for the web form and the JSON analysis endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Form, Json,
};
use serde::Deserialize;
use tracing::info;

use crate::analysis::analyzer::{AnalysisInput, MatchResult};
use crate::errors::AppError;
use crate::render::{form_page, FormView, BLANK_FIELDS_NOTICE};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub job: String,
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// GET /
///
/// Empty form.
pub async fn handle_form() -> Html<String> {
    Html(form_page("", "", None, None))
}

/// POST /analyze
///
/// Form submission. Both fields are required; the page is re-rendered with
/// the submitted text so nothing is lost on a blank field.
pub async fn handle_form_submit(
    State(state): State<AppState>,
    Form(form): Form<AnalyzeForm>,
) -> Html<String> {
    if is_blank(&form.resume) || is_blank(&form.job) {
        return Html(form_page(
            &form.resume,
            &form.job,
            None,
            Some(BLANK_FIELDS_NOTICE),
        ));
    }

    info!(
        "Form analysis: resume={} bytes, job={} bytes",
        form.resume.len(),
        form.job.len()
    );
    let result = state.analyzer.analyze(&form.resume, &form.job).await;
    let view = FormView::from_result(&result);

    Html(form_page(&form.resume, &form.job, Some(&view), None))
}

/// POST /api/v1/analyze
///
/// Returns the full `MatchResult`, including the raw LLM text. Blank texts
/// are analyzed like any other input and give a zero score with empty lists;
/// only an unreadable body is rejected.
pub async fn handle_analyze_json(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisInput>, JsonRejection>,
) -> Result<Json<MatchResult>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    Ok(Json(state.analyzer.analyze_input(&request).await))
}
