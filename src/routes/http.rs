//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};

use crate::domain::ProblemDraft;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_problems(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let problems = list_problems(&state).await;
  info!(target: "editor", count = problems.len(), "HTTP problem list served");
  Json(ProblemListOut { problems })
}

#[instrument(level = "info", skip(state), fields(%problem_id))]
pub async fn http_select_problem(
  State(state): State<Arc<AppState>>,
  Path(problem_id): Path<String>,
) -> impl IntoResponse {
  let result = select_problem(&state, &problem_id).await;
  let status = match &result {
    SelectResult::Opened { .. } => StatusCode::OK,
    SelectResult::Busy { .. } => StatusCode::CONFLICT,
    SelectResult::Failed { .. } => StatusCode::BAD_GATEWAY,
  };
  (status, Json(result))
}

#[instrument(level = "info", skip(state), fields(%token))]
pub async fn http_get_draft(
  State(state): State<Arc<AppState>>,
  Path(token): Path<String>,
) -> impl IntoResponse {
  match state.get_session(&token).await {
    Some(session) => Json(DraftOut {
      session_token: session.token,
      problem_id: session.problem_id,
      draft: session.draft,
    })
    .into_response(),
    None => (
      StatusCode::NOT_FOUND,
      Json(ErrorOut { message: "No edit session for this token.".into() }),
    )
      .into_response(),
  }
}

#[instrument(level = "info", skip(state, draft), fields(%token, title_len = draft.title.len()))]
pub async fn http_submit_draft(
  State(state): State<Arc<AppState>>,
  Path(token): Path<String>,
  Json(draft): Json<ProblemDraft>,
) -> impl IntoResponse {
  let result = submit_draft(&state, &token, draft).await;
  let status = match &result {
    SubmitResult::Updated { .. } => StatusCode::OK,
    SubmitResult::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    SubmitResult::Busy { .. } => StatusCode::CONFLICT,
    SubmitResult::UnknownSession { .. } => StatusCode::NOT_FOUND,
    SubmitResult::Failed { .. } => StatusCode::BAD_GATEWAY,
  };
  (status, Json(result))
}

#[instrument(level = "info", skip(state), fields(%token))]
pub async fn http_cancel_edit(
  State(state): State<Arc<AppState>>,
  Path(token): Path<String>,
) -> impl IntoResponse {
  let cancelled = cancel_edit(&state, &token).await;
  Json(CancelOut { cancelled })
}
