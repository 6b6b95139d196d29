//! Core editor behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Seeding an edit draft from an upstream detail response
//!   - Schema validation of drafts (blocks submission before any network I/O)
//!   - Selecting a problem (detail fetch + session open, de-duplicated)
//!   - Submitting a draft (upstream write, session close, list refresh)

use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::config::FormDefaults;
use crate::domain::{ProblemDetail, ProblemDraft};
use crate::protocol::{to_out, FieldError, ProblemSummaryOut, SelectResult, SubmitResult};
use crate::state::AppState;
use crate::templates::{
  normalize_reference_solution, normalize_start_code, placeholder_visible_case,
  scaffold_reference_solution, scaffold_start_code,
};

/// Build a fresh draft from an upstream detail response, substituting the
/// documented default for every absent field: empty text, easy difficulty,
/// the array tag, one placeholder visible case, no hidden cases, and the
/// three-language scaffolds.
pub fn seed_draft(detail: ProblemDetail, defaults: &FormDefaults) -> ProblemDraft {
  ProblemDraft {
    title: detail.title.unwrap_or_default(),
    description: detail.description.unwrap_or_default(),
    difficulty: detail.difficulty.unwrap_or_default(),
    tags: detail.tags.unwrap_or_default(),
    visible_test_cases: detail
      .visible_test_cases
      .unwrap_or_else(|| vec![placeholder_visible_case(defaults)]),
    hidden_test_cases: detail.hidden_test_cases.unwrap_or_default(),
    start_code: match detail.start_code {
      Some(stubs) => normalize_start_code(stubs, defaults),
      None => scaffold_start_code(defaults),
    },
    reference_solution: match detail.reference_solution {
      Some(entries) => normalize_reference_solution(entries, defaults),
      None => scaffold_reference_solution(defaults),
    },
  }
}

/// Synchronous schema check of a draft. An Err blocks submission and never
/// reaches the network layer. Enum-typed fields (difficulty, tags,
/// languages) are already constrained at the protocol boundary.
pub fn validate_draft(draft: &ProblemDraft) -> Result<(), Vec<FieldError>> {
  match draft.validate() {
    Ok(()) => Ok(()),
    Err(errs) => {
      let mut out: Vec<FieldError> = Vec::new();
      for (field, errors) in errs.field_errors() {
        for e in errors {
          let message = e
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("{field} is invalid"));
          out.push(FieldError { field: field.to_string(), message });
        }
      }
      out.sort_by(|a, b| a.field.cmp(&b.field));
      Err(out)
    }
  }
}

/// Shape-normalize the scaffold lists just before the upstream write, so
/// the service always receives one entry per language in canonical order.
pub fn finalize_draft(mut draft: ProblemDraft, defaults: &FormDefaults) -> ProblemDraft {
  draft.start_code = normalize_start_code(draft.start_code, defaults);
  draft.reference_solution = normalize_reference_solution(draft.reference_solution, defaults);
  draft
}

/// User-facing rendering of an upstream or transport failure.
pub fn user_error(detail: &str) -> String {
  format!("Error: {detail}")
}

/// Fetch and return the problem list. Failures degrade to an empty list.
#[instrument(level = "info", skip(state))]
pub async fn list_problems(state: &AppState) -> Vec<ProblemSummaryOut> {
  state.fetch_problems().await.iter().map(to_out).collect()
}

/// Fetch a problem's detail and open an edit session for it. A second
/// select for the same problem while one is in flight is rejected as busy.
#[instrument(level = "info", skip(state), fields(%problem_id))]
pub async fn select_problem(state: &AppState, problem_id: &str) -> SelectResult {
  // The guard's Drop releases the claim even if this future is cancelled
  // mid-fetch by a client disconnect.
  let op = format!("select:{problem_id}");
  let Some(_claim) = state.begin_op(&op) else {
    warn!(target: "editor", %problem_id, "Duplicate select while fetch in flight; rejected");
    return SelectResult::Busy {
      message: "This problem is already being fetched.".into(),
    };
  };
  let fetched = state.upstream.problem_detail(problem_id).await;

  match fetched {
    Ok(detail) => {
      let draft = seed_draft(detail, &state.defaults);
      let session = state.open_session(problem_id, draft).await;
      info!(
        target: "editor",
        %problem_id,
        token = %session.token,
        difficulty = %session.draft.difficulty,
        tags = %session.draft.tags,
        "Edit session opened"
      );
      SelectResult::Opened {
        session_token: session.token,
        problem_id: session.problem_id,
        draft: session.draft,
      }
    }
    Err(e) => {
      error!(target: "editor", %problem_id, error = %e, "Detail fetch failed; staying on list view");
      SelectResult::Failed { message: user_error(&e) }
    }
  }
}

/// Validate and submit a draft. On success the session is closed and the
/// list re-fetched; on any failure the session keeps the submitted draft so
/// the admin can retry without re-entering data.
#[instrument(level = "info", skip(state, draft), fields(%token, title_len = draft.title.len()))]
pub async fn submit_draft(state: &AppState, token: &str, draft: ProblemDraft) -> SubmitResult {
  let Some(session) = state.get_session(token).await else {
    warn!(target: "editor", %token, "Submit for unknown session token");
    return SubmitResult::UnknownSession {
      message: "No edit session for this token. Select the problem again.".into(),
    };
  };

  // Keep whatever the admin last typed, pass or fail.
  state.stash_draft(token, &draft).await;

  if let Err(errors) = validate_draft(&draft) {
    info!(target: "editor", %token, fields = errors.len(), "Draft blocked by validation");
    return SubmitResult::Invalid { errors };
  }

  // Same cancellation-safe claim as in select_problem.
  let op = format!("submit:{token}");
  let Some(_claim) = state.begin_op(&op) else {
    warn!(target: "editor", %token, "Duplicate submit while one is in flight; rejected");
    return SubmitResult::Busy {
      message: "This draft is already being submitted.".into(),
    };
  };
  let draft = finalize_draft(draft, &state.defaults);
  let sent = state.upstream.update_problem(&session.problem_id, &draft).await;

  match sent {
    Ok(()) => {
      state.close_session(token).await;
      let problems = list_problems(state).await;
      info!(target: "editor", problem_id = %session.problem_id, "Update accepted; back to list view");
      SubmitResult::Updated {
        message: "Problem updated successfully.".into(),
        problems,
      }
    }
    Err(e) => {
      error!(target: "editor", problem_id = %session.problem_id, error = %e, "Update failed; session preserved");
      SubmitResult::Failed { message: user_error(&e) }
    }
  }
}

/// Drop an edit session without submitting. Returns whether it existed.
#[instrument(level = "info", skip(state), fields(%token))]
pub async fn cancel_edit(state: &AppState, token: &str) -> bool {
  let existed = state.close_session(token).await;
  if existed {
    info!(target: "editor", %token, "Edit cancelled; back to list view");
  }
  existed
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Difficulty, HiddenCase, Language, Tag, VisibleCase};
  use crate::state::AppState;
  use crate::upstream::Upstream;

  fn offline_state() -> AppState {
    // Discard port: any accidental network call in these tests would fail
    // loudly instead of succeeding silently.
    let upstream = Upstream {
      client: reqwest::Client::new(),
      base_url: "http://127.0.0.1:9".into(),
    };
    AppState::new(upstream)
  }

  /// State whose upstream accepts TCP connections (listener backlog) but
  /// never answers, so every request stalls until the client timeout.
  /// Keep the returned listener alive for the duration of the test.
  async fn stalled_state(client_timeout: std::time::Duration) -> (AppState, tokio::net::TcpListener) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let client = reqwest::Client::builder()
      .timeout(client_timeout)
      .build()
      .unwrap();
    (AppState::new(Upstream { client, base_url }), listener)
  }

  fn valid_draft() -> ProblemDraft {
    ProblemDraft {
      title: "Two Sum".into(),
      description: "Classic.".into(),
      difficulty: Difficulty::Easy,
      tags: Tag::Array,
      visible_test_cases: vec![VisibleCase {
        input: "[2,7] 9".into(),
        output: "[0,1]".into(),
        explanation: Some("2+7=9".into()),
      }],
      hidden_test_cases: vec![HiddenCase { input: "[1,1] 2".into(), output: "[0,1]".into() }],
      start_code: vec![],
      reference_solution: vec![],
    }
  }

  #[test]
  fn seeding_an_empty_detail_yields_the_documented_defaults() {
    let defaults = FormDefaults::default();
    let draft = seed_draft(ProblemDetail::default(), &defaults);

    assert_eq!(draft.title, "");
    assert_eq!(draft.description, "");
    assert_eq!(draft.difficulty, Difficulty::Easy);
    assert_eq!(draft.tags, Tag::Array);
    assert_eq!(draft.visible_test_cases.len(), 1);
    assert!(draft.hidden_test_cases.is_empty());
    assert_eq!(draft.start_code.len(), 3);
    assert!(draft.start_code.iter().all(|s| s.initial_code.is_empty()));
    assert_eq!(draft.reference_solution.len(), 3);
    assert!(draft.reference_solution.iter().all(|s| s.complete_code.is_empty()));
  }

  #[test]
  fn seeding_keeps_present_fields_and_fills_scaffold_gaps() {
    let defaults = FormDefaults::default();
    let detail: ProblemDetail = serde_json::from_str(
      r#"{
        "_id": "p9",
        "title": "Reverse List",
        "description": "Reverse a singly linked list.",
        "difficulty": "medium",
        "tags": "linkedList",
        "visibleTestCases": [{"input": "1->2", "output": "2->1"}],
        "startCode": [{"language": "Java", "initialCode": "class Solution {}"}]
      }"#,
    )
    .unwrap();

    let draft = seed_draft(detail, &defaults);
    assert_eq!(draft.title, "Reverse List");
    assert_eq!(draft.difficulty, Difficulty::Medium);
    assert_eq!(draft.tags, Tag::LinkedList);
    // hiddenTestCases was absent: empty sequence, not an error.
    assert!(draft.hidden_test_cases.is_empty());
    // The single Java stub is kept and the other two languages are filled.
    assert_eq!(draft.start_code.len(), 3);
    assert_eq!(draft.start_code[0].language, Language::Cpp);
    assert_eq!(draft.start_code[1].initial_code, "class Solution {}");
    assert_eq!(draft.start_code[2].language, Language::JavaScript);
  }

  #[test]
  fn validation_flags_each_failing_field() {
    let mut draft = valid_draft();
    draft.title.clear();
    draft.description.clear();
    draft.visible_test_cases.clear();

    let errors = validate_draft(&draft).unwrap_err();
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["description", "title", "visible_test_cases"]);
    assert!(errors.iter().any(|e| e.message == "Title is required"));
    assert!(errors
      .iter()
      .any(|e| e.message == "At least one visible test case is required"));
  }

  #[test]
  fn validation_accepts_a_complete_draft() {
    assert!(validate_draft(&valid_draft()).is_ok());
  }

  #[test]
  fn finalize_enforces_the_three_language_shape() {
    let defaults = FormDefaults::default();
    let mut draft = valid_draft();
    draft.start_code = vec![crate::domain::CodeStub {
      language: Language::JavaScript,
      initial_code: "function f() {}".into(),
    }];
    let out = finalize_draft(draft, &defaults);
    assert_eq!(out.start_code.len(), 3);
    assert_eq!(out.reference_solution.len(), 3);
    assert_eq!(out.start_code[2].initial_code, "function f() {}");
  }

  #[test]
  fn upstream_failures_render_with_error_prefix() {
    assert_eq!(user_error("title already taken"), "Error: title already taken");
  }

  #[tokio::test]
  async fn invalid_draft_is_blocked_before_any_upstream_call() {
    let state = offline_state();
    let session = state.open_session("p1", valid_draft()).await;

    let mut draft = valid_draft();
    draft.title.clear();
    // The upstream base URL is unroutable; reaching the network would fail
    // with a transport error, not a validation result.
    match submit_draft(&state, &session.token, draft.clone()).await {
      SubmitResult::Invalid { errors } => {
        assert!(errors.iter().any(|e| e.field == "title"));
      }
      other => panic!("expected Invalid, got {other:?}"),
    }
    // The failed draft is preserved for retry.
    assert_eq!(state.get_session(&session.token).await.unwrap().draft.title, "");
  }

  #[tokio::test]
  async fn submit_with_unknown_token_is_rejected() {
    let state = offline_state();
    match submit_draft(&state, "missing", valid_draft()).await {
      SubmitResult::UnknownSession { .. } => {}
      other => panic!("expected UnknownSession, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn cancelled_select_releases_the_in_flight_claim() {
    use std::time::Duration;
    let (state, _listener) = stalled_state(Duration::from_millis(300)).await;

    // Dropping the select future mid-fetch is what a client disconnect
    // does to the axum handler.
    let cancelled =
      tokio::time::timeout(Duration::from_millis(50), select_problem(&state, "p1")).await;
    assert!(cancelled.is_err());

    // A later select of the same problem must run again, not stay busy.
    match select_problem(&state, "p1").await {
      SelectResult::Busy { .. } => panic!("problem stuck busy after a cancelled select"),
      SelectResult::Failed { .. } => {}
      SelectResult::Opened { .. } => panic!("stalled upstream cannot open a session"),
    }
  }

  #[tokio::test]
  async fn overlapping_selects_reject_the_second_as_busy() {
    use std::time::Duration;
    let (state, _listener) = stalled_state(Duration::from_millis(500)).await;

    let first = tokio::spawn({
      let state = state.clone();
      async move { select_problem(&state, "p1").await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    match select_problem(&state, "p1").await {
      SelectResult::Busy { .. } => {}
      other => panic!("expected Busy for the overlapping select, got {other:?}"),
    }
    // The first attempt still runs to completion (here: upstream timeout).
    match first.await.unwrap() {
      SelectResult::Failed { .. } => {}
      other => panic!("expected Failed from the stalled upstream, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn overlapping_submits_reject_the_second_as_busy() {
    use std::time::Duration;
    let (state, _listener) = stalled_state(Duration::from_millis(500)).await;
    let session = state.open_session("p1", valid_draft()).await;

    let first = tokio::spawn({
      let state = state.clone();
      let token = session.token.clone();
      async move { submit_draft(&state, &token, valid_draft()).await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    match submit_draft(&state, &session.token, valid_draft()).await {
      SubmitResult::Busy { .. } => {}
      other => panic!("expected Busy for the overlapping submit, got {other:?}"),
    }
    match first.await.unwrap() {
      SubmitResult::Failed { .. } => {}
      other => panic!("expected Failed from the stalled upstream, got {other:?}"),
    }
    // The failed submit preserves the session for retry.
    assert!(state.get_session(&session.token).await.is_some());
  }

  #[tokio::test]
  async fn cancel_closes_the_session() {
    let state = offline_state();
    let session = state.open_session("p1", valid_draft()).await;
    assert!(cancel_edit(&state, &session.token).await);
    assert!(!cancel_edit(&state, &session.token).await);
    assert!(state.get_session(&session.token).await.is_none());
  }
}
