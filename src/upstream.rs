//! HTTP client for the problem service.
//!
//! The editor only needs three calls: list all problems, fetch one problem's
//! admin-scoped detail, and write an updated draft back. Calls are
//! instrumented and log status, latencies, and sizes (not full payloads).

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{error, info, instrument};

use crate::domain::{ProblemDetail, ProblemDraft, ProblemSummary};
use crate::util::trunc_for_log;

const DEFAULT_BASE_URL: &str = "http://localhost:3001";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Clone)]
pub struct Upstream {
  pub client: reqwest::Client,
  pub base_url: String,
}

impl Upstream {
  /// Construct the client from UPSTREAM_BASE_URL / UPSTREAM_TIMEOUT_SECS,
  /// with localhost defaults.
  pub fn from_env() -> Result<Self, String> {
    let base_url = std::env::var("UPSTREAM_BASE_URL")
      .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
      .trim_end_matches('/')
      .to_string();
    let timeout = std::env::var("UPSTREAM_TIMEOUT_SECS")
      .ok()
      .and_then(|s| s.parse::<u64>().ok())
      .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout))
      .build()
      .map_err(|e| format!("building upstream HTTP client: {e}"))?;

    Ok(Self { client, base_url })
  }

  /// Fetch every problem summary.
  #[instrument(level = "info", skip(self))]
  pub async fn list_problems(&self) -> Result<Vec<ProblemSummary>, String> {
    let url = format!("{}/problem/getAllProblem", self.base_url);
    let start = std::time::Instant::now();
    let res = self
      .client
      .get(&url)
      .header(USER_AGENT, "judgeboard-backend/0.1")
      .send()
      .await
      .map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      error!(target: "editor", %status, body = %trunc_for_log(&body, 200), "List fetch rejected by upstream");
      return Err(upstream_error_message(status, &body));
    }

    let list: Vec<ProblemSummary> = res.json().await.map_err(|e| e.to_string())?;
    info!(target: "editor", count = list.len(), elapsed = ?start.elapsed(), "Problem list fetched");
    Ok(list)
  }

  /// Fetch one problem's full admin-scoped detail.
  #[instrument(level = "info", skip(self), fields(%problem_id))]
  pub async fn problem_detail(&self, problem_id: &str) -> Result<ProblemDetail, String> {
    let url = format!("{}/problem/problemById/{}/admin", self.base_url, problem_id);
    let start = std::time::Instant::now();
    let res = self
      .client
      .get(&url)
      .header(USER_AGENT, "judgeboard-backend/0.1")
      .send()
      .await
      .map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      error!(target: "editor", %problem_id, %status, body = %trunc_for_log(&body, 200), "Detail fetch rejected by upstream");
      return Err(upstream_error_message(status, &body));
    }

    let detail: ProblemDetail = res.json().await.map_err(|e| e.to_string())?;
    info!(target: "editor", %problem_id, elapsed = ?start.elapsed(), "Problem detail fetched");
    Ok(detail)
  }

  /// Write a validated draft back. One PUT, no retry.
  #[instrument(level = "info", skip(self, draft), fields(%problem_id, title_len = draft.title.len()))]
  pub async fn update_problem(&self, problem_id: &str, draft: &ProblemDraft) -> Result<(), String> {
    let url = format!("{}/problem/update/{}", self.base_url, problem_id);
    let start = std::time::Instant::now();
    let res = self
      .client
      .put(&url)
      .header(USER_AGENT, "judgeboard-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .json(draft)
      .send()
      .await
      .map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      error!(target: "editor", %problem_id, %status, body = %trunc_for_log(&body, 200), "Update rejected by upstream");
      return Err(upstream_error_message(status, &body));
    }

    info!(target: "editor", %problem_id, elapsed = ?start.elapsed(), "Problem updated upstream");
    Ok(())
  }
}

/// Best-effort extraction of a human-readable message from an upstream error
/// body. Priority: structured `message` field, then the raw body text, then
/// a generic HTTP-status fallback. Transport errors never reach this point;
/// they are stringified at the call site.
pub fn upstream_error_message(status: StatusCode, body: &str) -> String {
  if let Some(msg) = extract_message_field(body) {
    return msg;
  }
  let trimmed = body.trim();
  if !trimmed.is_empty() {
    // Some backends answer with a bare JSON-quoted string.
    if let Ok(serde_json::Value::String(s)) = serde_json::from_str::<serde_json::Value>(trimmed) {
      return s;
    }
    return trimmed.to_string();
  }
  format!("upstream returned HTTP {status}")
}

fn extract_message_field(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct MsgBody {
    message: String,
  }
  serde_json::from_str::<MsgBody>(body).ok().map(|b| b.message)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn structured_message_field_wins() {
    let msg = upstream_error_message(
      StatusCode::BAD_REQUEST,
      r#"{"message":"title already taken","code":409}"#,
    );
    assert_eq!(msg, "title already taken");
  }

  #[test]
  fn plain_string_body_is_used_verbatim() {
    let msg = upstream_error_message(StatusCode::INTERNAL_SERVER_ERROR, "database is down");
    assert_eq!(msg, "database is down");
  }

  #[test]
  fn json_quoted_string_body_is_unquoted() {
    let msg = upstream_error_message(StatusCode::BAD_REQUEST, r#""bad tags value""#);
    assert_eq!(msg, "bad tags value");
  }

  #[test]
  fn empty_body_falls_back_to_status() {
    let msg = upstream_error_message(StatusCode::BAD_GATEWAY, "   ");
    assert_eq!(msg, "upstream returned HTTP 502 Bad Gateway");
  }
}
