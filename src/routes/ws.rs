//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{error, info, instrument};

use crate::logic::*;
use crate::protocol::{ClientWsMessage, SelectResult, ServerWsMessage, SubmitResult};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "admin_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "admin_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => handle_client_ws(incoming, &state).await,
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) })
            .to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "admin_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => {
        let _ = socket.send(Message::Pong(payload)).await;
      }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "admin_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(msg, state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::ListProblems => {
      let problems = list_problems(state).await;
      info!(target: "editor", count = problems.len(), "WS problem list served");
      ServerWsMessage::ProblemList { problems }
    }

    ClientWsMessage::SelectProblem { problem_id } => {
      match select_problem(state, &problem_id).await {
        SelectResult::Opened { session_token, problem_id, draft } => {
          ServerWsMessage::EditOpened { session_token, problem_id, draft }
        }
        SelectResult::Busy { message } => ServerWsMessage::Busy { message },
        SelectResult::Failed { message } => ServerWsMessage::Error { message },
      }
    }

    ClientWsMessage::GetDraft { session_token } => match state.get_session(&session_token).await {
      Some(session) => ServerWsMessage::Draft {
        session_token: session.token,
        problem_id: session.problem_id,
        draft: session.draft,
      },
      None => ServerWsMessage::Error { message: "No edit session for this token.".into() },
    },

    ClientWsMessage::SubmitDraft { session_token, draft } => {
      match submit_draft(state, &session_token, draft).await {
        SubmitResult::Updated { message, problems } => {
          ServerWsMessage::Updated { message, problems }
        }
        SubmitResult::Invalid { errors } => ServerWsMessage::ValidationFailed { errors },
        SubmitResult::Busy { message } => ServerWsMessage::Busy { message },
        SubmitResult::UnknownSession { message } | SubmitResult::Failed { message } => {
          ServerWsMessage::Error { message }
        }
      }
    }

    ClientWsMessage::CancelEdit { session_token } => {
      if cancel_edit(state, &session_token).await {
        ServerWsMessage::EditCancelled
      } else {
        ServerWsMessage::Error { message: "No edit session for this token.".into() }
      }
    }
  }
}
