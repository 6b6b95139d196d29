//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Difficulty, ProblemDraft, ProblemSummary, Tag};

/// Messages the admin frontend can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    ListProblems,
    SelectProblem {
        #[serde(rename = "problemId")]
        problem_id: String,
    },
    GetDraft {
        #[serde(rename = "sessionToken")]
        session_token: String,
    },
    SubmitDraft {
        #[serde(rename = "sessionToken")]
        session_token: String,
        draft: ProblemDraft,
    },
    CancelEdit {
        #[serde(rename = "sessionToken")]
        session_token: String,
    },
}

/// Messages the server sends back over WebSocket. This is the structured
/// result channel: every outcome (success, validation failure, busy,
/// upstream error) is a tagged message, never free-form text.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    ProblemList {
        problems: Vec<ProblemSummaryOut>,
    },
    EditOpened {
        #[serde(rename = "sessionToken")]
        session_token: String,
        #[serde(rename = "problemId")]
        problem_id: String,
        draft: ProblemDraft,
    },
    Draft {
        #[serde(rename = "sessionToken")]
        session_token: String,
        #[serde(rename = "problemId")]
        problem_id: String,
        draft: ProblemDraft,
    },
    Updated {
        message: String,
        problems: Vec<ProblemSummaryOut>,
    },
    ValidationFailed {
        errors: Vec<FieldError>,
    },
    Busy {
        message: String,
    },
    EditCancelled,
    Error {
        message: String,
    },
}

/// Field-level validation failure surfaced to the admin form.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Outcome of selecting a problem for editing.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SelectResult {
    Opened {
        #[serde(rename = "sessionToken")]
        session_token: String,
        #[serde(rename = "problemId")]
        problem_id: String,
        draft: ProblemDraft,
    },
    Busy { message: String },
    Failed { message: String },
}

/// Outcome of submitting a draft.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitResult {
    /// Upstream accepted the update; the session is closed and the fresh
    /// list is included so the frontend can return to the list view.
    Updated {
        message: String,
        problems: Vec<ProblemSummaryOut>,
    },
    /// Schema validation blocked the submit; no upstream call was made.
    Invalid { errors: Vec<FieldError> },
    Busy { message: String },
    UnknownSession { message: String },
    Failed { message: String },
}

/// DTO used by both WS and HTTP for list rows.
#[derive(Clone, Debug, Serialize)]
pub struct ProblemSummaryOut {
    pub id: String,
    pub title: String,
    pub difficulty: Option<Difficulty>,
    pub tags: Option<Tag>,
}

/// Convert an upstream summary to the public DTO.
pub fn to_out(p: &ProblemSummary) -> ProblemSummaryOut {
    ProblemSummaryOut {
        id: p.id.clone(),
        title: p.title.clone(),
        difficulty: p.difficulty,
        tags: p.tags,
    }
}

//
// HTTP response DTOs
//

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ProblemListOut {
    pub problems: Vec<ProblemSummaryOut>,
}

#[derive(Serialize)]
pub struct DraftOut {
    #[serde(rename = "sessionToken")]
    pub session_token: String,
    #[serde(rename = "problemId")]
    pub problem_id: String,
    pub draft: ProblemDraft,
}

#[derive(Serialize)]
pub struct CancelOut {
    pub cancelled: bool,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub message: String,
}
