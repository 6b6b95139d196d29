//! Application state: edit sessions, in-flight guards, the upstream client,
//! and form defaults.
//!
//! This module owns:
//!   - edit sessions keyed by token (one per problem being edited)
//!   - the in-flight set that rejects duplicate select/submit attempts
//!
//! The upstream problem service stays the sole source of truth; the list is
//! re-fetched on every read and everything held here is discardable.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::{load_admin_config_from_env, FormDefaults};
use crate::domain::{ProblemDraft, ProblemSummary};
use crate::upstream::Upstream;

/// Sessions abandoned by closed tabs are evicted least-recently-touched
/// once this many are open.
const MAX_SESSIONS: usize = 64;

/// One problem open for editing. Created on select, dropped on cancel,
/// after a successful update, or by cap eviction. The stored draft is
/// whatever the admin last submitted, so a failed submit can be retried
/// without re-entering data.
#[derive(Clone, Debug)]
pub struct EditSession {
    pub token: String,
    pub problem_id: String,
    pub draft: ProblemDraft,
    touched_at: Instant,
}

/// Exclusive claim on one in-flight operation. Removing the key lives in
/// `Drop` so a handler future cancelled mid-await (client disconnect)
/// still releases the claim.
pub struct OpGuard {
    set: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for OpGuard {
    fn drop(&mut self) {
        if let Ok(mut set) = self.set.lock() {
            set.remove(&self.key);
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<String, EditSession>>>,
    in_flight: Arc<Mutex<HashSet<String>>>,
    pub upstream: Upstream,
    pub defaults: FormDefaults,
}

impl AppState {
    /// Build state: load TOML form defaults (if configured) and wrap the
    /// upstream client. No network traffic happens here.
    #[instrument(level = "info", skip_all)]
    pub fn new(upstream: Upstream) -> Self {
        let defaults = load_admin_config_from_env()
            .map(|c| c.defaults)
            .unwrap_or_default();

        info!(target: "admin_backend", base_url = %upstream.base_url, "Editor state initialized");

        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            upstream,
            defaults,
        }
    }

    /// Fetch the problem list from upstream. On failure the error is only
    /// logged and the list comes back empty; no retry.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_problems(&self) -> Vec<ProblemSummary> {
        match self.upstream.list_problems().await {
            Ok(list) => list,
            Err(e) => {
                error!(target: "editor", error = %e, "Problem list fetch failed; serving empty list");
                Vec::new()
            }
        }
    }

    /// Open an edit session for a freshly seeded draft. At the session cap
    /// the least-recently-touched session is evicted first.
    #[instrument(level = "debug", skip(self, draft), fields(%problem_id))]
    pub async fn open_session(&self, problem_id: &str, draft: ProblemDraft) -> EditSession {
        let session = EditSession {
            token: Uuid::new_v4().to_string(),
            problem_id: problem_id.to_string(),
            draft,
            touched_at: Instant::now(),
        };
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= MAX_SESSIONS {
            if let Some(stale) = sessions
                .values()
                .min_by_key(|s| s.touched_at)
                .map(|s| s.token.clone())
            {
                sessions.remove(&stale);
                warn!(target: "editor", token = %stale, "Session cap reached; evicted least-recently-touched session");
            }
        }
        sessions.insert(session.token.clone(), session.clone());
        session
    }

    #[instrument(level = "debug", skip(self), fields(%token))]
    pub async fn get_session(&self, token: &str) -> Option<EditSession> {
        self.sessions.read().await.get(token).cloned()
    }

    /// Store the latest draft for a session. Returns false for an unknown
    /// token.
    #[instrument(level = "debug", skip(self, draft), fields(%token))]
    pub async fn stash_draft(&self, token: &str, draft: &ProblemDraft) -> bool {
        match self.sessions.write().await.get_mut(token) {
            Some(session) => {
                session.draft = draft.clone();
                session.touched_at = Instant::now();
                true
            }
            None => false,
        }
    }

    /// Drop a session (cancel, or successful update). Returns whether it
    /// existed.
    #[instrument(level = "debug", skip(self), fields(%token))]
    pub async fn close_session(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Claim an operation key such as `select:<problem>` or
    /// `submit:<token>`. Returns None when the same operation is already
    /// running, which callers turn into a busy notice instead of racing a
    /// second request. The claim is released when the returned guard
    /// drops, including when the owning future is cancelled.
    pub fn begin_op(&self, key: &str) -> Option<OpGuard> {
        let mut set = self.in_flight.lock().ok()?;
        if !set.insert(key.to_string()) {
            return None;
        }
        Some(OpGuard { set: Arc::clone(&self.in_flight), key: key.to_string() })
    }
}
