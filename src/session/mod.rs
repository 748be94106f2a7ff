//! Search session state machine.
//!
//! [`SearchController`] owns the one [`SessionState`] of a search session and
//! funnels every mutation through its transition methods:
//!
//! ```text
//! Idle --select_file--> FileSelected --submit--> Submitting --+--> Ready
//!   ^                                                        |
//!   +------------------------- reset ------------------------+--> Failed
//! ```
//!
//! Each submit is tagged with the session generation it started in. `reset`
//! starts a new generation, so a request that settles after the user started
//! over is dropped instead of overwriting the fresh state. At most one request
//! per generation is ever in flight.
//!
//! The state lock is never held across an await.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::client::{SearchTransport, SyftClient};
use crate::encode::{DataUriEncoder, Encoder};
use crate::error::{FailureKind, SyftResult};
use crate::model::file::SelectedFile;
use crate::model::search::{SearchQuery, SearchRequestPayload, SearchResponse};

pub mod view;

pub use view::Screen;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing picked yet.
    #[default]
    Idle,
    FileSelected,
    /// A request is in flight.
    Submitting,
    /// Last attempt returned a response (possibly with no matches).
    Ready,
    /// Last attempt failed.
    Failed,
}

/// Everything the view reads about a search session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    selected_file: Option<SelectedFile>,
    query: SearchQuery,
    phase: Phase,
    last_response: Option<SearchResponse>,
    last_error: Option<FailureKind>,
    generation: u64,
}

impl SessionState {
    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_response(&self) -> Option<&SearchResponse> {
        self.last_response.as_ref()
    }

    pub fn last_error(&self) -> Option<FailureKind> {
        self.last_error
    }

    /// Counter bumped on every start-over.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Inputs may change and a search may start only outside `Submitting`.
    pub fn controls_enabled(&self) -> bool {
        self.phase != Phase::Submitting
    }

    pub fn can_submit(&self) -> bool {
        self.controls_enabled() && self.selected_file.is_some()
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Why a call left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A request is already in flight.
    Busy,
    /// `submit` without a selected file.
    NoFile,
}

/// Result of a [`SearchController::submit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No request was issued.
    Ignored(IgnoreReason),
    /// The attempt settled and was applied; carries the resulting phase.
    Completed(Phase),
    /// The attempt settled after a reset and was discarded.
    Superseded,
}

// ---------------------------------------------------------------------------
// InFlight: leaves `Submitting` even if the submit future is dropped
// ---------------------------------------------------------------------------

/// Held by a running submit. If the future is dropped before the attempt
/// settles (timeout, `select!`, aborted task), the attempt counts as a
/// transport failure so the session does not stay stuck in `Submitting`.
struct InFlight<'a> {
    state: &'a RwLock<SessionState>,
    generation: u64,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.state.write();
        if state.generation == self.generation && state.phase == Phase::Submitting {
            tracing::warn!(generation = self.generation, "search abandoned before settling");
            state.last_error = Some(FailureKind::TransportFailure);
            state.phase = Phase::Failed;
        }
    }
}

// ---------------------------------------------------------------------------
// SearchController
// ---------------------------------------------------------------------------

/// Drives the encoder and the transport for a single search session.
pub struct SearchController {
    encoder: Arc<dyn Encoder>,
    transport: Arc<dyn SearchTransport>,
    state: RwLock<SessionState>,
}

impl SearchController {
    pub fn new(encoder: Arc<dyn Encoder>, transport: Arc<dyn SearchTransport>) -> Self {
        Self {
            encoder,
            transport,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Controller wired to the HTTP client with data-URI encoding.
    pub fn with_client(client: SyftClient) -> Self {
        Self::new(Arc::new(DataUriEncoder), Arc::new(client))
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    pub async fn phase(&self) -> Phase {
        self.state.read().phase
    }

    /// What the view should show right now.
    pub async fn screen(&self) -> Screen {
        self.state.read().screen()
    }

    /// Replace the selected file. Returns `false` while a request is in flight.
    pub async fn select_file(&self, file: SelectedFile) -> bool {
        let mut state = self.state.write();
        if !state.controls_enabled() {
            tracing::debug!(file = file.name(), "select_file ignored while submitting");
            return false;
        }
        tracing::debug!(file = file.name(), size_bytes = file.size_bytes(), "file selected");
        state.selected_file = Some(file);
        if state.phase == Phase::Idle {
            state.phase = Phase::FileSelected;
        }
        true
    }

    pub async fn set_query_text(&self, text: impl Into<String>) -> bool {
        let mut state = self.state.write();
        if !state.controls_enabled() {
            return false;
        }
        state.query.text = text.into();
        true
    }

    pub async fn set_context_flag(&self, enabled: bool) -> bool {
        let mut state = self.state.write();
        if !state.controls_enabled() {
            return false;
        }
        state.query.context_search = enabled;
        true
    }

    /// Encode the selected file and run one search.
    ///
    /// Does nothing without a file or while another request is in flight. An
    /// encoding failure ends the attempt before any network call. The
    /// selected file survives a failure so the user can retry directly.
    pub async fn submit(&self) -> SubmitOutcome {
        let (guard, file, query) = {
            let mut state = self.state.write();
            if state.phase == Phase::Submitting {
                tracing::debug!("submit ignored, request already in flight");
                return SubmitOutcome::Ignored(IgnoreReason::Busy);
            }
            let Some(file) = state.selected_file.clone() else {
                tracing::debug!("submit ignored, no file selected");
                return SubmitOutcome::Ignored(IgnoreReason::NoFile);
            };
            state.phase = Phase::Submitting;
            state.last_error = None;
            state.last_response = None;
            let guard = InFlight {
                state: &self.state,
                generation: state.generation,
                settled: false,
            };
            (guard, file, state.query.clone())
        };

        tracing::debug!(generation = guard.generation, file = file.name(), "search started");
        let result = self.run(&file, &query).await;
        self.settle(guard, result)
    }

    async fn run(&self, file: &SelectedFile, query: &SearchQuery) -> SyftResult<SearchResponse> {
        let file_input = self.encoder.encode(file).await?;
        let payload = SearchRequestPayload::new(file_input, query);
        self.transport.submit(&payload).await
    }

    fn settle(&self, mut guard: InFlight<'_>, result: SyftResult<SearchResponse>) -> SubmitOutcome {
        guard.settled = true;
        let mut state = self.state.write();
        if state.generation != guard.generation {
            tracing::warn!(
                generation = guard.generation,
                current = state.generation,
                "discarding result from superseded session"
            );
            return SubmitOutcome::Superseded;
        }

        match result {
            Ok(response) => {
                tracing::info!(
                    matches = response.matches.len(),
                    elapsed_time = response.elapsed_time_seconds,
                    access_link = %response.access_link,
                    "search completed"
                );
                state.last_response = Some(response);
                state.phase = Phase::Ready;
            }
            Err(err) => {
                tracing::warn!(error = %err, "search failed");
                state.last_error = Some(err.kind());
                state.phase = Phase::Failed;
            }
        }
        SubmitOutcome::Completed(state.phase)
    }

    /// Start over: back to `Idle` with an empty session in a new generation.
    /// A request still in flight from the previous generation is discarded
    /// when it settles.
    pub async fn reset(&self) {
        let mut state = self.state.write();
        let generation = state.generation.wrapping_add(1);
        *state = SessionState {
            generation,
            ..SessionState::default()
        };
        tracing::debug!(generation, "session reset");
    }
}
