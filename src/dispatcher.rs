//! Turn dispatcher: one user input in, one assistant entry out.
//!
//! A turn moves the session `Idle → AwaitingReply → Idle`. The user message is
//! appended before the backend is called and stays in history whatever the
//! outcome; a failure or a cancelled call becomes an assistant-authored
//! error entry. Nothing is retried.

use tracing::{debug, info, warn};

use crate::prompts::{alternation_violations, build_request_payload, build_system_instruction};
use crate::providers::{BackendError, GenerateRequest, GenerativeBackend, ResponseFormat};
use crate::session::{Message, Session, TurnState};

/// Prefix of every assistant entry produced from a backend failure.
pub const BACKEND_ERROR_PREFIX: &str = "Error connecting to AI";

/// Why an input was dropped without touching history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Nobody is signed in.
    NotSignedIn,
    /// The active mode has no chat.
    NotConversational,
    /// Input was blank.
    EmptyInput,
}

/// Result of [`dispatch_turn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// User message and model reply were appended.
    Replied,
    /// User message and an error entry were appended.
    Failed(BackendError),
    /// History is unchanged.
    Ignored(IgnoreReason),
    /// Another turn is still in flight; history is unchanged.
    Busy,
}

/// Text of the assistant entry recorded for a backend failure.
pub fn error_entry_text(err: &BackendError) -> String {
    format!("{BACKEND_ERROR_PREFIX}: {err}")
}

/// Text of the assistant entry recorded when a turn is cancelled mid-call.
pub fn cancelled_entry_text() -> String {
    format!("{BACKEND_ERROR_PREFIX}: request cancelled")
}

/// Run one conversational turn against `backend`.
///
/// Cancel-safe: dropping the returned future after the user message was
/// appended still leaves a complete turn in history.
pub async fn dispatch_turn(
    session: &mut Session,
    backend: &dyn GenerativeBackend,
    input: &str,
) -> TurnOutcome {
    if session.turn_state() == TurnState::AwaitingReply {
        return TurnOutcome::Busy;
    }
    let Some(profile) = session.identity().map(|i| i.profile) else {
        debug!("turn without identity ignored");
        return TurnOutcome::Ignored(IgnoreReason::NotSignedIn);
    };
    let mode = session.mode();
    if !mode.is_conversational() {
        debug!(%mode, "turn in non-chat mode ignored");
        return TurnOutcome::Ignored(IgnoreReason::NotConversational);
    }
    if input.trim().is_empty() {
        return TurnOutcome::Ignored(IgnoreReason::EmptyInput);
    }

    let turn = InFlightTurn::begin(session, input);

    let prior = turn
        .session
        .history()
        .split_last()
        .map_or(&[][..], |(_, rest)| rest);
    let request = GenerateRequest {
        system_instruction: build_system_instruction(mode, profile),
        turns: build_request_payload(prior, input),
        response_format: ResponseFormat::Text,
    };

    let violations = alternation_violations(&request.turns);
    if !violations.is_empty() {
        warn!(?violations, "submitting non-alternating history as-is");
    }

    debug!(%mode, turns = request.turns.len(), input_chars = input.chars().count(), "dispatching turn");
    let result = backend.generate(&request).await;

    match result {
        Ok(reply) => {
            info!(%mode, reply_chars = reply.chars().count(), "turn completed");
            turn.finish(Message::assistant(reply));
            TurnOutcome::Replied
        }
        Err(err) => {
            warn!(%mode, error = %err, "backend call failed");
            turn.finish(Message::assistant(error_entry_text(&err)));
            TurnOutcome::Failed(err)
        }
    }
}

/// A turn between the user append and the assistant entry.
///
/// Dropped without [`InFlightTurn::finish`] (the dispatch future was
/// cancelled), it closes the turn with [`cancelled_entry_text`] so the
/// session is back to `Idle` with a complete user/assistant pair.
struct InFlightTurn<'a> {
    session: &'a mut Session,
    finished: bool,
}

impl<'a> InFlightTurn<'a> {
    fn begin(session: &'a mut Session, input: &str) -> Self {
        session.push(Message::user(input));
        session.set_turn_state(TurnState::AwaitingReply);
        Self {
            session,
            finished: false,
        }
    }

    fn finish(mut self, entry: Message) {
        self.close(entry);
    }

    fn close(&mut self, entry: Message) {
        self.session.push(entry);
        self.session.set_turn_state(TurnState::Idle);
        self.finished = true;
    }
}

impl Drop for InFlightTurn<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("turn cancelled before the backend replied");
            self.close(Message::assistant(cancelled_entry_text()));
        }
    }
}
