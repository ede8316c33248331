//! Session store: the single active identity, the active mode, and the
//! ordered message history.
//!
//! [`Session`] is the root of all conversational state. It is owned by one
//! handler (see [`crate::app::App`]) and passed by reference to the mode
//! controller and the turn dispatcher. History is append-only while a mode is
//! active; the only way to drop messages is a mode transition or a logout,
//! both of which clear the whole sequence.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod mode;

pub use mode::{switch_mode, welcome_message, IllegalModeTransition, Mode, ModeChange};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Access level resolved by the credential gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Candidate preparing for the interview. Reaches the three chat modes.
    Student,
    /// Operator. Additionally reaches the dashboard and the evaluation lab.
    Admin,
}

impl Role {
    /// Display label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse experience level that tunes the mentor's tone and depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profile {
    /// Starting from zero; wants concepts broken down.
    Fresher,
    /// Short on time; wants high-yield summaries.
    #[serde(rename = "Working Professional")]
    WorkingProfessional,
    /// Coming from UPSC preparation; wants linkages.
    #[serde(rename = "UPSC Aspirant")]
    UpscAspirant,
    /// No particular calibration.
    General,
}

impl Profile {
    /// Display label, also used verbatim inside prompts.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fresher => "Fresher",
            Self::WorkingProfessional => "Working Professional",
            Self::UpscAspirant => "UPSC Aspirant",
            Self::General => "General",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "fresher" => Ok(Self::Fresher),
            "working professional" | "professional" => Ok(Self::WorkingProfessional),
            "upsc aspirant" | "upsc" => Ok(Self::UpscAspirant),
            "general" => Ok(Self::General),
            other => Err(format!("unknown profile {other:?}")),
        }
    }
}

/// An authenticated user. Immutable for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Login name, exactly as registered.
    pub username: String,
    /// Access level.
    pub role: Role,
    /// Tone/depth calibration.
    pub profile: Profile,
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Author of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// Typed by the user.
    User,
    /// Produced by the mentor (welcome text, model reply, or error text).
    Assistant,
}

/// One entry in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who produced the entry.
    pub speaker: Speaker,
    /// Entry text.
    pub text: String,
}

impl Message {
    /// A user-authored entry.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    /// An assistant-authored entry.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}

/// Dispatcher state for the single in-flight turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    /// No turn in flight; input may be submitted.
    #[default]
    Idle,
    /// A user message was appended and the backend has not answered yet.
    AwaitingReply,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The single active session of this process.
#[derive(Debug, Clone, Default)]
pub struct Session {
    identity: Option<Identity>,
    mode: Mode,
    history: Vec<Message>,
    turn_state: TurnState,
}

impl Session {
    /// A fresh, signed-out session in the default mode with empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// The signed-in user, if any.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Whether a user is signed in.
    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    /// The active mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Messages produced since the last mode transition or login.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Current dispatcher state.
    pub fn turn_state(&self) -> TurnState {
        self.turn_state
    }

    /// Install a freshly authenticated identity and enter the role's initial
    /// mode, including its welcome message.
    ///
    /// Any previous identity and history are discarded first.
    pub(crate) fn sign_in(&mut self, identity: Identity) {
        self.reset();
        let initial = Mode::initial_for(identity.role);
        let profile = identity.profile;
        self.identity = Some(identity);
        mode::enter(self, initial, profile);
    }

    /// Sign out: identity cleared, mode back to the default, history emptied.
    pub(crate) fn reset(&mut self) {
        self.identity = None;
        self.mode = Mode::default();
        self.history.clear();
        self.turn_state = TurnState::Idle;
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.history.push(message);
    }

    pub(crate) fn set_turn_state(&mut self, state: TurnState) {
        self.turn_state = state;
    }

    /// Set the mode and drop the whole history in one step.
    pub(crate) fn replace_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.history.clear();
    }
}
