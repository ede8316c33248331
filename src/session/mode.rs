//! Mode controller: the closed set of preparation modes, which role may reach
//! which mode, and the history reset + welcome injection on every transition.
//!
//! The controller only touches [`Session`]; it never calls the backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Message, Profile, Role, Session, TurnState};

/// A preparation mode. Exactly one is active per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Mode A: academic concept explanations.
    #[default]
    SyllabusDecoder,
    /// Mode B: mock interview panel.
    InterviewSimulator,
    /// Mode C: tie concepts to Haryana's geography.
    HaryanaContextualizer,
    /// Admin-only cohort overview. No chat.
    AdminDashboard,
    /// Admin-only structured grading. No chat.
    EvaluationLab,
}

impl Mode {
    /// Every mode in menu order.
    pub const ALL: [Mode; 5] = [
        Mode::SyllabusDecoder,
        Mode::InterviewSimulator,
        Mode::HaryanaContextualizer,
        Mode::EvaluationLab,
        Mode::AdminDashboard,
    ];

    /// Whether the mode is a chat with the mentor. Dashboard-style modes
    /// render their own view and never get a welcome message.
    pub fn is_conversational(self) -> bool {
        matches!(
            self,
            Self::SyllabusDecoder | Self::InterviewSimulator | Self::HaryanaContextualizer
        )
    }

    /// Whether a user with `role` may enter this mode.
    pub fn is_available_to(self, role: Role) -> bool {
        match role {
            Role::Admin => true,
            Role::Student => self.is_conversational(),
        }
    }

    /// Mode entered right after login.
    pub fn initial_for(role: Role) -> Mode {
        match role {
            Role::Student => Mode::SyllabusDecoder,
            Role::Admin => Mode::AdminDashboard,
        }
    }

    /// Modes `role` may switch to, in menu order.
    pub fn available_to(role: Role) -> impl Iterator<Item = Mode> {
        Self::ALL.into_iter().filter(move |m| m.is_available_to(role))
    }

    /// Menu title.
    pub fn title(self) -> &'static str {
        match self {
            Self::SyllabusDecoder => "Syllabus Decoder",
            Self::InterviewSimulator => "Interview Simulator",
            Self::HaryanaContextualizer => "Haryana Contextualizer",
            Self::AdminDashboard => "Admin Dashboard",
            Self::EvaluationLab => "Evaluation Lab",
        }
    }

    /// One-line menu description.
    pub fn description(self) -> &'static str {
        match self {
            Self::SyllabusDecoder => "Deep academic explanation",
            Self::InterviewSimulator => "Mock panel simulation",
            Self::HaryanaContextualizer => "Link global to local",
            Self::AdminDashboard => "Cohort insights",
            Self::EvaluationLab => "AI score card and grading",
        }
    }

    /// Short name accepted by [`FromStr`].
    pub fn slug(self) -> &'static str {
        match self {
            Self::SyllabusDecoder => "syllabus",
            Self::InterviewSimulator => "interview",
            Self::HaryanaContextualizer => "haryana",
            Self::AdminDashboard => "dashboard",
            Self::EvaluationLab => "lab",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "syllabus" | "syllabus-decoder" => Ok(Self::SyllabusDecoder),
            "b" | "interview" | "interview-simulator" => Ok(Self::InterviewSimulator),
            "c" | "haryana" | "haryana-contextualizer" => Ok(Self::HaryanaContextualizer),
            "d" | "lab" | "evaluation" | "evaluation-lab" => Ok(Self::EvaluationLab),
            "admin" | "dashboard" | "admin-dashboard" => Ok(Self::AdminDashboard),
            other => Err(format!("unknown mode {other:?}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Welcome text
// ---------------------------------------------------------------------------

/// Welcome text injected when entering `mode`, or `None` for dashboard-style
/// modes. Pure in `(mode, profile)`.
pub fn welcome_message(mode: Mode, profile: Profile) -> Option<String> {
    let text = match mode {
        Mode::SyllabusDecoder => format!(
            "Mode A Active: Syllabus Decoder. Which topic from the HPSC syllabus shall we analyze academically? ({profile} Mode)"
        ),
        Mode::InterviewSimulator => format!(
            "Mode B Active: Interview Simulator. I will act as the HPSC Panel. Type 'Ready' to begin your mock interview. ({profile} Mode)"
        ),
        Mode::HaryanaContextualizer => format!(
            "Mode C Active: Haryana Contextualizer. Give me a geography concept, and I will connect it to Haryana. ({profile} Mode)"
        ),
        Mode::AdminDashboard | Mode::EvaluationLab => return None,
    };
    Some(text)
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// A mode request the current identity is not allowed to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("mode {requested} is not available to {}", .role.map_or("a signed-out session", Role::as_str))]
pub struct IllegalModeTransition {
    /// The mode that was asked for.
    pub requested: Mode,
    /// Role of the requester, `None` when nobody is signed in.
    pub role: Option<Role>,
}

/// Result of a [`switch_mode`] request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    /// Mode changed; history was reset.
    Switched,
    /// Requested mode is already active; nothing changed.
    Unchanged,
    /// Request was dropped without touching the session.
    Rejected(IllegalModeTransition),
    /// A turn is in flight; the request was dropped.
    Busy,
}

/// Apply a mode change request to `session`.
///
/// Illegal requests are ignored: the session stays exactly as it was. A legal
/// change replaces the mode, clears history, and, for conversational modes,
/// seeds the history with the welcome message.
pub fn switch_mode(session: &mut Session, requested: Mode) -> ModeChange {
    let role = session.identity().map(|i| i.role);
    let Some(identity) = session.identity() else {
        debug!(mode = %requested, "mode request without identity ignored");
        return ModeChange::Rejected(IllegalModeTransition {
            requested,
            role: None,
        });
    };
    let profile = identity.profile;

    if !requested.is_available_to(identity.role) {
        debug!(mode = %requested, role = %identity.role, "illegal mode request ignored");
        return ModeChange::Rejected(IllegalModeTransition { requested, role });
    }
    if requested == session.mode() {
        return ModeChange::Unchanged;
    }
    if session.turn_state() == TurnState::AwaitingReply {
        debug!(mode = %requested, "mode request while awaiting reply ignored");
        return ModeChange::Busy;
    }

    let from = session.mode();
    enter(session, requested, profile);
    info!(%from, to = %requested, "mode switched");
    ModeChange::Switched
}

/// Unconditionally enter `mode`: set it, clear history, inject the welcome.
pub(crate) fn enter(session: &mut Session, mode: Mode, profile: Profile) {
    session.replace_mode(mode);
    if let Some(text) = welcome_message(mode, profile) {
        session.push(Message::assistant(text));
    }
}
