//! Prompt assembly: system instructions and the backend turn list.
//!
//! Both builders are pure. The same `(mode, profile)` always yields the same
//! instruction bytes, and the turn list is a literal, order-preserving copy of
//! the stored history followed by the new input.

use crate::providers::{Turn, TurnRole};
use crate::session::{Message, Mode, Profile, Speaker};

pub mod context;

// ---------------------------------------------------------------------------
// System instruction
// ---------------------------------------------------------------------------

/// Behavioural directive for a conversational mode, or `None` for
/// dashboard-style modes.
pub fn mode_directive(mode: Mode) -> Option<&'static str> {
    match mode {
        Mode::SyllabusDecoder => Some(
            "*** MODE A: SYLLABUS DECODER ***
Explain the topic the user names with academic depth, calibrated to their profile. Always include:
1. The key geographers and theorists behind it.
2. Recent research trends or case studies from India or Haryana.
3. Pedagogy: how you would teach it to undergraduates.",
        ),
        Mode::InterviewSimulator => Some(
            "*** MODE B: INTERVIEW SIMULATOR ***
Act as the HPSC interview panel.
- Ask exactly one question per turn, then wait for the candidate's answer.
- Never reveal several questions at once or list upcoming questions.
- Mix core technical geography with Haryana-specific geography.
- Push back on generic answers: \"That is a GS answer. I need an academic answer.\"
- Probe follow-ups Socratically.",
        ),
        Mode::HaryanaContextualizer => Some(
            "*** MODE C: HARYANA CONTEXTUALIZER ***
Relate every concept the user raises to the geography of Haryana.
- Urbanisation: Gurugram-Manesar.
- Soils: salinity in Hisar and Fatehabad.
- Climate: western disturbances over Rohtak.",
        ),
        Mode::AdminDashboard | Mode::EvaluationLab => None,
    }
}

/// Build the system instruction for `mode` and `profile`.
///
/// Sections, in order:
/// 1. Mentor persona and grading guidelines
/// 2. Reference material (syllabus, Haryana digest, interview style)
/// 3. Profile tone rules
/// 4. Mode directive (chat modes only)
/// 5. `[USER_PROFILE]: <profile>`
pub fn build_system_instruction(mode: Mode, profile: Profile) -> String {
    let mut sections: Vec<String> = vec![
        context::MENTOR_PERSONA.to_owned(),
        format!(
            "*** CONTEXT DATA ***\n[SYLLABUS]:\n{}\n\n[HARYANA CONTEXT]:\n{}\n\n[INTERVIEW STYLE]:\n{}",
            context::HPSC_SYLLABUS,
            context::HARYANA_CONTEXT,
            context::INTERVIEW_STYLE
        ),
        context::PROFILE_RULES.to_owned(),
    ];

    if let Some(directive) = mode_directive(mode) {
        sections.push(directive.to_owned());
    }

    sections.push(format!("[USER_PROFILE]: {profile}"));
    sections.join("\n\n")
}

// ---------------------------------------------------------------------------
// Turn list
// ---------------------------------------------------------------------------

fn turn_role(speaker: Speaker) -> TurnRole {
    match speaker {
        Speaker::User => TurnRole::User,
        Speaker::Assistant => TurnRole::Model,
    }
}

/// Map stored history plus the new input to the backend turn list.
///
/// `history` must not contain `new_input` yet. Every message is kept, in
/// order; consecutive same-role turns are passed through untouched.
pub fn build_request_payload(history: &[Message], new_input: &str) -> Vec<Turn> {
    history
        .iter()
        .map(|m| Turn {
            role: turn_role(m.speaker),
            text: m.text.clone(),
        })
        .chain(std::iter::once(Turn::user(new_input)))
        .collect()
}

/// Indices `i` where `turns[i]` has the same role as `turns[i - 1]`.
///
/// Diagnostic only: callers log these, they do not rewrite the payload.
pub fn alternation_violations(turns: &[Turn]) -> Vec<usize> {
    turns
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0].role == pair[1].role)
        .map(|(i, _)| i.saturating_add(1))
        .collect()
}
