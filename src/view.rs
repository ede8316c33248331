//! Plain-text rendering of application state.
//!
//! Every function here is pure: it reads state and returns a `String`. The
//! REPL in `main.rs` prints the result; nothing in this module mutates the
//! session.

use std::fmt::Write as _;

use crate::credentials::MissingConfiguration;
use crate::evaluation::{EvaluationLog, EvaluationModule, EvaluationResult, TOPICS};
use crate::session::{Mode, Role, Session, Speaker, TurnState};

/// Rows shown in the dashboard's recent-activity list.
const RECENT_ROWS: usize = 10;

/// Banner shown before the login prompt.
pub fn render_login_banner() -> String {
    "HPSC Geography Mentor\nSign in to continue (username and password).".to_owned()
}

/// Operator-facing message for the missing-configuration state.
pub fn render_missing_configuration(missing: &MissingConfiguration) -> String {
    format!(
        "Configuration required.\n{missing}\nEvery action is disabled until the key is provided; restart afterwards."
    )
}

/// Modes the role may switch to, with the active one marked.
pub fn render_mode_menu(role: Role, active: Mode) -> String {
    let mut out = String::from("Modes:\n");
    for mode in Mode::available_to(role) {
        let marker = if mode == active { '*' } else { ' ' };
        let _ = writeln!(
            out,
            " {marker} {slug:<10} {title}: {description}",
            slug = mode.slug(),
            title = mode.title(),
            description = mode.description()
        );
    }
    out.push_str("Switch with /mode <name>.");
    out
}

fn speaker_label(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::User => "You",
        Speaker::Assistant => "Mentor",
    }
}

/// Chat transcript of the active mode.
pub fn render_history(session: &Session) -> String {
    let mut out = String::new();
    for message in session.history() {
        let _ = writeln!(out, "{}: {}", speaker_label(message.speaker), message.text);
    }
    if session.turn_state() == TurnState::AwaitingReply {
        out.push_str("Mentor is thinking...\n");
    }
    out
}

/// Header line: who is signed in and where.
pub fn render_status_line(session: &Session) -> String {
    match session.identity() {
        Some(identity) => format!(
            "[{user} | {role} | {profile} | {mode}]",
            user = identity.username,
            role = identity.role,
            profile = identity.profile,
            mode = session.mode()
        ),
        None => "[signed out]".to_owned(),
    }
}

/// Admin dashboard: static cohort panel plus the latest lab entries.
pub fn render_dashboard(log: &EvaluationLog) -> String {
    let mut out = String::from("Admin Analytics\nHPSC Geography Cohort Insights\n\n");
    let _ = writeln!(out, "Total attempts: {}", log.len());
    out.push_str("\nRecent activity:\n");
    if log.is_empty() {
        out.push_str("  No logs found.\n");
        return out;
    }
    for entry in log.entries().iter().rev().take(RECENT_ROWS) {
        let _ = writeln!(
            out,
            "  {when}  {student:<12} {module:<22} {archetype:<14} {score}%",
            when = entry.recorded_at.format("%Y-%m-%d %H:%M"),
            student = entry.student,
            module = entry.module,
            archetype = entry.result.admin_analytics.candidate_archetype,
            score = entry.result.user_feedback.score_total
        );
    }
    out
}

/// Evaluation lab help: modules, topics, and the command syntax.
pub fn render_lab_help() -> String {
    let mut out = String::from("Evaluation Lab\nModules: interview, teaching, research\nTopics:\n");
    for topic in TOPICS {
        let _ = writeln!(out, "  - {topic}");
    }
    out.push_str(
        "Grade an answer with /eval <candidate> | <module> | <topic> | <question> | <answer>",
    );
    out
}

/// One score card, labelled with the module's framework dimensions.
pub fn render_evaluation(module: EvaluationModule, result: &EvaluationResult) -> String {
    let feedback = &result.user_feedback;
    let scores = &feedback.framework_scores;
    let [first, second, third] = module.dimension_labels();
    let analytics = &result.admin_analytics;
    format!(
        "Score: {total}/100\n  {first}: {d1}/10\n  {second}: {d2}/10\n  {third}: {d3}/10\nFeedback: {comment}\nArchetype: {archetype} | Error: {error} | Level: {level}",
        total = feedback.score_total,
        d1 = scores.dimension_1,
        d2 = scores.dimension_2,
        d3 = scores.dimension_3,
        comment = feedback.constructive_comment,
        archetype = analytics.candidate_archetype,
        error = analytics.error_category,
        level = analytics.cognitive_level,
    )
}

/// Readiness trend, oldest score first.
pub fn render_trend(scores: &[f32]) -> String {
    if scores.is_empty() {
        return "Trend: no attempts yet".to_owned();
    }
    let joined: Vec<String> = scores.iter().map(|s| format!("{s:.0}")).collect();
    format!("Trend: {}", joined.join(" → "))
}

/// Main panel for the current session.
pub fn render_session(session: &Session, log: &EvaluationLog) -> String {
    if !session.is_signed_in() {
        return render_login_banner();
    }
    let body = match session.mode() {
        Mode::AdminDashboard => render_dashboard(log),
        Mode::EvaluationLab => render_lab_help(),
        _ => render_history(session),
    };
    format!("{}\n{}", render_status_line(session), body)
}
