//! Evaluation lab: structured grading of a single candidate answer.
//!
//! The backend is asked for one JSON document scoring the answer against the
//! framework of the chosen module, plus diagnostic tags for the admin view.
//! Grading never touches the chat history.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::prompts::context;
use crate::providers::{BackendError, GenerateRequest, GenerativeBackend, ResponseFormat, Turn};
use crate::session::Profile;

pub mod log;

pub use log::{EvaluationLog, LogEntry};

/// Which framework the answer is graded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationModule {
    /// 3-C model: content, context, communication.
    InterviewSimulation,
    /// TPACK + Bloom: pedagogy, engagement, complexity.
    TeachingDemo,
    /// Grant reviewer standard: methodology, relevance, feasibility.
    ResearchDefense,
}

impl EvaluationModule {
    /// Identifier sent to the model.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InterviewSimulation => "INTERVIEW_SIMULATION",
            Self::TeachingDemo => "TEACHING_DEMO",
            Self::ResearchDefense => "RESEARCH_DEFENSE",
        }
    }

    /// Human labels for `dimension_1..3`.
    pub fn dimension_labels(self) -> [&'static str; 3] {
        match self {
            Self::InterviewSimulation => ["Content", "Context", "Communication"],
            Self::TeachingDemo => ["Pedagogy", "Engagement", "Complexity"],
            Self::ResearchDefense => ["Methodology", "Relevance", "Feasibility"],
        }
    }
}

impl fmt::Display for EvaluationModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EvaluationModule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "interview" | "interview_simulation" => Ok(Self::InterviewSimulation),
            "teaching" | "teaching_demo" => Ok(Self::TeachingDemo),
            "research" | "research_defense" => Ok(Self::ResearchDefense),
            other => Err(format!("unknown evaluation module {other:?}")),
        }
    }
}

/// Topics offered by the lab's topic picker.
pub const TOPICS: [&str; 9] = [
    "Geomorphology",
    "Climatology",
    "Oceanography",
    "Geographic Thought",
    "Population & Settlement",
    "Economic Geography",
    "Regional Planning",
    "Geography of India",
    "Haryana Geography",
];

/// One answer to grade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    /// Grading framework.
    pub module: EvaluationModule,
    /// Syllabus topic.
    pub topic: String,
    /// The question that was answered.
    pub question: String,
    /// The candidate's answer.
    pub answer: String,
    /// Profile used to pitch the feedback.
    pub profile: Profile,
}

// ---------------------------------------------------------------------------
// Result schema
// ---------------------------------------------------------------------------

/// Per-dimension scores, 0–10 each.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameworkScores {
    /// First framework dimension.
    pub dimension_1: f32,
    /// Second framework dimension.
    pub dimension_2: f32,
    /// Third framework dimension.
    pub dimension_3: f32,
}

/// Feedback shown to the candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFeedback {
    /// Overall score, 0–100.
    pub score_total: f32,
    /// Framework breakdown.
    pub framework_scores: FrameworkScores,
    /// Actionable advice.
    pub constructive_comment: String,
}

/// Diagnostic tags shown to admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAnalytics {
    /// Module label echoed by the model.
    pub module_used: String,
    /// How the candidate prepares.
    pub candidate_archetype: String,
    /// Main weakness.
    pub error_category: String,
    /// Bloom level reached.
    pub cognitive_level: String,
}

/// Full score card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Candidate-facing part.
    pub user_feedback: UserFeedback,
    /// Admin-facing part.
    pub admin_analytics: AdminAnalytics,
}

/// Grading failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    /// Nothing to grade.
    #[error("answer is empty")]
    EmptyAnswer,
    /// The backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// The backend replied with something other than the score card.
    #[error("score card did not parse: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Prompting
// ---------------------------------------------------------------------------

/// System instruction for grading: rubric plus profile tone rules.
pub fn evaluation_instruction() -> String {
    format!("{}\n\n{}", context::EVALUATION_RUBRIC, context::PROFILE_RULES)
}

/// The single user turn carrying the answer to grade.
pub fn evaluation_prompt(request: &EvaluationRequest) -> String {
    format!(
        "[USER_PROFILE]: {profile}\n\nCURRENT MODULE: {module}\nTopic: {topic}\nQuestion: {question}\nCandidate Answer: {answer}\n\nEvaluate this answer. The user is a {profile}; pitch the feedback accordingly.",
        profile = request.profile,
        module = request.module,
        topic = request.topic,
        question = request.question,
        answer = request.answer,
    )
}

/// Parse the score card, tolerating a surrounding Markdown code fence.
///
/// # Errors
///
/// Returns [`EvaluationError::Malformed`] when the text is not the expected
/// JSON document.
pub fn parse_evaluation(raw: &str) -> Result<EvaluationResult, EvaluationError> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();
    serde_json::from_str(body).map_err(|e| EvaluationError::Malformed(e.to_string()))
}

/// Grade one answer.
///
/// # Errors
///
/// Returns [`EvaluationError::EmptyAnswer`] before calling the backend when
/// the answer is blank, otherwise backend or parse failures.
pub async fn evaluate(
    backend: &dyn GenerativeBackend,
    request: &EvaluationRequest,
) -> Result<EvaluationResult, EvaluationError> {
    if request.answer.trim().is_empty() {
        return Err(EvaluationError::EmptyAnswer);
    }

    let generate = GenerateRequest {
        system_instruction: evaluation_instruction(),
        turns: vec![Turn::user(evaluation_prompt(request))],
        response_format: ResponseFormat::Json,
    };
    let raw = backend.generate(&generate).await?;
    let result = parse_evaluation(&raw).inspect_err(|e| {
        warn!(module = %request.module, error = %e, "evaluation reply did not parse");
    })?;

    info!(
        module = %request.module,
        score = result.user_feedback.score_total,
        archetype = %result.admin_analytics.candidate_archetype,
        "answer evaluated"
    );
    Ok(result)
}
