//! In-memory log of graded answers, feeding the score trend.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{EvaluationModule, EvaluationResult};

/// Number of scores kept in a trend.
pub const TREND_LEN: usize = 10;

/// One graded answer.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Unique id.
    pub id: Uuid,
    /// When the result was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Who submitted the answer.
    pub student: String,
    /// Module the answer was graded in.
    pub module: EvaluationModule,
    /// Topic of the question.
    pub topic: String,
    /// The score card.
    pub result: EvaluationResult,
}

/// Append-only list of [`LogEntry`], oldest first.
#[derive(Debug, Clone, Default)]
pub struct EvaluationLog {
    entries: Vec<LogEntry>,
}

impl EvaluationLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result and return the stored entry.
    pub fn record(
        &mut self,
        student: &str,
        module: EvaluationModule,
        topic: &str,
        result: EvaluationResult,
    ) -> &LogEntry {
        self.entries.push(LogEntry {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            student: student.to_owned(),
            module,
            topic: topic.to_owned(),
            result,
        });
        let last = self.entries.len().saturating_sub(1);
        &self.entries[last]
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries recorded for `student`, oldest first.
    pub fn for_student<'a>(&'a self, student: &'a str) -> impl Iterator<Item = &'a LogEntry> + 'a {
        self.entries.iter().filter(move |e| e.student == student)
    }

    /// The last [`TREND_LEN`] total scores for `student`, oldest first.
    pub fn trend(&self, student: &str) -> Vec<f32> {
        let scores: Vec<f32> = self
            .for_student(student)
            .map(|e| e.result.user_feedback.score_total)
            .collect();
        let skip = scores.len().saturating_sub(TREND_LEN);
        scores.into_iter().skip(skip).collect()
    }

    /// Mean total score for `student`, `None` without entries.
    pub fn average(&self, student: &str) -> Option<f32> {
        let (sum, count) = self
            .for_student(student)
            .fold((0.0_f32, 0.0_f32), |(sum, count), e| {
                (sum + e.result.user_feedback.score_total, count + 1.0)
            });
        (count > 0.0).then(|| sum / count)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
