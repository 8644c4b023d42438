//! Interactive completion of a schedule draft.
//!
//! The engine is a two-state machine driven by the caller: every answer is
//! one synchronous step, and there are no timers or retries inside.
//!
//! ## State Transitions
//!
//! ```text
//! Collecting --answer--> Collecting   (questions remain)
//! Collecting --answer--> Complete     (nothing missing)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CompletionEngine::new(draft);
//! while let Some(question) = engine.next_question().cloned() {
//!     let value = ask_user(&question.question);
//!     engine.answer(&Answer::for_question(&question, value))?;
//! }
//! let draft = engine.into_draft();
//! ```

mod answer;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schedule::{clean_missing_info, detect_missing_info, normalize_draft, Question, ScheduleDraft};

pub use answer::{apply_answer, apply_answers, Answer, AnswerOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    /// At least one question is unanswered.
    Collecting,
    /// Nothing is missing; `missing_info` has been stripped.
    Complete,
}

/// How many questions the caller is shown at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionMode {
    #[default]
    OneAtATime,
    Batch,
}

/// Drives a draft from `Collecting` to `Complete`.
#[derive(Debug, Clone)]
pub struct CompletionEngine {
    draft: ScheduleDraft,
    pending: Vec<Question>,
    mode: CompletionMode,
}

impl CompletionEngine {
    /// Normalize the draft and compute its outstanding questions.
    pub fn new(draft: ScheduleDraft) -> Self {
        let mut draft = normalize_draft(draft);
        let pending = detect_missing_info(&draft);
        if pending.is_empty() {
            clean_missing_info(&mut draft);
        }
        Self {
            draft,
            pending,
            mode: CompletionMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: CompletionMode) -> Self {
        self.mode = mode;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CompletionState {
        if self.pending.is_empty() {
            CompletionState::Complete
        } else {
            CompletionState::Collecting
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == CompletionState::Complete
    }

    pub fn mode(&self) -> CompletionMode {
        self.mode
    }

    /// Every unanswered question, meetings first.
    pub fn pending(&self) -> &[Question] {
        &self.pending
    }

    pub fn next_question(&self) -> Option<&Question> {
        self.pending.first()
    }

    /// Questions to present now: one or all, depending on the mode.
    pub fn questions(&self) -> &[Question] {
        match self.mode {
            CompletionMode::OneAtATime => &self.pending[..self.pending.len().min(1)],
            CompletionMode::Batch => &self.pending,
        }
    }

    pub fn draft(&self) -> &ScheduleDraft {
        &self.draft
    }

    pub fn into_draft(self) -> ScheduleDraft {
        self.draft
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Apply one answer. On error the draft is left untouched.
    pub fn answer(&mut self, answer: &Answer) -> Result<CompletionState> {
        let outcome = apply_answer(&self.draft, answer)?;
        Ok(self.accept(outcome))
    }

    /// Apply answers in order; either all apply or none do.
    pub fn answer_all(&mut self, answers: &[Answer]) -> Result<CompletionState> {
        let outcome = apply_answers(&self.draft, answers)?;
        Ok(self.accept(outcome))
    }

    fn accept(&mut self, outcome: AnswerOutcome) -> CompletionState {
        self.draft = outcome.draft;
        self.pending = outcome.remaining;
        let state = self.state();
        if state == CompletionState::Complete {
            tracing::info!(
                meetings = self.draft.meetings.len(),
                tasks = self.draft.tasks.len(),
                "schedule draft complete"
            );
        }
        state
    }
}
