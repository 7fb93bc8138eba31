use anyhow::{bail, Result};

use super::answers::{AnswerSet, CompletedAnswers};
use crate::catalog::{Question, QUESTIONS};
use crate::scoring::{ANSWER_MAX, ANSWER_MIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    Idle,
    Answering(usize),
    Submitted,
}

/// Outcome of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved(usize),
    Submitted,
    /// Request ignored (at a bound, or not answering)
    Stayed,
}

/// Linear walk through the statement catalog.
///
/// `Idle -> Answering(0) -> ... -> Answering(n - 1) -> Submitted`.
/// Moving back stops at the first statement; moving forward from the last
/// statement submits and freezes the answers.
#[derive(Debug, Clone)]
pub struct Questionnaire {
    questions: &'static [Question],
    answers: AnswerSet,
    state: QuizState,
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::new()
    }
}

impl Questionnaire {
    /// Questionnaire over the full statement catalog
    pub fn new() -> Self {
        Self::with_questions(&QUESTIONS)
    }

    pub fn with_questions(questions: &'static [Question]) -> Self {
        Self {
            questions,
            answers: AnswerSet::new(questions.len()),
            state: QuizState::Idle,
        }
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn is_submitted(&self) -> bool {
        self.state == QuizState::Submitted
    }

    /// Begin answering. Only leaves `Idle`.
    pub fn start(&mut self) -> Step {
        if self.state != QuizState::Idle {
            return Step::Stayed;
        }
        if self.questions.is_empty() {
            self.state = QuizState::Submitted;
            return Step::Submitted;
        }
        self.state = QuizState::Answering(0);
        Step::Moved(0)
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            QuizState::Answering(i) => Some(i),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_index().and_then(|i| self.questions.get(i))
    }

    pub fn current_answer(&self) -> Option<u8> {
        self.current_index().and_then(|i| self.answers.get(i))
    }

    pub fn is_last(&self) -> bool {
        matches!(self.state, QuizState::Answering(i) if i + 1 == self.questions.len())
    }

    /// Set the answer of the current statement
    pub fn set_current(&mut self, value: u8) -> Result<()> {
        let Some(index) = self.current_index() else {
            bail!("Not answering a statement");
        };
        self.answers.set(index, value)
    }

    /// Move the current answer one step up the scale, stopping at the top
    pub fn increment(&mut self) {
        if let Some(value) = self.current_answer() {
            let _ = self.set_current(value.saturating_add(1).min(ANSWER_MAX));
        }
    }

    /// Move the current answer one step down the scale, stopping at the bottom
    pub fn decrement(&mut self) {
        if let Some(value) = self.current_answer() {
            let _ = self.set_current(value.saturating_sub(1).max(ANSWER_MIN));
        }
    }

    pub fn previous(&mut self) -> Step {
        match self.state {
            QuizState::Answering(i) if i > 0 => {
                self.state = QuizState::Answering(i - 1);
                Step::Moved(i - 1)
            }
            _ => Step::Stayed,
        }
    }

    pub fn next(&mut self) -> Step {
        match self.state {
            QuizState::Answering(i) if i + 1 < self.questions.len() => {
                self.state = QuizState::Answering(i + 1);
                Step::Moved(i + 1)
            }
            QuizState::Answering(_) => {
                self.state = QuizState::Submitted;
                Step::Submitted
            }
            _ => Step::Stayed,
        }
    }

    /// Percentage shown in the progress bar: statements reached so far
    pub fn progress_percent(&self) -> u8 {
        let total = self.questions.len();
        match self.state {
            QuizState::Idle => 0,
            QuizState::Submitted => 100,
            QuizState::Answering(i) => {
                (((i + 1) as f64 / total as f64) * 100.0).round() as u8
            }
        }
    }

    /// Frozen answers with their categories, once submitted
    pub fn completed(&self) -> Option<CompletedAnswers> {
        if !self.is_submitted() {
            return None;
        }
        Some(CompletedAnswers {
            scores: self.answers.values().to_vec(),
            categories: self.questions.iter().map(|q| q.category).collect(),
        })
    }

    /// Throw away all answers and go back to `Idle`
    pub fn reset(&mut self) {
        self.answers = AnswerSet::new(self.questions.len());
        self.state = QuizState::Idle;
    }
}
