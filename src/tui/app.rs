use chrono::Utc;
use std::path::PathBuf;
use std::time::Instant;

use crate::backend::{BackendConfig, ResultSubmission, SubmissionReceipt};
use crate::config::UserContext;
use crate::questionnaire::{CompletedAnswers, Questionnaire, QuizState, Step};
use crate::report::{build_report, write_report};
use crate::results::{load_history, save_history, StoredResult};
use crate::scoring::{score_answers, ScoreResult, ScoringConfig};
use crate::tui::theme::ThemeColors;

/// Seconds a flash message stays in the status bar
const FLASH_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Question,
    Result,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

/// Everything the TUI needs from the outside, passed in explicitly.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub scoring: ScoringConfig,
    pub user: Option<UserContext>,
    pub results_path: PathBuf,
    pub report_dir: PathBuf,
    pub theme: ThemeColors,
    /// Results are submitted here when set
    pub backend: Option<BackendConfig>,
}

/// A scored, submitted questionnaire
#[derive(Debug, Clone)]
pub struct Outcome {
    pub answers: CompletedAnswers,
    pub result: ScoreResult,
}

pub struct App {
    pub quiz: Questionnaire,
    pub outcome: Option<Outcome>,
    pub input_mode: InputMode,
    pub flash_message: Option<(String, FlashKind, Instant)>,
    pub should_quit: bool,
    pub scoring: ScoringConfig,
    pub user: Option<UserContext>,
    pub results_path: PathBuf,
    pub report_dir: PathBuf,
    pub theme: ThemeColors,
    pub backend: Option<BackendConfig>,
    /// Token of the saved copy of the current outcome
    pub saved_token: Option<String>,
    /// Token the backend issued for the current outcome
    pub submitted_token: Option<String>,
    pub needs_submit: bool,
    pub is_submitting: bool,
}

impl App {
    pub fn new(ctx: AppContext) -> Self {
        Self::with_questionnaire(ctx, Questionnaire::new())
    }

    pub fn with_questionnaire(ctx: AppContext, quiz: Questionnaire) -> Self {
        Self {
            quiz,
            outcome: None,
            input_mode: InputMode::Normal,
            flash_message: None,
            should_quit: false,
            scoring: ctx.scoring,
            user: ctx.user,
            results_path: ctx.results_path,
            report_dir: ctx.report_dir,
            theme: ctx.theme,
            backend: ctx.backend,
            saved_token: None,
            submitted_token: None,
            needs_submit: false,
            is_submitting: false,
        }
    }

    pub fn screen(&self) -> Screen {
        match self.quiz.state() {
            QuizState::Idle => Screen::Welcome,
            QuizState::Answering(_) => Screen::Question,
            QuizState::Submitted => Screen::Result,
        }
    }

    pub fn start(&mut self) {
        if self.quiz.start() == Step::Submitted {
            self.score_submission();
        }
    }

    /// Choose a value on the scale for the current statement
    pub fn answer(&mut self, value: u8) {
        if let Err(e) = self.quiz.set_current(value) {
            self.show_error(e.to_string());
        }
    }

    pub fn increment(&mut self) {
        self.quiz.increment();
    }

    pub fn decrement(&mut self) {
        self.quiz.decrement();
    }

    pub fn previous(&mut self) {
        self.quiz.previous();
    }

    /// Advance; moving past the last statement submits and scores
    pub fn next(&mut self) {
        if self.quiz.next() == Step::Submitted {
            self.score_submission();
        }
    }

    fn score_submission(&mut self) {
        let Some(answers) = self.quiz.completed() else {
            return;
        };
        match score_answers(&answers.scores, &answers.categories, &self.scoring) {
            Ok(result) => {
                tracing::info!(profile = %result.profile, "questionnaire scored");
                self.outcome = Some(Outcome { answers, result });
                // Submit right away when there is somewhere to send it
                self.needs_submit = self.backend.is_some() && self.user.is_some();
            }
            Err(e) => self.show_error(format!("Failed to score answers: {}", e)),
        }
    }

    /// Record the current outcome in the local history
    pub fn save_result(&mut self) {
        let Some(ref outcome) = self.outcome else {
            return;
        };
        if self.saved_token.is_some() {
            self.show_success("Already saved".to_string());
            return;
        }
        let Some(ref user) = self.user else {
            self.show_error("Failed to save: no respondent email (use --email)".to_string());
            return;
        };

        let mut stored = StoredResult::new(
            user.email.clone(),
            outcome.answers.scores.clone(),
            outcome.answers.categories.clone(),
            &outcome.result,
        );
        if let Some(ref issued) = self.submitted_token {
            stored = stored.with_token(issued.clone());
        }
        let token = stored.token.clone();

        let saved = load_history(&self.results_path).and_then(|mut history| {
            history.record(stored)?;
            save_history(&self.results_path, &history)
        });
        match saved {
            Ok(()) => {
                self.show_success(format!("Saved: {}", token));
                self.saved_token = Some(token);
            }
            Err(e) => self.show_error(format!("Failed to save: {:#}", e)),
        }
    }

    /// Queue the current outcome for submission to the backend
    pub fn request_submit(&mut self) {
        if self.outcome.is_none() {
            return;
        }
        if self.backend.is_none() {
            self.show_error("No backend configured (see backend.base_url)".to_string());
            return;
        }
        if self.user.is_none() {
            self.show_error("Failed to submit: no respondent email (use --email)".to_string());
            return;
        }
        if self.is_submitting {
            return;
        }
        if self.submitted_token.is_some() {
            self.show_success("Already submitted".to_string());
            return;
        }
        self.needs_submit = true;
    }

    /// Hand out the queued submission, marking it in flight
    pub fn take_submission(&mut self) -> Option<ResultSubmission> {
        if !self.needs_submit || self.is_submitting {
            return None;
        }
        self.needs_submit = false;
        let outcome = self.outcome.as_ref()?;
        let user = self.user.as_ref()?;
        self.is_submitting = true;
        Some(ResultSubmission {
            email: user.email.clone(),
            scores: outcome.answers.scores.clone(),
            categories: outcome.answers.categories.clone(),
            profile_type: outcome.result.profile,
        })
    }

    /// Apply the backend's answer to a submission; a saved copy moves to the issued token
    pub fn finish_submit(&mut self, receipt: anyhow::Result<SubmissionReceipt>) {
        self.is_submitting = false;
        let receipt = match receipt {
            Ok(receipt) => receipt,
            Err(e) => {
                self.show_error(format!("Submit failed: {:#}", e));
                return;
            }
        };
        let Some(token) = receipt.token else {
            self.show_success("Submitted".to_string());
            return;
        };

        if let Some(local) = self.saved_token.clone().filter(|t| *t != token) {
            let moved = load_history(&self.results_path).and_then(|mut history| {
                history.retoken(&local, &token)?;
                save_history(&self.results_path, &history)
            });
            match moved {
                Ok(()) => self.saved_token = Some(token.clone()),
                Err(e) => {
                    self.submitted_token = Some(token);
                    self.show_error(format!("Submitted, but failed to update history: {:#}", e));
                    return;
                }
            }
        }

        self.show_success(format!("Submitted: {}", token));
        self.submitted_token = Some(token);
    }

    /// Write the report for the current outcome into the report directory
    pub fn export_report(&mut self) -> Option<PathBuf> {
        let outcome = self.outcome.as_ref()?;
        let now = Utc::now();
        let doc = build_report(
            self.user.as_ref(),
            &outcome.result.averages,
            outcome.result.profile,
            now,
        );
        let path = self
            .report_dir
            .join(format!("get-authentic-report-{}.txt", now.format("%Y%m%d-%H%M%S")));

        match write_report(&path, &doc) {
            Ok(()) => {
                self.show_success(format!("Exported: {}", path.display()));
                Some(path)
            }
            Err(e) => {
                self.show_error(format!("Failed to export: {:#}", e));
                None
            }
        }
    }

    /// Discard the outcome and answer again from the first statement
    pub fn restart(&mut self) {
        if self.is_submitting {
            self.show_error("Wait for the submission to finish".to_string());
            return;
        }
        self.quiz.reset();
        self.outcome = None;
        self.saved_token = None;
        self.submitted_token = None;
        self.needs_submit = false;
        self.quiz.start();
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn update_flash(&mut self) {
        if let Some((_, _, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }
    }

    pub fn show_success(&mut self, msg: String) {
        self.flash_message = Some((msg, FlashKind::Success, Instant::now()));
    }

    pub fn show_error(&mut self, msg: String) {
        tracing::warn!("{}", msg);
        self.flash_message = Some((msg, FlashKind::Error, Instant::now()));
    }
}
