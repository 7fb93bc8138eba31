pub mod config;
pub mod engine;
pub mod error;
pub mod profile;
pub mod validation;

pub use config::*;
pub use engine::{
    averages_from_scores, break_tie, classify, classify_profile, compute_category_averages,
    score_answers, vote_for, CategoryAverages, Classification, DimensionVote, ScoreBreakdown,
    ScoreResult,
};
pub use error::ScoringError;
pub use profile::ProfileLabel;
pub use validation::{validate_answers, validate_scoring, ANSWER_MAX, ANSWER_MIN};
