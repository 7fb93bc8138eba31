use thiserror::Error;

use crate::catalog::Category;

/// Contract violations rejected before any score is computed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Got {answers} answers but {categories} categories")]
    LengthMismatch { answers: usize, categories: usize },

    #[error("Answer {} is {value}, expected a value from 1 to 7", .index + 1)]
    InvalidAnswerRange { index: usize, value: u8 },

    #[error("{category} score is not a finite number")]
    NonFiniteScore { category: Category },

    #[error("{category} score {value} is outside 1-7 (or 0 for an empty dimension)")]
    ScoreOutOfRange { category: Category, value: f64 },
}

pub type Result<T> = std::result::Result<T, ScoringError>;
