use super::config::{ScoringConfig, ThresholdTable};
use super::error::{Result, ScoringError};
use crate::catalog::Category;

/// Lowest and highest answer on the Likert scale
pub const ANSWER_MIN: u8 = 1;
pub const ANSWER_MAX: u8 = 7;

/// Check the shape of an answer set before it is averaged.
pub fn validate_answers(answers: &[u8], categories: &[Category]) -> Result<()> {
    if answers.len() != categories.len() {
        return Err(ScoringError::LengthMismatch {
            answers: answers.len(),
            categories: categories.len(),
        });
    }

    if let Some((index, value)) = answers
        .iter()
        .enumerate()
        .find(|(_, v)| !(ANSWER_MIN..=ANSWER_MAX).contains(*v))
    {
        return Err(ScoringError::InvalidAnswerRange {
            index,
            value: *value,
        });
    }

    Ok(())
}

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> std::result::Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref table) = config.thresholds {
        for category in Category::ALL {
            let row = table.for_category(category);
            let key = ThresholdTable::key_for(category);

            for (name, value) in [
                ("leisure_below", row.leisure_below),
                ("food_driven_below", row.food_driven_below),
            ] {
                if !value.is_finite() {
                    errors.push(format!(
                        "scoring.thresholds.{}.{}: must be a finite number",
                        key, name
                    ));
                } else if !(1.0..=7.0).contains(&value) {
                    errors.push(format!(
                        "scoring.thresholds.{}.{}: {} is outside the 1-7 answer scale",
                        key, name, value
                    ));
                }
            }

            if row.leisure_below > row.food_driven_below {
                errors.push(format!(
                    "scoring.thresholds.{}: leisure_below ({}) must not exceed food_driven_below ({})",
                    key, row.leisure_below, row.food_driven_below
                ));
            }
        }
    }

    if let Some(ref tie_break) = config.tie_break {
        for (name, value) in [
            ("cultural_above", tie_break.cultural_above),
            ("leisure_at_least", tie_break.leisure_at_least),
        ] {
            if !value.is_finite() {
                errors.push(format!("scoring.tie_break.{}: must be a finite number", name));
            } else if !(1.0..=7.0).contains(&value) {
                errors.push(format!(
                    "scoring.tie_break.{}: {} is outside the 1-7 answer scale",
                    name, value
                ));
            }
        }

        if tie_break.leisure_at_least > tie_break.cultural_above {
            errors.push(format!(
                "scoring.tie_break: leisure_at_least ({}) must not exceed cultural_above ({})",
                tie_break.leisure_at_least, tie_break.cultural_above
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
