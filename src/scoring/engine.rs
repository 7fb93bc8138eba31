use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::{DimensionThresholds, ScoringConfig, TieBreakConfig};
use super::error::{Result, ScoringError};
use super::profile::ProfileLabel;
use super::validation::validate_answers;
use crate::catalog::Category;

/// Mean answer of each dimension, in canonical category order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryAverages {
    scores: [f64; 4],
}

impl CategoryAverages {
    /// Wrap raw dimension scores given in canonical order
    pub fn new(scores: [f64; 4]) -> Self {
        Self { scores }
    }

    pub fn get(&self, category: Category) -> f64 {
        self.scores[category.index()]
    }

    pub fn as_array(&self) -> [f64; 4] {
        self.scores
    }

    /// (category, score) pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.iter().map(move |c| (*c, self.get(*c)))
    }

    /// Unweighted mean of the four dimension scores
    pub fn mean(&self) -> f64 {
        self.scores.iter().sum::<f64>() / self.scores.len() as f64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DimensionVote {
    pub category: Category,
    pub score: f64,
    pub vote: ProfileLabel,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub votes: Vec<DimensionVote>,
    /// Vote count per profile, indexed by `ProfileLabel::index`
    pub tally: [usize; 3],
    /// Mean of all dimensions when the vote was tied and it decided the profile
    pub tie_break_average: Option<f64>,
}

impl ScoreBreakdown {
    pub fn count_for(&self, profile: ProfileLabel) -> usize {
        self.tally[profile.index()]
    }

    pub fn was_tied(&self) -> bool {
        self.tie_break_average.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub profile: ProfileLabel,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResult {
    pub averages: CategoryAverages,
    pub profile: ProfileLabel,
    pub breakdown: ScoreBreakdown,
}

/// Average the answers of each dimension.
///
/// `answers` and `categories` are parallel. A dimension without any answer
/// averages to 0.
pub fn compute_category_averages(
    answers: &[u8],
    categories: &[Category],
) -> Result<CategoryAverages> {
    validate_answers(answers, categories)?;

    let mut sums = [0u32; 4];
    let mut counts = [0u32; 4];
    for (answer, category) in answers.iter().zip(categories) {
        sums[category.index()] += u32::from(*answer);
        counts[category.index()] += 1;
    }

    let mut scores = [0.0; 4];
    for i in 0..scores.len() {
        if counts[i] > 0 {
            scores[i] = f64::from(sums[i]) / f64::from(counts[i]);
        }
    }

    Ok(CategoryAverages::new(scores))
}

/// Profile a single dimension score votes for
pub fn vote_for(score: f64, thresholds: &DimensionThresholds) -> ProfileLabel {
    if score < thresholds.leisure_below {
        ProfileLabel::LeisureTraveler
    } else if score < thresholds.food_driven_below {
        ProfileLabel::FoodDrivenTraveler
    } else {
        ProfileLabel::CulturalFoodTraveler
    }
}

/// Resolve a tied vote from the mean of all dimension scores
pub fn break_tie(average: f64, tie_break: &TieBreakConfig) -> ProfileLabel {
    if average > tie_break.cultural_above {
        ProfileLabel::CulturalFoodTraveler
    } else if average >= tie_break.leisure_at_least {
        ProfileLabel::LeisureTraveler
    } else {
        ProfileLabel::FoodDrivenTraveler
    }
}

/// Classify dimension scores into a profile, keeping the vote breakdown.
pub fn classify(averages: &CategoryAverages, config: &ScoringConfig) -> Classification {
    let thresholds = config.effective_thresholds();
    let mut tally = [0usize; 3];
    let mut votes = Vec::with_capacity(Category::ALL.len());

    for (category, score) in averages.iter() {
        let vote = vote_for(score, thresholds.for_category(category));
        debug!(dimension = %category, score, vote = %vote, "dimension vote");
        tally[vote.index()] += 1;
        votes.push(DimensionVote {
            category,
            score,
            vote,
        });
    }

    let max_count = tally.iter().copied().max().unwrap_or(0);
    let leaders: Vec<ProfileLabel> = ProfileLabel::ALL
        .iter()
        .copied()
        .filter(|p| tally[p.index()] == max_count)
        .collect();

    let (profile, tie_break_average) = match leaders.as_slice() {
        [single] => (*single, None),
        _ => {
            let average = averages.mean();
            let profile = break_tie(average, &config.effective_tie_break());
            debug!(average, profile = %profile, "vote tied, resolved by mean score");
            (profile, Some(average))
        }
    };

    Classification {
        profile,
        breakdown: ScoreBreakdown {
            votes,
            tally,
            tie_break_average,
        },
    }
}

/// Classify dimension scores into a profile
pub fn classify_profile(averages: &CategoryAverages, config: &ScoringConfig) -> ProfileLabel {
    classify(averages, config).profile
}

/// Average a finished answer set and classify it.
pub fn score_answers(
    answers: &[u8],
    categories: &[Category],
    config: &ScoringConfig,
) -> Result<ScoreResult> {
    let averages = compute_category_averages(answers, categories)?;
    let classification = classify(&averages, config);

    Ok(ScoreResult {
        averages,
        profile: classification.profile,
        breakdown: classification.breakdown,
    })
}

/// Build averages from raw dimension scores supplied by a caller, rejecting
/// non-finite values and values that no answer set could produce.
pub fn averages_from_scores(scores: [f64; 4]) -> Result<CategoryAverages> {
    for (category, value) in Category::ALL.iter().zip(scores) {
        if !value.is_finite() {
            return Err(ScoringError::NonFiniteScore {
                category: *category,
            });
        }
        if value != 0.0 && !(1.0..=7.0).contains(&value) {
            return Err(ScoringError::ScoreOutOfRange {
                category: *category,
                value,
            });
        }
    }
    Ok(CategoryAverages::new(scores))
}
