use serde::{Deserialize, Serialize};

use crate::catalog::Category;

/// Scoring calibration.
///
/// The per-dimension vote thresholds and the tie-break bounds come from an
/// external study. Both sections are optional; a missing section falls back
/// to the published calibration.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   thresholds:
///     ingredients: { leisure_below: 5.78, food_driven_below: 5.96 }
///     visual_appearance: { leisure_below: 5.65, food_driven_below: 5.82 }
///     cultural_and_local_experiences: { leisure_below: 5.68, food_driven_below: 5.89 }
///     servicescape: { leisure_below: 5.44, food_driven_below: 5.88 }
///   tie_break:
///     cultural_above: 6.04
///     leisure_at_least: 5.84
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Per-dimension vote thresholds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<ThresholdTable>,

    /// Bounds applied to the mean of all dimensions when the vote is tied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tie_break: Option<TieBreakConfig>,
}

impl ScoringConfig {
    /// Thresholds in effect (configured or default)
    pub fn effective_thresholds(&self) -> ThresholdTable {
        self.thresholds.clone().unwrap_or_default()
    }

    /// Tie-break bounds in effect (configured or default)
    pub fn effective_tie_break(&self) -> TieBreakConfig {
        self.tie_break.clone().unwrap_or_default()
    }
}

/// One row of the threshold table.
///
/// A score below `leisure_below` votes Leisure Traveler, a score below
/// `food_driven_below` votes Food-Driven Traveler, anything else votes
/// Cultural Food Traveler. Both comparisons are strict.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DimensionThresholds {
    pub leisure_below: f64,
    pub food_driven_below: f64,
}

impl DimensionThresholds {
    pub const fn new(leisure_below: f64, food_driven_below: f64) -> Self {
        Self {
            leisure_below,
            food_driven_below,
        }
    }
}

/// Threshold rows for all four dimensions.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ThresholdTable {
    pub ingredients: DimensionThresholds,
    pub visual_appearance: DimensionThresholds,
    pub cultural_and_local_experiences: DimensionThresholds,
    pub servicescape: DimensionThresholds,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            ingredients: DimensionThresholds::new(5.78, 5.96),
            visual_appearance: DimensionThresholds::new(5.65, 5.82),
            cultural_and_local_experiences: DimensionThresholds::new(5.68, 5.89),
            servicescape: DimensionThresholds::new(5.44, 5.88),
        }
    }
}

impl ThresholdTable {
    pub fn for_category(&self, category: Category) -> &DimensionThresholds {
        match category {
            Category::Ingredients => &self.ingredients,
            Category::VisualAppearance => &self.visual_appearance,
            Category::CulturalAndLocalExperiences => &self.cultural_and_local_experiences,
            Category::Servicescape => &self.servicescape,
        }
    }

    pub fn for_category_mut(&mut self, category: Category) -> &mut DimensionThresholds {
        match category {
            Category::Ingredients => &mut self.ingredients,
            Category::VisualAppearance => &mut self.visual_appearance,
            Category::CulturalAndLocalExperiences => &mut self.cultural_and_local_experiences,
            Category::Servicescape => &mut self.servicescape,
        }
    }

    /// Config key of a row, used in validation messages
    pub fn key_for(category: Category) -> &'static str {
        match category {
            Category::Ingredients => "ingredients",
            Category::VisualAppearance => "visual_appearance",
            Category::CulturalAndLocalExperiences => "cultural_and_local_experiences",
            Category::Servicescape => "servicescape",
        }
    }
}

/// Tie-break bounds on the unweighted mean of the four dimension scores.
///
/// Above `cultural_above` -> Cultural Food Traveler; at least
/// `leisure_at_least` -> Leisure Traveler; below -> Food-Driven Traveler.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TieBreakConfig {
    pub cultural_above: f64,
    pub leisure_at_least: f64,
}

impl Default for TieBreakConfig {
    fn default() -> Self {
        Self {
            cultural_above: 6.04,
            leisure_at_least: 5.84,
        }
    }
}
