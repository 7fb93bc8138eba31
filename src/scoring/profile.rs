use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Customer profile a restaurant is matched with.
///
/// Variant order is the tally order used when counting votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileLabel {
    #[serde(rename = "Leisure Traveler")]
    LeisureTraveler,
    #[serde(rename = "Food-Driven Traveler")]
    FoodDrivenTraveler,
    #[serde(rename = "Cultural Food Traveler")]
    CulturalFoodTraveler,
}

impl ProfileLabel {
    pub const ALL: [ProfileLabel; 3] = [
        ProfileLabel::LeisureTraveler,
        ProfileLabel::FoodDrivenTraveler,
        ProfileLabel::CulturalFoodTraveler,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProfileLabel::LeisureTraveler => "Leisure Traveler",
            ProfileLabel::FoodDrivenTraveler => "Food-Driven Traveler",
            ProfileLabel::CulturalFoodTraveler => "Cultural Food Traveler",
        }
    }

    /// One-line summary of what this traveler looks for
    pub fn description(&self) -> &'static str {
        match self {
            ProfileLabel::LeisureTraveler => {
                "Enjoys relaxed, comfortable environments with familiar food."
            }
            ProfileLabel::FoodDrivenTraveler => {
                "Prioritizes exceptional culinary experiences and quality."
            }
            ProfileLabel::CulturalFoodTraveler => {
                "Seeks deep cultural immersion through food and authenticity."
            }
        }
    }

    /// Slot in a vote tally
    pub fn index(&self) -> usize {
        match self {
            ProfileLabel::LeisureTraveler => 0,
            ProfileLabel::FoodDrivenTraveler => 1,
            ProfileLabel::CulturalFoodTraveler => 2,
        }
    }

    /// Parse a profile name: "Leisure Traveler", "leisure", "food-driven",
    /// "cultural_food_traveler" and similar spellings are accepted.
    pub fn parse(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        let normalized = normalized.strip_suffix("traveler").unwrap_or(&normalized);

        match normalized {
            "leisure" => Ok(ProfileLabel::LeisureTraveler),
            "fooddriven" | "food" => Ok(ProfileLabel::FoodDrivenTraveler),
            "culturalfood" | "cultural" => Ok(ProfileLabel::CulturalFoodTraveler),
            _ => bail!(
                "Unknown profile '{}' (expected leisure, food-driven or cultural)",
                s
            ),
        }
    }
}

impl fmt::Display for ProfileLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProfileLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        ProfileLabel::parse(s)
    }
}
