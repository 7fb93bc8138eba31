use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four authenticity dimensions a statement belongs to.
///
/// Variant order is the canonical dimension order used for averages, the
/// radar chart axes and report lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Ingredients")]
    Ingredients,
    #[serde(rename = "Visual Appearance")]
    VisualAppearance,
    #[serde(rename = "Cultural & Local Experiences")]
    CulturalAndLocalExperiences,
    #[serde(rename = "Servicescape")]
    Servicescape,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Ingredients,
        Category::VisualAppearance,
        Category::CulturalAndLocalExperiences,
        Category::Servicescape,
    ];

    /// Display label, as shown on chart axes and in reports
    pub fn label(&self) -> &'static str {
        match self {
            Category::Ingredients => "Ingredients",
            Category::VisualAppearance => "Visual Appearance",
            Category::CulturalAndLocalExperiences => "Cultural & Local Experiences",
            Category::Servicescape => "Servicescape",
        }
    }

    /// Short label for narrow terminals and TSV output
    pub fn short_label(&self) -> &'static str {
        match self {
            Category::Ingredients => "Ingredients",
            Category::VisualAppearance => "Visual",
            Category::CulturalAndLocalExperiences => "Cultural",
            Category::Servicescape => "Servicescape",
        }
    }

    /// Position in the canonical dimension order
    pub fn index(&self) -> usize {
        match self {
            Category::Ingredients => 0,
            Category::VisualAppearance => 1,
            Category::CulturalAndLocalExperiences => 2,
            Category::Servicescape => 3,
        }
    }

    /// Parse a category name.
    ///
    /// Accepts the display label ("Cultural & Local Experiences"), the
    /// identifier form ("CulturalAndLocalExperiences") and snake/kebab case
    /// ("cultural_and_local_experiences"), ignoring case.
    pub fn parse(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .replace('&', "and")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "ingredients" => Ok(Category::Ingredients),
            "visualappearance" | "visual" => Ok(Category::VisualAppearance),
            "culturalandlocalexperiences" | "cultural" => {
                Ok(Category::CulturalAndLocalExperiences)
            }
            "servicescape" => Ok(Category::Servicescape),
            _ => bail!("Unknown category: '{}'", s),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::parse(s)
    }
}
