//! Recommendations shown to a restaurant once it has been matched with a
//! customer profile.

use crate::scoring::ProfileLabel;

/// Guideline bundle for one profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guidelines {
    pub must_have: &'static [&'static str],
    pub nice_to_have: &'static [&'static str],
}

const SHARE_CULINARY_CULTURE: &str =
    "Staff interaction offering dish recommendations and sharing Thai culinary culture";
const THAI_MENU_DESIGN: &str = "Menu design using Thai language and Thai-style fonts";
const SHOWCASE_THAI_CHEFS: &str = "Showcase Thai chefs preparing Thai dishes";

static CULTURAL_FOOD: Guidelines = Guidelines {
    must_have: &[
        "Use authentic Thai ingredients sourced from Thailand",
        "Traditional dish presentation e.g. banana leaves",
        THAI_MENU_DESIGN,
        SHARE_CULINARY_CULTURE,
        SHOWCASE_THAI_CHEFS,
    ],
    nice_to_have: &[
        "Thai traditional music or calming ambient soundscapes",
        "Cultural activities like Thai dessert wrapping",
    ],
};

static FOOD_DRIVEN: Guidelines = Guidelines {
    must_have: &[
        "Use traditional Thai ingredients such as fish sauce, shrimp paste and galangal",
        "Storytelling on the menu about the origin and cultural background of dishes",
        SHARE_CULINARY_CULTURE,
        "Thai-style exterior with carved wood, bamboo, or traditional signage",
    ],
    nice_to_have: &[
        "Cultural storytelling via placemats or QR codes",
        "Open kitchen or chef's counter to showcase cooking techniques",
    ],
};

static LEISURE: Guidelines = Guidelines {
    must_have: &[
        "Use fresh Thai herbs and vegetables",
        THAI_MENU_DESIGN,
        SHARE_CULINARY_CULTURE,
        "Welcome guests with a traditional Thai greeting",
    ],
    nice_to_have: &[
        SHOWCASE_THAI_CHEFS,
        "Demonstrate traditional Thai methods like mortar and pestle or clay pot",
    ],
};

pub fn guidelines_for(profile: ProfileLabel) -> &'static Guidelines {
    match profile {
        ProfileLabel::CulturalFoodTraveler => &CULTURAL_FOOD,
        ProfileLabel::FoodDrivenTraveler => &FOOD_DRIVEN,
        ProfileLabel::LeisureTraveler => &LEISURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_profile_has_guidelines() {
        for profile in ProfileLabel::ALL {
            let guidelines = guidelines_for(profile);
            assert!(!guidelines.must_have.is_empty());
            assert!(!guidelines.nice_to_have.is_empty());
        }
    }

    #[test]
    fn test_bundle_sizes() {
        assert_eq!(guidelines_for(ProfileLabel::CulturalFoodTraveler).must_have.len(), 5);
        assert_eq!(guidelines_for(ProfileLabel::FoodDrivenTraveler).must_have.len(), 4);
        assert_eq!(guidelines_for(ProfileLabel::LeisureTraveler).must_have.len(), 4);
    }

    #[test]
    fn test_shared_recommendation() {
        // Every profile is told to have staff share Thai culinary culture
        for profile in ProfileLabel::ALL {
            assert!(guidelines_for(profile)
                .must_have
                .contains(&SHARE_CULINARY_CULTURE));
        }
    }

    #[test]
    fn test_leisure_nice_to_have_chef_showcase() {
        let leisure = guidelines_for(ProfileLabel::LeisureTraveler);
        assert_eq!(leisure.nice_to_have[0], SHOWCASE_THAI_CHEFS);
    }
}
