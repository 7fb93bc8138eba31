use super::category::Category;

/// A single Likert statement of the self-assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub text: &'static str,
    pub category: Category,
}

const fn q(text: &'static str, category: Category) -> Question {
    Question { text, category }
}

/// The fixed statement catalog, in the order it is presented.
///
/// Servicescape carries ten statements against five for each other
/// dimension. The distribution feeds straight into the averages, so it must
/// stay as shipped.
#[rustfmt::skip]
pub static QUESTIONS: [Question; 25] = [
    q("We use ingredients locally sourced from Thailand such as kaffir lime, lemongrass, Thai lime and Thai chili.", Category::Ingredients),
    q("We use fresh Thai herbs and vegetables in our dishes.", Category::Ingredients),
    q("We use hot and spicy ingredients like Thai chili or chili paste in our menu.", Category::Ingredients),
    q("Our dishes use traditional Thai flavor ingredients such as fish sauce, shrimp paste, and galangal.", Category::Ingredients),
    q("We serve Thai dishes that feature unique or less familiar ingredients.", Category::Ingredients),
    q("Our Thai dishes are carefully plated with attention to visual presentation.", Category::VisualAppearance),
    q("We use visual presentation elements such as banana leaves or vegetable carving.", Category::VisualAppearance),
    q("Our menu uses Thai language or Thai-style fonts to reflect Thai identity.", Category::VisualAppearance),
    q("Our menu includes stories or descriptions of the origin and cultural background of Thai dishes.", Category::VisualAppearance),
    q("We avoid presenting Thai dishes in overly modern or fusion styles that could reduce authenticity.", Category::VisualAppearance),
    q("Our restaurant features Thai cultural performances such as classical dance or live traditional music.", Category::CulturalAndLocalExperiences),
    q("We demonstrate traditional Thai cooking methods like using a mortar and pestle or clay pot.", Category::CulturalAndLocalExperiences),
    q("We offer hands-on cultural activities such as dessert wrapping or preparing chili paste.", Category::CulturalAndLocalExperiences),
    q("Our service staff recommends Thai dish pairings and explains Thai food culture.", Category::CulturalAndLocalExperiences),
    q("We present local Thai ingredients or allow guests to observe food preparation.", Category::CulturalAndLocalExperiences),
    q("Our restaurant's exterior design includes traditional Thai features such as carved wood, bamboo, or Thai-style signage that reflects Thai identity.", Category::Servicescape),
    q("Our restaurant's interior features Thai elements such as traditional furniture, lighting, artwork, or poetry.", Category::Servicescape),
    q("We serve food with Thai-style tableware and utensils.", Category::Servicescape),
    q("We use Thai-style table settings, such as shared samrub meals or flower decorations.", Category::Servicescape),
    q("The dining area features natural aromas from Thai herbs or ingredients like coconut milk and lemongrass.", Category::Servicescape),
    q("We play traditional Thai music or music by Thai artists in our restaurant.", Category::Servicescape),
    q("Guests may hear our staff speaking Thai among themselves during service.", Category::Servicescape),
    q("Our guests are welcomed with a traditional Thai greeting.", Category::Servicescape),
    q("Guests can see Thai chefs preparing dishes in the kitchen or open counter.", Category::Servicescape),
    q("Our staff wears traditional Thai clothing during service.", Category::Servicescape),
];

/// Category of every catalog statement, parallel to [`QUESTIONS`]
pub fn catalog_categories() -> Vec<Category> {
    QUESTIONS.iter().map(|q| q.category).collect()
}

/// Number of statements in each category, in canonical order
pub fn category_counts() -> [usize; 4] {
    let mut counts = [0; 4];
    for question in QUESTIONS.iter() {
        counts[question.category.index()] += 1;
    }
    counts
}
