pub mod category;
pub mod questions;

pub use category::Category;
pub use questions::{catalog_categories, category_counts, Question, QUESTIONS};
