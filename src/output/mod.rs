pub mod formatter;

pub use formatter::{
    format_age, format_guidelines, format_history, format_json, format_questions, format_result,
    format_score, format_tsv, score_bar, should_use_colors,
};
