pub mod answers;
pub mod flow;

pub use answers::{
    load_answers, parse_answer_list, parse_answers_json, AnswerSet, CompletedAnswers,
    DEFAULT_ANSWER,
};
pub use flow::{Questionnaire, QuizState, Step};
