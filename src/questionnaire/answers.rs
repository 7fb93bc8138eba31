use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::catalog::{catalog_categories, Category};
use crate::scoring::{ANSWER_MAX, ANSWER_MIN};

/// Value every statement starts at before the respondent touches it
pub const DEFAULT_ANSWER: u8 = 4;

/// Answers to the statement catalog, one per statement, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet {
    values: Vec<u8>,
}

impl AnswerSet {
    /// `len` answers, all at the default value
    pub fn new(len: usize) -> Self {
        Self {
            values: vec![DEFAULT_ANSWER; len],
        }
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.values.get(index).copied()
    }

    /// Replace one answer. The value must be on the 1-7 scale.
    pub fn set(&mut self, index: usize, value: u8) -> Result<()> {
        if !(ANSWER_MIN..=ANSWER_MAX).contains(&value) {
            bail!("Answer must be between {} and {}, got {}", ANSWER_MIN, ANSWER_MAX, value);
        }
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => bail!("No statement {} (there are {})", index + 1, self.values.len()),
        }
    }

    pub fn into_values(self) -> Vec<u8> {
        self.values
    }
}

/// Answers plus the category of each answer, ready for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedAnswers {
    pub scores: Vec<u8>,
    pub categories: Vec<Category>,
}

impl CompletedAnswers {
    /// Answers given in catalog order
    pub fn for_catalog(scores: Vec<u8>) -> Self {
        Self {
            scores,
            categories: catalog_categories(),
        }
    }
}

/// Accepted shapes of an answers file: the full payload or a bare array
/// of scores in catalog order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnswersFile {
    Payload {
        scores: Vec<u8>,
        #[serde(default)]
        categories: Option<Vec<Category>>,
    },
    Scores(Vec<u8>),
}

/// Parse a comma or whitespace separated answer list ("7,6,5 4 ...")
pub fn parse_answer_list(s: &str) -> Result<Vec<u8>> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .enumerate()
        .map(|(i, part)| {
            part.parse::<u8>()
                .with_context(|| format!("Answer {} is not a whole number: '{}'", i + 1, part))
        })
        .collect()
}

/// Parse answers from JSON text
pub fn parse_answers_json(json: &str) -> Result<CompletedAnswers> {
    let file: AnswersFile =
        serde_json::from_str(json).context("Expected {\"scores\": [...]} or a JSON array")?;

    Ok(match file {
        AnswersFile::Payload {
            scores,
            categories: Some(categories),
        } => CompletedAnswers { scores, categories },
        AnswersFile::Payload {
            scores,
            categories: None,
        }
        | AnswersFile::Scores(scores) => CompletedAnswers::for_catalog(scores),
    })
}

/// Load answers from a JSON file
pub fn load_answers(path: &Path) -> Result<CompletedAnswers> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file at {}", path.display()))?;
    parse_answers_json(&content)
        .with_context(|| format!("Failed to parse answers in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_answer_set_defaults() {
        let answers = AnswerSet::new(25);
        assert_eq!(answers.len(), 25);
        assert!(answers.values().iter().all(|v| *v == DEFAULT_ANSWER));
    }

    #[test]
    fn test_set_answer() {
        let mut answers = AnswerSet::new(3);
        answers.set(1, 7).unwrap();
        assert_eq!(answers.values(), &[4, 7, 4]);
    }

    #[test]
    fn test_set_rejects_out_of_range() {
        let mut answers = AnswerSet::new(3);
        assert!(answers.set(0, 0).is_err());
        assert!(answers.set(0, 8).is_err());
        assert!(answers.set(3, 5).is_err());
        assert_eq!(answers.values(), &[4, 4, 4]);
    }

    #[test]
    fn test_parse_answer_list() {
        assert_eq!(parse_answer_list("7,6, 5 4").unwrap(), vec![7, 6, 5, 4]);
        assert!(parse_answer_list("7,x").is_err());
        assert!(parse_answer_list("-1").is_err());
        assert!(parse_answer_list("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_payload_with_categories() {
        let json = r#"{"scores": [7, 5], "categories": ["Ingredients", "Servicescape"]}"#;
        let answers = parse_answers_json(json).unwrap();
        assert_eq!(answers.scores, vec![7, 5]);
        assert_eq!(
            answers.categories,
            vec![Category::Ingredients, Category::Servicescape]
        );
    }

    #[test]
    fn test_parse_bare_array_uses_catalog() {
        let json = serde_json::to_string(&vec![6u8; 25]).unwrap();
        let answers = parse_answers_json(&json).unwrap();
        assert_eq!(answers.scores.len(), 25);
        assert_eq!(answers.categories, catalog_categories());
    }

    #[test]
    fn test_parse_payload_without_categories() {
        let answers = parse_answers_json(r#"{"scores": [1, 2, 3]}"#).unwrap();
        assert_eq!(answers.categories.len(), 25);
        assert_eq!(answers.scores.len(), 3);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_answers_json(r#"{"answers": "yes"}"#).is_err());
        assert!(parse_answers_json(r#"{"scores": [1], "categories": ["Ambience"]}"#).is_err());
    }

    #[test]
    fn test_load_answers_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        fs::write(&path, "[7, 7, 7]").unwrap();
        let answers = load_answers(&path).unwrap();
        assert_eq!(answers.scores, vec![7, 7, 7]);
    }

    #[test]
    fn test_load_answers_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_answers(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read answers file"));
    }
}
