//! Paginated text report of a classification.
//!
//! Layout works on a vertical cursor measured in page units: each line
//! advances it by [`LINE_HEIGHT`], and a new page starts when the cursor is
//! past [`PAGE_LIMIT`] before the next line is placed.

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::config::UserContext;
use crate::guidelines::guidelines_for;
use crate::scoring::{CategoryAverages, ProfileLabel};

pub const TOP_MARGIN: u32 = 20;
pub const LINE_HEIGHT: u32 = 10;
pub const PAGE_LIMIT: u32 = 270;
/// Columns before a line is wrapped
pub const WRAP_WIDTH: usize = 78;

#[derive(Debug, Clone)]
pub struct Document {
    pages: Vec<Vec<String>>,
    cursor: u32,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            cursor: TOP_MARGIN,
        }
    }

    pub fn pages(&self) -> &[Vec<String>] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Place one physical line, breaking the page first if the cursor is past the limit
    fn place(&mut self, line: String) {
        if self.cursor > PAGE_LIMIT {
            self.pages.push(Vec::new());
            self.cursor = TOP_MARGIN;
        }
        if let Some(page) = self.pages.last_mut() {
            page.push(line);
        }
        self.cursor += LINE_HEIGHT;
    }

    /// Add text, wrapping it at [`WRAP_WIDTH`] columns
    pub fn line(&mut self, text: &str) {
        self.indented_line("", text);
    }

    /// Add text with a first-line prefix; continuation lines are indented to match
    pub fn indented_line(&mut self, prefix: &str, text: &str) {
        let indent = " ".repeat(prefix.chars().count());
        let width = WRAP_WIDTH.saturating_sub(indent.len()).max(1);
        for (i, chunk) in wrap(text, width).into_iter().enumerate() {
            let lead = if i == 0 { prefix } else { indent.as_str() };
            self.place(format!("{}{}", lead, chunk));
        }
    }

    pub fn blank(&mut self) {
        self.place(String::new());
    }

    /// Render pages separated by form feeds, each closed with a page footer
    pub fn to_text(&self) -> String {
        let total = self.pages.len();
        let mut out = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                out.push('\u{c}');
                out.push('\n');
            }
            for line in page {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
            out.push_str(&format!("Page {} of {}\n", i + 1, total));
        }
        out
    }
}

/// Greedy word wrap; words longer than `width` are split
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let head: String = word.chars().take(width).collect();
            word = word.chars().skip(width).collect();
            lines.push(head);
        }
        if word.is_empty() {
            continue;
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lay out the full report for one classification
pub fn build_report(
    user: Option<&UserContext>,
    averages: &CategoryAverages,
    profile: ProfileLabel,
    generated_at: DateTime<Utc>,
) -> Document {
    let mut doc = Document::new();

    doc.line("Thai Cultural Authenticity Report");
    doc.line(&format!("Generated {}", generated_at.format("%Y-%m-%d %H:%M UTC")));
    if let Some(user) = user {
        if let Some(ref name) = user.restaurant_name {
            doc.line(&format!("Restaurant: {}", name));
        }
        doc.line(&format!("Respondent: {}", user.email));
    }
    doc.blank();

    doc.line(&format!("Customer profile: {}", profile));
    doc.line(profile.description());
    doc.blank();

    doc.line("Category scores (1-7)");
    for (category, score) in averages.iter() {
        doc.line(&format!("  {:<30} {:.2}", category.label(), score));
    }
    doc.blank();

    let guidelines = guidelines_for(profile);
    doc.line("Must Have");
    for item in guidelines.must_have {
        doc.indented_line("  - ", item);
    }
    doc.blank();
    doc.line("Nice to Have");
    for item in guidelines.nice_to_have {
        doc.indented_line("  - ", item);
    }

    doc
}

/// Write a rendered report atomically, creating the parent directory if needed
pub fn write_report(path: &Path, doc: &Document) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(doc.to_text().as_bytes())
        .context("Failed to write report")?;
    file.commit().context("Failed to save report")?;

    info!(path = %path.display(), pages = doc.page_count(), "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::averages_from_scores;

    /// Lines that fit on one page: cursor 20, 30, ..., 270
    const LINES_PER_PAGE: usize = ((PAGE_LIMIT - TOP_MARGIN) / LINE_HEIGHT + 1) as usize;

    #[test]
    fn test_lines_per_page() {
        assert_eq!(LINES_PER_PAGE, 26);
    }

    #[test]
    fn test_page_breaks_only_past_limit() {
        let mut doc = Document::new();
        for i in 0..LINES_PER_PAGE {
            doc.line(&format!("line {}", i));
        }
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.cursor(), 280);

        doc.line("overflow");
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages()[1], vec!["overflow".to_string()]);
        assert_eq!(doc.cursor(), TOP_MARGIN + LINE_HEIGHT);
    }

    #[test]
    fn test_wrap_long_text() {
        let text = "word ".repeat(40);
        let lines = wrap(&text, 20);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
        assert_eq!(lines.join(" ").split_whitespace().count(), 40);
    }

    #[test]
    fn test_wrap_splits_oversized_word() {
        let lines = wrap("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn test_indented_continuation() {
        let mut doc = Document::new();
        doc.indented_line("  - ", &"x ".repeat(60));
        let page = &doc.pages()[0];
        assert!(page[0].starts_with("  - x"));
        assert!(page[1].starts_with("    x"));
    }

    #[test]
    fn test_report_contents() {
        let averages = averages_from_scores([6.5, 6.0, 5.75, 7.0]).unwrap();
        let mut user = UserContext::new("owner@example.com");
        user.restaurant_name = Some("Baan Thai".to_string());

        let doc = build_report(
            Some(&user),
            &averages,
            ProfileLabel::CulturalFoodTraveler,
            Utc::now(),
        );
        let text = doc.to_text();

        assert!(text.contains("Restaurant: Baan Thai"));
        assert!(text.contains("Respondent: owner@example.com"));
        assert!(text.contains("Customer profile: Cultural Food Traveler"));
        assert!(text.contains("Ingredients"));
        assert!(text.contains("6.50"));
        assert!(text.contains("Cultural & Local Experiences"));
        assert!(text.contains("5.75"));
        assert!(text.contains("Must Have"));
        assert!(text.contains("Nice to Have"));
        assert!(text.contains(&format!("Page 1 of {}", doc.page_count())));
    }

    #[test]
    fn test_multi_page_footers() {
        let mut doc = Document::new();
        for _ in 0..(LINES_PER_PAGE * 2 + 1) {
            doc.line("x");
        }
        assert_eq!(doc.page_count(), 3);
        let text = doc.to_text();
        assert!(text.contains("Page 1 of 3"));
        assert!(text.contains("Page 3 of 3"));
        assert_eq!(text.matches('\u{c}').count(), 2);
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.txt");
        let averages = averages_from_scores([4.0; 4]).unwrap();
        let doc = build_report(None, &averages, ProfileLabel::LeisureTraveler, Utc::now());

        write_report(&path, &doc).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("Customer profile: Leisure Traveler"));
        assert!(!written.contains("Respondent:"));
    }
}
