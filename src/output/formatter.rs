use chrono::{Duration, Utc};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::catalog::QUESTIONS;
use crate::guidelines::guidelines_for;
use crate::results::StoredResult;
use crate::scoring::{ProfileLabel, ScoreResult, ANSWER_MAX};

/// Width of the score bar in the result table
const BAR_WIDTH: usize = 14;
/// Widest category label ("Cultural & Local Experiences")
const LABEL_WIDTH: usize = 28;
/// Widest short category label ("Servicescape")
const SHORT_LABEL_WIDTH: usize = 12;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format a dimension score with two decimals
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// Horizontal bar proportional to a score on the 0-7 scale
pub fn score_bar(score: f64, width: usize) -> String {
    let fraction = (score / ANSWER_MAX as f64).clamp(0.0, 1.0);
    let filled = (fraction * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn paint_profile(profile: ProfileLabel, use_colors: bool) -> String {
    if !use_colors {
        return profile.to_string();
    }
    match profile {
        ProfileLabel::LeisureTraveler => profile.label().cyan().bold().to_string(),
        ProfileLabel::FoodDrivenTraveler => profile.label().yellow().bold().to_string(),
        ProfileLabel::CulturalFoodTraveler => profile.label().green().bold().to_string(),
    }
}

/// Format a scored result: one row per dimension, then the profile
///
/// Row: "{category}  {score}  {bar}  {vote}"
pub fn format_result(result: &ScoreResult, use_colors: bool) -> String {
    let mut lines = Vec::new();

    for vote in &result.breakdown.votes {
        let label = format!("{:<width$}", vote.category.label(), width = LABEL_WIDTH);
        let score = format!("{:>5}", format_score(vote.score));
        let bar = score_bar(vote.score, BAR_WIDTH);
        if use_colors {
            lines.push(format!(
                "{}  {}  {}  {}",
                label,
                score.bold(),
                bar.blue(),
                vote.vote.label().dimmed()
            ));
        } else {
            lines.push(format!("{}  {}  {}  {}", label, score, bar, vote.vote));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Profile: {}",
        paint_profile(result.profile, use_colors)
    ));

    if let Some(mean) = result.breakdown.tie_break_average {
        let note = format!("Votes tied; decided on mean score {:.2}", mean);
        if use_colors {
            lines.push(note.dimmed().to_string());
        } else {
            lines.push(note);
        }
    }

    lines.push(result.profile.description().to_string());
    lines.join("\n")
}

/// Format a result as one tab-separated line for scripting
/// Columns: the four scores in category order, then the profile (no headers, no colors)
pub fn format_tsv(result: &ScoreResult) -> String {
    let mut columns: Vec<String> = result
        .averages
        .iter()
        .map(|(_, score)| format_score(score))
        .collect();
    columns.push(result.profile.to_string());
    columns.join("\t")
}

/// Format a result as pretty JSON
pub fn format_json(result: &ScoreResult) -> anyhow::Result<String> {
    let averages: serde_json::Map<String, serde_json::Value> = result
        .averages
        .iter()
        .map(|(category, score)| (category.label().to_string(), serde_json::json!(score)))
        .collect();

    let value = serde_json::json!({
        "averages": averages,
        "profile": result.profile,
        "votes": result.breakdown.votes,
        "tally": {
            "Leisure Traveler": result.breakdown.count_for(ProfileLabel::LeisureTraveler),
            "Food-Driven Traveler": result.breakdown.count_for(ProfileLabel::FoodDrivenTraveler),
            "Cultural Food Traveler": result.breakdown.count_for(ProfileLabel::CulturalFoodTraveler),
        },
        "tie_break_average": result.breakdown.tie_break_average,
    });

    Ok(serde_json::to_string_pretty(&value)?)
}

/// Format the guideline bundle of a profile as two bullet lists
pub fn format_guidelines(profile: ProfileLabel, use_colors: bool) -> String {
    let guidelines = guidelines_for(profile);
    let heading = |s: &str| {
        if use_colors {
            s.bold().underline().to_string()
        } else {
            s.to_string()
        }
    };

    let mut lines = vec![paint_profile(profile, use_colors), String::new()];
    lines.push(heading("Must Have"));
    lines.extend(guidelines.must_have.iter().map(|item| format!("  - {}", item)));
    lines.push(String::new());
    lines.push(heading("Nice to Have"));
    lines.extend(guidelines.nice_to_have.iter().map(|item| format!("  - {}", item)));
    lines.join("\n")
}

/// Format the statement catalog, one numbered line per statement
pub fn format_questions(use_colors: bool) -> String {
    let term_width = get_terminal_width();
    let prefix_width = 4 + SHORT_LABEL_WIDTH + 2;

    QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let index = format!("{:>2}.", i + 1);
            let category = format!(
                "{:<width$}",
                q.category.short_label(),
                width = SHORT_LABEL_WIDTH
            );
            let text = match term_width {
                Some(width) if width > prefix_width + 20 => {
                    truncate_text(q.text, width - prefix_width)
                }
                _ => q.text.to_string(),
            };
            if use_colors {
                format!("{} {}  {}", index.dimmed(), category.cyan(), text)
            } else {
                format!("{} {}  {}", index, category, text)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format stored results, newest first as given
/// Row: "{token}  {age}  {profile}  {email}"
pub fn format_history(results: &[&StoredResult], use_colors: bool) -> String {
    if results.is_empty() {
        return "No saved results.".to_string();
    }

    let now = Utc::now();
    results
        .iter()
        .map(|r| {
            let age = format!("{:>4}", format_age(now - r.created_at));
            if use_colors {
                format!(
                    "{}  {}  {}  {}",
                    r.token.underline(),
                    age.dimmed(),
                    paint_profile(r.profile_type, true),
                    r.email.yellow()
                )
            } else {
                format!("{}  {}  {}  {}", r.token, age, r.profile_type, r.email)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}
