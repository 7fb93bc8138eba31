use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::catalog::Category;
use crate::scoring::{CategoryAverages, ProfileLabel, ScoreResult};

pub const HISTORY_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultHistory {
    pub version: u32,
    #[serde(default)]
    pub results: Vec<StoredResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredResult {
    /// Local identifier, or the backend token once submitted
    pub token: String,
    pub email: String,
    pub scores: Vec<u8>,
    pub categories: Vec<Category>,
    pub averages: CategoryAverages,
    pub profile_type: ProfileLabel,
    pub created_at: DateTime<Utc>,
}

impl StoredResult {
    pub fn new(
        email: impl Into<String>,
        scores: Vec<u8>,
        categories: Vec<Category>,
        result: &ScoreResult,
    ) -> Self {
        let created_at = Utc::now();
        Self {
            token: local_token(created_at),
            email: email.into(),
            scores,
            categories,
            averages: result.averages,
            profile_type: result.profile,
            created_at,
        }
    }

    /// Replace the local token with the one issued by the backend
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }
}

/// Per-process sequence so results created in the same millisecond differ
static LOCAL_SEQUENCE: AtomicU32 = AtomicU32::new(0);

fn local_token(at: DateTime<Utc>) -> String {
    let seq = LOCAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!(
        "local-{}-{:x}-{}",
        at.format("%Y%m%d%H%M%S%3f"),
        std::process::id(),
        seq
    )
}

impl Default for ResultHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultHistory {
    pub fn new() -> Self {
        Self {
            version: HISTORY_VERSION,
            results: Vec::new(),
        }
    }

    /// Add a result, replacing an earlier entry with the same token.
    ///
    /// A token already held by a different respondent is never overwritten.
    pub fn record(&mut self, result: StoredResult) -> Result<()> {
        if let Some(existing) = self.find(&result.token) {
            if !existing.email.eq_ignore_ascii_case(&result.email) {
                anyhow::bail!(
                    "Result token '{}' already belongs to another respondent",
                    result.token
                );
            }
        }
        self.results.retain(|r| r.token != result.token);
        self.results.push(result);
        Ok(())
    }

    /// Move a stored result to the token the backend issued for it
    pub fn retoken(&mut self, old: &str, new: &str) -> Result<()> {
        let Some(index) = self.results.iter().position(|r| r.token == old) else {
            anyhow::bail!("No stored result with token '{}'", old);
        };
        let entry = self.results.remove(index).with_token(new);
        if let Err(e) = self.record(entry.clone()) {
            self.results.insert(index, entry.with_token(old));
            return Err(e);
        }
        Ok(())
    }

    pub fn find(&self, token: &str) -> Option<&StoredResult> {
        self.results.iter().find(|r| r.token == token)
    }

    /// Results for one respondent, newest first
    pub fn for_email(&self, email: &str) -> Vec<&StoredResult> {
        let mut matching: Vec<&StoredResult> = self
            .results
            .iter()
            .filter(|r| r.email.eq_ignore_ascii_case(email))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }

    pub fn latest_for(&self, email: &str) -> Option<&StoredResult> {
        self.for_email(email).into_iter().next()
    }

    /// All results, newest first
    pub fn all(&self) -> Vec<&StoredResult> {
        let mut all: Vec<&StoredResult> = self.results.iter().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
