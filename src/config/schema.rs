use serde::{Deserialize, Serialize};

use crate::backend::BackendConfig;
use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Config {
    /// Who is answering; attached to saved and submitted results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserContext>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendConfig>,

    /// TUI color theme: "auto", "dark" or "light"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// The respondent, passed explicitly to whatever needs it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UserContext {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
}

impl UserContext {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            restaurant_name: None,
        }
    }

    /// Restaurant name if known, otherwise the email
    pub fn display_name(&self) -> &str {
        self.restaurant_name.as_deref().unwrap_or(&self.email)
    }
}
