use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{check_status, BackendClient};
use crate::config::UserContext;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SignupRequest {
    pub restaurant_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    /// Email or restaurant name
    identifier: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct UserOut {
    restaurant_name: String,
    email: String,
}

#[derive(Debug, Deserialize)]
struct SignupResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Restaurant profile details sent after login.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ProfileUpdate {
    pub contact_email: String,
    pub owner_name: String,
    pub location: String,
    pub business_type: String,
    pub current_position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProfileUpdate {
    /// Names of required fields left blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("contact_email", &self.contact_email),
            ("owner_name", &self.owner_name),
            ("location", &self.location),
            ("business_type", &self.business_type),
            ("current_position", &self.current_position),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl BackendClient {
    /// Create an account; returns the backend's confirmation message
    pub async fn signup(&self, request: &SignupRequest) -> Result<String> {
        let url = self.endpoint(&["api", "signup"])?;
        debug!(%url, email = %request.email, "signing up");

        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .context("Failed to reach results backend")?;

        let response = check_status(response).await?;
        let body: SignupResponse = response
            .json()
            .await
            .context("Failed to parse signup response")?;

        info!(email = %request.email, "account created");
        Ok(body
            .message
            .unwrap_or_else(|| "Account created.".to_string()))
    }

    /// Log in by email or restaurant name; returns the respondent it belongs to
    pub async fn login(&self, identifier: &str, password: &str) -> Result<UserContext> {
        let url = self.endpoint(&["api", "login"])?;
        debug!(%url, identifier, "logging in");

        let response = self
            .http
            .post(url)
            .json(&LoginRequest {
                identifier,
                password,
            })
            .send()
            .await
            .context("Failed to reach results backend")?;

        let response = check_status(response).await?;
        let user: UserOut = response
            .json()
            .await
            .context("Failed to parse login response")?;

        info!(email = %user.email, "logged in");
        Ok(UserContext {
            email: user.email,
            restaurant_name: Some(user.restaurant_name),
        })
    }

    pub async fn update_profile(&self, profile: &ProfileUpdate) -> Result<()> {
        let missing = profile.missing_fields();
        if !missing.is_empty() {
            anyhow::bail!("Profile is missing required fields: {}", missing.join(", "));
        }

        let url = self.endpoint(&["api", "profile-update"])?;
        debug!(%url, email = %profile.contact_email, "updating profile");

        let response = self
            .http
            .post(url)
            .json(profile)
            .send()
            .await
            .context("Failed to reach results backend")?;

        check_status(response).await?;
        info!(email = %profile.contact_email, "profile updated");
        Ok(())
    }
}
