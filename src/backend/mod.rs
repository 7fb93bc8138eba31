//! Thin client for the results backend.
//!
//! The backend owns accounts and persistence; this side posts a finished
//! result, reads one back by its token, and relays the account calls in
//! [`account`].

pub mod account;

pub use account::{ProfileUpdate, SignupRequest};

use anyhow::{Context, Result};
use reqwest::multipart::Form;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::catalog::Category;
use crate::scoring::ProfileLabel;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL, e.g. "https://api.example.com"
    pub base_url: String,

    /// Request timeout as a duration string, e.g. "10s" (default: 10s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

impl BackendConfig {
    pub fn timeout(&self) -> Result<Duration> {
        match self.timeout {
            Some(ref s) => humantime::parse_duration(s)
                .with_context(|| format!("backend.timeout: invalid duration '{}'", s)),
            None => Ok(DEFAULT_TIMEOUT),
        }
    }
}

/// What the backend stores for a finished questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultSubmission {
    pub email: String,
    pub scores: Vec<u8>,
    pub categories: Vec<Category>,
    pub profile_type: ProfileLabel,
}

impl ResultSubmission {
    /// Upload form: plain `email` and `profile_type` fields, with `scores`
    /// and `categories` as JSON-encoded arrays
    pub fn to_form(&self) -> Result<Form> {
        let scores = serde_json::to_string(&self.scores).context("Failed to encode scores")?;
        let categories =
            serde_json::to_string(&self.categories).context("Failed to encode categories")?;

        Ok(Form::new()
            .text("email", self.email.clone())
            .text("scores", scores)
            .text("categories", categories)
            .text("profile_type", self.profile_type.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SubmissionReceipt {
    pub success: bool,
    /// Token identifying the stored result
    #[serde(default)]
    pub token: Option<String>,
    /// Shareable URL path of the stored result
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("backend.base_url: invalid URL '{}'", config.base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("backend.base_url: '{}' cannot hold a path", config.base_url);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout()?)
            .user_agent(concat!("get-authentic/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http, base_url })
    }

    /// Endpoint under the base URL; each segment is percent-encoded on its own
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("backend.base_url cannot hold a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Store a result; returns the backend's receipt
    pub async fn submit_result(&self, submission: &ResultSubmission) -> Result<SubmissionReceipt> {
        let url = self.endpoint(&["api", "upload-result"])?;
        debug!(%url, email = %submission.email, "submitting result");

        let response = self
            .http
            .post(url)
            .multipart(submission.to_form()?)
            .send()
            .await
            .context("Failed to reach results backend")?;

        let response = check_status(response).await?;
        let receipt: SubmissionReceipt = response
            .json()
            .await
            .context("Failed to parse backend response")?;

        if !receipt.success {
            anyhow::bail!("Backend did not accept the result");
        }

        info!(token = ?receipt.token, "result submitted");
        Ok(receipt)
    }

    /// Fetch a previously stored result by its token
    pub async fn fetch_result(&self, token: &str) -> Result<ResultSubmission> {
        if token.is_empty() || token == "." || token == ".." {
            anyhow::bail!("Invalid result token '{}'", token);
        }
        let url = self.endpoint(&["api", "results", token])?;
        debug!(%url, "fetching result");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to reach results backend")?;

        let response = check_status(response).await?;
        response
            .json()
            .await
            .context("Failed to parse stored result")
    }
}

/// Turn a non-success response into an error carrying the backend's detail
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.detail)
        .unwrap_or(body);

    if detail.is_empty() {
        anyhow::bail!("Backend returned {}", status)
    } else {
        anyhow::bail!("Backend returned {}: {}", status, detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let config = BackendConfig {
            base_url: "http://localhost".to_string(),
            timeout: None,
        };
        assert_eq!(config.timeout().unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn test_custom_timeout() {
        let config = BackendConfig {
            base_url: "http://localhost".to_string(),
            timeout: Some("2m".to_string()),
        };
        assert_eq!(config.timeout().unwrap(), Duration::from_secs(120));
    }

    #[test]
    fn test_invalid_timeout() {
        let config = BackendConfig {
            base_url: "http://localhost".to_string(),
            timeout: Some("soon".to_string()),
        };
        let err = config.timeout().unwrap_err();
        assert!(err.to_string().contains("backend.timeout"));
    }

    fn client(base_url: &str) -> BackendClient {
        let _ = rustls::crypto::ring::default_provider().install_default();
        BackendClient::new(&BackendConfig {
            base_url: base_url.to_string(),
            timeout: None,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        for base in ["http://localhost:8000", "http://localhost:8000/"] {
            let url = client(base).endpoint(&["api", "results", "x"]).unwrap();
            assert_eq!(url.as_str(), "http://localhost:8000/api/results/x");
        }

        let url = client("https://example.com/survey/")
            .endpoint(&["api", "login"])
            .unwrap();
        assert_eq!(url.as_str(), "https://example.com/survey/api/login");
    }

    #[test]
    fn test_endpoint_encodes_token_segment() {
        let url = client("http://localhost:8000")
            .endpoint(&["api", "results", "../admin"])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/results/..%2Fadmin");

        let url = client("http://localhost:8000")
            .endpoint(&["api", "results", "a b?c"])
            .unwrap();
        assert_eq!(url.path(), "/api/results/a%20b%3Fc");
    }

    #[test]
    fn test_invalid_base_url() {
        let _ = rustls::crypto::ring::default_provider().install_default();
        for base in ["not a url", "mailto:owner@example.com"] {
            let err = BackendClient::new(&BackendConfig {
                base_url: base.to_string(),
                timeout: None,
            })
            .unwrap_err();
            assert!(err.to_string().contains("backend.base_url"), "{}", err);
        }
    }

    #[test]
    fn test_submission_wire_format() {
        let submission = ResultSubmission {
            email: "owner@example.com".to_string(),
            scores: vec![7, 6],
            categories: vec![Category::Ingredients, Category::CulturalAndLocalExperiences],
            profile_type: ProfileLabel::CulturalFoodTraveler,
        };
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["profile_type"], "Cultural Food Traveler");
        assert_eq!(json["categories"][1], "Cultural & Local Experiences");
        assert_eq!(json["scores"][0], 7);
    }
}
