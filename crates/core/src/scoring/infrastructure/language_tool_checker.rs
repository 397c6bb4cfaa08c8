use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::scoring::domain::grammar_checker::{GrammarChecker, GrammarIssue};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Error, Debug)]
pub enum GrammarCheckError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("grammar service unreachable at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("grammar service at {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("malformed response from {url}: {source}")]
    Response {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Grammar checker backed by a LanguageTool HTTP server.
///
/// Works against the public API or a self-hosted instance.
pub struct LanguageToolChecker {
    client: reqwest::blocking::Client,
    check_url: String,
    language: String,
}

impl LanguageToolChecker {
    /// Connects to the server at `base_url` and verifies it answers.
    ///
    /// Fails if the server cannot be reached, so callers can run without a
    /// checker instead of failing every request later.
    pub fn connect(base_url: &str, language: &str) -> Result<Self, GrammarCheckError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(GrammarCheckError::Client)?;
        let base = base_url.trim_end_matches('/');

        let probe_url = format!("{base}/v2/languages");
        let response = client
            .get(&probe_url)
            .send()
            .map_err(|source| GrammarCheckError::Unreachable {
                url: probe_url.clone(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(GrammarCheckError::Status {
                url: probe_url,
                status: response.status().as_u16(),
            });
        }
        log::debug!("Connected to LanguageTool at {base} ({language})");

        Ok(Self {
            client,
            check_url: format!("{base}/v2/check"),
            language: language.to_string(),
        })
    }

    fn request(&self, text: &str) -> Result<CheckResponse, GrammarCheckError> {
        let response = self
            .client
            .post(&self.check_url)
            .form(&[("text", text), ("language", self.language.as_str())])
            .send()
            .map_err(|source| GrammarCheckError::Unreachable {
                url: self.check_url.clone(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(GrammarCheckError::Status {
                url: self.check_url.clone(),
                status: response.status().as_u16(),
            });
        }
        response
            .json::<CheckResponse>()
            .map_err(|source| GrammarCheckError::Response {
                url: self.check_url.clone(),
                source,
            })
    }
}

impl GrammarChecker for LanguageToolChecker {
    fn check(&self, text: &str) -> Result<Vec<GrammarIssue>, Box<dyn std::error::Error>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let response = self.request(text)?;
        Ok(response.into_issues())
    }
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<RuleMatch>,
}

#[derive(Debug, Deserialize)]
struct RuleMatch {
    #[serde(default)]
    message: String,
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    length: usize,
    rule: Option<MatchedRule>,
}

#[derive(Debug, Deserialize)]
struct MatchedRule {
    #[serde(default)]
    id: String,
}

impl CheckResponse {
    fn into_issues(self) -> Vec<GrammarIssue> {
        self.matches
            .into_iter()
            .map(|m| GrammarIssue {
                message: m.message,
                offset: m.offset,
                length: m.length,
                rule_id: m.rule.map(|r| r.id).unwrap_or_default(),
            })
            .collect()
    }
}
