//! Claude API integration for the circadian energy journal.
//!
//! Turns the recent daily series into a short written analysis: the most
//! productive window, recurring dips and one actionable recommendation.
//!
//! Callers that must never fail use [`generate_insight_or_fallback`], which
//! maps every problem to a fixed informational message.

use std::fmt;
use std::time::Duration;

use cj_core::aggregate::{RECENT_DAYS, recent};
use cj_core::DayData;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const INSIGHT_MAX_TOKENS: u32 = 600;
const INSIGHT_TEMPERATURE: f32 = 0.4;

/// Model used when the configuration does not name one.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Shown when no API key is configured.
pub const NOT_CONFIGURED_MESSAGE: &str =
    "No API key configured. Set CJ_API_KEY or api_key in config.toml to enable AI insights.";
/// Shown when the service answers without any text.
pub const EMPTY_RESPONSE_MESSAGE: &str =
    "Could not generate an insight right now. Please try again later.";
/// Shown on any transport or API failure.
pub const COMMUNICATION_ERROR_MESSAGE: &str =
    "Something went wrong talking to the AI assistant. Check your network connection or API configuration.";

/// LLM client errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provided API key was invalid.
    #[error("invalid API key: {reason}")]
    InvalidApiKey { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The response parsed but carried no text.
    #[error("empty response")]
    EmptyResponse,
}

/// Text to show for an insight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightText {
    /// Written by the model.
    Generated(String),
    /// A fixed message standing in for a failed request.
    Fallback(&'static str),
}

impl InsightText {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Generated(text) => text.as_str(),
            Self::Fallback(text) => *text,
        }
    }

    pub const fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

/// Claude API client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_endpoint(api_key, ANTHROPIC_API_URL)
    }

    /// Creates a client that posts to a custom messages endpoint.
    pub fn with_endpoint(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();

        if api_key.is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be empty",
            });
        }
        if api_key.trim().is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(LlmError::ClientBuild)?;

        Ok(Self {
            http,
            api_key,
            endpoint: endpoint.into(),
        })
    }

    /// Asks the model to analyze the most recent days of `series`.
    pub async fn generate_insight(&self, model: &str, series: &[DayData]) -> Result<String, LlmError> {
        let request = MessageRequest {
            model: model.to_string(),
            max_tokens: INSIGHT_MAX_TOKENS,
            temperature: INSIGHT_TEMPERATURE,
            messages: vec![Message {
                role: "user",
                content: build_insight_prompt(series),
            }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(&body).unwrap_or_else(|| LlmError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        let payload: MessageResponse = serde_json::from_str(&body)
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
        extract_text(payload.content)
    }

    /// Like [`Client::generate_insight`], but never fails.
    pub async fn insight_or_fallback(&self, model: &str, series: &[DayData]) -> InsightText {
        match self.generate_insight(model, series).await {
            Ok(text) => InsightText::Generated(text),
            Err(LlmError::EmptyResponse) => {
                tracing::warn!("insight response had no text");
                InsightText::Fallback(EMPTY_RESPONSE_MESSAGE)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to generate insight");
                InsightText::Fallback(COMMUNICATION_ERROR_MESSAGE)
            }
        }
    }
}

/// Generates an insight, degrading to a fixed message on any failure.
///
/// A missing or blank `api_key` is reported without touching the network.
pub async fn generate_insight_or_fallback(
    api_key: Option<&str>,
    model: &str,
    series: &[DayData],
) -> InsightText {
    let Some(api_key) = api_key.map(str::trim).filter(|key| !key.is_empty()) else {
        tracing::warn!("no API key configured for insights");
        return InsightText::Fallback(NOT_CONFIGURED_MESSAGE);
    };
    match Client::new(api_key) {
        Ok(client) => client.insight_or_fallback(model, series).await,
        Err(e) => {
            tracing::warn!(error = %e, "failed to create LLM client");
            InsightText::Fallback(COMMUNICATION_ERROR_MESSAGE)
        }
    }
}

#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

fn extract_text(blocks: Vec<ContentBlock>) -> Result<String, LlmError> {
    let pieces: Vec<String> = blocks
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
        .collect();
    let text = pieces.join("\n");
    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text.trim().to_string())
}

fn parse_api_error(body: &str) -> Option<LlmError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| LlmError::Api {
            message: payload.error.message,
        })
}

/// One summary line per day: average energy, productivity, sleep and peaks.
fn summarize_day(day: &DayData) -> String {
    let peaks = day
        .peak_slots()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "date: {}, average energy: {:.1}, productivity score: {}, sleep: {}h, peak slots: [{peaks}]",
        day.date,
        day.average_energy,
        day.total_productivity,
        day.sleep_hours(),
    )
}

fn build_insight_prompt(series: &[DayData]) -> String {
    let mut lines = Vec::new();
    lines.push(
        "I am tracking my circadian rhythm and energy levels on a 1-5 scale (1 = exhausted, 5 = peak)."
            .to_string(),
    );
    lines.push("Here is my data for the past few days:".to_string());
    lines.extend(recent(series, RECENT_DAYS).iter().map(summarize_day));
    lines.push(String::new());
    lines.push("Act as a health and productivity advisor and analyze my rhythm:".to_string());
    lines.push("1. Identify my most productive time window (peak hours).".to_string());
    lines.push("2. Point out recurring energy dips or low periods.".to_string());
    lines.push(
        "3. Give one concrete, actionable recommendation for managing my energy.".to_string(),
    );
    lines.push(String::new());
    lines.push("Requirements:".to_string());
    lines.push("- Keep it concise, under 200 words.".to_string());
    lines.push("- Positive, professional and encouraging tone.".to_string());
    lines.push("- Use Markdown; bold the key words.".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use cj_core::{EnergyLevel, EntryStore, Slot, SlotFields, weekly_series};

    fn series(days: u32) -> Vec<DayData> {
        let mut store = EntryStore::new();
        for day in 1..=days {
            let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
            store.upsert(
                &Utc,
                date,
                Slot::new(9, 0).unwrap(),
                SlotFields::energy(EnergyLevel::new(5).unwrap(), Vec::new()),
            );
            store.upsert(
                &Utc,
                date,
                Slot::new(14, 30).unwrap(),
                SlotFields::energy(EnergyLevel::new(2).unwrap(), Vec::new()),
            );
            store.upsert(&Utc, date, Slot::new(3, 0).unwrap(), SlotFields::sleep());
        }
        weekly_series(store.entries())
    }

    #[test]
    fn client_rejects_empty_api_key() {
        assert!(matches!(
            Client::new(""),
            Err(LlmError::InvalidApiKey { .. })
        ));
    }

    #[test]
    fn client_rejects_whitespace_api_key() {
        assert!(matches!(
            Client::new("   "),
            Err(LlmError::InvalidApiKey { .. })
        ));
    }

    #[test]
    fn client_accepts_valid_api_key() {
        assert!(Client::new("sk-ant-api03-valid-key").is_ok());
    }

    #[test]
    fn client_debug_redacts_api_key() {
        let client = Client::new("secret-key").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn summary_line_formats_day() {
        let series = series(1);
        insta::assert_snapshot!(
            summarize_day(&series[0]),
            @"date: 2024-01-01, average energy: 3.5, productivity score: 3.5, sleep: 0.5h, peak slots: [09:00]"
        );
    }

    #[test]
    fn prompt_covers_only_last_seven_days() {
        let prompt = build_insight_prompt(&series(9));
        assert!(!prompt.contains("date: 2024-01-02,"));
        assert!(prompt.contains("date: 2024-01-03,"));
        assert!(prompt.contains("date: 2024-01-09,"));
        assert_eq!(prompt.matches("date: ").count(), 7);
        assert!(prompt.contains("under 200 words"));
    }

    #[test]
    fn extract_text_joins_text_blocks() {
        let payload: MessageResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"**Peak** at 9."},{"type":"thinking","thinking":"x"},{"type":"text","text":"Rest at 14:30."}]}"#,
        )
        .unwrap();
        assert_eq!(
            extract_text(payload.content).unwrap(),
            "**Peak** at 9.\nRest at 14:30."
        );
    }

    #[test]
    fn extract_text_rejects_blank_content() {
        let payload: MessageResponse =
            serde_json::from_str(r#"{"content":[{"type":"text","text":"  "}]}"#).unwrap();
        assert!(matches!(
            extract_text(payload.content),
            Err(LlmError::EmptyResponse)
        ));
        assert!(matches!(extract_text(Vec::new()), Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn parse_api_error_reads_message() {
        let err = parse_api_error(r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#)
            .unwrap();
        assert!(matches!(err, LlmError::Api { message } if message == "invalid x-api-key"));
        assert!(parse_api_error("<html>").is_none());
    }

    #[tokio::test]
    async fn missing_api_key_falls_back_without_request() {
        let text = generate_insight_or_fallback(None, DEFAULT_MODEL, &series(2)).await;
        assert_eq!(text, InsightText::Fallback(NOT_CONFIGURED_MESSAGE));
        let text = generate_insight_or_fallback(Some("  "), DEFAULT_MODEL, &series(2)).await;
        assert!(!text.is_generated());
        assert_eq!(text.as_str(), NOT_CONFIGURED_MESSAGE);
    }

    #[tokio::test]
    async fn unreachable_endpoint_falls_back() {
        let client = Client::with_endpoint("sk-test", "http://127.0.0.1:9/v1/messages").unwrap();
        let text = client.insight_or_fallback(DEFAULT_MODEL, &series(1)).await;
        assert_eq!(text, InsightText::Fallback(COMMUNICATION_ERROR_MESSAGE));
    }
}
