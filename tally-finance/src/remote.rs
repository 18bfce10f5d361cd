//! OpenAI-compatible remote classifier.
//!
//! Sends one chat-completions request per transaction and expects a single
//! JSON object back: `{"category": "...", "confidence": 0.95, "reasoning": "..."}`.
//! The category is checked against the closed vocabulary before use.

use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tally_core::Category;

use crate::classifier::{CategoryClassifier, Classification, ClassificationRequest};
use crate::error::ClassifyError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: String::new(),
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RemoteClassifier {
    config: RemoteConfig,
    client: reqwest::Client,
}

impl RemoteClassifier {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

/// Prompt listing the closed vocabulary and the single-object reply format
pub fn build_prompt(request: &ClassificationRequest) -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Act as a Senior Accountant. Classify the following bank transaction for a small business.

TRANSACTION:
- Description: "{description}"
- Amount: ${amount}
- Type: {direction}

AVAILABLE CATEGORIES:
{categories}

RULES:
1. Respond ONLY with a JSON object in this format: {{"category": "Category Name", "confidence": 0.95, "reasoning": "Brief explanation"}}
2. Choose the most specific category.
3. "Income" is for DEPOSITS that look like sales or revenue.
4. "Transfers" is for internal money movement (Zelle, Transfers, Credit Card Payments).
5. "Software & Tech" includes anything like Amazon Web Services, Google, Github, etc.
6. "Rent & HOA" includes hampton, community, cvp, vendor pay, etc."#,
        description = request.description,
        amount = request.amount,
        direction = request.direction,
    )
}

#[derive(Deserialize)]
struct RawReply {
    category: String,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Strip a surrounding ```json fence, if any
fn strip_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Parse and validate the model's reply text
pub fn parse_reply(content: &str) -> Result<Classification, ClassifyError> {
    let raw: RawReply = serde_json::from_str(strip_fence(content))
        .map_err(|e| ClassifyError::Malformed(format!("{e}: {content}")))?;

    let category = Category::from_label(&raw.category).unwrap_or_else(|| {
        tracing::debug!(label = %raw.category, "classifier returned unknown category");
        Category::Uncategorized
    });

    Ok(Classification {
        category,
        confidence: raw.confidence.unwrap_or(0.0).clamp(0.0, 1.0),
        reasoning: raw.reasoning,
    })
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: Option<String>,
}

impl CategoryClassifier for RemoteClassifier {
    async fn classify(&self, request: &ClassificationRequest) -> Result<Classification, ClassifyError> {
        let body = Req {
            model: &self.config.model,
            messages: vec![Msg {
                role: "user",
                content: build_prompt(request),
            }],
            temperature: self.config.temperature,
        };

        let resp = self
            .client
            .post(self.endpoint())
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClassifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let out: Resp = resp.json().await?;
        let content = out
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| ClassifyError::Malformed("empty choices".to_string()))?;

        parse_reply(content)
    }
}
