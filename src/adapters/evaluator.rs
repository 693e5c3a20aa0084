use crate::domain::model::{BusinessRecord, EvaluationVerdict};
use crate::domain::ports::BusinessEvaluator;
use crate::utils::error::{LeadGenError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_OPENROUTER_BASE: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Website-need evaluator backed by an OpenRouter chat-completions model.
///
/// One call per business, no retry; the pipeline applies the forced-negative
/// verdict when this returns an error.
pub struct OpenRouterEvaluator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    referer: Option<String>,
    app_title: Option<String>,
}

impl OpenRouterEvaluator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_OPENROUTER_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            referer: None,
            app_title: None,
        }
    }

    /// Set a custom base URL (for tests and proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Optional HTTP-Referer header identifying the calling site.
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Optional X-Title header identifying the calling application.
    pub fn with_app_title(mut self, title: impl Into<String>) -> Self {
        self.app_title = Some(title.into());
        self
    }
}

#[async_trait]
impl BusinessEvaluator for OpenRouterEvaluator {
    async fn evaluate(&self, business: &BusinessRecord) -> Result<EvaluationVerdict> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "You are a helpful assistant that outputs JSON.".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(business),
                },
            ],
            temperature: 0.3,
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");
        if let Some(referer) = &self.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.app_title {
            builder = builder.header("X-Title", title);
        }

        let response = builder.json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LeadGenError::EvaluationError {
                message: format!("chat completion returned {}: {}", status, body),
            });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LeadGenError::EvaluationError {
                message: "no choices in chat completion response".to_string(),
            })?;

        parse_verdict(&content)
    }
}

/// Fixed evaluation prompt embedding the record's fields and the static
/// scoring criteria.
fn build_prompt(business: &BusinessRecord) -> String {
    let rating = business
        .rating
        .map(|r| r.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let reviews = business
        .reviews
        .map(|r| r.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        r#"You are a professional B2B lead researcher. Analyze the following business and decide if it needs a new or improved website.

Business Details:
- Name: {name}
- Category: {category}
- Location: {location}
- Has website? {has_website}
- Google Rating: {rating}
- Number of Reviews: {reviews}
- Phone available? {has_phone}

High-Priority Criteria (businesses with strong growth potential):
- 50+ Google reviews
- Active customers (implied by reviews)
- Physical presence
- Legitimate business
- Website would generate real revenue or improve operations (booking, credibility, visibility)

Skip:
- Small kirana stores, paan shops, street vendors, very small rural shops with no digital presence, businesses with low customer traffic.

Also consider:
- If they have only an Instagram page or JustDial listing but no website -> immediate opportunity.
- If they have a broken website or no booking form -> immediate opportunity.

Return a JSON object with the following fields:
- "needs_website": true/false
- "priority": "High" / "Medium" / "Low"
- "reasoning": short explanation why they need (or don't need) a website
- "has_online_presence": "none" / "social_only" / "basic_website" / "good_website"

Only include businesses that need a website in the final output. If they don't need a website, set needs_website to false."#,
        name = business.name,
        category = business.category,
        location = business.location,
        has_website = if business.has_website() { "Yes" } else { "No" },
        rating = rating,
        reviews = reviews,
        has_phone = if business.has_phone() { "Yes" } else { "No" },
    )
}

/// Parse the verdict JSON, tolerating a fenced ```json block around it.
fn parse_verdict(content: &str) -> Result<EvaluationVerdict> {
    serde_json::from_str(content)
        .or_else(|_| {
            let stripped = content
                .trim()
                .trim_start_matches("```json")
                .trim_start_matches("```")
                .trim_end_matches("```")
                .trim();
            serde_json::from_str(stripped)
        })
        .map_err(LeadGenError::SerializationError)
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{PresenceLevel, Priority};
    use httpmock::prelude::*;

    fn sample_business() -> BusinessRecord {
        BusinessRecord {
            name: "Sunrise Coaching Classes".to_string(),
            category: "Coaching Institutes".to_string(),
            location: "Varanasi, Uttar Pradesh".to_string(),
            phone: Some("+91 98765 43210".to_string()),
            website: None,
            rating: Some(4.6),
            reviews: Some(75),
            address: None,
            hours: None,
            gps_coordinates: None,
            data_id: None,
        }
    }

    fn verdict_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    #[test]
    fn test_prompt_embeds_record_fields() {
        let prompt = build_prompt(&sample_business());
        assert!(prompt.contains("Name: Sunrise Coaching Classes"));
        assert!(prompt.contains("Category: Coaching Institutes"));
        assert!(prompt.contains("Location: Varanasi, Uttar Pradesh"));
        assert!(prompt.contains("Has website? No"));
        assert!(prompt.contains("Phone available? Yes"));
        assert!(prompt.contains("Number of Reviews: 75"));
        assert!(prompt.contains("50+ Google reviews"));
    }

    #[test]
    fn test_parse_verdict_plain_and_fenced() {
        let raw = r#"{"needs_website": true, "priority": "Medium", "reasoning": "only social", "has_online_presence": "social_only"}"#;
        let plain = parse_verdict(raw).unwrap();
        assert_eq!(plain.priority, Priority::Medium);

        let fenced = parse_verdict(&format!("```json\n{}\n```", raw)).unwrap();
        assert_eq!(fenced.has_online_presence, PresenceLevel::SocialOnly);
    }

    #[test]
    fn test_parse_verdict_rejects_garbage() {
        assert!(parse_verdict("not json at all").is_err());
        assert!(parse_verdict(r#"{"needs_website": true}"#).is_err());
    }

    #[tokio::test]
    async fn test_evaluate_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("Authorization", "Bearer test-key")
                .header("HTTP-Referer", "https://example.test")
                .header("X-Title", "LeadGen AI Agent")
                .body_contains("Sunrise Coaching Classes")
                .body_contains("\"temperature\":0.3")
                .body_contains("json_object");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(verdict_body(
                    r#"{"needs_website": true, "priority": "High", "reasoning": "no website, strong reviews", "has_online_presence": "none"}"#,
                ));
        });

        let evaluator = OpenRouterEvaluator::new("test-key")
            .with_base_url(server.url(""))
            .with_referer("https://example.test")
            .with_app_title("LeadGen AI Agent");

        let verdict = evaluator.evaluate(&sample_business()).await.unwrap();

        api_mock.assert();
        assert!(verdict.needs_website);
        assert_eq!(verdict.priority, Priority::High);
        assert_eq!(verdict.has_online_presence, PresenceLevel::None);
    }

    #[tokio::test]
    async fn test_evaluate_http_failure_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(429).body("rate limited");
        });

        let evaluator = OpenRouterEvaluator::new("test-key").with_base_url(server.url(""));
        let err = evaluator.evaluate(&sample_business()).await.unwrap_err();

        match err {
            LeadGenError::EvaluationError { message } => {
                assert!(message.contains("429"));
            }
            other => panic!("expected EvaluationError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_evaluate_malformed_verdict_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(verdict_body("I think they probably need a website."));
        });

        let evaluator = OpenRouterEvaluator::new("test-key").with_base_url(server.url(""));
        assert!(evaluator.evaluate(&sample_business()).await.is_err());
    }

    #[tokio::test]
    async fn test_evaluate_empty_choices_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"choices": []}));
        });

        let evaluator = OpenRouterEvaluator::new("test-key").with_base_url(server.url(""));
        assert!(evaluator.evaluate(&sample_business()).await.is_err());
    }
}
