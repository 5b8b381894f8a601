//! HTTP client for the vision-language model API
//!
//! The pipeline talks to the model through the [`VisionClient`] trait so
//! batch processing and tests can run against a mock. The production
//! implementation targets OpenRouter's chat-completions endpoint with a
//! bearer token and a data-URL image part.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::request::{
    ChatRequest, ChatResponse, ContentPart, ImageUrl, Message, MessageContent, SYSTEM_PROMPT,
    build_prompt,
};
use crate::app::services::image_loader::EncodedImage;
use crate::config::{ApiConfig, FieldSet};
use crate::{Error, Result};

/// Client for submitting a card image and receiving the model's reply text
pub trait VisionClient {
    /// Submit one image and return the raw reply content
    async fn extract_card_text(&self, image: &EncodedImage) -> Result<String>;
}

/// OpenRouter chat-completions client
pub struct OpenRouterClient {
    client: reqwest::Client,
    config: ApiConfig,
    prompt: String,
}

impl OpenRouterClient {
    /// Create a client for the given API configuration and active field set.
    ///
    /// Fails if no API key is configured; the parse-only command never
    /// constructs a client.
    pub fn new(config: ApiConfig, fields: &FieldSet) -> Result<Self> {
        if config.api_key.as_deref().unwrap_or("").trim().is_empty() {
            return Err(Error::configuration(
                "OpenRouter API key not provided".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::api_request("Failed to create HTTP client", Some(e)))?;

        Ok(Self {
            client,
            config,
            prompt: build_prompt(fields),
        })
    }

    fn request_body(&self, image: &EncodedImage) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message {
                    role: "system",
                    content: MessageContent::Text(SYSTEM_PROMPT.to_string()),
                },
                Message {
                    role: "user",
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: self.prompt.clone(),
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: image.data_url(),
                            },
                        },
                    ]),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    async fn send_once(&self, image: &EncodedImage) -> Result<reqwest::Response> {
        let key = self.config.api_key.as_deref().unwrap_or_default();

        self.client
            .post(&self.config.base_url)
            .bearer_auth(key)
            .header("HTTP-Referer", "https://localhost")
            .header("X-Title", "Medical Card Extractor")
            .json(&self.request_body(image))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::api_request(
                        format!(
                            "Request timed out after {}s",
                            self.config.request_timeout_secs
                        ),
                        Some(e),
                    )
                } else {
                    Error::api_request("API request failed", Some(e))
                }
            })
    }
}

/// Seconds to wait for a 429, honouring Retry-After when present
fn retry_after_secs(response: &reqwest::Response, fallback: u64) -> u64 {
    response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(fallback)
}

impl VisionClient for OpenRouterClient {
    async fn extract_card_text(&self, image: &EncodedImage) -> Result<String> {
        info!("Sending image {} to OpenRouter API", image.filename);

        let mut attempt = 0u32;
        let response = loop {
            attempt += 1;
            let response = self.send_once(image).await?;
            let status = response.status();
            debug!("API response status: {}", status);

            if status.as_u16() == 429 {
                if attempt >= self.config.max_retries {
                    return Err(Error::rate_limit_exhausted(attempt));
                }
                let wait = retry_after_secs(&response, self.config.retry_delay_secs);
                warn!(
                    "Rate limited (attempt {}/{}). Retrying after {} seconds",
                    attempt, self.config.max_retries, wait
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            break response;
        };

        let status = response.status();
        match status.as_u16() {
            401 => {
                return Err(Error::api_response(
                    401,
                    "Unauthorized: check your OpenRouter API key",
                ));
            }
            402 => {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::api_response(
                    402,
                    format!("Payment required: insufficient credits ({})", body),
                ));
            }
            _ if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::api_response(status.as_u16(), body));
            }
            _ => {}
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::response_format(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::response_format("reply carried no choices"))?;

        info!(
            "Extracted text from {}: '{}'",
            image.filename,
            content.trim()
        );
        Ok(content)
    }
}

/// Mock vision client for tests. Returns scripted replies in order,
/// repeating the last one when the script runs out.
pub struct MockVisionClient {
    replies: Mutex<VecDeque<String>>,
    last: String,
}

impl MockVisionClient {
    pub fn new(reply: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            last: reply.to_string(),
        }
    }

    pub fn with_replies(replies: Vec<String>) -> Self {
        let last = replies.last().cloned().unwrap_or_default();
        Self {
            replies: Mutex::new(replies.into()),
            last,
        }
    }
}

impl VisionClient for MockVisionClient {
    async fn extract_card_text(&self, _image: &EncodedImage) -> Result<String> {
        let mut replies = self.replies.lock().expect("mock reply lock poisoned");
        Ok(replies.pop_front().unwrap_or_else(|| self.last.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image() -> EncodedImage {
        EncodedImage {
            filename: "card.jpg".to_string(),
            mime_type: "image/jpeg",
            base64_data: "QUJD".to_string(),
        }
    }

    fn test_config(key: Option<&str>) -> ApiConfig {
        ApiConfig {
            api_key: key.map(|k| k.to_string()),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn client_requires_api_key() {
        assert!(OpenRouterClient::new(test_config(None), &FieldSet::all()).is_err());
        assert!(OpenRouterClient::new(test_config(Some("sk-test")), &FieldSet::all()).is_ok());
    }

    #[test]
    fn request_body_carries_prompt_and_image() {
        let client = OpenRouterClient::new(test_config(Some("sk-test")), &FieldSet::all()).unwrap();
        let body = client.request_body(&test_image());

        assert_eq!(body.messages.len(), 2);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(
            json["messages"][1]["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,QUJD"
        );
    }

    #[tokio::test]
    async fn mock_client_returns_scripted_replies_in_order() {
        let mock = MockVisionClient::with_replies(vec![
            "<age>34</age>".to_string(),
            "<age>55</age>".to_string(),
        ]);
        let image = test_image();

        assert_eq!(mock.extract_card_text(&image).await.unwrap(), "<age>34</age>");
        assert_eq!(mock.extract_card_text(&image).await.unwrap(), "<age>55</age>");
        // script exhausted; last reply repeats
        assert_eq!(mock.extract_card_text(&image).await.unwrap(), "<age>55</age>");
    }
}
