//! Request and response payload types for the OpenRouter chat-completions API

use serde::{Deserialize, Serialize};

use crate::app::models::CardField;
use crate::config::FieldSet;

/// Request body for the chat-completions endpoint
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// One chat message; user messages carry mixed text and image parts
#[derive(Debug, Serialize)]
pub struct Message {
    pub role: &'static str,
    pub content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Response body from the chat-completions endpoint
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: String,
}

/// System message framing the extraction task
pub const SYSTEM_PROMPT: &str = "You are an AI assistant specialized in extracting specific \
     information from images. Be concise and direct.";

fn field_instruction(field: CardField) -> &'static str {
    match field {
        CardField::PatientName => "the patient's full name (first and last name)",
        CardField::Age => "the patient's age in years",
        CardField::Sex => "the patient's sex as a single letter, M or F",
        CardField::Telephone => "the telephone number, exactly 10 digits",
        CardField::Address => "the patient's address or city",
        CardField::Kebele => "the kebele number (a 2-digit code)",
        CardField::Date => "the card date in Ethiopian DD/MM/YYYY format",
    }
}

/// Build the extraction prompt for the active field set.
///
/// The prompt asks the model to wrap each value in the field's tag pair and
/// to leave a tag empty when the value cannot be read; the parser's fallback
/// chain handles models that ignore the format anyway.
pub fn build_prompt(fields: &FieldSet) -> String {
    let mut prompt = String::from(
        "This is a medical card. Extract the following information from the image:\n",
    );

    for &field in fields.fields() {
        prompt.push_str(&format!("- {}: {}\n", field.tag(), field_instruction(field)));
    }

    prompt.push_str("\nRespond using exactly this format, with no other text:\n");
    for &field in fields.fields() {
        prompt.push_str(&format!("<{tag}></{tag}>", tag = field.tag()));
    }
    prompt.push_str(
        "\n\nPut each value between its tags. If a value cannot be read from the card, \
         leave that tag empty. The card may be filled in Amharic; transcribe names as \
         written and report sex as M or F.",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_only_active_fields() {
        let fields = FieldSet::from_fields(&[CardField::Age, CardField::Sex]);
        let prompt = build_prompt(&fields);
        assert!(prompt.contains("<age></age>"));
        assert!(prompt.contains("<sex></sex>"));
        assert!(!prompt.contains("<telephone>"));
    }

    #[test]
    fn full_prompt_covers_every_tag() {
        let prompt = build_prompt(&FieldSet::all());
        for field in CardField::ALL {
            assert!(prompt.contains(&format!("<{}>", field.tag())));
        }
    }

    #[test]
    fn content_parts_serialize_with_type_tags() {
        let part = ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: "data:image/jpeg;base64,AAAA".to_string(),
            },
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["type"], "image_url");
        assert_eq!(json["image_url"]["url"], "data:image/jpeg;base64,AAAA");
    }
}
