//! Vision-language model API client
//!
//! Thin wrapper over the OpenRouter chat-completions endpoint: builds the
//! extraction prompt for the active field set, submits the base64 image as
//! a data URL, and returns the model's raw reply for the response parser.
//!
//! - [`client`] - `VisionClient` trait, OpenRouter implementation, mock
//! - [`request`] - typed request/response payloads and prompt builder

pub mod client;
pub mod request;

// Re-export main types for easy access
pub use client::{MockVisionClient, OpenRouterClient, VisionClient};
pub use request::build_prompt;
