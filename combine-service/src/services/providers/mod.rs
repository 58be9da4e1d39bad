//! AI provider abstractions and implementations.
//!
//! This module provides a trait-based abstraction for text providers,
//! allowing easy swapping between backends (Gemini, mock).

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Upstream API error ({status})")]
    Upstream { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unparseable upstream response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::Upstream { .. } => "upstream_status",
            ProviderError::Network(_) => "network",
            ProviderError::InvalidResponse(_) => "invalid_response",
        }
    }
}

/// Result of a provider response.
pub struct ProviderResponse {
    /// Generated text, if the provider returned any.
    pub text: Option<String>,

    /// Input tokens consumed.
    pub input_tokens: i32,

    /// Output tokens generated.
    pub output_tokens: i32,
}

/// Trait for text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Whether the provider has the credentials it needs to make calls.
    fn is_configured(&self) -> bool;

    /// Generate a text response for a system prompt and user query.
    async fn generate(
        &self,
        system_prompt: &str,
        user_query: &str,
    ) -> Result<ProviderResponse, ProviderError>;
}
