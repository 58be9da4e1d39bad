//! Mock provider implementations for testing.

use super::{ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;

/// Mock text provider for testing.
pub struct MockTextProvider {
    enabled: bool,
}

impl MockTextProvider {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn is_configured(&self) -> bool {
        self.enabled
    }

    async fn generate(
        &self,
        _system_prompt: &str,
        user_query: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ));
        }

        Ok(ProviderResponse {
            text: Some(format!("🧪 Mock result for: {}", user_query)),
            input_tokens: user_query.len() as i32 / 4,
            output_tokens: 10,
        })
    }
}
