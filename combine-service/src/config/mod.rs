use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Base URL of the Gemini generative-language API.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for combination prompts.
const DEFAULT_TEXT_MODEL: &str = "gemini-1.5-pro-latest";

#[derive(Debug, Clone, Deserialize)]
pub struct CombineConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub models: ModelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub api_key: Secret<String>,
    pub api_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Model for text generation (e.g., gemini-1.5-pro-latest)
    pub text_model: String,
}

impl CombineConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        // An absent API key is not a startup failure: the handler reports it
        // per-request as a server misconfiguration.
        Ok(CombineConfig {
            common,
            google: GoogleConfig {
                api_key: Secret::new(env::var("GEMINI_API_KEY").unwrap_or_default()),
                api_base_url: env::var("GEMINI_API_BASE_URL")
                    .unwrap_or_else(|_| GEMINI_API_BASE.to_string()),
            },
            models: ModelConfig {
                text_model: env::var("GEMINI_TEXT_MODEL")
                    .unwrap_or_else(|_| DEFAULT_TEXT_MODEL.to_string()),
            },
        })
    }
}
