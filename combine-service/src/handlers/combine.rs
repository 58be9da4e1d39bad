use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::services::metrics;
use crate::services::providers::ProviderError;
use crate::startup::AppState;
use service_core::error::AppError;

/// Persona prompt for the crafting assistant: a 1-3 word item name,
/// prefixed with a relevant emoji.
const SYSTEM_PROMPT: &str = "You are a helpful assistant for a crafting game. The user will provide two items. Respond with the single, most logical item that would result from combining them. Your response should be a short, 1-3 word answer, and must start with a relevant emoji. For example, if the user combines '💧 Water' and '🔥 Fire', a good response would be '💨 Steam'.";

#[derive(Debug, Deserialize)]
pub struct CombineRequest {
    #[serde(default)]
    pub element1: Option<String>,
    #[serde(default)]
    pub element2: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CombineResponse {
    pub result: String,
}

/// Present means non-null and non-empty. Whitespace-only values pass the
/// presence check and are trimmed during prompt construction.
fn is_present(field: &Option<String>) -> bool {
    matches!(field, Some(value) if !value.is_empty())
}

/// Build the user query for a pair of elements.
fn user_query(element1: &str, element2: &str) -> String {
    format!("Combine: {} and {}", element1.trim(), element2.trim())
}

#[tracing::instrument(skip(state, request))]
pub async fn combine(
    State(state): State<AppState>,
    Json(request): Json<CombineRequest>,
) -> Result<Json<CombineResponse>, AppError> {
    if !is_present(&request.element1) || !is_present(&request.element2) {
        metrics::record_combine_request("bad_request");
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Missing element1 or element2 in request body"
        )));
    }

    if !state.text_provider.is_configured() {
        metrics::record_combine_request("not_configured");
        return Err(AppError::Configuration(
            "API key not configured on the server".to_string(),
        ));
    }

    let element1 = request.element1.as_deref().unwrap_or_default();
    let element2 = request.element2.as_deref().unwrap_or_default();
    let query = user_query(element1, element2);

    let started = Instant::now();
    let result = state.text_provider.generate(SYSTEM_PROMPT, &query).await;
    metrics::record_provider_latency(
        "gemini",
        &state.config.models.text_model,
        started.elapsed().as_secs_f64(),
    );

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            metrics::record_combine_request("provider_error");
            metrics::record_provider_error("gemini", err.kind());
            return Err(map_provider_error(err));
        }
    };

    let Some(text) = response.text else {
        metrics::record_combine_request("invalid_response");
        metrics::record_provider_error("gemini", "missing_text");
        tracing::error!("Gemini response contained no generated text");
        return Err(invalid_response());
    };

    tracing::info!(
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "Combination generated"
    );
    metrics::record_combine_request("ok");

    Ok(Json(CombineResponse {
        result: text.trim().to_string(),
    }))
}

/// Map a provider failure to the client-facing error, logging the raw
/// upstream detail server-side only.
fn map_provider_error(err: ProviderError) -> AppError {
    match err {
        ProviderError::NotConfigured(_) => AppError::Configuration(
            "API key not configured on the server".to_string(),
        ),
        ProviderError::Upstream { status, body } => {
            tracing::error!(status, body = %body, "Gemini API error");
            AppError::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message: "Failed to fetch from Gemini API".to_string(),
            }
        }
        ProviderError::Network(err) => {
            tracing::error!(error = %err, "Failed to reach Gemini API");
            AppError::Upstream {
                status: StatusCode::BAD_GATEWAY,
                message: "Failed to fetch from Gemini API".to_string(),
            }
        }
        ProviderError::InvalidResponse(err) => {
            tracing::error!(error = %err, "Failed to parse Gemini response");
            invalid_response()
        }
    }
}

fn invalid_response() -> AppError {
    AppError::Upstream {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Invalid response from Gemini API".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CombineConfig, GoogleConfig, ModelConfig};
    use crate::services::providers::mock::MockTextProvider;
    use crate::services::providers::TextProvider;
    use secrecy::Secret;
    use service_core::config::Config as CoreConfig;
    use std::sync::Arc;

    fn test_state(provider_enabled: bool) -> AppState {
        AppState {
            config: CombineConfig {
                common: CoreConfig { port: 0 },
                google: GoogleConfig {
                    api_key: Secret::new("test-key".to_string()),
                    api_base_url: "http://127.0.0.1:65535".to_string(),
                },
                models: ModelConfig {
                    text_model: "gemini-1.5-pro-latest".to_string(),
                },
            },
            text_provider: Arc::new(MockTextProvider::new(provider_enabled))
                as Arc<dyn TextProvider>,
        }
    }

    fn request(element1: Option<&str>, element2: Option<&str>) -> CombineRequest {
        CombineRequest {
            element1: element1.map(String::from),
            element2: element2.map(String::from),
        }
    }

    #[test]
    fn presence_check_preserves_truthiness_semantics() {
        assert!(!is_present(&None));
        assert!(!is_present(&Some(String::new())));
        // Whitespace-only values are "present"
        assert!(is_present(&Some("   ".to_string())));
        assert!(is_present(&Some("💧 Water".to_string())));
    }

    #[test]
    fn user_query_trims_both_elements() {
        assert_eq!(
            user_query("  💧 Water ", "🔥 Fire\n"),
            "Combine: 💧 Water and 🔥 Fire"
        );
    }

    #[tokio::test]
    async fn missing_element_is_rejected() {
        let result = combine(
            State(test_state(true)),
            Json(request(Some("💧 Water"), None)),
        )
        .await;

        let err = result.expect_err("Expected a bad request error");
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(err.to_string().contains("Missing element1 or element2"));
    }

    #[tokio::test]
    async fn empty_element_is_rejected() {
        let result = combine(
            State(test_state(true)),
            Json(request(Some(""), Some("🔥 Fire"))),
        )
        .await;

        assert!(matches!(
            result.expect_err("Expected a bad request error"),
            AppError::BadRequest(_)
        ));
    }

    #[tokio::test]
    async fn unconfigured_provider_is_a_server_error() {
        let result = combine(
            State(test_state(false)),
            Json(request(Some("💧 Water"), Some("🔥 Fire"))),
        )
        .await;

        match result.expect_err("Expected a configuration error") {
            AppError::Configuration(message) => {
                assert_eq!(message, "API key not configured on the server");
            }
            other => panic!("Unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn valid_elements_produce_a_result() {
        let result = combine(
            State(test_state(true)),
            Json(request(Some(" 💧 Water "), Some("🔥 Fire"))),
        )
        .await
        .expect("Expected a successful combination");

        assert_eq!(
            result.0.result,
            "🧪 Mock result for: Combine: 💧 Water and 🔥 Fire"
        );
    }
}
