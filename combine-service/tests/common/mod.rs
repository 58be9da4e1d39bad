use combine_service::config::{CombineConfig, GoogleConfig, ModelConfig};
use combine_service::services::init_metrics;
use combine_service::startup::Application;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::Once;

// Initialize metrics once for all tests
static INIT_METRICS: Once = Once::new();

pub struct TestApp {
    pub address: String,
}

impl TestApp {
    /// Spawn the service on a random port, pointed at the given Gemini
    /// endpoint (normally a wiremock server).
    pub async fn spawn(api_key: &str, api_base_url: &str) -> Self {
        INIT_METRICS.call_once(init_metrics);

        let config = CombineConfig {
            common: CoreConfig { port: 0 },
            google: GoogleConfig {
                api_key: Secret::new(api_key.to_string()),
                api_base_url: api_base_url.to_string(),
            },
            models: ModelConfig {
                text_model: "gemini-1.5-pro-latest".to_string(),
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the HTTP server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }

        TestApp { address }
    }
}
