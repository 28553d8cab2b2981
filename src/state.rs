use crate::config::AppConfig;
use crate::generation::{CompletionClient, OpenAiClient};
use crate::store::{self, DataStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DataStore>,
    pub completion: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn init(config: AppConfig) -> anyhow::Result<Self> {
        let store = Arc::new(store::connect(&config.supabase)?) as Arc<dyn DataStore>;
        let completion =
            Arc::new(OpenAiClient::new(config.openai.clone())) as Arc<dyn CompletionClient>;

        Ok(Self::from_parts(Arc::new(config), store, completion))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn DataStore>,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            config,
            store,
            completion,
        }
    }

    #[cfg(test)]
    pub fn fake(store: Arc<dyn DataStore>, completion: Arc<dyn CompletionClient>) -> Self {
        use crate::config::{OpenAiConfig, SupabaseConfig};

        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: crate::config::DEFAULT_PORT,
            supabase: SupabaseConfig {
                url: "https://fake.supabase.local".into(),
                key: "fake".into(),
            },
            openai: OpenAiConfig {
                api_key: "fake".into(),
                model: "gpt-test".into(),
                base_url: "https://fake.openai.local/v1".into(),
            },
        });
        Self::from_parts(config, store, completion)
    }
}
