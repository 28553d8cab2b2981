use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3002;
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Credentials for the hosted data store.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub supabase: SupabaseConfig,
    pub openai: OpenAiConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let supabase = SupabaseConfig {
            url: required("SUPABASE_URL")?,
            key: required("SUPABASE_KEY")?,
        };
        let openai = OpenAiConfig {
            api_key: required("OPENAI_API_KEY")?,
            model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            base_url: lookup("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.into()),
        };

        let port = match lookup("APP_PORT") {
            Some(v) => v
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "APP_PORT", value: v })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            supabase,
            openai,
        })
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_are_applied() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://db.example.co"),
            ("SUPABASE_KEY", "anon"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .expect("config should load");

        assert_eq!(cfg.port, 3002);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.openai.model, "gpt-3.5-turbo");
        assert_eq!(cfg.openai.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn missing_store_key_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://db.example.co"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SUPABASE_KEY")));
    }

    #[test]
    fn empty_store_url_counts_as_missing() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "  "),
            ("SUPABASE_KEY", "anon"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "SUPABASE_URL must be set");
    }

    #[test]
    fn bad_port_is_reported() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://db.example.co"),
            ("SUPABASE_KEY", "anon"),
            ("OPENAI_API_KEY", "sk-test"),
            ("APP_PORT", "http"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "APP_PORT", .. }));
    }
}
