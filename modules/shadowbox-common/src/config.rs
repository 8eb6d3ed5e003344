use std::env;

use tracing::info;

/// Application configuration loaded from environment variables.
///
/// Every upstream credential is optional: a missing key degrades the matching
/// source to soft "no data" results instead of refusing to start.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// SocialData.tools API key (Twitter profile lookups).
    pub socialdata_api_key: Option<String>,

    /// Apify token (Instagram, LinkedIn, Facebook actors).
    pub apify_token: Option<String>,

    /// OpenRouter API key (persona synthesis).
    pub openrouter_api_key: Option<String>,

    /// Model used for persona synthesis.
    pub profiler_model: String,
}

const DEFAULT_PROFILER_MODEL: &str = "openai/gpt-5-mini";

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            socialdata_api_key: optional_env("SOCIALDATA_API_KEY"),
            apify_token: optional_env("APIFY_API_TOKEN"),
            openrouter_api_key: optional_env("OPENROUTER_API_KEY"),
            profiler_model: env::var("PROFILER_MODEL")
                .unwrap_or_else(|_| DEFAULT_PROFILER_MODEL.to_string()),
        }
    }

    /// Log which credentials are present without echoing their values.
    pub fn log_redacted(&self) {
        info!(
            socialdata = self.socialdata_api_key.is_some(),
            apify = self.apify_token.is_some(),
            openrouter = self.openrouter_api_key.is_some(),
            model = self.profiler_model.as_str(),
            "Config loaded"
        );
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
