//! CLI entry point: profile one person from their profile URLs and print
//! the synthesized persona as JSON.

use std::sync::Arc;

use anyhow::{bail, Result};
use shadowbox_common::Config;
use shadowbox_profiler::adapters::AdapterSet;
use shadowbox_profiler::synthesizer::OpenRouterSynthesizer;
use shadowbox_profiler::tasks::NoopTasks;
use shadowbox_profiler::ProfilePipeline;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        bail!("usage: profiler <profile-url>...");
    }

    let config = Config::from_env();
    config.log_redacted();

    let synthesizer = OpenRouterSynthesizer::new(
        config.openrouter_api_key.clone(),
        &config.profiler_model,
    );
    let pipeline = ProfilePipeline::new(
        AdapterSet::from_config(&config),
        Arc::new(synthesizer),
        Arc::new(NoopTasks),
    );

    let profile = pipeline.build_profile("subject", &urls).await;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}
