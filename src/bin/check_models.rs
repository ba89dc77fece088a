//! Lists the chat models available to GROQ_API_KEY, marking the configured one.

use anyhow::{anyhow, Result};
use scholarship_tracker::advisor::GroqClient;
use scholarship_tracker::config::ENV_GROQ_API_KEY;
use scholarship_tracker::{init_tracing, Secrets, TrackerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = TrackerConfig::load_default()?;
    let key = Secrets::from_env()
        .groq_api_key
        .ok_or_else(|| anyhow!("{ENV_GROQ_API_KEY} tidak ditemukan."))?;

    let client = GroqClient::new(key, &cfg.advisor, &cfg.http)?;
    tracing::info!("checking available models");
    let models = client.list_models().await?;

    for id in &models {
        let marker = if id == client.model() { " (configured)" } else { "" };
        println!("Model: {id}{marker}");
    }
    if !models.iter().any(|m| m == client.model()) {
        tracing::warn!(model = client.model(), "configured model is not in the list");
    }
    Ok(())
}
