//! AI scholarship advisor: one chat-completion call per run against an
//! OpenAI-compatible endpoint (Groq by default).
//!
//! Failures never escape: a missing key, a missing topic or a failed call all
//! come back as human-readable text that ends up in the report.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{AdvisorConfig, HttpConfig};

pub const NO_TOPIC_MESSAGE: &str = "Tidak ada informasi beasiswa untuk dianalisis AI.";
pub const MISSING_KEY_MESSAGE: &str = "Error: GROQ_API_KEY tidak ditemukan.";
const ERROR_PREFIX: &str = "Error AI Advisor (Groq)";

pub const SYSTEM_PROMPT: &str = "Kamu adalah Konsultan Beasiswa Luar Negeri yang ahli dan 'Insider'. Kamu sangat pintar menemukan celah, syarat tersembunyi, dan strategi khusus agar pendaftar bisa lolos beasiswa full funded.";

/// User prompt asking for summary, requirements, deadline, strategy and tips.
pub fn build_user_prompt(topic: &str) -> String {
    format!(
        r#"Berdasarkan informasi beasiswa berikut: "{topic}", buatkan analisis mendalam:

🎯 RINGKASAN: (Apa beasiswanya, untuk siapa, dan apa cakupannya).
📝 SYARAT UTAMA: (Sebutkan 3-4 syarat paling penting).
⏳ DEADLINE & JADWAL: (Kapan pendaftaran dibuka/ditutup jika ada).
🔍 CELAH & STRATEGI: (Berikan analisis 'insider' tentang celah sekecil apapun, syarat tersembunyi, atau strategi khusus untuk memenangkan beasiswa ini).
💡 TIPS LOLOS: (Berikan 2 tips praktis yang jarang diketahui orang lain).

Gunakan bahasa Indonesia yang santai, profesional, dan penuh wawasan 'insider'."#
    )
}

/// Low-level chat backend. Separated so tests can count calls without HTTP.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
    fn provider_name(&self) -> &'static str;
}

pub type DynChatClient = Arc<dyn ChatClient>;

/// Groq chat completions (OpenAI wire format).
pub struct GroqClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl GroqClient {
    pub fn new(api_key: String, cfg: &AdvisorConfig, http_cfg: &HttpConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("scholarship-tracker/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(http_cfg.timeout_secs.min(10)))
            // LLM answers take longer than page fetches.
            .timeout(Duration::from_secs(http_cfg.timeout_secs.max(60)))
            .build()
            .context("building groq http client")?;
        Ok(Self {
            http,
            api_key,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ids of the models available to this API key, sorted.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let body = self
            .http
            .get(format!("{}/models", self.api_base))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("groq models request")?
            .error_for_status()
            .context("groq models non-2xx")?
            .text()
            .await
            .context("groq models body")?;
        parse_model_ids(&body)
    }
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

/// `{"data":[{"id":..}, ..]}` to sorted model ids.
fn parse_model_ids(body: &str) -> Result<Vec<String>> {
    let list: ModelList = serde_json::from_str(body).context("parsing models list")?;
    let mut ids: Vec<String> = list.data.into_iter().map(|m| m.id).collect();
    ids.sort();
    Ok(ids)
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, system: &'a str, user: &'a str) -> Self {
        Self {
            model,
            messages: vec![
                Msg {
                    role: "system",
                    content: system,
                },
                Msg {
                    role: "user",
                    content: user,
                },
            ],
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    content: Option<String>,
}

/// Content of the first choice. No choices or a null content is an error.
fn first_choice(body: &str) -> Result<String> {
    let resp: ChatResponse = serde_json::from_str(body).context("parsing chat response")?;
    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("response contained no choices"))?;
    choice
        .message
        .content
        .ok_or_else(|| anyhow!("first choice has no content"))
}

#[async_trait]
impl ChatClient for GroqClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let req = ChatRequest::new(&self.model, system, user);

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("chat request")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("HTTP {status}: {}", body.trim()));
        }

        let body = resp.text().await.context("chat response body")?;
        first_choice(&body)
    }

    fn provider_name(&self) -> &'static str {
        "groq"
    }
}

/// Advisor facade used by the orchestrator. `client == None` means no key.
#[derive(Clone)]
pub struct AiAdvisor {
    client: Option<DynChatClient>,
}

impl AiAdvisor {
    pub fn new(client: Option<DynChatClient>) -> Self {
        Self { client }
    }

    /// Build from config; an absent key yields an advisor that never calls out.
    pub fn from_config(
        api_key: Option<String>,
        cfg: &AdvisorConfig,
        http_cfg: &HttpConfig,
    ) -> Result<Self> {
        let client = match api_key {
            Some(key) => Some(Arc::new(GroqClient::new(key, cfg, http_cfg)?) as DynChatClient),
            None => None,
        };
        Ok(Self { client })
    }

    pub async fn advise(&self, topic: Option<&str>) -> String {
        let Some(topic) = topic.map(str::trim).filter(|t| !t.is_empty()) else {
            return NO_TOPIC_MESSAGE.to_string();
        };
        let Some(client) = &self.client else {
            tracing::warn!("advisor skipped: {MISSING_KEY_MESSAGE}");
            return MISSING_KEY_MESSAGE.to_string();
        };

        tracing::info!(provider = client.provider_name(), %topic, "asking AI advisor");
        match client.complete(SYSTEM_PROMPT, &build_user_prompt(topic)).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!(error = ?e, provider = client.provider_name(), "advisor call failed");
                format!("{ERROR_PREFIX}: {e:#}")
            }
        }
    }
}
