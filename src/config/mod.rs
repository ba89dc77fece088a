// src/config/mod.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "TRACKER_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/tracker.toml";

pub const ENV_GROQ_API_KEY: &str = "GROQ_API_KEY";
pub const ENV_DISCORD_WEBHOOK: &str = "DISCORD_WEBHOOK";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Everything that is not a secret. Every field has a default so a partial
/// (or missing) `config/tracker.toml` still yields a working setup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    pub report_path: PathBuf,
    pub http: HttpConfig,
    pub embassy: EmbassyConfig,
    pub news: NewsConfig,
    pub listing: ListingConfig,
    pub advisor: AdvisorConfig,
    pub notify: NotifyConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            report_path: PathBuf::from("latest_report.md"),
            http: HttpConfig::default(),
            embassy: EmbassyConfig::default(),
            news: NewsConfig::default(),
            listing: ListingConfig::default(),
            advisor: AdvisorConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

/// MEXT status page on the Embassy of Japan site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbassyConfig {
    pub url: String,
    pub title: String,
    pub label: String,
    /// Line marker that carries the registration period.
    pub marker: String,
    pub fallback_status: String,
}

impl Default for EmbassyConfig {
    fn default() -> Self {
        Self {
            url: "https://www.id.emb-japan.go.jp/itpr_id/sch_gakubu.html".to_string(),
            title: "Beasiswa MEXT (Monbukagakusho) - Gakubu (S1)".to_string(),
            label: "Embassy of Japan".to_string(),
            marker: "Masa Pendaftaran".to_string(),
            fallback_status: "Belum Diketahui / Cek Link".to_string(),
        }
    }
}

/// Google News RSS search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NewsConfig {
    pub search_url: String,
    pub queries: Vec<String>,
    pub hl: String,
    pub gl: String,
    pub ceid: String,
    pub label: String,
    pub max_items: usize,
    pub dedup_titles: bool,
    /// Best-effort og:image lookup on every linked article.
    pub fetch_images: bool,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            search_url: "https://news.google.com/rss/search".to_string(),
            queries: vec![
                r#"scholarship "fully funded" OR "full scholarship" 2025 2026"#.to_string(),
                r#"beasiswa "biaya 0 rupiah" OR "beasiswa penuh" terbaru"#.to_string(),
                r#"scholarship "no application fee" OR "no IELTS" fully funded"#.to_string(),
                r#"beasiswa "tanpa wawancara" OR "tanpa TOEFL" luar negeri"#.to_string(),
            ],
            hl: "id".to_string(),
            gl: "ID".to_string(),
            ceid: "ID:id".to_string(),
            label: "Deep Search (Scholarships)".to_string(),
            max_items: 10,
            dedup_titles: true,
            fetch_images: false,
        }
    }
}

/// ScholarshipTab "fully funded" directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListingConfig {
    pub url: String,
    pub base_url: String,
    pub label: String,
    pub heading_selector: String,
    pub max_items: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            url: "https://www.scholarshiptab.com/fully-funded".to_string(),
            base_url: "https://www.scholarshiptab.com".to_string(),
            label: "ScholarshipTab".to_string(),
            heading_selector: "h2".to_string(),
            max_items: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdvisorConfig {
    /// OpenAI-compatible API root; `/chat/completions` and `/models` hang off it.
    pub api_base: String,
    pub model: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NotifyConfig {
    pub username: String,
    pub footer: String,
    /// Max characters of body per text message (Discord hard limit is 2000).
    pub text_limit: usize,
    /// Max embeds per message (Discord hard limit).
    pub embed_limit: usize,
    /// Pause between consecutive webhook sends.
    pub pause_ms: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            username: "Scholarship Tracker Bot".to_string(),
            footer: "Scholarship Tracker Bot".to_string(),
            text_limit: 1900,
            embed_limit: 10,
            pause_ms: 1000,
        }
    }
}

impl TrackerConfig {
    /// Load from an explicit TOML file. Missing keys fall back to defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading tracker config from {}", path.display()))?;
        let mut cfg: TrackerConfig = toml::from_str(&content)
            .with_context(|| format!("parsing tracker config {}", path.display()))?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Load using env var + fallbacks:
    /// 1) $TRACKER_CONFIG_PATH
    /// 2) config/tracker.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        Ok(Self::default())
    }

    fn sanitize(&mut self) {
        let defaults = NotifyConfig::default();
        // Zero limits would never make progress when chunking.
        if self.notify.text_limit == 0 {
            self.notify.text_limit = defaults.text_limit;
        }
        if self.notify.embed_limit == 0 || self.notify.embed_limit > defaults.embed_limit {
            self.notify.embed_limit = defaults.embed_limit;
        }
        if self.http.timeout_secs == 0 {
            self.http.timeout_secs = HttpConfig::default().timeout_secs;
        }
        self.news.queries.retain(|q| !q.trim().is_empty());
    }
}

/// Credentials only ever come from the environment (or `.env`).
#[derive(Clone, Default)]
pub struct Secrets {
    pub groq_api_key: Option<String>,
    pub discord_webhook: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self {
            groq_api_key: non_empty_env(ENV_GROQ_API_KEY),
            discord_webhook: non_empty_env(ENV_DISCORD_WEBHOOK),
        }
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Safe diagnostics: presence only
        f.debug_struct("Secrets")
            .field("groq_api_key", &self.groq_api_key.is_some())
            .field("discord_webhook", &self.discord_webhook.is_some())
            .finish()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
