// src/report.rs
//! Markdown report assembly. Pure string building; the only I/O is
//! `write_report`, whose failure is fatal for the run.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::ingest::types::Item;

pub const REPORT_TITLE: &str = "# 🎓 Scholarship Tracker Report (Deep Search Edition)";
pub const ADVISOR_HEADER: &str = "🧠 AI Scholarship Advisor (Insider Analysis)";
pub const EMBASSY_HEADER: &str = "🇯🇵 Beasiswa MEXT Jepang (Special Monitor)";
pub const NEWS_HEADER: &str = "🌍 Deep Scholarship Search (Full Funded & Hidden Gems)";
pub const LISTING_HEADER: &str = "📚 Peluang Beasiswa Lainnya (ScholarshipTab)";
pub const REPORT_FOOTER: &str = "---\n*Automated by scholarship-tracker*";

const NOT_AVAILABLE: &str = "N/A";

pub struct ReportInput<'a> {
    /// Already formatted, e.g. `2026-10-18 07:00:00`.
    pub generated_at: &'a str,
    pub advice: &'a str,
    pub embassy: Option<&'a Item>,
    pub news: &'a [Item],
    pub listing: &'a [Item],
}

/// `- title ([Link](url))`
pub fn bullet_line(item: &Item) -> String {
    format!("- {} ([Link]({}))", item.title, item.link)
}

pub fn assemble_report(input: &ReportInput<'_>) -> String {
    let (title, link, status) = match input.embassy {
        Some(it) => (
            it.title.as_str(),
            it.link.as_str(),
            it.status.as_deref().unwrap_or(NOT_AVAILABLE),
        ),
        None => (NOT_AVAILABLE, NOT_AVAILABLE, NOT_AVAILABLE),
    };

    let mut out = format!(
        "{REPORT_TITLE}\nGenerated at: {}\n\n## {ADVISOR_HEADER}\n{}\n\n## {EMBASSY_HEADER}\n\
         - **Judul:** {title}\n- **Link:** {link}\n- **Status:** {status}\n",
        input.generated_at, input.advice,
    );

    out.push_str(&format!("\n## {NEWS_HEADER}\n"));
    push_bullets(&mut out, input.news);
    out.push_str(&format!("\n## {LISTING_HEADER}\n"));
    push_bullets(&mut out, input.listing);

    out.push_str(&format!("\n{REPORT_FOOTER}\n"));
    out
}

fn push_bullets(out: &mut String, items: &[Item]) {
    for item in items {
        out.push_str(&bullet_line(item));
        out.push('\n');
    }
}

/// Overwrite `path` with the report, creating parent directories as needed.
pub fn write_report(path: &Path, report: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report dir {}", parent.display()))?;
    }
    fs::write(path, report).with_context(|| format!("writing report to {}", path.display()))
}
