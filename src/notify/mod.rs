// src/notify/mod.rs
pub mod discord;

pub use discord::DiscordNotifier;

use serde::Serialize;

/// Embed accent colors (decimal RGB, as Discord expects).
pub const COLOR_EMBASSY: u32 = 15_158_332; // red
pub const COLOR_NEWS: u32 = 3_066_993; // green
pub const COLOR_LISTING: u32 = 1_752_220; // teal

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NotificationPayload {
    pub username: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<Embed>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Embed {
    pub title: String,
    pub url: String,
    pub description: String,
    pub color: u32,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub footer: EmbedFooter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbedImage {
    pub url: String,
}

/// Outcome counts for one send call (one entry per POST).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendStats {
    pub sent: usize,
    pub failed: usize,
}

impl SendStats {
    pub fn posts(&self) -> usize {
        self.sent + self.failed
    }
}

impl std::ops::AddAssign for SendStats {
    fn add_assign(&mut self, rhs: Self) {
        self.sent += rhs.sent;
        self.failed += rhs.failed;
    }
}
