// src/hook.rs
//! Attention-grabbing title prefixes for embed cards.

use rand::seq::IndexedRandom;
use rand::Rng;

pub const HOOK_PREFIXES: [&str; 6] = [
    "🎓 KULIAH GRATIS:",
    "🤯 FULL FUNDED:",
    "⚠️ BURUAN DAFTAR:",
    "🌍 BEASISWA LUAR NEGERI:",
    "💸 BIAYA 0 RUPIAH:",
    "🤔 MAU KULIAH GRATIS?",
];

/// `"<random prefix> <title>"` using the thread-local RNG.
pub fn generate_hook(title: &str) -> String {
    generate_hook_with(&mut rand::rng(), title)
}

/// Same as [`generate_hook`] with a caller-supplied RNG (seed it in tests).
pub fn generate_hook_with<R: Rng + ?Sized>(rng: &mut R, title: &str) -> String {
    let prefix = HOOK_PREFIXES.choose(rng).copied().unwrap_or(HOOK_PREFIXES[0]);
    format!("{prefix} {title}")
}
