//! Comment-text heuristics: bot ratio and purchase-intent ratio.
//!
//! Scans the sampled comments of an evaluation against two fixed
//! vocabularies. The heuristics are intentionally cheap and deterministic:
//! a comment is bot-flagged when it is generic praise, emoji/symbol-only,
//! or a verbatim duplicate of another sampled comment. Vocabulary is
//! bilingual (en/ko) to match the upstream audience.

use std::collections::HashMap;

use creatordb_core::PostComment;

use crate::round::round2;

/// Generic-praise phrases typical of engagement-pod and bot comments.
/// Matched against the normalized comment text; a short comment consisting
/// of (or containing, when ≤ [`GENERIC_PRAISE_MAX_WORDS`] words) one of
/// these counts as generic praise.
pub const BOT_PRAISE_VOCAB: &[&str] = &[
    "nice",
    "great",
    "awesome",
    "amazing",
    "cool",
    "wow",
    "beautiful",
    "perfect",
    "love it",
    "so pretty",
    "nice pic",
    "great shot",
    "좋아요",
    "멋져요",
    "예뻐요",
    "대박",
    "최고",
    "짱",
];

/// A comment with at most this many words can be flagged as generic praise.
pub const GENERIC_PRAISE_MAX_WORDS: usize = 3;

/// Purchase-intent terms. A comment containing any of these counts toward
/// the purchase-keyword ratio.
pub const PURCHASE_INTENT_VOCAB: &[&str] = &[
    "buy",
    "order",
    "price",
    "link",
    "purchase",
    "how much",
    "where can i",
    "shipping",
    "구매",
    "주문",
    "가격",
    "링크",
    "배송",
    "어디서",
    "얼마",
];

/// Aggregated comment-text signals for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommentSignals {
    /// Share of sampled comments flagged by the bot heuristics, `0–100`.
    pub bot_ratio: f64,
    /// `100 − bot_ratio`. With no sampled comments there is no bot
    /// evidence, so this defaults to `100`.
    pub authenticity_score: f64,
    /// Share of sampled comments containing purchase-intent terms, `0–100`.
    pub purchase_keyword_ratio: f64,
}

impl CommentSignals {
    const fn empty() -> Self {
        Self {
            bot_ratio: 0.0,
            authenticity_score: 100.0,
            purchase_keyword_ratio: 0.0,
        }
    }
}

/// Scan sampled comments and derive the bot / purchase-intent signals.
///
/// Never fails; an empty slice yields the documented defaults
/// (`bot_ratio = 0`, `authenticity = 100`, `purchase = 0`).
#[must_use]
pub fn scan_comments(comments: &[&PostComment]) -> CommentSignals {
    if comments.is_empty() {
        return CommentSignals::empty();
    }

    let normalized: Vec<String> = comments.iter().map(|c| normalize(&c.text)).collect();

    // Verbatim duplicates across the sample: every occurrence of a repeated
    // text is flagged, not just the copies.
    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for text in &normalized {
        if !text.is_empty() {
            *occurrences.entry(text.as_str()).or_insert(0) += 1;
        }
    }

    let mut bot_flagged = 0usize;
    let mut purchase_flagged = 0usize;

    for (comment, text) in comments.iter().zip(&normalized) {
        let duplicated = occurrences.get(text.as_str()).copied().unwrap_or(0) > 1;
        if duplicated || is_emoji_only(&comment.text) || is_generic_praise(text) {
            bot_flagged += 1;
        }
        if PURCHASE_INTENT_VOCAB.iter().any(|term| text.contains(term)) {
            purchase_flagged += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let total = comments.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let bot_ratio = round2(bot_flagged as f64 / total * 100.0);
    #[allow(clippy::cast_precision_loss)]
    let purchase_keyword_ratio = round2(purchase_flagged as f64 / total * 100.0);

    CommentSignals {
        bot_ratio,
        authenticity_score: round2(100.0 - bot_ratio),
        purchase_keyword_ratio,
    }
}

/// Lowercase, trim, and collapse inner whitespace.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A non-empty comment with no alphanumeric content (emoji, punctuation,
/// symbol spam).
fn is_emoji_only(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && !trimmed.chars().any(char::is_alphanumeric)
}

/// Short comment that is, or contains, a generic-praise phrase.
fn is_generic_praise(normalized: &str) -> bool {
    if normalized.is_empty() {
        return false;
    }
    let word_count = normalized.split(' ').count();
    if word_count > GENERIC_PRAISE_MAX_WORDS {
        return false;
    }
    BOT_PRAISE_VOCAB
        .iter()
        .any(|phrase| normalized == *phrase || normalized.contains(phrase))
}
