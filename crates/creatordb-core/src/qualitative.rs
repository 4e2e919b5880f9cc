//! Typed accessors over the opaque qualitative-analysis blob.
//!
//! The LLM collaborator produces an untyped JSON document. The engine does
//! not model its schema; it reads exactly the leaf paths persisted onto the
//! record and passes the rest through unexamined. Leaf names are the
//! collaborator's camelCase wire names.

use serde_json::Value;

/// Overall tier label (`"S"`..`"D"`), as judged by the collaborator.
#[must_use]
pub fn tier(blob: &Value) -> Option<&str> {
    blob.get("tier").and_then(Value::as_str)
}

/// Growth-oriented grade label (e.g. `"Star"`, `"Rising"`, `"Stagnant"`).
#[must_use]
pub fn grade(blob: &Value) -> Option<&str> {
    blob.get("grade").and_then(Value::as_str)
}

/// Account category/vertical, when the collaborator supplies one.
#[must_use]
pub fn category(blob: &Value) -> Option<&str> {
    blob.get("category").and_then(Value::as_str)
}

/// Follower count echoed in the collaborator's basic stats.
#[must_use]
pub fn followers(blob: &Value) -> Option<u64> {
    basic_stat(blob, "followers").and_then(Value::as_u64)
}

/// Engagement rate echoed in the collaborator's basic stats.
#[must_use]
pub fn er(blob: &Value) -> Option<f64> {
    basic_stat(blob, "er").and_then(Value::as_f64)
}

/// Bot ratio echoed in the collaborator's basic stats.
#[must_use]
pub fn bot_ratio(blob: &Value) -> Option<f64> {
    basic_stat(blob, "botRatio").and_then(Value::as_f64)
}

/// Purchase-keyword ratio echoed in the collaborator's basic stats.
#[must_use]
pub fn purchase_keyword_ratio(blob: &Value) -> Option<f64> {
    basic_stat(blob, "purchaseKeywordRatio").and_then(Value::as_f64)
}

fn basic_stat<'a>(blob: &'a Value, key: &str) -> Option<&'a Value> {
    blob.get("basicStats").and_then(|stats| stats.get(key))
}
