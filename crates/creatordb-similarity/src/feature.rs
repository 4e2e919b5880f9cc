//! Fixed-shape feature summary fed to the embedding collaborator.
//!
//! The summary is the contract between a cached analysis record and the
//! vector space: the same denormalized fields are embedded, stored as the
//! Qdrant payload, and returned on lookalike hits so API consumers never
//! need a second round trip.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use creatordb_core::{qualitative, AnalysisRecord, ErTrend};

/// Denormalized summary of one analyzed account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub username: String,
    pub followers: u64,
    pub er: f64,
    pub tier: String,
    pub grade: String,
    pub category: String,
    pub purchase_keyword_ratio: f64,
    pub trend_direction: String,
}

impl FeatureSummary {
    /// Build the summary from a record. Fields present in the qualitative
    /// blob take precedence (they are what the collaborator judged the
    /// account on); everything else falls back to the computed metrics.
    #[must_use]
    pub fn from_record(record: &AnalysisRecord) -> Self {
        let tier = qualitative::tier(&record.qualitative)
            .map_or_else(|| format!("{:?}", record.metrics.tier), str::to_string);
        let grade = qualitative::grade(&record.qualitative)
            .unwrap_or_default()
            .to_string();
        let category = qualitative::category(&record.qualitative)
            .unwrap_or_default()
            .to_string();
        let followers = qualitative::followers(&record.qualitative).unwrap_or(0);
        let er = qualitative::er(&record.qualitative).unwrap_or(record.metrics.total_er);
        let purchase_keyword_ratio = qualitative::purchase_keyword_ratio(&record.qualitative)
            .unwrap_or(record.metrics.purchase_keyword_ratio);

        let trend_direction = record.trend.as_ref().map_or_else(
            || "unknown".to_string(),
            |t| {
                match t.er_trend {
                    ErTrend::Rising => "rising",
                    ErTrend::Stable => "stable",
                    ErTrend::Declining => "declining",
                }
                .to_string()
            },
        );

        Self {
            username: record.username.clone(),
            followers,
            er,
            tier,
            grade,
            category,
            purchase_keyword_ratio,
            trend_direction,
        }
    }

    /// Canonical text fed to the embedder: the summary fields plus the full
    /// qualitative blob, as one JSON document.
    #[must_use]
    pub fn embedding_text(&self, qualitative_blob: &Value) -> String {
        let doc = serde_json::json!({
            "summary": self,
            "analysis": qualitative_blob,
        });
        doc.to_string()
    }

    /// Qdrant point payload carrying the denormalized fields.
    #[must_use]
    pub fn to_payload(&self) -> HashMap<String, Value> {
        let mut payload = HashMap::new();
        payload.insert("username".to_string(), Value::from(self.username.clone()));
        payload.insert("followers".to_string(), Value::from(self.followers));
        payload.insert("er".to_string(), Value::from(self.er));
        payload.insert("tier".to_string(), Value::from(self.tier.clone()));
        payload.insert("grade".to_string(), Value::from(self.grade.clone()));
        payload.insert("category".to_string(), Value::from(self.category.clone()));
        payload.insert(
            "purchase_keyword_ratio".to_string(),
            Value::from(self.purchase_keyword_ratio),
        );
        payload.insert(
            "trend_direction".to_string(),
            Value::from(self.trend_direction.clone()),
        );
        payload
    }

    /// Parse a summary back out of a Qdrant payload. Missing or mistyped
    /// fields fall back to defaults — the payload is denormalized data, not
    /// a source of truth.
    #[must_use]
    pub fn from_payload(payload: &HashMap<String, Value>) -> Self {
        let text = |key: &str| {
            payload
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let number = |key: &str| payload.get(key).and_then(Value::as_f64).unwrap_or(0.0);

        Self {
            username: text("username"),
            followers: payload
                .get("followers")
                .and_then(Value::as_u64)
                .unwrap_or(0),
            er: number("er"),
            tier: text("tier"),
            grade: text("grade"),
            category: text("category"),
            purchase_keyword_ratio: number("purchase_keyword_ratio"),
            trend_direction: text("trend_direction"),
        }
    }
}
