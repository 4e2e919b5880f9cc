//! Business-policy thresholds for the metric calculators.
//!
//! Every cutoff that product policy owns lives here as a named constant so
//! it can be tested independently. The two thresholds operators tune per
//! deployment (activity window, fake-account cutoff) are carried on
//! [`MetricsPolicy`] and seeded from `AppConfig`; everything else is fixed
//! policy.

/// A bot ratio at or above this percentage marks the account as fake.
pub const BOT_RATIO_FAKE_THRESHOLD: f64 = 30.0;

/// Days since the latest post within which an account counts as active.
pub const ACTIVITY_WINDOW_DAYS: u32 = 30;

/// ER at which the campaign ER component saturates at 100.
pub const ER_SCORE_CEILING_PERCENT: f64 = 10.0;

/// Minimum authenticity score for market suitability.
pub const MIN_MARKET_AUTHENTICITY: f64 = 60.0;

/// Maximum average upload cycle (days) for market suitability.
pub const MAX_MARKET_UPLOAD_CYCLE_DAYS: u32 = 14;

/// Campaign letter-grade cutoffs, applied to scores in `[0, 100]`.
pub const GRADE_S_CUTOFF: f64 = 80.0;
pub const GRADE_A_CUTOFF: f64 = 65.0;
pub const GRADE_B_CUTOFF: f64 = 50.0;
pub const GRADE_C_CUTOFF: f64 = 35.0;

/// Component weights for one campaign sub-score. Each row sums to 1.0, so a
/// score is a convex combination of components already in `[0, 100]` — the
/// clamp in the calculator is for float dust only.
#[derive(Debug, Clone, Copy)]
pub struct CampaignWeights {
    pub er: f64,
    pub authenticity: f64,
    pub activity: f64,
    pub purchase: f64,
}

/// Sponsorship follows reach: ER dominates, authenticity close behind.
pub const SPONSORSHIP_WEIGHTS: CampaignWeights = CampaignWeights {
    er: 0.4,
    authenticity: 0.3,
    activity: 0.2,
    purchase: 0.1,
};

/// Paid ads are brand-safety sensitive: authenticity leads.
pub const PAID_AD_WEIGHTS: CampaignWeights = CampaignWeights {
    er: 0.3,
    authenticity: 0.4,
    activity: 0.2,
    purchase: 0.1,
};

/// Co-purchase converts on buying intent in the comment section.
pub const CO_PURCHASE_WEIGHTS: CampaignWeights = CampaignWeights {
    er: 0.2,
    authenticity: 0.2,
    activity: 0.2,
    purchase: 0.4,
};

/// Upper edges of the follower brackets: nano / micro / mid / macro / mega.
/// An account belongs to the first bracket whose edge exceeds its followers.
pub const FOLLOWER_BRACKET_EDGES: [u64; 4] = [10_000, 100_000, 500_000, 1_000_000];

/// Minimum total ER for tiers S, A, B, C per follower bracket (row order
/// matches the brackets above, smallest accounts first). Anything below the
/// C cutoff is tier D. Smaller accounts are held to higher ER, matching how
/// engagement dilutes with reach.
pub const TIER_ER_CUTOFFS: [[f64; 4]; 5] = [
    [8.0, 5.0, 3.0, 1.5],
    [6.0, 4.0, 2.5, 1.2],
    [5.0, 3.0, 2.0, 1.0],
    [4.0, 2.5, 1.5, 0.8],
    [3.0, 2.0, 1.2, 0.6],
];

/// Deployment-tunable thresholds, seeded from `AppConfig`.
#[derive(Debug, Clone, Copy)]
pub struct MetricsPolicy {
    pub activity_window_days: u32,
    pub bot_ratio_fake_threshold: f64,
}

impl Default for MetricsPolicy {
    fn default() -> Self {
        Self {
            activity_window_days: ACTIVITY_WINDOW_DAYS,
            bot_ratio_fake_threshold: BOT_RATIO_FAKE_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_weight_rows_sum_to_one() {
        for weights in [SPONSORSHIP_WEIGHTS, PAID_AD_WEIGHTS, CO_PURCHASE_WEIGHTS] {
            let sum = weights.er + weights.authenticity + weights.activity + weights.purchase;
            assert!((sum - 1.0).abs() < 1e-9, "weights must sum to 1.0, got {sum}");
        }
    }

    #[test]
    fn tier_cutoffs_descend_within_each_bracket() {
        for row in TIER_ER_CUTOFFS {
            assert!(row[0] > row[1] && row[1] > row[2] && row[2] > row[3]);
        }
    }

    #[test]
    fn bracket_edges_ascend() {
        assert!(FOLLOWER_BRACKET_EDGES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn default_policy_matches_documented_constants() {
        let policy = MetricsPolicy::default();
        assert_eq!(policy.activity_window_days, 30);
        assert_eq!(policy.bot_ratio_fake_threshold, 30.0);
    }
}
