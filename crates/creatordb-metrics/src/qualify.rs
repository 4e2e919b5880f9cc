//! Qualification criteria applied on top of the metrics snapshot.
//!
//! Fixed business thresholds producing a per-criterion pass/fail breakdown
//! plus an aggregate, so the orchestrator can attach a stable badges object
//! to the final record without re-deriving thresholds elsewhere.

use creatordb_core::{Criterion, CriterionResult, MetricsSnapshot, Profile, QualificationReport};

use crate::policy::{MAX_MARKET_UPLOAD_CYCLE_DAYS, MIN_MARKET_AUTHENTICITY};

/// Minimum follower floor for campaign qualification.
pub const MIN_QUALIFY_FOLLOWERS: u64 = 1_000;

/// Sentinel reported as the observed upload cycle when fewer than 2 dated
/// posts exist and no cadence is measurable.
pub const UPLOAD_CYCLE_UNMEASURED: f64 = -1.0;

/// Evaluate the fixed qualification criteria against a computed snapshot.
#[must_use]
pub fn evaluate_qualification(
    profile: &Profile,
    metrics: &MetricsSnapshot,
) -> QualificationReport {
    #[allow(clippy::cast_precision_loss)]
    let followers = profile.followers as f64;
    #[allow(clippy::cast_precision_loss)]
    let follower_floor = MIN_QUALIFY_FOLLOWERS as f64;

    let cycle_observed = metrics
        .avg_upload_cycle_days
        .map_or(UPLOAD_CYCLE_UNMEASURED, f64::from);

    let criteria = vec![
        CriterionResult {
            criterion: Criterion::MinFollowers,
            passed: profile.followers >= MIN_QUALIFY_FOLLOWERS,
            observed: followers,
            required: follower_floor,
        },
        CriterionResult {
            criterion: Criterion::MinAuthenticity,
            passed: metrics.authenticity_score >= MIN_MARKET_AUTHENTICITY,
            observed: metrics.authenticity_score,
            required: MIN_MARKET_AUTHENTICITY,
        },
        CriterionResult {
            criterion: Criterion::Activity,
            passed: metrics.is_active,
            observed: if metrics.is_active { 1.0 } else { 0.0 },
            required: 1.0,
        },
        CriterionResult {
            criterion: Criterion::UploadCadence,
            passed: metrics
                .avg_upload_cycle_days
                .is_some_and(|cycle| cycle <= MAX_MARKET_UPLOAD_CYCLE_DAYS),
            observed: cycle_observed,
            required: f64::from(MAX_MARKET_UPLOAD_CYCLE_DAYS),
        },
    ];

    let qualified = criteria.iter().all(|c| c.passed);
    QualificationReport {
        criteria,
        qualified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creatordb_core::{CampaignGrade, CampaignSuitability, Tier};

    fn profile(followers: u64) -> Profile {
        Profile {
            username: "tester".to_string(),
            followers,
            biography: None,
            profile_image_url: None,
            is_verified: false,
        }
    }

    fn snapshot(authenticity: f64, is_active: bool, cycle: Option<u32>) -> MetricsSnapshot {
        let grade = CampaignGrade {
            grade: Tier::B,
            score: 55.0,
        };
        MetricsSnapshot {
            total_er: 2.0,
            feed_er: 2.0,
            reels_er: 0.0,
            avg_likes: 100.0,
            avg_comments: 10.0,
            avg_views: 0.0,
            authenticity_score: authenticity,
            bot_ratio: 100.0 - authenticity,
            is_fake: false,
            purchase_keyword_ratio: 5.0,
            is_active,
            avg_upload_cycle_days: cycle,
            market_suitable: true,
            campaign: CampaignSuitability {
                sponsorship: grade,
                paid_ad: grade,
                co_purchase: grade,
            },
            tier: Tier::B,
        }
    }

    #[test]
    fn all_criteria_passing_qualifies() {
        let report = evaluate_qualification(&profile(5_000), &snapshot(90.0, true, Some(7)));
        assert!(report.qualified);
        assert_eq!(report.criteria.len(), 4);
        assert!(report.criteria.iter().all(|c| c.passed));
    }

    #[test]
    fn follower_floor_is_inclusive() {
        let report = evaluate_qualification(&profile(1_000), &snapshot(90.0, true, Some(7)));
        let followers = report
            .criteria
            .iter()
            .find(|c| c.criterion == Criterion::MinFollowers)
            .expect("criterion present");
        assert!(followers.passed);

        let report = evaluate_qualification(&profile(999), &snapshot(90.0, true, Some(7)));
        assert!(!report.qualified);
    }

    #[test]
    fn unmeasured_cadence_fails_with_sentinel() {
        let report = evaluate_qualification(&profile(5_000), &snapshot(90.0, true, None));
        let cadence = report
            .criteria
            .iter()
            .find(|c| c.criterion == Criterion::UploadCadence)
            .expect("criterion present");
        assert!(!cadence.passed);
        assert_eq!(cadence.observed, UPLOAD_CYCLE_UNMEASURED);
        assert!(!report.qualified);
    }

    #[test]
    fn single_failure_fails_aggregate_but_reports_all() {
        let report = evaluate_qualification(&profile(5_000), &snapshot(40.0, true, Some(7)));
        assert!(!report.qualified);
        let passing = report.criteria.iter().filter(|c| c.passed).count();
        assert_eq!(passing, 3);
    }
}
