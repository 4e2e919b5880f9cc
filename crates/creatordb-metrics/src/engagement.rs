//! Engagement, tier, campaign and market-suitability metrics.
//!
//! [`compute_metrics`] is a total function: malformed or missing numeric
//! inputs are treated as zero, zero followers yields zero engagement rates
//! (never NaN/Infinity), and no input can make it fail.

use chrono::{DateTime, Utc};

use creatordb_core::{
    CampaignGrade, CampaignSuitability, ContentKind, MetricsSnapshot, Post, Profile, Tier,
};

use crate::authenticity::scan_comments;
use crate::policy::{
    CampaignWeights, MetricsPolicy, CO_PURCHASE_WEIGHTS, ER_SCORE_CEILING_PERCENT,
    FOLLOWER_BRACKET_EDGES, GRADE_A_CUTOFF, GRADE_B_CUTOFF, GRADE_C_CUTOFF, GRADE_S_CUTOFF,
    MAX_MARKET_UPLOAD_CYCLE_DAYS, MIN_MARKET_AUTHENTICITY, PAID_AD_WEIGHTS, SPONSORSHIP_WEIGHTS,
    TIER_ER_CUTOFFS,
};
use crate::round::{round1, round2};

/// Compute the full metrics snapshot for one profile + post list.
///
/// `now` anchors the activity check; pass the evaluation timestamp so the
/// result is reproducible. Posts may arrive in any order — only the
/// timestamps matter here.
#[must_use]
pub fn compute_metrics(
    profile: &Profile,
    posts: &[Post],
    policy: &MetricsPolicy,
    now: DateTime<Utc>,
) -> MetricsSnapshot {
    let followers = profile.followers;

    let avg_likes = round2(mean(posts.iter().map(|p| p.likes)));
    let avg_comments = round2(mean(posts.iter().map(|p| p.comments)));
    let avg_views = round2(mean(posts.iter().filter_map(|p| p.views)));

    let total_er = engagement_rate(posts.iter(), followers);
    let feed_er = engagement_rate(
        posts.iter().filter(|p| p.kind == ContentKind::FeedImage),
        followers,
    );
    let reels_er = reels_engagement_rate(posts, followers);

    let sampled: Vec<_> = posts.iter().flat_map(|p| &p.sampled_comments).collect();
    let signals = scan_comments(&sampled);

    let latest_post = posts.iter().filter_map(|p| p.taken_at).max();
    let is_active = latest_post.is_some_and(|latest| {
        let days = (now - latest).num_days();
        days >= 0 && days <= i64::from(policy.activity_window_days)
    });

    let avg_upload_cycle_days = average_upload_cycle(posts);

    let market_suitable = is_active
        && avg_upload_cycle_days.is_some_and(|cycle| cycle <= MAX_MARKET_UPLOAD_CYCLE_DAYS)
        && signals.authenticity_score >= MIN_MARKET_AUTHENTICITY;

    let campaign = campaign_suitability(
        total_er,
        signals.authenticity_score,
        is_active,
        signals.purchase_keyword_ratio,
    );

    MetricsSnapshot {
        total_er,
        feed_er,
        reels_er,
        avg_likes,
        avg_comments,
        avg_views,
        authenticity_score: signals.authenticity_score,
        bot_ratio: signals.bot_ratio,
        is_fake: signals.bot_ratio >= policy.bot_ratio_fake_threshold,
        purchase_keyword_ratio: signals.purchase_keyword_ratio,
        is_active,
        avg_upload_cycle_days,
        market_suitable,
        campaign,
        tier: tier_for(followers, total_er),
    }
}

/// `(avg likes + avg comments) / followers × 100`, 2-decimal rounded.
/// Zero followers or an empty selection yields exactly `0.0`.
fn engagement_rate<'a>(posts: impl Iterator<Item = &'a Post>, followers: u64) -> f64 {
    if followers == 0 {
        return 0.0;
    }
    let selected: Vec<&Post> = posts.collect();
    if selected.is_empty() {
        return 0.0;
    }
    let avg_engagement = mean(selected.iter().map(|p| p.likes + p.comments));
    #[allow(clippy::cast_precision_loss)]
    let rate = avg_engagement / followers as f64 * 100.0;
    round2(rate)
}

/// Views-weighted ER over video posts: posts with more views count more
/// toward the average engagement (weight 1 where views are absent or zero),
/// still denominated in followers so a zero-follower profile stays at 0.
fn reels_engagement_rate(posts: &[Post], followers: u64) -> f64 {
    if followers == 0 {
        return 0.0;
    }
    let mut weighted_engagement = 0.0_f64;
    let mut total_weight = 0.0_f64;
    for post in posts.iter().filter(|p| p.kind == ContentKind::FeedVideo) {
        #[allow(clippy::cast_precision_loss)]
        let weight = post.views.map_or(1.0, |v| v.max(1) as f64);
        #[allow(clippy::cast_precision_loss)]
        let engagement = (post.likes + post.comments) as f64;
        weighted_engagement += weight * engagement;
        total_weight += weight;
    }
    if total_weight == 0.0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let rate = weighted_engagement / total_weight / followers as f64 * 100.0;
    round2(rate)
}

/// `total day span / (dated posts − 1)`, rounded to the nearest day.
/// `None` with fewer than 2 dated posts.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn average_upload_cycle(posts: &[Post]) -> Option<u32> {
    let mut dated: Vec<DateTime<Utc>> = posts.iter().filter_map(|p| p.taken_at).collect();
    if dated.len() < 2 {
        return None;
    }
    dated.sort_unstable();
    let span = *dated.last().expect("len >= 2") - dated[0];
    #[allow(clippy::cast_precision_loss)]
    let span_days = span.num_seconds() as f64 / 86_400.0;
    #[allow(clippy::cast_precision_loss)]
    let cycle = span_days / (dated.len() - 1) as f64;
    Some(cycle.round().max(0.0) as u32)
}

/// Tier lookup: follower bracket × total-ER bracket.
#[must_use]
pub fn tier_for(followers: u64, total_er: f64) -> Tier {
    let bracket = FOLLOWER_BRACKET_EDGES
        .iter()
        .position(|&edge| followers < edge)
        .unwrap_or(FOLLOWER_BRACKET_EDGES.len());
    let cutoffs = TIER_ER_CUTOFFS[bracket];
    if total_er >= cutoffs[0] {
        Tier::S
    } else if total_er >= cutoffs[1] {
        Tier::A
    } else if total_er >= cutoffs[2] {
        Tier::B
    } else if total_er >= cutoffs[3] {
        Tier::C
    } else {
        Tier::D
    }
}

fn campaign_suitability(
    total_er: f64,
    authenticity: f64,
    is_active: bool,
    purchase_ratio: f64,
) -> CampaignSuitability {
    let er_score = (total_er / ER_SCORE_CEILING_PERCENT * 100.0).clamp(0.0, 100.0);
    let activity_score = if is_active { 100.0 } else { 0.0 };
    let authenticity_score = authenticity.clamp(0.0, 100.0);
    let purchase_score = purchase_ratio.clamp(0.0, 100.0);

    let score = |weights: CampaignWeights| -> CampaignGrade {
        let raw = er_score * weights.er
            + authenticity_score * weights.authenticity
            + activity_score * weights.activity
            + purchase_score * weights.purchase;
        let score = round1(raw.clamp(0.0, 100.0));
        CampaignGrade {
            grade: grade_for(score),
            score,
        }
    };

    CampaignSuitability {
        sponsorship: score(SPONSORSHIP_WEIGHTS),
        paid_ad: score(PAID_AD_WEIGHTS),
        co_purchase: score(CO_PURCHASE_WEIGHTS),
    }
}

/// Letter grade for a campaign sub-score in `[0, 100]`.
#[must_use]
pub fn grade_for(score: f64) -> Tier {
    if score >= GRADE_S_CUTOFF {
        Tier::S
    } else if score >= GRADE_A_CUTOFF {
        Tier::A
    } else if score >= GRADE_B_CUTOFF {
        Tier::B
    } else if score >= GRADE_C_CUTOFF {
        Tier::C
    } else {
        Tier::D
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = u64>) -> f64 {
    let mut sum = 0.0_f64;
    let mut count = 0usize;
    for value in values {
        sum += value as f64;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
