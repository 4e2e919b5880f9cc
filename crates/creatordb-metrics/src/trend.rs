//! Three-window trend classification over the most recent posts.
//!
//! A fixed 10/10/10 partition over the 30 most recent posts, compared by
//! engagement rate. Deliberately not a general sliding-window abstraction —
//! the three named windows are the product's testable behavior.

use chrono::{DateTime, Utc};

use creatordb_core::{ErTrend, PeriodStats, Post, TrendReport};

use crate::round::{round1, round2};

/// Posts per comparison window.
pub const TREND_WINDOW_SIZE: usize = 10;

/// Total lookback; everything past the 30 most recent posts is ignored.
pub const TREND_LOOKBACK_POSTS: usize = 30;

/// Minimum posts required to produce a report at all.
pub const MIN_POSTS_FOR_TREND: usize = 10;

/// ER change (percent) beyond which the trend counts as rising/declining.
/// The boundary is exclusive on both sides: exactly ±15.0 is stable.
pub const TREND_CHANGE_THRESHOLD_PERCENT: f64 = 15.0;

/// Classify the engagement trend over the most recent posts.
///
/// Returns `None` when fewer than [`MIN_POSTS_FOR_TREND`] posts are
/// available — insufficient data is a typed non-result here, never a
/// degenerate report built from partial windows.
///
/// Posts are re-sorted by timestamp (most recent first, undated posts
/// last) before windowing; upstream ordering is not trusted.
#[must_use]
pub fn analyze_trend(posts: &[Post], followers: u64) -> Option<TrendReport> {
    if posts.len() < MIN_POSTS_FOR_TREND {
        return None;
    }

    let mut ordered: Vec<&Post> = posts.iter().collect();
    ordered.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
    ordered.truncate(TREND_LOOKBACK_POSTS);

    let recent_window = &ordered[..TREND_WINDOW_SIZE.min(ordered.len())];
    let middle_window = window(&ordered, TREND_WINDOW_SIZE, 2 * TREND_WINDOW_SIZE);
    let oldest_window = window(&ordered, 2 * TREND_WINDOW_SIZE, 3 * TREND_WINDOW_SIZE);

    let (recent, recent_er) = window_stats(recent_window, followers);
    let (middle, middle_er) = window_stats(middle_window, followers);
    let (oldest, oldest_er) = window_stats(oldest_window, followers);

    // Baseline ER from the older windows: average both when both exist,
    // fall back to the middle window alone, else no baseline.
    let previous_avg_er = if !middle_window.is_empty() && !oldest_window.is_empty() {
        (middle_er + oldest_er) / 2.0
    } else if !middle_window.is_empty() {
        middle_er
    } else {
        0.0
    };

    let er_change_percent = if previous_avg_er > 0.0 {
        round1((recent_er - previous_avg_er) / previous_avg_er * 100.0)
    } else {
        0.0
    };

    let er_trend = if er_change_percent > TREND_CHANGE_THRESHOLD_PERCENT {
        ErTrend::Rising
    } else if er_change_percent < -TREND_CHANGE_THRESHOLD_PERCENT {
        ErTrend::Declining
    } else {
        ErTrend::Stable
    };

    Some(TrendReport {
        recent,
        middle,
        oldest,
        er_trend,
        er_change_percent,
        avg_upload_frequency_days: upload_frequency(&ordered),
        total_posts: ordered.len(),
    })
}

fn window<'a>(ordered: &'a [&'a Post], start: usize, end: usize) -> &'a [&'a Post] {
    if start >= ordered.len() {
        return &[];
    }
    &ordered[start..end.min(ordered.len())]
}

/// Window aggregates. Returns the rounded stats for the report and the raw
/// ER used for the change computation (rounding only at the edges keeps the
/// comparison faithful to the underlying averages).
#[allow(clippy::cast_precision_loss)]
fn window_stats(window: &[&Post], followers: u64) -> (PeriodStats, f64) {
    if window.is_empty() {
        return (PeriodStats::empty(), 0.0);
    }
    let len = window.len() as f64;
    let avg_likes = window.iter().map(|p| p.likes as f64).sum::<f64>() / len;
    let avg_comments = window.iter().map(|p| p.comments as f64).sum::<f64>() / len;

    let raw_er = if followers == 0 {
        0.0
    } else {
        (avg_likes + avg_comments) / followers as f64 * 100.0
    };

    (
        PeriodStats {
            er: round2(raw_er),
            avg_likes: round2(avg_likes),
            avg_comments: round2(avg_comments),
        },
        raw_er,
    )
}

/// Mean days between uploads over all parseable timestamps; `0` when fewer
/// than 2 remain.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn upload_frequency(ordered: &[&Post]) -> u32 {
    let mut dated: Vec<DateTime<Utc>> = ordered.iter().filter_map(|p| p.taken_at).collect();
    if dated.len() < 2 {
        return 0;
    }
    dated.sort_unstable_by(|a, b| b.cmp(a));
    let span = dated[0] - *dated.last().expect("len >= 2");
    #[allow(clippy::cast_precision_loss)]
    let span_days = span.num_seconds() as f64 / 86_400.0;
    #[allow(clippy::cast_precision_loss)]
    let avg = span_days / (dated.len() - 1) as f64;
    avg.round().max(0.0) as u32
}
