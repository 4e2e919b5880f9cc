//! Deterministic metrics for the influencer evaluation engine.
//!
//! Pure functions from a profile + post list to engagement, authenticity,
//! campaign-suitability and tier scores (`engagement`), a three-window trend
//! classification (`trend`), and a fixed-threshold qualification breakdown
//! (`qualify`). No I/O anywhere in this crate; identical inputs always
//! produce identical outputs.

pub mod authenticity;
pub mod engagement;
pub mod policy;
pub mod qualify;
pub mod trend;

mod round;

pub use authenticity::{scan_comments, CommentSignals};
pub use engagement::compute_metrics;
pub use policy::MetricsPolicy;
pub use qualify::evaluate_qualification;
pub use trend::{
    analyze_trend, MIN_POSTS_FOR_TREND, TREND_CHANGE_THRESHOLD_PERCENT, TREND_LOOKBACK_POSTS,
    TREND_WINDOW_SIZE,
};
