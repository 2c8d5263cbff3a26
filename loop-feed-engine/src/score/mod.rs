//! The decaying trending score.
//!
//! `score = (upvotes − downvotes) / (hours_since_post + 2)^1.5`
//!
//! The numerator is net votes; the denominator grows super-linearly with
//! age so older posts sink even at equal net votes. The `+2` offset keeps
//! brand-new posts from dividing by near-zero and dominating on a single
//! vote. The score is recomputed on every vote event for the affected post
//! rather than on a sweep, so a post with no new votes keeps a stale score
//! and drifts down only in relative rank.
use chrono::{DateTime, Utc};

/// Hours added to the post age before applying the decay exponent.
pub const AGE_OFFSET_HOURS: f64 = 2.0;

/// Exponent applied to the offset age.
pub const DECAY_EXPONENT: f64 = 1.5;

/// Computes the trending score of a post from its counters and its age.
///
/// The age is clamped to zero when `now < created_at` (clock skew between
/// writers is tolerated, never amplified). Net votes may be negative, so
/// the score may be negative.
pub fn trending_score(
    upvotes: i64,
    downvotes: i64,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> f64 {
    let age_ms = (now - created_at).num_milliseconds().max(0);
    let age_hours = age_ms as f64 / 3_600_000.0;
    let net = (upvotes - downvotes) as f64;
    net / (age_hours + AGE_OFFSET_HOURS).powf(DECAY_EXPONENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at_age(hours: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now - Duration::hours(hours), now)
    }

    #[test]
    fn fresh_post_uses_the_offset_denominator() {
        let (created_at, now) = at_age(0);
        // (3 - 5) / 2^1.5
        let score = trending_score(3, 5, created_at, now);
        assert!((score - (-2.0 / 2.0_f64.powf(1.5))).abs() < 1e-9);
        assert!((score + 0.7071).abs() < 1e-3);
    }

    #[test]
    fn score_is_negative_when_net_is_negative() {
        let (created_at, now) = at_age(4);
        assert!(trending_score(1, 10, created_at, now) < 0.0);
    }

    #[test]
    fn score_decays_strictly_with_age_at_fixed_net() {
        let now = Utc::now();
        let mut last = f64::MAX;
        for hours in [0, 1, 2, 6, 24, 72] {
            let score = trending_score(10, 2, now - Duration::hours(hours), now);
            assert!(score < last, "score must strictly decrease with age");
            last = score;
        }
    }

    #[test]
    fn clock_skew_clamps_age_to_zero() {
        let now = Utc::now();
        let future = now + Duration::minutes(5);
        let skewed = trending_score(4, 0, future, now);
        let fresh = trending_score(4, 0, now, now);
        assert!((skewed - fresh).abs() < 1e-12);
    }

    #[test]
    fn zero_votes_scores_zero_at_any_age() {
        let (created_at, now) = at_age(100);
        assert_eq!(trending_score(0, 0, created_at, now), 0.0);
        assert_eq!(trending_score(3, 3, created_at, now), 0.0);
    }
}
