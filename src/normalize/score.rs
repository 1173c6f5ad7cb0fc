//! Performance scoring.
//!
//! The score combines four signals observable from ad-library metadata:
//! how long the ad has run, how many creative variants were tested, how many
//! publisher platforms it runs on, and whether the advertiser is verified.
//! Each signal is capped so that the weights sum to 100 at saturation.

/// Points per day active, capped at [`LONGEVITY_CAP`].
const POINTS_PER_DAY: f64 = 5.0;
pub const LONGEVITY_CAP: f64 = 40.0;

const POINTS_PER_VARIANT: f64 = 6.0;
pub const VARIANT_CAP: f64 = 30.0;

const POINTS_PER_PLATFORM: f64 = 4.0;
pub const PLATFORM_CAP: f64 = 20.0;

pub const VERIFIED_BONUS: f64 = 10.0;

/// Compute the heuristic performance score in `[0, 100]`.
pub fn performance_score(active_hours: u64, variants: u32, platform_count: u32, verified: bool) -> u8 {
    let days = active_hours as f64 / 24.0;

    let score = (days * POINTS_PER_DAY).min(LONGEVITY_CAP)
        + (f64::from(variants) * POINTS_PER_VARIANT).min(VARIANT_CAP)
        + (f64::from(platform_count) * POINTS_PER_PLATFORM).min(PLATFORM_CAP)
        + if verified { VERIFIED_BONUS } else { 0.0 };

    score.round().clamp(0.0, 100.0) as u8
}

/// Convert an active duration in seconds to whole hours.
///
/// Rounds half away from zero; negative or non-finite input yields 0.
pub fn seconds_to_hours(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds / 3600.0).round() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_score() {
        // 10 days, 6 variants, 2 platforms, verified
        assert_eq!(performance_score(240, 6, 2, true), 88);
    }

    #[test]
    fn test_minimum_inputs() {
        // 0h, 1 variant, 1 platform -> 0 + 6 + 4
        assert_eq!(performance_score(0, 1, 1, false), 10);
    }

    #[test]
    fn test_saturates_at_100() {
        assert_eq!(performance_score(10_000, 100, 50, true), 100);
        assert_eq!(performance_score(u64::MAX, u32::MAX, u32::MAX, true), 100);
    }

    #[test]
    fn test_fractional_days_round() {
        // 1h = 0.2083 points -> 0 + 6 + 4 = 10.21 -> 10
        assert_eq!(performance_score(1, 1, 1, false), 10);
        // 60h = 12.5 points -> 12.5 + 6 + 4 = 22.5 -> 23
        assert_eq!(performance_score(60, 1, 1, false), 23);
    }

    #[test]
    fn test_monotonic_in_each_input() {
        for hours in 0..400u64 {
            assert!(performance_score(hours + 1, 2, 2, false) >= performance_score(hours, 2, 2, false));
        }
        for variants in 0..20u32 {
            assert!(performance_score(48, variants + 1, 2, false) >= performance_score(48, variants, 2, false));
        }
        for platforms in 0..20u32 {
            assert!(performance_score(48, 2, platforms + 1, true) >= performance_score(48, 2, platforms, true));
        }
    }

    #[test]
    fn test_caps() {
        // Longevity saturates at 8 days.
        assert_eq!(performance_score(8 * 24, 0, 0, false), 40);
        assert_eq!(performance_score(80 * 24, 0, 0, false), 40);
        // Variants saturate at 5.
        assert_eq!(performance_score(0, 5, 0, false), 30);
        assert_eq!(performance_score(0, 50, 0, false), 30);
        // Platforms saturate at 5.
        assert_eq!(performance_score(0, 0, 5, false), 20);
        assert_eq!(performance_score(0, 0, 9, false), 20);
    }

    #[test]
    fn test_seconds_to_hours() {
        assert_eq!(seconds_to_hours(90_000.0), 25);
        assert_eq!(seconds_to_hours(5_400.0), 2); // 1.5 rounds up
        assert_eq!(seconds_to_hours(5_399.0), 1);
        assert_eq!(seconds_to_hours(0.0), 0);
        assert_eq!(seconds_to_hours(-100.0), 0);
        assert_eq!(seconds_to_hours(f64::NAN), 0);
    }
}
