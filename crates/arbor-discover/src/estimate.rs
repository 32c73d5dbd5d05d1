//! Duration estimation for credentials without published course lengths.
//!
//! The estimate starts from a cadence base and scales it by level, category,
//! and title cues, then clamps to the cadence's plausible range. The output is
//! whole weeks.

use arbor_core::{Cadence, LevelBand};

const SEASONAL_BASE_WEEKS: f64 = 10.0;
const MONTHLY_BASE_WEEKS: f64 = 3.0;

const SEASONAL_RANGE: (u32, u32) = (8, 16);
const MONTHLY_RANGE: (u32, u32) = (2, 5);

fn level_multiplier(level: LevelBand) -> f64 {
    match level {
        LevelBand::K1 => 0.8,
        LevelBand::Grades2To3 => 0.85,
        LevelBand::Grades4To5 => 0.9,
        LevelBand::Middle => 0.95,
        LevelBand::High => 1.0,
        LevelBand::Undergraduate => 1.1,
        LevelBand::Graduate => 1.25,
        LevelBand::Faculty => 1.4,
    }
}

fn category_multiplier(category: &str) -> f64 {
    match category.to_ascii_uppercase().as_str() {
        "MATH" => 1.1,
        "SCIENCE" => 1.05,
        "LANGUAGE" => 1.05,
        "ARTS" => 0.95,
        _ => 1.0,
    }
}

fn title_multiplier(title: &str) -> f64 {
    let t = title.to_lowercase();
    if t.contains("intensive") {
        1.3
    } else if t.contains("advanced") {
        1.2
    } else if t.contains("intro") || t.contains("foundations") || t.contains("basics") {
        0.9
    } else {
        1.0
    }
}

/// Estimated duration in whole weeks for a credential described by its
/// cadence, level, category, and title.
pub fn estimate_duration_weeks(
    cadence: Cadence,
    level: LevelBand,
    category: &str,
    title: &str,
) -> u32 {
    let (base, (lo, hi)) = match cadence {
        Cadence::Seasonal => (SEASONAL_BASE_WEEKS, SEASONAL_RANGE),
        Cadence::Monthly => (MONTHLY_BASE_WEEKS, MONTHLY_RANGE),
    };
    let raw = base * level_multiplier(level) * category_multiplier(category) * title_multiplier(title);
    (raw.round() as u32).clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn k1_math_seasonal_rounds_to_nine_weeks() {
        // 10 * 0.8 * 1.1 = 8.8, rounds to 9, inside [8, 16].
        let weeks = estimate_duration_weeks(Cadence::Seasonal, LevelBand::K1, "MATH", "Counting");
        assert_eq!(weeks, 9);
    }

    #[test]
    fn monthly_estimates_stay_inside_their_range() {
        for level in [
            LevelBand::K1,
            LevelBand::Middle,
            LevelBand::Undergraduate,
            LevelBand::Faculty,
        ] {
            let weeks =
                estimate_duration_weeks(Cadence::Monthly, level, "ARTS", "Intensive Sculpture");
            assert!((2..=5).contains(&weeks), "{level:?} gave {weeks}");
        }
    }

    #[test]
    fn title_cues_shift_the_estimate() {
        let intro =
            estimate_duration_weeks(Cadence::Seasonal, LevelBand::High, "SCIENCE", "Intro Biology");
        let advanced = estimate_duration_weeks(
            Cadence::Seasonal,
            LevelBand::High,
            "SCIENCE",
            "Advanced Biology",
        );
        assert!(advanced > intro);
    }

    #[test]
    fn faculty_seasonal_hits_the_upper_half_of_the_range() {
        let weeks = estimate_duration_weeks(
            Cadence::Seasonal,
            LevelBand::Faculty,
            "MATH",
            "Intensive Research Seminar",
        );
        // 10 * 1.4 * 1.1 * 1.3 = 20.02, clamped to 16.
        assert_eq!(weeks, 16);
    }
}
