//! Level System
//!
//! Geometric XP curve with title bands.
//!
//! ## XP Curve
//!
//! XP required to reach level L: round(base_xp * growth^(L-1)), level 1 is free.
//! - base_xp = 100
//! - growth = 1.5
//!
//! This means:
//! - Level 2: 150 XP
//! - Level 3: 225 XP
//! - Level 10: 3,844 XP
//! - Level 20: 221,684 XP
//!
//! The closed-form inverse (`user_level_estimate`) drifts by one level at some
//! band edges because the thresholds are rounded. `user_level` settles the
//! estimate against the thresholds themselves, so the bands are authoritative.

use serde::{Deserialize, Serialize};

/// Title bands mapping level ranges to progression titles
pub const TITLE_BANDS: &[(u32, u32, &str)] = &[
    (1, 2, "Newcomer"),
    (3, 4, "Learner"),
    (5, 7, "Contributor"),
    (8, 10, "Mentor"),
    (11, 15, "Expert"),
    (16, 20, "Master"),
    (21, MAX_LEVEL, "Legend"),
];

/// Highest reachable level
pub const MAX_LEVEL: u32 = 99;

/// XP configuration constants
const BASE_XP: f64 = 100.0;
const GROWTH_FACTOR: f64 = 1.5;

/// Total XP required to reach `level`
///
/// 0 for level 1 and below, `round(100 * 1.5^(level-1))` otherwise.
pub fn required_xp(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }
    let exponent = (level.min(MAX_LEVEL) - 1) as i32;
    // `as` saturates for the top levels, which keeps the curve monotonic
    (BASE_XP * GROWTH_FACTOR.powi(exponent)).round() as u64
}

/// Closed-form level for `xp`: `max(1, floor(1 + ln(xp/100) / ln(1.5)))`
///
/// Fast, but may land one level off at rounded thresholds.
/// Use `user_level` for anything user-visible.
pub fn user_level_estimate(xp: u64) -> u32 {
    if (xp as f64) < BASE_XP {
        return 1;
    }
    let raw = 1.0 + (xp as f64 / BASE_XP).ln() / GROWTH_FACTOR.ln();
    raw.floor().max(1.0) as u32
}

/// Level for `xp`, consistent with `required_xp`
///
/// Always satisfies `required_xp(L) <= xp < required_xp(L + 1)` below the cap.
pub fn user_level(xp: u64) -> u32 {
    let mut level = user_level_estimate(xp).clamp(1, MAX_LEVEL);
    while level < MAX_LEVEL && required_xp(level + 1) <= xp {
        level += 1;
    }
    while level > 1 && required_xp(level) > xp {
        level -= 1;
    }
    level
}

/// Percentage (0-100) of the current level band already earned
pub fn level_progress(xp: u64) -> f64 {
    let level = user_level(xp);
    if level >= MAX_LEVEL {
        return 100.0;
    }

    let band_start = required_xp(level);
    let band_end = required_xp(level + 1);
    let span = band_end.saturating_sub(band_start);
    if span == 0 {
        return 100.0;
    }

    let earned = xp.saturating_sub(band_start) as f64;
    (earned / span as f64 * 100.0).clamp(0.0, 100.0)
}

/// XP still missing before the next level
pub fn xp_to_next_level(xp: u64) -> u64 {
    let level = user_level(xp);
    if level >= MAX_LEVEL {
        return 0;
    }
    required_xp(level + 1).saturating_sub(xp)
}

/// A user's level (1-99)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Level(pub u32);

impl Level {
    /// Create a new level (clamped to 1-99)
    pub fn new(level: u32) -> Self {
        Self(level.clamp(1, MAX_LEVEL))
    }

    /// Level reached with `xp` total points
    pub fn from_xp(xp: u64) -> Self {
        Self(user_level(xp))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn title(&self) -> Title {
        Title::from_level(self.0)
    }

    pub fn xp_required(&self) -> u64 {
        required_xp(self.0)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self(1)
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Title corresponding to a level band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title(String);

impl Title {
    pub fn from_level(level: u32) -> Self {
        for &(min, max, title) in TITLE_BANDS {
            if level >= min && level <= max {
                return Self(title.to_string());
            }
        }
        Self("Unknown".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the level table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelRow {
    pub level: u32,
    pub required_xp: u64,
    pub title: String,
}

/// Thresholds for levels 1..=max
pub fn level_table(max: u32) -> Vec<LevelRow> {
    (1..=max.clamp(1, MAX_LEVEL))
        .map(|level| LevelRow {
            level,
            required_xp: required_xp(level),
            title: Title::from_level(level).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_xp_curve() {
        assert_eq!(required_xp(0), 0);
        assert_eq!(required_xp(1), 0);
        assert_eq!(required_xp(2), 150);
        assert_eq!(required_xp(3), 225);
        assert_eq!(required_xp(4), 338); // 337.5 rounds up
        assert_eq!(required_xp(6), 759); // 759.375 rounds down
        assert_eq!(required_xp(10), 3844);
        assert_eq!(required_xp(20), 221_684);
    }

    #[test]
    fn test_required_xp_monotonic() {
        for level in 1..MAX_LEVEL {
            assert!(required_xp(level + 1) >= required_xp(level), "level {}", level);
        }
    }

    #[test]
    fn test_user_level_below_floor() {
        assert_eq!(user_level(0), 1);
        assert_eq!(user_level(99), 1);
        assert_eq!(user_level(100), 1);
        assert_eq!(user_level(149), 1);
        assert_eq!(user_level(150), 2);
    }

    #[test]
    fn test_round_trip_levels_1_to_20() {
        for level in 1..=20 {
            assert_eq!(user_level(required_xp(level)), level, "level {}", level);
        }
    }

    #[test]
    fn test_estimate_drifts_at_rounded_edges() {
        // 759.375 rounds down to 759, which the log formula places in level 5
        assert_eq!(user_level_estimate(759), 5);
        assert_eq!(user_level(759), 6);

        // The estimate never strays more than one level from the bands
        for level in 1..=20 {
            let xp = required_xp(level);
            let diff = user_level_estimate(xp) as i64 - user_level(xp) as i64;
            assert!(diff.abs() <= 1, "level {} estimate off by {}", level, diff);
        }
    }

    #[test]
    fn test_level_progress_band() {
        assert_eq!(level_progress(0), 0.0);
        assert_eq!(level_progress(75), 50.0);
        assert_eq!(level_progress(150), 0.0);
        let mid = level_progress(187);
        assert!(mid > 49.0 && mid < 51.0, "got {}", mid);
    }

    #[test]
    fn test_level_progress_resets_on_level_up() {
        for level in 2..=20 {
            let start = required_xp(level);
            assert_eq!(level_progress(start), 0.0, "level {}", level);
            assert!(level_progress(start - 1) > 90.0, "level {}", level);
        }
    }

    #[test]
    fn test_xp_to_next_level() {
        assert_eq!(xp_to_next_level(0), 150);
        assert_eq!(xp_to_next_level(150), 75);
        assert_eq!(xp_to_next_level(u64::MAX), 0);
    }

    #[test]
    fn test_title_bands() {
        assert_eq!(Title::from_level(1).as_str(), "Newcomer");
        assert_eq!(Title::from_level(3).as_str(), "Learner");
        assert_eq!(Title::from_level(5).as_str(), "Contributor");
        assert_eq!(Title::from_level(10).as_str(), "Mentor");
        assert_eq!(Title::from_level(15).as_str(), "Expert");
        assert_eq!(Title::from_level(20).as_str(), "Master");
        assert_eq!(Title::from_level(99).as_str(), "Legend");
    }

    #[test]
    fn test_level_clamped() {
        assert_eq!(Level::new(0).value(), 1);
        assert_eq!(Level::new(500).value(), MAX_LEVEL);
        assert_eq!(Level::from_xp(u64::MAX).value(), MAX_LEVEL);
    }

    #[test]
    fn test_level_table() {
        let table = level_table(5);
        assert_eq!(table.len(), 5);
        assert_eq!(table[0].required_xp, 0);
        assert_eq!(table[1].required_xp, 150);
        assert_eq!(table[4].title, "Contributor");
    }
}
