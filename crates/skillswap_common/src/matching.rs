//! Match scoring between two user profiles.
//!
//! Five weighted components, each normalized by its own maximum:
//!
//! | Component           | Points        | Weight |
//! |---------------------|---------------|--------|
//! | skill overlap       | 15 per match  | 15     |
//! | reciprocal learning | 15 per match  | 15     |
//! | interests           | 10 per match  | 10     |
//! | location            | 20 flat       | 20     |
//! | availability        | 10 per match  | 10     |
//!
//! Tags are compared trimmed and case-insensitively. A component with no
//! possible points contributes 0.

use serde::Serialize;
use std::collections::HashSet;

const SKILL_POINTS: u32 = 15;
const RECIPROCAL_POINTS: u32 = 15;
const INTEREST_POINTS: u32 = 10;
const LOCATION_POINTS: u32 = 20;
const AVAILABILITY_POINTS: u32 = 10;

/// Borrowed view of the profile fields matching cares about
#[derive(Debug, Clone, Copy)]
pub struct MatchProfile<'a> {
    pub skills: &'a [String],
    pub wants_to_learn: &'a [String],
    pub interests: &'a [String],
    pub location: &'a str,
    pub availability: &'a [String],
}

/// Points earned against the maximum a component could give
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComponentScore {
    pub points: u32,
    pub max: u32,
}

impl ComponentScore {
    /// Fraction of the maximum earned, 0 when nothing was possible
    pub fn ratio(&self) -> f64 {
        if self.max == 0 {
            0.0
        } else {
            (self.points as f64 / self.max as f64).min(1.0)
        }
    }
}

/// Per-component match details
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchBreakdown {
    /// Skills the other user has that this user wants
    pub skills: ComponentScore,
    /// Skills this user has that the other user wants
    pub reciprocal: ComponentScore,
    pub interests: ComponentScore,
    pub location: ComponentScore,
    pub availability: ComponentScore,
}

impl MatchBreakdown {
    fn weighted(&self) -> [(f64, ComponentScore); 5] {
        [
            (SKILL_POINTS as f64, self.skills),
            (RECIPROCAL_POINTS as f64, self.reciprocal),
            (INTEREST_POINTS as f64, self.interests),
            (LOCATION_POINTS as f64, self.location),
            (AVAILABILITY_POINTS as f64, self.availability),
        ]
    }

    /// Weighted percentage in [0, 100]
    pub fn percentage(&self) -> u8 {
        let components = self.weighted();
        let total_weight: f64 = components.iter().map(|(w, _)| w).sum();
        let score: f64 = components.iter().map(|(w, c)| w * c.ratio()).sum();
        if total_weight == 0.0 || !score.is_finite() {
            return 0;
        }
        (score / total_weight * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

fn tag_set(tags: &[String]) -> HashSet<String> {
    tags.iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn overlap(wanted: &HashSet<String>, offered: &HashSet<String>, per_match: u32) -> ComponentScore {
    let matches = wanted.intersection(offered).count() as u32;
    ComponentScore {
        points: matches * per_match,
        max: wanted.len() as u32 * per_match,
    }
}

/// Score every component of `user` looking at `other`
pub fn match_breakdown(user: &MatchProfile<'_>, other: &MatchProfile<'_>) -> MatchBreakdown {
    let user_skills = tag_set(user.skills);
    let user_wants = tag_set(user.wants_to_learn);
    let other_skills = tag_set(other.skills);
    let other_wants = tag_set(other.wants_to_learn);

    let user_location = user.location.trim().to_lowercase();
    let other_location = other.location.trim().to_lowercase();
    let same_place = !user_location.is_empty() && user_location == other_location;

    MatchBreakdown {
        skills: overlap(&user_wants, &other_skills, SKILL_POINTS),
        reciprocal: overlap(&other_wants, &user_skills, RECIPROCAL_POINTS),
        interests: overlap(&tag_set(user.interests), &tag_set(other.interests), INTEREST_POINTS),
        location: ComponentScore {
            points: if same_place { LOCATION_POINTS } else { 0 },
            max: LOCATION_POINTS,
        },
        availability: overlap(
            &tag_set(user.availability),
            &tag_set(other.availability),
            AVAILABILITY_POINTS,
        ),
    }
}

/// Compatibility of `other` for `user`, 0-100
pub fn match_percentage(user: &MatchProfile<'_>, other: &MatchProfile<'_>) -> u8 {
    match_breakdown(user, other).percentage()
}
