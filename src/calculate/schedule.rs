//! Week-by-week views over a division's fixtures.

use crate::models::Match;

/// Last scheduled week, or 1 when there are no matches.
pub fn max_week(matches: &[Match]) -> u32 {
    matches.iter().map(|m| m.week).max().unwrap_or(1)
}

/// Matches scheduled for `week`, bye weeks left out.
pub fn matches_for_week(matches: &[Match], week: u32) -> Vec<&Match> {
    matches
        .iter()
        .filter(|m| m.week == week && !m.is_bye_week)
        .collect()
}

/// Whether any match in `week` belongs to the knockout stage.
pub fn week_has_knockout(matches: &[Match], week: u32) -> bool {
    matches.iter().any(|m| m.week == week && m.is_knockout)
}

/// Clamp a requested week into `1..=max_week`.
pub fn clamp_week(matches: &[Match], week: u32) -> u32 {
    week.clamp(1, max_week(matches))
}
