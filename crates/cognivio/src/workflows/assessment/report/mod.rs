mod dashboard;
mod insights;
mod roster;
pub mod views;

pub use dashboard::{TeacherDashboard, TrendPoint};
pub use insights::{TeacherInsights, INSIGHT_WINDOW};
pub use roster::{build_roster, roster_entry, Roster, TeacherRosterEntry};

use super::normalizer::round_to;

pub(crate) fn round_score(value: f64) -> f64 {
    round_to(value, 2)
}

pub(crate) fn round_optional(value: Option<f64>) -> Option<f64> {
    value.map(round_score)
}

#[cfg(test)]
mod tests;
