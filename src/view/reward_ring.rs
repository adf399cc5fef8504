//! Reward-ring progress computation.
//!
//! Given a `current`/`goal` pair supplied by the backend, computes the
//! ring fraction and a human-readable remaining-amount string. The caller
//! has already validated both values non-negative, but a stale or
//! out-of-range `current` still must not overflow past 100%, and a zero
//! goal renders as 0% rather than dividing.

use crate::model::ThresholdType;

#[derive(Debug, Clone, PartialEq)]
pub struct RewardRing {
    /// Completed fraction in `[0, 1]`.
    pub fraction: f64,
    /// Rounded percentage for display.
    pub percent: u8,
    /// Amount still needed, in the program's unit.
    pub remaining: f64,
    /// e.g. "1 appointment", "2.50 dollars".
    pub remaining_label: String,
    pub complete: bool,
}

/// Singular/plural unit word per program type. Unknown types get points
/// wording.
fn unit_words(program: ThresholdType) -> (&'static str, &'static str) {
    match program {
        ThresholdType::Appointments => ("appointment", "appointments"),
        ThresholdType::Products => ("product", "products"),
        ThresholdType::Points | ThresholdType::Unknown => ("point", "points"),
        ThresholdType::Price => ("dollar", "dollars"),
    }
}

/// Integers render without decimals, anything else with exactly two.
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

pub fn reward_ring(current: f64, goal: f64, program: ThresholdType) -> RewardRing {
    // Clamp before computing the fraction: the backend can return a
    // current past the goal.
    let clamped = current.clamp(0.0, goal.max(0.0));
    let fraction = if goal > 0.0 { clamped / goal } else { 0.0 };
    let remaining = if goal > 0.0 { goal - clamped } else { 0.0 };

    let (singular, plural) = unit_words(program);
    let unit = if remaining == 1.0 { singular } else { plural };

    RewardRing {
        fraction,
        percent: (fraction * 100.0).round() as u8,
        remaining,
        remaining_label: format!("{} {}", format_amount(remaining), unit),
        complete: goal > 0.0 && clamped >= goal,
    }
}
