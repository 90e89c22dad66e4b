// DurationGate - checks whether the claimed recording length is usable
//
// The penalty is a continuous function of duration: zero inside the optimal
// band, ramping to BOUNDARY_PENALTY at the hard limits and growing beyond
// them (up to 0.5 for very short takes, 0.3 for very long ones).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::QualityGate;

/// Shortest recording without the steep short-take penalty (seconds)
pub const HARD_MIN_SECS: f32 = 10.0;
/// Longest recording without the long-take penalty (seconds)
pub const HARD_MAX_SECS: f32 = 120.0;
/// Start of the penalty-free band (seconds)
pub const OPTIMAL_MIN_SECS: f32 = 15.0;
/// End of the penalty-free band (seconds)
pub const OPTIMAL_MAX_SECS: f32 = 90.0;

/// Penalty reached at either hard limit
pub const BOUNDARY_PENALTY: f32 = 0.2;
/// Penalty for a zero-length (or invalid) recording
pub const MAX_SHORT_PENALTY: f32 = 0.5;
/// Cap for recordings past the hard maximum
pub const MAX_LONG_PENALTY: f32 = 0.3;
/// Additional penalty per minute past the hard maximum
pub const LONG_PENALTY_PER_MINUTE: f32 = 0.1;
/// Recordings at or above this penalty are reported invalid
pub const INVALID_PENALTY: f32 = 0.5;

/// Why a duration was (or was not) penalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationReason {
    /// Zero, negative or non-finite duration
    Invalid,
    /// Below the hard minimum
    TooShort,
    /// Between the hard minimum and the optimal band
    SlightlyShort,
    /// Inside the optimal band
    Optimal,
    /// Between the optimal band and the hard maximum
    SlightlyLong,
    /// Past the hard maximum
    TooLong,
}

impl fmt::Display for DurationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DurationReason::Invalid => "Recording duration is zero or invalid",
            DurationReason::TooShort => "Recording is too short, record at least 10 seconds",
            DurationReason::SlightlyShort => "Recording is a little short, 15 seconds or more works best",
            DurationReason::Optimal => "Recording duration is fine",
            DurationReason::SlightlyLong => "Recording is a little long, keep it within 90 seconds",
            DurationReason::TooLong => "Recording is too long, keep it under 120 seconds",
        };
        f.write_str(text)
    }
}

/// Outcome of the duration check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationCheck {
    /// `false` when the penalty reaches [`INVALID_PENALTY`]
    pub is_valid: bool,
    /// Score reduction fraction in [0, 1]
    pub penalty: f32,
    pub reason: DurationReason,
}

/// Evaluate the claimed recording duration
///
/// # Arguments
/// * `duration` - Claimed duration in seconds
pub fn check_duration(duration: f32) -> DurationCheck {
    let (penalty, reason) = if !duration.is_finite() || duration <= 0.0 {
        (MAX_SHORT_PENALTY, DurationReason::Invalid)
    } else if duration < HARD_MIN_SECS {
        let shortfall = (HARD_MIN_SECS - duration) / HARD_MIN_SECS;
        (
            BOUNDARY_PENALTY + (MAX_SHORT_PENALTY - BOUNDARY_PENALTY) * shortfall,
            DurationReason::TooShort,
        )
    } else if duration < OPTIMAL_MIN_SECS {
        (
            BOUNDARY_PENALTY * (OPTIMAL_MIN_SECS - duration) / (OPTIMAL_MIN_SECS - HARD_MIN_SECS),
            DurationReason::SlightlyShort,
        )
    } else if duration <= OPTIMAL_MAX_SECS {
        (0.0, DurationReason::Optimal)
    } else if duration <= HARD_MAX_SECS {
        (
            BOUNDARY_PENALTY * (duration - OPTIMAL_MAX_SECS) / (HARD_MAX_SECS - OPTIMAL_MAX_SECS),
            DurationReason::SlightlyLong,
        )
    } else {
        let extra_minutes = (duration - HARD_MAX_SECS) / 60.0;
        (
            (BOUNDARY_PENALTY + LONG_PENALTY_PER_MINUTE * extra_minutes).min(MAX_LONG_PENALTY),
            DurationReason::TooLong,
        )
    };

    let penalty = penalty.clamp(0.0, 1.0);

    log::debug!(
        "[DurationGate] {:.1}s -> penalty {:.1}% ({:?})",
        duration,
        penalty * 100.0,
        reason
    );

    DurationCheck {
        is_valid: penalty < INVALID_PENALTY,
        penalty,
        reason,
    }
}

impl QualityGate for DurationCheck {
    fn passed(&self) -> bool {
        self.is_valid
    }

    fn value(&self) -> f32 {
        self.penalty
    }

    fn reason_text(&self) -> String {
        self.reason.to_string()
    }
}
