//! Compliance score.
//!
//! A weighted scorecard starting at 100. Advisory only: the score summarises
//! how close a driver is to the limits and carries no legal meaning.
//!
//! | metric | exceeded | approaching |
//! |---|---|---|
//! | daily working | -20 | -5 (within 1h) |
//! | daily driving (base or extended limit) | -20 | -5 (within 0.5h) |
//! | weekly working | -15 | -5 (within 2h) |
//! | weekly driving | -15 | -5 (within 2h) |
//! | break non-compliance | -10 | |
//! | rest non-compliance | -10 | |

use serde::Serialize;

use crate::limits::RegulatoryLimits;

/// How far below the daily working limit counts as approaching it.
pub const DAILY_WORKING_MARGIN_HOURS: f64 = 1.0;
/// How far below the daily driving limit counts as approaching it.
pub const DAILY_DRIVING_MARGIN_HOURS: f64 = 0.5;
/// How far below either weekly limit counts as approaching it.
pub const WEEKLY_MARGIN_HOURS: f64 = 2.0;

const MAX_SCORE: i32 = 100;
const DAILY_EXCEEDED_PENALTY: i32 = 20;
const WEEKLY_EXCEEDED_PENALTY: i32 = 15;
const APPROACHING_PENALTY: i32 = 5;
const BREAK_PENALTY: i32 = 10;
const REST_PENALTY: i32 = 10;

/// Where a metric sits relative to its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitStatus {
    Within,
    /// At or below the limit but inside the warning margin.
    Approaching,
    Exceeded,
}

/// Classifies a value against an inclusive limit.
pub fn limit_status(value: f64, max: f64, margin: f64) -> LimitStatus {
    if value > max {
        LimitStatus::Exceeded
    } else if value >= max - margin {
        LimitStatus::Approaching
    } else {
        LimitStatus::Within
    }
}

/// Metrics the score is computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub daily_working_hours: f64,
    pub daily_driving_hours: f64,
    /// Daily driving limit in effect, base or extended.
    pub daily_driving_limit_hours: f64,
    pub weekly_working_hours: f64,
    pub weekly_driving_hours: f64,
    pub break_compliant: bool,
    pub rest_compliant: bool,
}

/// Computes a score in `0..=100`.
pub fn compliance_score(inputs: &ScoreInputs, limits: &RegulatoryLimits) -> u8 {
    let mut score = MAX_SCORE;

    score -= penalty(
        limit_status(
            inputs.daily_working_hours,
            limits.max_daily_working_hours,
            DAILY_WORKING_MARGIN_HOURS,
        ),
        DAILY_EXCEEDED_PENALTY,
    );
    score -= penalty(
        limit_status(
            inputs.daily_driving_hours,
            inputs.daily_driving_limit_hours,
            DAILY_DRIVING_MARGIN_HOURS,
        ),
        DAILY_EXCEEDED_PENALTY,
    );
    score -= penalty(
        limit_status(
            inputs.weekly_working_hours,
            limits.max_weekly_working_hours,
            WEEKLY_MARGIN_HOURS,
        ),
        WEEKLY_EXCEEDED_PENALTY,
    );
    score -= penalty(
        limit_status(
            inputs.weekly_driving_hours,
            limits.max_weekly_driving_hours,
            WEEKLY_MARGIN_HOURS,
        ),
        WEEKLY_EXCEEDED_PENALTY,
    );

    if !inputs.break_compliant {
        score -= BREAK_PENALTY;
    }
    if !inputs.rest_compliant {
        score -= REST_PENALTY;
    }

    clamp_score(score)
}

fn clamp_score(score: i32) -> u8 {
    u8::try_from(score.clamp(0, MAX_SCORE)).unwrap_or(0)
}

const fn penalty(status: LimitStatus, exceeded: i32) -> i32 {
    match status {
        LimitStatus::Within => 0,
        LimitStatus::Approaching => APPROACHING_PENALTY,
        LimitStatus::Exceeded => exceeded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean() -> ScoreInputs {
        ScoreInputs {
            daily_working_hours: 0.0,
            daily_driving_hours: 0.0,
            daily_driving_limit_hours: 9.0,
            weekly_working_hours: 0.0,
            weekly_driving_hours: 0.0,
            break_compliant: true,
            rest_compliant: true,
        }
    }

    fn score(inputs: ScoreInputs) -> u8 {
        compliance_score(&inputs, &RegulatoryLimits::default())
    }

    #[test]
    fn limit_status_is_inclusive_at_limit() {
        assert_eq!(limit_status(13.0, 13.0, 1.0), LimitStatus::Approaching);
        assert_eq!(limit_status(13.01, 13.0, 1.0), LimitStatus::Exceeded);
        assert_eq!(limit_status(12.0, 13.0, 1.0), LimitStatus::Approaching);
        assert_eq!(limit_status(11.99, 13.0, 1.0), LimitStatus::Within);
    }

    #[test]
    fn clean_inputs_score_full_marks() {
        assert_eq!(score(clean()), 100);
    }

    #[test]
    fn daily_working_penalties() {
        let over = ScoreInputs {
            daily_working_hours: 14.0,
            ..clean()
        };
        assert_eq!(score(over), 80);

        let near = ScoreInputs {
            daily_working_hours: 12.5,
            ..clean()
        };
        assert_eq!(score(near), 95);
    }

    #[test]
    fn daily_driving_penalties() {
        let over = ScoreInputs {
            daily_driving_hours: 9.5,
            ..clean()
        };
        assert_eq!(score(over), 80);

        let near = ScoreInputs {
            daily_driving_hours: 8.5,
            ..clean()
        };
        assert_eq!(score(near), 95);

        let clear = ScoreInputs {
            daily_driving_hours: 8.4,
            ..clean()
        };
        assert_eq!(score(clear), 100);
    }

    #[test]
    fn weekly_penalties() {
        let over = ScoreInputs {
            weekly_working_hours: 61.0,
            weekly_driving_hours: 57.0,
            ..clean()
        };
        assert_eq!(score(over), 70);

        let near = ScoreInputs {
            weekly_working_hours: 58.0,
            weekly_driving_hours: 54.0,
            ..clean()
        };
        assert_eq!(score(near), 90);
    }

    #[test]
    fn break_and_rest_flags_cost_ten_each() {
        let inputs = ScoreInputs {
            break_compliant: false,
            rest_compliant: false,
            ..clean()
        };
        assert_eq!(score(inputs), 80);
    }

    #[test]
    fn extended_driving_limit_moves_the_threshold() {
        let extended = ScoreInputs {
            daily_driving_hours: 9.5,
            daily_driving_limit_hours: 10.0,
            ..clean()
        };
        assert_eq!(score(extended), 95);

        let over_extended = ScoreInputs {
            daily_driving_hours: 12.5,
            daily_driving_limit_hours: 10.0,
            ..clean()
        };
        assert_eq!(score(over_extended), 80);
    }

    #[test]
    fn all_penalties_stack() {
        let limits = RegulatoryLimits {
            max_daily_working_hours: 1.0,
            max_daily_driving_hours: 1.0,
            max_weekly_working_hours: 1.0,
            max_weekly_driving_hours: 1.0,
            ..RegulatoryLimits::default()
        };
        let inputs = ScoreInputs {
            daily_working_hours: 100.0,
            daily_driving_hours: 100.0,
            daily_driving_limit_hours: 1.0,
            weekly_working_hours: 100.0,
            weekly_driving_hours: 100.0,
            break_compliant: false,
            rest_compliant: false,
        };
        // 100 - 20 - 20 - 15 - 15 - 10 - 10 = 10
        assert_eq!(compliance_score(&inputs, &limits), 10);
    }

    #[test]
    fn clamp_score_floors_at_zero() {
        assert_eq!(clamp_score(-40), 0);
        assert_eq!(clamp_score(0), 0);
        assert_eq!(clamp_score(55), 55);
        assert_eq!(clamp_score(130), 100);
    }

    #[test]
    fn score_stays_in_range_for_sampled_inputs() {
        let limits = RegulatoryLimits::default();
        for hours in [0.0, 4.5, 8.9, 9.0, 12.0, 13.0, 24.0, 70.0, 500.0] {
            for flag in [true, false] {
                let inputs = ScoreInputs {
                    daily_working_hours: hours,
                    daily_driving_hours: hours,
                    daily_driving_limit_hours: limits.max_daily_driving_hours,
                    weekly_working_hours: hours * 5.0,
                    weekly_driving_hours: hours * 5.0,
                    break_compliant: flag,
                    rest_compliant: flag,
                };
                assert!(compliance_score(&inputs, &limits) <= 100);
            }
        }
    }
}
