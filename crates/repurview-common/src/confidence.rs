/// Outcome scoring for a closed contextual review.
/// Turns an answer tally into a new hypothesis status and confidence.

use serde::{Deserialize, Serialize};

use crate::entities::{AnswerTally, HypothesisStatus, OutcomeSnapshot};

pub const MIN_CONFIDENCE: i32 = 0;
pub const MAX_CONFIDENCE: i32 = 100;

/// Step sizes and the support threshold applied to a review.
/// A "no" moves the score further than a "yes" so that a clinician-flagged
/// concern shows up faster than agreement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoringRules {
    #[serde(default = "default_yes_step")]
    pub yes_step: i32,
    #[serde(default = "default_no_step")]
    pub no_step: i32,
    /// Fraction of "yes" answers (numerator / denominator) needed for `supported`.
    #[serde(default = "default_support_numerator")]
    pub support_numerator: u32,
    #[serde(default = "default_support_denominator")]
    pub support_denominator: u32,
}

fn default_yes_step()            -> i32 { 5 }
fn default_no_step()             -> i32 { 8 }
fn default_support_numerator()   -> u32 { 2 }
fn default_support_denominator() -> u32 { 3 }

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            yes_step:            default_yes_step(),
            no_step:             default_no_step(),
            support_numerator:   default_support_numerator(),
            support_denominator: default_support_denominator(),
        }
    }
}

impl ScoringRules {
    /// Check the rules are usable. Returns a description of the first problem.
    pub fn validate(&self) -> Result<(), String> {
        if self.support_denominator == 0 {
            return Err("support_denominator must be non-zero".to_string());
        }
        if self.support_numerator > self.support_denominator {
            return Err(format!(
                "support ratio {}/{} exceeds 1",
                self.support_numerator, self.support_denominator
            ));
        }
        if self.yes_step < 0 || self.no_step < 0 {
            return Err("confidence steps must be non-negative".to_string());
        }
        Ok(())
    }

    /// Minimum "yes" count for `supported`: ceil(numerator/denominator * total).
    pub fn support_threshold(&self, total: u32) -> u64 {
        let den = u64::from(self.support_denominator.max(1));
        (u64::from(self.support_numerator) * u64::from(total)).div_ceil(den)
    }

    pub fn status_for(&self, tally: &AnswerTally) -> HypothesisStatus {
        if tally.no > tally.yes {
            HypothesisStatus::Concerns
        } else if u64::from(tally.yes) >= self.support_threshold(tally.total()) {
            HypothesisStatus::Supported
        } else {
            HypothesisStatus::Awaiting
        }
    }

    /// Linear adjustment clamped to 0–100. "Unsure" never moves the score.
    pub fn adjust_confidence(&self, old: u8, tally: &AnswerTally) -> u8 {
        let yes = i32::try_from(tally.yes).unwrap_or(i32::MAX);
        let no = i32::try_from(tally.no).unwrap_or(i32::MAX);
        let raw = i32::from(old)
            .saturating_add(self.yes_step.saturating_mul(yes))
            .saturating_sub(self.no_step.saturating_mul(no));
        // clamped into 0..=100, always fits
        raw.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE) as u8
    }

    pub fn evaluate(&self, old_confidence: u8, tally: &AnswerTally) -> OutcomeSnapshot {
        OutcomeSnapshot {
            status: self.status_for(tally),
            confidence: self.adjust_confidence(old_confidence, tally),
        }
    }
}

/// Is `confidence` a legal stored value?
pub fn in_range(confidence: i32) -> bool {
    (MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&confidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(yes: u32, no: u32, unsure: u32) -> AnswerTally {
        AnswerTally { yes, no, unsure }
    }

    #[test]
    fn test_two_yes_one_no_is_supported() {
        let rules = ScoringRules::default();
        let out = rules.evaluate(70, &tally(2, 1, 0));
        assert_eq!(out.status, HypothesisStatus::Supported);
        assert_eq!(out.confidence, 72);
    }

    #[test]
    fn test_majority_no_is_concerns() {
        let rules = ScoringRules::default();
        let out = rules.evaluate(70, &tally(0, 2, 1));
        assert_eq!(out.status, HypothesisStatus::Concerns);
        assert_eq!(out.confidence, 54);
    }

    #[test]
    fn test_mixed_signal_stays_awaiting() {
        let rules = ScoringRules::default();
        let out = rules.evaluate(60, &tally(1, 0, 2));
        assert_eq!(out.status, HypothesisStatus::Awaiting);
        assert_eq!(out.confidence, 65);
    }

    #[test]
    fn test_tie_is_not_concerns() {
        // 1 yes, 1 no: threshold for 2 answers is 2, so awaiting
        let rules = ScoringRules::default();
        assert_eq!(rules.status_for(&tally(1, 1, 0)), HypothesisStatus::Awaiting);
    }

    #[test]
    fn test_support_threshold_rounds_up() {
        let rules = ScoringRules::default();
        assert_eq!(rules.support_threshold(1), 1);
        assert_eq!(rules.support_threshold(3), 2);
        assert_eq!(rules.support_threshold(4), 3);
        assert_eq!(rules.support_threshold(0), 0);
    }

    #[test]
    fn test_extreme_ratio_terms_do_not_overflow() {
        let rules = ScoringRules {
            support_numerator: u32::MAX,
            support_denominator: u32::MAX,
            ..Default::default()
        };
        assert!(rules.validate().is_ok());
        assert_eq!(rules.support_threshold(u32::MAX), u64::from(u32::MAX));
        assert_eq!(rules.status_for(&tally(2, 0, 0)), HypothesisStatus::Supported);
        assert_eq!(rules.status_for(&tally(2, 1, 0)), HypothesisStatus::Awaiting);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let rules = ScoringRules::default();
        assert_eq!(rules.adjust_confidence(98, &tally(4, 0, 0)), 100);
        assert_eq!(rules.adjust_confidence(10, &tally(0, 4, 0)), 0);
    }

    #[test]
    fn test_unsure_does_not_move_confidence() {
        let rules = ScoringRules::default();
        assert_eq!(rules.adjust_confidence(61, &tally(0, 0, 4)), 61);
    }

    #[test]
    fn test_validate_rejects_bad_ratio() {
        let zero = ScoringRules { support_denominator: 0, ..Default::default() };
        assert!(zero.validate().is_err());
        let above_one = ScoringRules { support_numerator: 4, ..Default::default() };
        assert!(above_one.validate().is_err());
        assert!(ScoringRules::default().validate().is_ok());
    }

    #[test]
    fn test_in_range() {
        assert!(in_range(0));
        assert!(in_range(100));
        assert!(!in_range(-1));
        assert!(!in_range(101));
    }
}
