//! Tri-state comparison of expected and actual traces.

use clashtb_common::{Sample, Signal};

use crate::error::BenchError;

/// Returns `true` if `actual` satisfies `expected` at one time step.
///
/// An expected sample that asserts nothing (unknown or don't-care) matches
/// anything. Otherwise the two values must denote the same logic level
/// (`1`, `true`, `HIGH`, ... are all high) or be equal.
pub fn samples_match(expected: &Sample, actual: &Sample) -> bool {
    match (expected.value(), actual.value()) {
        (None, _) => true,
        (Some(e), Some(a)) => e.loosely_eq(a),
        (Some(_), None) => false,
    }
}

/// The verdict for one expected output.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    expected: Signal,
    actual: Signal,
    steps: Vec<bool>,
}

impl Comparison {
    /// Compares two traces step by step.
    ///
    /// # Errors
    ///
    /// Fails if the traces differ in length.
    pub fn new(expected: Signal, actual: Signal) -> Result<Self, BenchError> {
        if expected.len() != actual.len() {
            return Err(BenchError::ActualLengthMismatch {
                signal: actual.name().to_string(),
                expected: expected.len(),
                actual: actual.len(),
            });
        }
        let steps = expected
            .iter()
            .zip(actual.iter())
            .map(|(e, a)| samples_match(e, a))
            .collect();
        Ok(Self {
            expected,
            actual,
            steps,
        })
    }

    /// The name the result is reported under.
    pub fn name(&self) -> &str {
        self.actual.name()
    }

    /// The expected trace.
    pub fn expected(&self) -> &Signal {
        &self.expected
    }

    /// The actual trace.
    pub fn actual(&self) -> &Signal {
        &self.actual
    }

    /// Per-step match results.
    pub fn steps(&self) -> &[bool] {
        &self.steps
    }

    /// Returns `true` if every step matches.
    pub fn passed(&self) -> bool {
        self.steps.iter().all(|&ok| ok)
    }

    /// Indices of the steps that do not match.
    pub fn mismatches(&self) -> Vec<usize> {
        self.steps
            .iter()
            .enumerate()
            .filter(|&(_, &ok)| !ok)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clashtb_common::SignalKind;

    #[test]
    fn unasserted_expectation_matches_anything() {
        assert!(samples_match(&Sample::unknown(), &Sample::logic(7i64)));
        assert!(samples_match(&Sample::dont_care(), &Sample::logic("Idle")));
        assert!(samples_match(&Sample::unknown(), &Sample::unknown()));
    }

    #[test]
    fn logic_spellings_match() {
        assert!(samples_match(&Sample::logic(1i64), &Sample::logic("true")));
        assert!(samples_match(&Sample::logic("HIGH"), &Sample::logic(1i64)));
        assert!(samples_match(&Sample::logic(0i64), &Sample::logic("low")));
        assert!(!samples_match(&Sample::logic(1i64), &Sample::logic("False")));
    }

    #[test]
    fn concrete_values_must_be_equal() {
        assert!(samples_match(&Sample::logic(3i64), &Sample::logic(3i64)));
        assert!(!samples_match(&Sample::logic(3i64), &Sample::logic(4i64)));
        assert!(samples_match(&Sample::logic("Idle"), &Sample::logic("Idle")));
        assert!(!samples_match(&Sample::logic(1i64), &Sample::unknown()));
    }

    #[test]
    fn comparison_reports_mismatches() {
        let expected = Signal::bit("out", [0i64, 0, 1, 1]).unwrap();
        let actual = expected.from_actual(&["0", "1", "1", "1"]).unwrap();
        let c = Comparison::new(expected, actual).unwrap();
        assert!(!c.passed());
        assert_eq!(c.mismatches(), vec![1]);
        assert_eq!(c.steps(), &[true, false, true, true]);
        assert_eq!(c.name(), "out");
    }

    #[test]
    fn dont_care_steps_pass() {
        let expected = Signal::from_input("n", SignalKind::Unsigned(4), ("2x-2", vec![3i64, 5])).unwrap();
        let actual = expected.from_actual(&["3", "9", "12", "5"]).unwrap();
        assert!(Comparison::new(expected, actual).unwrap().passed());
    }

    #[test]
    fn length_mismatch_is_error() {
        let expected = Signal::bit("out", "0011").unwrap();
        let actual = expected.from_actual(&["0", "0"]).unwrap();
        assert!(matches!(
            Comparison::new(expected, actual).unwrap_err(),
            BenchError::ActualLengthMismatch {
                expected: 4,
                actual: 2,
                ..
            }
        ));
    }
}
