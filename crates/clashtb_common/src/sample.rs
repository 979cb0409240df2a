//! The atomic unit of a trace: one time step of one signal.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::logic::LogicLevel;
use crate::value::Value;

/// One time step's value for one signal.
///
/// Samples are immutable; a [`Signal`](crate::Signal) replaces a sample at
/// an index rather than mutating it. When the level is not
/// [`LogicLevel::Logic`] the value is ignored by comparisons.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Sample {
    value: Option<Value>,
    level: LogicLevel,
    color: u8,
}

impl Sample {
    /// Creates an asserted sample.
    pub fn logic(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            level: LogicLevel::Logic,
            color: 0,
        }
    }

    /// Creates an unknown sample.
    pub fn unknown() -> Self {
        Self {
            value: None,
            level: LogicLevel::Unknown,
            color: 0,
        }
    }

    /// Creates a don't-care sample.
    pub fn dont_care() -> Self {
        Self {
            value: None,
            level: LogicLevel::DontCare,
            color: 0,
        }
    }

    /// Creates an unasserted sample at the given level.
    ///
    /// Passing [`LogicLevel::Logic`] yields an unknown sample, since an
    /// asserted sample needs a value.
    pub fn unasserted(level: LogicLevel) -> Self {
        match level {
            LogicLevel::DontCare => Self::dont_care(),
            _ => Self::unknown(),
        }
    }

    /// Returns a copy of this sample with the given color index.
    pub fn with_color(mut self, color: u8) -> Self {
        self.color = color;
        self
    }

    /// The asserted value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self.level {
            LogicLevel::Logic => self.value.as_ref(),
            _ => None,
        }
    }

    /// The logic level.
    pub fn level(&self) -> LogicLevel {
        self.level
    }

    /// The color index used for data lanes in the compact encoding.
    pub fn color(&self) -> u8 {
        self.color
    }

    /// Returns `true` if this sample asserts a value.
    pub fn is_asserted(&self) -> bool {
        self.level.is_asserted()
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.level.symbol(), self.value()) {
            (Some(symbol), _) => write!(f, "{symbol}"),
            (None, Some(value)) => write!(f, "{value}"),
            (None, None) => write!(f, "?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logic_sample() {
        let s = Sample::logic(3i64);
        assert_eq!(s.value(), Some(&Value::Int(3)));
        assert_eq!(s.level(), LogicLevel::Logic);
        assert!(s.is_asserted());
        assert_eq!(s.color(), 0);
    }

    #[test]
    fn unknown_hides_value() {
        let s = Sample::unknown();
        assert_eq!(s.value(), None);
        assert!(!s.is_asserted());
    }

    #[test]
    fn unasserted_levels() {
        assert_eq!(
            Sample::unasserted(LogicLevel::DontCare).level(),
            LogicLevel::DontCare
        );
        assert_eq!(
            Sample::unasserted(LogicLevel::Logic).level(),
            LogicLevel::Unknown
        );
    }

    #[test]
    fn color_is_kept() {
        let s = Sample::logic("Idle").with_color(2);
        assert_eq!(s.color(), 2);
        assert_eq!(s.value(), Some(&Value::from("Idle")));
    }

    #[test]
    fn display() {
        assert_eq!(Sample::logic(1i64).to_string(), "1");
        assert_eq!(Sample::logic("Idle").to_string(), "Idle");
        assert_eq!(Sample::unknown().to_string(), "x");
        assert_eq!(Sample::dont_care().to_string(), "-");
    }
}
