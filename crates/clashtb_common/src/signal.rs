//! Named, ordered sample sequences with a declared value domain.
//!
//! A [`Signal`] is one wire's trace over time. Its [`SignalKind`] fixes the
//! domain every asserted sample must lie in; the domain is checked whenever
//! concrete values enter the signal (construction, [`Signal::push`],
//! [`Signal::set`], [`Signal::fit`]). A length-1 signal is a constant and
//! can be broadcast to any run length with [`Signal::fit`].

use std::fmt;
use std::ops::Index;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::convert::{convert_values, WaveInput};
use crate::error::ValueError;
use crate::sample::Sample;
use crate::value::Value;

/// The value domain of a signal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SignalKind {
    /// A single bit: 0 or 1.
    Bit,
    /// An N-bit unsigned integer in `[0, 2^N - 1]`.
    Unsigned(u32),
    /// An N-bit two's complement integer in `[-2^(N-1), 2^(N-1) - 1]`.
    Signed(u32),
    /// An N-bit vector, valued like `Unsigned(N)`.
    BitVector(u32),
    /// Any value: state names, opaque simulator payloads, or integers.
    Data,
}

impl SignalKind {
    /// Returns the inclusive integer bounds of a numeric domain.
    ///
    /// `Data` has no bounds and returns `None`.
    pub fn bounds(self) -> Option<(i64, i64)> {
        match self {
            SignalKind::Bit => Some((0, 1)),
            SignalKind::Unsigned(n) | SignalKind::BitVector(n) => {
                let max = if n >= 63 { i64::MAX } else { (1i64 << n) - 1 };
                Some((0, max))
            }
            SignalKind::Signed(0) => Some((0, 0)),
            SignalKind::Signed(n) if n >= 64 => Some((i64::MIN, i64::MAX)),
            SignalKind::Signed(n) => {
                let half = 1i64 << (n - 1);
                Some((-half, half - 1))
            }
            SignalKind::Data => None,
        }
    }

    /// Returns `true` if `value` lies in this domain.
    pub fn contains(self, value: &Value) -> bool {
        match (self.bounds(), value) {
            (None, _) => true,
            (Some((lo, hi)), Value::Int(n)) => (lo..=hi).contains(n),
            (Some(_), Value::Text(_)) => false,
        }
    }

    /// Parses one item of raw simulator output into a value of this domain.
    ///
    /// Numeric domains accept integers and, for `Bit`, boolean spellings.
    /// Text that cannot be read as a number is kept as text so the domain
    /// check reports it.
    pub fn parse_raw(self, raw: &str) -> Value {
        let value = Value::parse(raw);
        match (self, &value) {
            (SignalKind::Bit, Value::Text(_)) => match value.as_logic() {
                Some(bit) => Value::Int(i64::from(bit)),
                None => value,
            },
            _ => value,
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Bit => write!(f, "Bit"),
            SignalKind::Unsigned(n) => write!(f, "Unsigned {n}"),
            SignalKind::Signed(n) => write!(f, "Signed {n}"),
            SignalKind::BitVector(n) => write!(f, "BitVector {n}"),
            SignalKind::Data => write!(f, "Data"),
        }
    }
}

/// A named, non-empty trace of samples.
///
/// `order` is the signal's position within its group (inputs and outputs
/// are ordered separately) and is how unlabeled simulator output is matched
/// back to a named signal.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Signal {
    name: String,
    kind: SignalKind,
    order: usize,
    samples: Vec<Sample>,
}

impl Signal {
    /// Creates a signal from already-built samples.
    ///
    /// # Errors
    ///
    /// Fails if `samples` is empty or an asserted sample is out of domain.
    pub fn new(
        name: impl Into<String>,
        kind: SignalKind,
        samples: Vec<Sample>,
    ) -> Result<Self, ValueError> {
        let name = name.into();
        if samples.is_empty() {
            return Err(ValueError::EmptySignal(name));
        }
        let signal = Self {
            name,
            kind,
            order: 0,
            samples,
        };
        for sample in &signal.samples {
            signal.check(sample)?;
        }
        Ok(signal)
    }

    /// Creates a signal from any accepted input shape.
    pub fn from_input(
        name: impl Into<String>,
        kind: SignalKind,
        input: impl Into<WaveInput>,
    ) -> Result<Self, ValueError> {
        let samples = convert_values(&input.into())?;
        Self::new(name, kind, samples)
    }

    /// Creates a single-bit signal.
    pub fn bit(name: impl Into<String>, input: impl Into<WaveInput>) -> Result<Self, ValueError> {
        Self::from_input(name, SignalKind::Bit, input)
    }

    /// Creates an N-bit unsigned signal.
    pub fn unsigned(
        name: impl Into<String>,
        width: u32,
        input: impl Into<WaveInput>,
    ) -> Result<Self, ValueError> {
        Self::from_input(name, SignalKind::Unsigned(width), input)
    }

    /// Creates an N-bit signed signal.
    pub fn signed(
        name: impl Into<String>,
        width: u32,
        input: impl Into<WaveInput>,
    ) -> Result<Self, ValueError> {
        Self::from_input(name, SignalKind::Signed(width), input)
    }

    /// Creates an N-bit bit-vector signal.
    pub fn bit_vector(
        name: impl Into<String>,
        width: u32,
        input: impl Into<WaveInput>,
    ) -> Result<Self, ValueError> {
        Self::from_input(name, SignalKind::BitVector(width), input)
    }

    /// Creates an unconstrained data signal (state names, opaque values).
    pub fn data(name: impl Into<String>, input: impl Into<WaveInput>) -> Result<Self, ValueError> {
        Self::from_input(name, SignalKind::Data, input)
    }

    /// Returns this signal with the given order index.
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Returns this signal under a new name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builds the actual-output counterpart of this signal from raw
    /// simulator text, keeping name, kind and order.
    pub fn from_actual<S: AsRef<str>>(&self, raw: &[S]) -> Result<Self, ValueError> {
        let samples = raw
            .iter()
            .map(|r| Sample::logic(self.kind.parse_raw(r.as_ref())))
            .collect();
        Ok(Self::new(self.name.clone(), self.kind, samples)?.with_order(self.order))
    }

    /// The signal name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared value domain.
    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    /// The position of this signal within its group.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if there are no samples, which a constructed signal never has.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns `true` if this signal is a constant (exactly one sample).
    pub fn is_constant(&self) -> bool {
        self.samples.len() == 1
    }

    /// The samples in time order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Iterates the samples in time order.
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Returns the sample at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    /// Appends one sample.
    pub fn push(&mut self, sample: Sample) -> Result<(), ValueError> {
        self.check(&sample)?;
        self.samples.push(sample);
        Ok(())
    }

    /// Appends several samples, validating all of them before any is added.
    pub fn extend(&mut self, samples: impl IntoIterator<Item = Sample>) -> Result<(), ValueError> {
        let samples: Vec<Sample> = samples.into_iter().collect();
        for sample in &samples {
            self.check(sample)?;
        }
        self.samples.extend(samples);
        Ok(())
    }

    /// Replaces the sample at `index` with an asserted sample of `value`.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<(), ValueError> {
        self.replace(index, Sample::logic(value))
    }

    /// Replaces the sample at `index`.
    pub fn replace(&mut self, index: usize, sample: Sample) -> Result<(), ValueError> {
        let len = self.samples.len();
        if index >= len {
            return Err(ValueError::IndexOutOfBounds {
                signal: self.name.clone(),
                index,
                len,
            });
        }
        self.check(&sample)?;
        self.samples[index] = sample;
        Ok(())
    }

    /// Broadcasts a constant signal to `n` samples.
    ///
    /// # Errors
    ///
    /// Fails unless the signal has exactly one sample and `n >= 1`.
    pub fn fit(&mut self, n: usize) -> Result<(), ValueError> {
        if !self.is_constant() {
            return Err(ValueError::NotConstant {
                signal: self.name.clone(),
                len: self.samples.len(),
            });
        }
        if n == 0 {
            return Err(ValueError::EmptySignal(self.name.clone()));
        }
        let sample = self.samples[0].clone();
        self.check(&sample)?;
        self.samples = vec![sample; n];
        Ok(())
    }

    /// The asserted values, `None` where a sample asserts nothing.
    pub fn values(&self) -> Vec<Option<Value>> {
        self.samples.iter().map(|s| s.value().cloned()).collect()
    }

    /// The samples as printable strings (`x`/`-` for unasserted samples).
    pub fn display_values(&self) -> Vec<String> {
        self.samples.iter().map(|s| s.to_string()).collect()
    }

    /// The samples as simulator literals.
    ///
    /// Unasserted samples are replaced by a random value drawn from the
    /// signal's domain.
    ///
    /// # Errors
    ///
    /// Fails for an unasserted sample of a `Data` signal, which has no
    /// domain to draw from.
    pub fn literals<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<String>, ValueError> {
        self.samples
            .iter()
            .enumerate()
            .map(|(index, sample)| match (sample.value(), self.kind.bounds()) {
                (Some(value), _) => Ok(value.to_literal()),
                (None, Some((lo, hi))) => Ok(Value::Int(rng.gen_range(lo..=hi)).to_literal()),
                (None, None) => Err(ValueError::Unprintable {
                    signal: self.name.clone(),
                    index,
                }),
            })
            .collect()
    }

    fn check(&self, sample: &Sample) -> Result<(), ValueError> {
        match sample.value() {
            Some(value) if !self.kind.contains(value) => Err(ValueError::OutOfRange {
                signal: self.name.clone(),
                kind: self.kind,
                value: value.clone(),
            }),
            _ => Ok(()),
        }
    }
}

impl Index<usize> for Signal {
    type Output = Sample;

    fn index(&self, index: usize) -> &Sample {
        &self.samples[index]
    }
}

impl<'a> IntoIterator for &'a Signal {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : {} [{}]",
            self.name,
            self.kind,
            self.display_values().join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::LogicLevel;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn bounds() {
        assert_eq!(SignalKind::Bit.bounds(), Some((0, 1)));
        assert_eq!(SignalKind::Unsigned(4).bounds(), Some((0, 15)));
        assert_eq!(SignalKind::Signed(4).bounds(), Some((-8, 7)));
        assert_eq!(SignalKind::BitVector(1).bounds(), Some((0, 1)));
        assert_eq!(SignalKind::Unsigned(64).bounds(), Some((0, i64::MAX)));
        assert_eq!(SignalKind::Signed(64).bounds(), Some((i64::MIN, i64::MAX)));
        assert_eq!(SignalKind::Data.bounds(), None);
    }

    #[test]
    fn kind_display() {
        assert_eq!(SignalKind::Bit.to_string(), "Bit");
        assert_eq!(SignalKind::Unsigned(8).to_string(), "Unsigned 8");
        assert_eq!(SignalKind::Data.to_string(), "Data");
    }

    #[test]
    fn parse_raw_bit_spellings() {
        assert_eq!(SignalKind::Bit.parse_raw("1"), Value::Int(1));
        assert_eq!(SignalKind::Bit.parse_raw("True"), Value::Int(1));
        assert_eq!(SignalKind::Bit.parse_raw("low"), Value::Int(0));
        assert_eq!(SignalKind::Data.parse_raw("Idle"), Value::from("Idle"));
        assert_eq!(SignalKind::Data.parse_raw("12"), Value::Int(12));
    }

    #[test]
    fn bit_signal_from_list() {
        let s = Signal::bit("start", [0i64, 1, 0, 0]).unwrap();
        assert_eq!(s.len(), 4);
        assert_eq!(s.name(), "start");
        assert_eq!(s.kind(), SignalKind::Bit);
        assert_eq!(s.order(), 0);
        assert_eq!(
            s.values(),
            vec![
                Some(Value::Int(0)),
                Some(Value::Int(1)),
                Some(Value::Int(0)),
                Some(Value::Int(0))
            ]
        );
    }

    #[test]
    fn bit_signal_rejects_out_of_range() {
        let err = Signal::bit("start", [0i64, 2]).unwrap_err();
        assert!(matches!(err, ValueError::OutOfRange { .. }));
    }

    #[test]
    fn unsigned_range_is_checked() {
        assert!(Signal::unsigned("n", 2, [0i64, 3]).is_ok());
        assert!(Signal::unsigned("n", 2, [4i64]).is_err());
        assert!(Signal::unsigned("n", 2, [-1i64]).is_err());
        assert!(Signal::signed("s", 3, [-4i64, 3]).is_ok());
        assert!(Signal::signed("s", 3, [4i64]).is_err());
    }

    #[test]
    fn names_rejected_by_numeric_kind() {
        assert!(Signal::unsigned("n", 4, vec!["Idle", "Busy"]).is_err());
        assert!(Signal::data("state", vec!["Idle", "Busy"]).is_ok());
    }

    #[test]
    fn empty_signal_rejected() {
        let err = Signal::new("e", SignalKind::Bit, vec![]).unwrap_err();
        assert_eq!(err, ValueError::EmptySignal("e".into()));
    }

    #[test]
    fn unknown_samples_pass_domain_check() {
        let s = Signal::bit("a", "0x-1").unwrap();
        assert_eq!(s[1].level(), LogicLevel::Unknown);
        assert_eq!(s[2].level(), LogicLevel::DontCare);
        assert_eq!(s.display_values(), vec!["0", "x", "-", "1"]);
    }

    #[test]
    fn fit_broadcasts_constant() {
        let mut s = Signal::unsigned("k", 4, 9i64).unwrap();
        assert!(s.is_constant());
        s.fit(5).unwrap();
        assert_eq!(s.len(), 5);
        assert!(s.iter().all(|sample| *sample == Sample::logic(9i64)));
    }

    #[test]
    fn fit_of_one_keeps_sample() {
        let mut s = Signal::bit("k", 1i64).unwrap();
        s.fit(1).unwrap();
        assert_eq!(s.values(), vec![Some(Value::Int(1))]);
    }

    #[test]
    fn fit_rejects_non_constant() {
        let mut s = Signal::bit("k", "01").unwrap();
        let err = s.fit(4).unwrap_err();
        assert_eq!(
            err,
            ValueError::NotConstant {
                signal: "k".into(),
                len: 2
            }
        );
    }

    #[test]
    fn fit_rejects_zero() {
        let mut s = Signal::bit("k", 1i64).unwrap();
        assert!(s.fit(0).is_err());
    }

    #[test]
    fn push_and_set_validate() {
        let mut s = Signal::bit("a", "0").unwrap();
        s.push(Sample::logic(1i64)).unwrap();
        assert!(s.push(Sample::logic(5i64)).is_err());
        assert_eq!(s.len(), 2);

        s.set(0, 1i64).unwrap();
        assert_eq!(s[0], Sample::logic(1i64));
        assert!(s.set(0, 3i64).is_err());
        assert!(matches!(
            s.set(9, 1i64).unwrap_err(),
            ValueError::IndexOutOfBounds { index: 9, .. }
        ));
    }

    #[test]
    fn extend_is_all_or_nothing() {
        let mut s = Signal::bit("a", "0").unwrap();
        let err = s.extend(vec![Sample::logic(1i64), Sample::logic(7i64)]);
        assert!(err.is_err());
        assert_eq!(s.len(), 1);
        s.extend(vec![Sample::logic(1i64), Sample::unknown()]).unwrap();
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn from_actual_keeps_identity() {
        let expected = Signal::bit("out", [0i64, 0, 1, 1]).unwrap().with_order(2);
        let actual = expected.from_actual(&["0", "1", "1", "1"]).unwrap();
        assert_eq!(actual.name(), "out");
        assert_eq!(actual.order(), 2);
        assert_eq!(actual.kind(), SignalKind::Bit);
        assert_eq!(actual[1], Sample::logic(1i64));
    }

    #[test]
    fn from_actual_checks_domain() {
        let expected = Signal::unsigned("n", 2, [0i64]).unwrap();
        assert!(expected.from_actual(&["7"]).is_err());
    }

    #[test]
    fn literals_randomize_unknowns_in_domain() {
        let s = Signal::unsigned("n", 3, ("2x2", vec![5i64, 6])).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let lits = s.literals(&mut rng).unwrap();
        assert_eq!(lits[0], "5");
        assert_eq!(lits[2], "6");
        let random: i64 = lits[1].parse().unwrap();
        assert!((0..=7).contains(&random));
    }

    #[test]
    fn literals_parenthesize_negatives() {
        let s = Signal::signed("s", 8, [-3i64, 4]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(s.literals(&mut rng).unwrap(), vec!["(-3)", "4"]);
    }

    #[test]
    fn literals_fail_for_unknown_data() {
        let s = Signal::data("state", ("3x", vec!["Idle"])).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            s.literals(&mut rng).unwrap_err(),
            ValueError::Unprintable {
                signal: "state".into(),
                index: 1
            }
        );
    }

    #[test]
    fn display() {
        let s = Signal::bit("a", "01x").unwrap();
        assert_eq!(s.to_string(), "a : Bit [0, 1, x]");
    }
}
