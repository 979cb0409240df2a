//! Normalization of caller-supplied value shapes into samples.
//!
//! Callers describe stimulus and expectations in whichever shape is most
//! convenient: a single scalar, a wave string such as `"01x-"`, a list of
//! integers, a list of state names, or a compact wave plus its data list.
//! [`WaveInput`] names each accepted shape explicitly and
//! [`convert_values`] turns it into the canonical sample list.

use crate::error::ValueError;
use crate::logic::{LogicLevel, WaveSymbol};
use crate::sample::Sample;
use crate::value::Value;

/// An accepted input shape for signal values.
#[derive(Clone, Debug, PartialEq)]
pub enum WaveInput {
    /// A single scalar, yielding one asserted sample.
    Scalar(Value),
    /// One sample per character of `0`, `1`, `x` and `-`.
    Wave(String),
    /// One asserted sample per integer.
    Ints(Vec<i64>),
    /// Either single wave characters or multi-character symbolic names.
    Strings(Vec<String>),
    /// A wave string whose data symbols take their values from the list.
    WaveData(String, Vec<Value>),
}

/// Converts an input shape into an ordered list of samples.
///
/// # Errors
///
/// Returns [`ValueError`] for empty input, characters outside the wave
/// alphabet, data symbols without data, and wave/data count mismatches.
pub fn convert_values(input: &WaveInput) -> Result<Vec<Sample>, ValueError> {
    match input {
        WaveInput::Scalar(value) => Ok(vec![Sample::logic(value.clone())]),
        WaveInput::Wave(wave) => {
            if wave.is_empty() {
                return Err(shape("empty wave string"));
            }
            wave.chars().map(symbol_sample).collect()
        }
        WaveInput::Ints(values) => {
            if values.is_empty() {
                return Err(shape("empty integer list"));
            }
            Ok(values.iter().map(|&v| Sample::logic(v)).collect())
        }
        WaveInput::Strings(values) => convert_strings(values),
        WaveInput::WaveData(wave, data) => convert_wave_data(wave, data),
    }
}

fn convert_strings(values: &[String]) -> Result<Vec<Sample>, ValueError> {
    if values.is_empty() {
        return Err(shape("empty string list"));
    }
    if values.iter().any(|v| v.is_empty()) {
        return Err(shape("empty string in list"));
    }

    let all_symbols = values.iter().all(|v| {
        let mut chars = v.chars();
        matches!(
            (chars.next(), chars.next()),
            (Some('0' | '1' | 'x' | 'X' | '-'), None)
        )
    });

    if all_symbols {
        values
            .iter()
            .filter_map(|v| v.chars().next())
            .map(symbol_sample)
            .collect()
    } else {
        Ok(values
            .iter()
            .map(|v| Sample::logic(Value::Text(v.clone())))
            .collect())
    }
}

fn convert_wave_data(wave: &str, data: &[Value]) -> Result<Vec<Sample>, ValueError> {
    if wave.is_empty() {
        return Err(shape("empty wave string"));
    }

    let needed = wave.chars().filter(|&c| is_data_char(c)).count();
    if needed != data.len() {
        return Err(ValueError::DataCountMismatch {
            needed,
            provided: data.len(),
        });
    }

    let mut data_iter = data.iter();
    let mut samples = Vec::with_capacity(wave.len());
    for c in wave.chars() {
        let symbol = WaveSymbol::from_char(c).ok_or(ValueError::UnknownSymbol(c))?;
        let sample = match symbol {
            WaveSymbol::Data(color) => match data_iter.next() {
                Some(value) => Sample::logic(value.clone()).with_color(color),
                None => {
                    return Err(ValueError::DataCountMismatch {
                        needed,
                        provided: data.len(),
                    })
                }
            },
            WaveSymbol::Binary(bit) => Sample::logic(i64::from(bit)),
            other => Sample::unasserted(other.level()),
        };
        samples.push(sample);
    }
    Ok(samples)
}

/// Maps a bare wave character (no data list) to a sample.
fn symbol_sample(c: char) -> Result<Sample, ValueError> {
    match WaveSymbol::from_char(c) {
        Some(WaveSymbol::Binary(bit)) => Ok(Sample::logic(i64::from(bit))),
        Some(WaveSymbol::Unknown) => Ok(Sample::unasserted(LogicLevel::Unknown)),
        Some(WaveSymbol::DontCare) => Ok(Sample::unasserted(LogicLevel::DontCare)),
        Some(WaveSymbol::Data(_)) => Err(shape(&format!(
            "data symbol '{c}' requires a data list"
        ))),
        None => Err(ValueError::UnknownSymbol(c)),
    }
}

fn is_data_char(c: char) -> bool {
    matches!(WaveSymbol::from_char(c), Some(WaveSymbol::Data(_)))
}

fn shape(reason: &str) -> ValueError {
    ValueError::UnsupportedShape {
        reason: reason.to_string(),
    }
}

impl From<i64> for WaveInput {
    fn from(v: i64) -> Self {
        WaveInput::Scalar(Value::Int(v))
    }
}

impl From<&str> for WaveInput {
    fn from(wave: &str) -> Self {
        WaveInput::Wave(wave.to_string())
    }
}

impl From<Vec<i64>> for WaveInput {
    fn from(values: Vec<i64>) -> Self {
        WaveInput::Ints(values)
    }
}

impl<const N: usize> From<[i64; N]> for WaveInput {
    fn from(values: [i64; N]) -> Self {
        WaveInput::Ints(values.to_vec())
    }
}

impl From<Vec<&str>> for WaveInput {
    fn from(values: Vec<&str>) -> Self {
        WaveInput::Strings(values.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for WaveInput {
    fn from(values: Vec<String>) -> Self {
        WaveInput::Strings(values)
    }
}

impl<V: Into<Value>> From<(&str, Vec<V>)> for WaveInput {
    fn from((wave, data): (&str, Vec<V>)) -> Self {
        WaveInput::WaveData(wave.to_string(), data.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::LogicLevel as LL;

    fn pairs(samples: &[Sample]) -> Vec<(Option<Value>, LL)> {
        samples
            .iter()
            .map(|s| (s.value().cloned(), s.level()))
            .collect()
    }

    #[test]
    fn wave_string() {
        let out = convert_values(&"01x".into()).unwrap();
        assert_eq!(
            pairs(&out),
            vec![
                (Some(Value::Int(0)), LL::Logic),
                (Some(Value::Int(1)), LL::Logic),
                (None, LL::Unknown),
            ]
        );
    }

    #[test]
    fn dash_is_dont_care() {
        let out = convert_values(&"1-".into()).unwrap();
        assert_eq!(out[1].level(), LL::DontCare);
    }

    #[test]
    fn scalar() {
        let out = convert_values(&1i64.into()).unwrap();
        assert_eq!(pairs(&out), vec![(Some(Value::Int(1)), LL::Logic)]);
    }

    #[test]
    fn integer_list() {
        let out = convert_values(&vec![1i64, 2, 3].into()).unwrap();
        assert_eq!(
            pairs(&out),
            vec![
                (Some(Value::Int(1)), LL::Logic),
                (Some(Value::Int(2)), LL::Logic),
                (Some(Value::Int(3)), LL::Logic),
            ]
        );
    }

    #[test]
    fn state_names() {
        let out = convert_values(&vec!["Idle", "StateX"].into()).unwrap();
        assert_eq!(
            pairs(&out),
            vec![
                (Some(Value::from("Idle")), LL::Logic),
                (Some(Value::from("StateX")), LL::Logic),
            ]
        );
    }

    #[test]
    fn single_character_strings_are_symbols() {
        let out = convert_values(&vec!["1", "1", "0", "x"].into()).unwrap();
        assert_eq!(
            pairs(&out),
            vec![
                (Some(Value::Int(1)), LL::Logic),
                (Some(Value::Int(1)), LL::Logic),
                (Some(Value::Int(0)), LL::Logic),
                (None, LL::Unknown),
            ]
        );
    }

    #[test]
    fn wave_with_data() {
        let out = convert_values(&("3x", vec!["Idle"]).into()).unwrap();
        assert_eq!(
            pairs(&out),
            vec![(Some(Value::from("Idle")), LL::Logic), (None, LL::Unknown)]
        );
        assert_eq!(out[0].color(), 1);

        let out = convert_values(&("33x", vec!["Idle", "StateX"]).into()).unwrap();
        assert_eq!(
            pairs(&out),
            vec![
                (Some(Value::from("Idle")), LL::Logic),
                (Some(Value::from("StateX")), LL::Logic),
                (None, LL::Unknown),
            ]
        );
    }

    #[test]
    fn wave_with_data_keeps_binary() {
        let out = convert_values(&("13", vec![7i64]).into()).unwrap();
        assert_eq!(
            pairs(&out),
            vec![
                (Some(Value::Int(1)), LL::Logic),
                (Some(Value::Int(7)), LL::Logic)
            ]
        );
    }

    #[test]
    fn data_count_mismatch() {
        let err = convert_values(&("333", vec!["A"]).into()).unwrap_err();
        assert_eq!(
            err,
            ValueError::DataCountMismatch {
                needed: 3,
                provided: 1
            }
        );
        let err = convert_values(&("3", vec!["A", "B"]).into()).unwrap_err();
        assert!(matches!(err, ValueError::DataCountMismatch { .. }));
    }

    #[test]
    fn rejects_unknown_symbols() {
        assert_eq!(
            convert_values(&"01q".into()).unwrap_err(),
            ValueError::UnknownSymbol('q')
        );
        assert!(matches!(
            convert_values(&"3".into()).unwrap_err(),
            ValueError::UnsupportedShape { .. }
        ));
        assert_eq!(
            convert_values(&("3.", vec!["A"]).into()).unwrap_err(),
            ValueError::UnknownSymbol('.')
        );
    }

    #[test]
    fn rejects_empty_shapes() {
        assert!(convert_values(&"".into()).is_err());
        assert!(convert_values(&Vec::<i64>::new().into()).is_err());
        assert!(convert_values(&WaveInput::Strings(vec![])).is_err());
        assert!(convert_values(&vec!["A", ""].into()).is_err());
    }
}
