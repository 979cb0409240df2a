//! Run-length wave codec.
//!
//! A wave string holds one character per time step. A literal character
//! starts a new value; `.` repeats the previous step's symbol and payload.
//! Data symbols (`2`..`9`) take their payloads, in order, from a separate
//! compacted data list that only has entries for literal data symbols.
//!
//! ```text
//! ['0','1','0','0','x','x','0']            <-> "010.x.0"
//! ['3','3','3','x','3','3'] + [A,A,A,_,B,B] <-> "3..x3." + [A,B]
//! ```
//!
//! Signals are mapped to and from waves by [`encode_signal`] and
//! [`decode_signal`].

use clashtb_common::logic::{data_symbol, is_data_symbol, UNKNOWN_SYMBOL};
use clashtb_common::{LogicLevel, Sample, Signal, SignalKind, Value, WaveSymbol};

use crate::error::WaveError;

/// The continuation marker.
pub const CONTINUATION: char = '.';

/// Compresses a list of per-step symbols.
///
/// Each step that repeats the previous symbol is written as `.`.
pub fn compress(wave: &[char]) -> String {
    let mut out = String::with_capacity(wave.len());
    let mut previous: Option<char> = None;
    for &w in wave {
        if previous == Some(w) {
            out.push(CONTINUATION);
        } else {
            out.push(w);
        }
        previous = Some(w);
    }
    out
}

/// Compresses per-step symbols together with their payloads.
///
/// A step is written as `.` only when both its symbol and its payload equal
/// the previous step's. Only literal data symbols contribute an entry to the
/// returned data list.
///
/// # Errors
///
/// Fails if `wave` and `data` differ in length or a literal data symbol has
/// no payload.
pub fn compress_with_data<T: Clone + PartialEq>(
    wave: &[char],
    data: &[Option<T>],
) -> Result<(String, Vec<T>), WaveError> {
    if wave.len() != data.len() {
        return Err(WaveError::PayloadLengthMismatch {
            wave: wave.len(),
            data: data.len(),
        });
    }

    let mut out = String::with_capacity(wave.len());
    let mut compacted = Vec::new();
    let mut previous: Option<(char, &Option<T>)> = None;

    for (index, (&w, d)) in wave.iter().zip(data).enumerate() {
        if previous == Some((w, d)) {
            out.push(CONTINUATION);
        } else {
            out.push(w);
            if is_data_symbol(w) {
                match d {
                    Some(payload) => compacted.push(payload.clone()),
                    None => return Err(WaveError::MissingPayload { symbol: w, index }),
                }
            }
        }
        previous = Some((w, d));
    }

    Ok((out, compacted))
}

/// Expands a compressed wave into per-step symbols.
///
/// # Errors
///
/// Fails if the wave starts with `.`.
pub fn uncompress(wave: &str) -> Result<Vec<char>, WaveError> {
    let mut out: Vec<char> = Vec::with_capacity(wave.len());
    for w in wave.chars() {
        if w == CONTINUATION {
            let last = *out.last().ok_or(WaveError::LeadingContinuation)?;
            out.push(last);
        } else {
            out.push(w);
        }
    }
    Ok(out)
}

/// Expands a compressed wave and its compacted data list.
///
/// Every literal data symbol consumes the next unused data value; `.`
/// repeats the previous step's symbol and payload; any other literal has
/// no payload.
///
/// # Errors
///
/// Fails if the wave starts with `.` or the number of literal data symbols
/// differs from the length of `data`.
pub fn uncompress_with_data<T: Clone>(
    wave: &str,
    data: &[T],
) -> Result<(Vec<char>, Vec<Option<T>>), WaveError> {
    let symbols = wave.chars().filter(|&c| is_data_symbol(c)).count();
    if symbols != data.len() {
        return Err(WaveError::DataLengthMismatch {
            symbols,
            data: data.len(),
        });
    }

    let mut data_iter = data.iter();
    let mut steps: Vec<char> = Vec::with_capacity(wave.len());
    let mut payloads: Vec<Option<T>> = Vec::with_capacity(wave.len());

    for w in wave.chars() {
        if w == CONTINUATION {
            let last = *steps.last().ok_or(WaveError::LeadingContinuation)?;
            let payload = payloads.last().cloned().flatten();
            steps.push(last);
            payloads.push(payload);
        } else if is_data_symbol(w) {
            let payload = data_iter.next().cloned().ok_or(WaveError::DataLengthMismatch {
                symbols,
                data: data.len(),
            })?;
            steps.push(w);
            payloads.push(Some(payload));
        } else {
            steps.push(w);
            payloads.push(None);
        }
    }

    Ok((steps, payloads))
}

/// A signal in its compact wave form.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedWave {
    /// The compressed wave string.
    pub wave: String,
    /// The compacted data list, `None` when the wave has no data symbols.
    pub data: Option<Vec<Value>>,
}

/// Encodes a signal as a compact wave.
///
/// `Bit` signals use the literal `0`/`1` symbols; every other kind writes
/// asserted samples as data symbols chosen by their color index. Unknown and
/// don't-care samples become `x` and `-`.
pub fn encode_signal(signal: &Signal) -> Result<EncodedWave, WaveError> {
    let mut steps = Vec::with_capacity(signal.len());
    let mut payloads = Vec::with_capacity(signal.len());

    for sample in signal {
        let (step, payload) = match sample.value() {
            None => (sample.level().symbol().unwrap_or(UNKNOWN_SYMBOL), None),
            Some(value) => match (signal.kind(), value.as_int()) {
                (SignalKind::Bit, Some(0)) => ('0', None),
                (SignalKind::Bit, Some(_)) => ('1', None),
                _ => (data_symbol(sample.color()), Some(value.clone())),
            },
        };
        steps.push(step);
        payloads.push(payload);
    }

    let (wave, data) = compress_with_data(&steps, &payloads)?;
    Ok(EncodedWave {
        wave,
        data: (!data.is_empty()).then_some(data),
    })
}

/// Infers the kind of a decoded wave: `Bit` when it only holds binary and
/// unasserted symbols, `Data` otherwise.
pub fn infer_kind(wave: &str) -> SignalKind {
    if wave.chars().any(is_data_symbol) {
        SignalKind::Data
    } else {
        SignalKind::Bit
    }
}

/// Decodes a compact wave into a signal of the given kind.
///
/// # Errors
///
/// Fails on a leading `.`, a wave/data length mismatch, a character outside
/// the wave alphabet, or a value outside the signal's domain.
pub fn decode_signal(
    name: &str,
    kind: SignalKind,
    wave: &str,
    data: Option<&[Value]>,
) -> Result<Signal, WaveError> {
    let (steps, payloads) = uncompress_with_data(wave, data.unwrap_or(&[]))?;

    let mut samples = Vec::with_capacity(steps.len());
    for (step, payload) in steps.into_iter().zip(payloads) {
        let symbol = WaveSymbol::from_char(step).ok_or_else(|| WaveError::UnknownSymbol {
            symbol: step,
            name: name.to_string(),
        })?;
        let sample = match (symbol, payload) {
            (WaveSymbol::Binary(bit), _) => Sample::logic(i64::from(bit)),
            (WaveSymbol::Data(color), Some(value)) => Sample::logic(value).with_color(color),
            (WaveSymbol::Data(_), None) => {
                return Err(WaveError::MissingPayload {
                    symbol: step,
                    index: samples.len(),
                })
            }
            (WaveSymbol::Unknown, _) => Sample::unasserted(LogicLevel::Unknown),
            (WaveSymbol::DontCare, _) => Sample::unasserted(LogicLevel::DontCare),
        };
        samples.push(sample);
    }

    Ok(Signal::new(name, kind, samples)?)
}
