//! One test run of an entity against expected outputs.
//!
//! A [`Testbench`] collects input and expected-output signals, checks that
//! every non-constant signal shares one length, broadcasts constants to that
//! length, samples the entity through a [`Simulator`], and compares each
//! expected output with the actual output at its order index.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clashtb_common::{Sample, Signal, SignalKind};
use clashtb_repl::Simulator;
use clashtb_wave::Chronogram;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::compare::Comparison;
use crate::error::BenchError;
use crate::report::{render_report, ReportOptions};

/// Group label of the input signals in a session chronogram.
pub const INPUTS_GROUP: &str = "inputs";
/// Group label of the expected outputs in a session chronogram.
pub const EXPECTED_GROUP: &str = "out (th)";
/// Group label of the actual outputs in a session chronogram.
pub const ACTUAL_GROUP: &str = "out";

/// A configured, and possibly finished, test session.
#[derive(Debug)]
pub struct Testbench {
    design: PathBuf,
    entity: String,
    inputs: Vec<Signal>,
    expected: Vec<Signal>,
    actual_names: Option<Vec<String>>,
    single_value: bool,
    length: Option<usize>,
    rng: StdRng,
    results: Option<RunResults>,
}

#[derive(Debug)]
struct RunResults {
    actual: Vec<Signal>,
    comparisons: Vec<Comparison>,
}

impl Testbench {
    /// Creates a session for `entity` defined in the `design` source file.
    pub fn new(design: impl Into<PathBuf>, entity: impl Into<String>) -> Self {
        Self {
            design: design.into(),
            entity: entity.into(),
            inputs: Vec::new(),
            expected: Vec::new(),
            actual_names: None,
            single_value: false,
            length: None,
            rng: StdRng::from_entropy(),
            results: None,
        }
    }

    /// Seeds the generator that fills unknown input samples.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Treats each time step of a single output as one value, even when the
    /// simulator prints it as a tuple.
    pub fn set_single_value(&mut self, single_value: bool) {
        self.single_value = single_value;
    }

    /// Sets the input signals, ordered by position.
    ///
    /// Returns the run length implied by all signals set so far.
    ///
    /// # Errors
    ///
    /// Fails if `signals` is empty or a non-constant signal's length differs
    /// from any other non-constant input or expected output.
    pub fn set_inputs(&mut self, signals: Vec<Signal>) -> Result<usize, BenchError> {
        if signals.is_empty() {
            return Err(BenchError::EmptyInputs);
        }
        let signals: Vec<Signal> = signals
            .into_iter()
            .enumerate()
            .map(|(i, s)| s.with_order(i))
            .collect();
        let length = common_length(signals.iter().chain(&self.expected))?;
        self.inputs = signals;
        self.length = Some(length);
        self.results = None;
        Ok(length)
    }

    /// Sets the expected outputs, ordered by position.
    ///
    /// The first signal is compared with the simulator's first output, the
    /// second with its second output, and so on.
    ///
    /// # Errors
    ///
    /// Fails if `signals` is empty or lengths disagree as for
    /// [`set_inputs`](Self::set_inputs).
    pub fn set_expected_outputs(&mut self, signals: Vec<Signal>) -> Result<usize, BenchError> {
        let signals = signals
            .into_iter()
            .enumerate()
            .map(|(i, s)| s.with_order(i))
            .collect();
        self.set_expected_outputs_ordered(signals)
    }

    /// Sets the expected outputs, keeping each signal's own
    /// [`order`](Signal::order) as the simulator output it is compared with.
    ///
    /// Use this when only some outputs have expectations.
    ///
    /// # Errors
    ///
    /// Fails if `signals` is empty, two signals share an order, or lengths
    /// disagree as for [`set_inputs`](Self::set_inputs).
    pub fn set_expected_outputs_ordered(
        &mut self,
        signals: Vec<Signal>,
    ) -> Result<usize, BenchError> {
        if signals.is_empty() {
            return Err(BenchError::EmptyOutputs);
        }
        let mut orders: BTreeMap<usize, &str> = BTreeMap::new();
        for signal in &signals {
            if let Some(first) = orders.insert(signal.order(), signal.name()) {
                return Err(BenchError::DuplicateOrder {
                    order: signal.order(),
                    first: first.to_string(),
                    second: signal.name().to_string(),
                });
            }
        }
        let length = common_length(self.inputs.iter().chain(&signals))?;
        self.expected = signals;
        self.length = Some(length);
        self.results = None;
        Ok(length)
    }

    /// Declares a name for every output the entity produces.
    ///
    /// After a run, every output is available under its declared name, and
    /// the simulator must produce exactly this many outputs.
    pub fn set_actual_output_names<S: Into<String>>(&mut self, names: impl IntoIterator<Item = S>) {
        self.actual_names = Some(names.into_iter().map(Into::into).collect());
    }

    /// The design file.
    pub fn design(&self) -> &Path {
        &self.design
    }

    /// The entity under test.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// The run length, once signals are set.
    pub fn length(&self) -> Option<usize> {
        self.length
    }

    /// The input signals.
    pub fn inputs(&self) -> &[Signal] {
        &self.inputs
    }

    /// The expected outputs.
    pub fn expected_outputs(&self) -> &[Signal] {
        &self.expected
    }

    /// Builds the argument text passed to the entity: one
    /// `(fromList [..])` per input, in order.
    ///
    /// Unknown samples are replaced by random in-domain values.
    pub fn input_expression(&mut self) -> Result<String, BenchError> {
        let mut parts = Vec::with_capacity(self.inputs.len());
        for signal in &self.inputs {
            let literals = signal.literals(&mut self.rng)?;
            parts.push(format!("(fromList [{}])", literals.join(",")));
        }
        Ok(parts.join(" "))
    }

    /// Runs the session and returns `true` if every expected output passed.
    ///
    /// Constant signals are broadcast to the run length, the design is
    /// loaded, and the entity is sampled once.
    ///
    /// # Errors
    ///
    /// Fails on a session that is not configured, on any simulator error,
    /// when the number of outputs differs from the declared output names,
    /// or when an expected output's order has no simulator output.
    pub fn run(&mut self, sim: &mut impl Simulator) -> Result<bool, BenchError> {
        if self.inputs.is_empty() {
            return Err(BenchError::EmptyInputs);
        }
        if self.expected.is_empty() {
            return Err(BenchError::EmptyOutputs);
        }
        let length = self.length.ok_or(BenchError::EmptyInputs)?;

        for signal in self.inputs.iter_mut().chain(self.expected.iter_mut()) {
            if signal.is_constant() {
                signal.fit(length)?;
            }
        }

        let inputs = self.input_expression()?;
        info!(
            entity = %self.entity,
            inputs = self.inputs.len(),
            outputs = self.expected.len(),
            steps = length,
            "running testbench"
        );

        sim.load(&self.design)?;
        let raw = sim.sample_n(length, &self.entity, &inputs, self.single_value)?;

        if let Some(names) = &self.actual_names {
            if raw.len() != names.len() {
                return Err(BenchError::OutputCountMismatch {
                    produced: raw.len(),
                    declared: names.len(),
                });
            }
        }

        let mut comparisons = Vec::with_capacity(self.expected.len());
        for expected in &self.expected {
            let values = raw
                .get(expected.order())
                .ok_or_else(|| BenchError::OutputOrderOutOfRange {
                    signal: expected.name().to_string(),
                    order: expected.order(),
                    produced: raw.len(),
                })?;
            let mut actual = expected.from_actual(values)?;
            if let Some(name) = self.output_name(expected.order()) {
                actual = actual.renamed(name);
            }
            let comparison = Comparison::new(expected.clone(), actual)?;
            debug!(
                signal = comparison.name(),
                passed = comparison.passed(),
                "compared output"
            );
            comparisons.push(comparison);
        }

        let actual = match &self.actual_names {
            Some(names) => names
                .iter()
                .zip(&raw)
                .enumerate()
                .map(|(order, (name, values))| {
                    let kind = self
                        .expected
                        .iter()
                        .find(|s| s.order() == order)
                        .map_or(SignalKind::Data, Signal::kind);
                    let samples = values
                        .iter()
                        .map(|v| Sample::logic(kind.parse_raw(v)))
                        .collect();
                    Ok(Signal::new(name.clone(), kind, samples)?.with_order(order))
                })
                .collect::<Result<Vec<_>, BenchError>>()?,
            None => comparisons.iter().map(|c| c.actual().clone()).collect(),
        };

        let passed = comparisons.iter().all(Comparison::passed);
        self.results = Some(RunResults {
            actual,
            comparisons,
        });
        Ok(passed)
    }

    /// The per-output verdicts of the last run.
    pub fn comparisons(&self) -> Result<&[Comparison], BenchError> {
        Ok(&self.results()?.comparisons)
    }

    /// The actual outputs of the last run.
    ///
    /// With declared output names this holds every produced output;
    /// otherwise one signal per expected output.
    pub fn actual_outputs(&self) -> Result<&[Signal], BenchError> {
        Ok(&self.results()?.actual)
    }

    /// Returns `true` if the last run passed.
    pub fn passed(&self) -> Result<bool, BenchError> {
        Ok(self.comparisons()?.iter().all(Comparison::passed))
    }

    /// Renders the verdicts of the last run.
    pub fn report(&self, options: ReportOptions) -> Result<String, BenchError> {
        Ok(render_report(self.comparisons()?, options))
    }

    /// Builds a chronogram of the last run: a clock track, then the inputs,
    /// the expected outputs and the actual outputs as separate groups.
    pub fn chronogram(&self) -> Result<Chronogram, BenchError> {
        let results = self.results()?;
        let length = self.length.unwrap_or(1);
        Ok(Chronogram::from_groups(
            length,
            [
                (INPUTS_GROUP, self.inputs.as_slice()),
                (EXPECTED_GROUP, self.expected.as_slice()),
                (ACTUAL_GROUP, results.actual.as_slice()),
            ],
        )?)
    }

    fn results(&self) -> Result<&RunResults, BenchError> {
        self.results.as_ref().ok_or(BenchError::NotRun)
    }

    fn output_name(&self, order: usize) -> Option<String> {
        self.actual_names.as_ref()?.get(order).cloned()
    }
}

/// Returns the length shared by every non-constant signal, or 1 when all
/// signals are constants.
fn common_length<'a>(signals: impl IntoIterator<Item = &'a Signal>) -> Result<usize, BenchError> {
    let lengths: Vec<(&str, usize)> = signals
        .into_iter()
        .filter(|s| !s.is_constant())
        .map(|s| (s.name(), s.len()))
        .collect();

    match lengths.first() {
        None => Ok(1),
        Some(&(_, first)) if lengths.iter().all(|&(_, len)| len == first) => Ok(first),
        Some(_) => Err(BenchError::LengthMismatch {
            lengths: lengths
                .iter()
                .map(|(name, len)| format!("{name}: {len}"))
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}
