//! Entry points for testing a design: sequential entities and plain
//! functions.

use std::path::{Path, PathBuf};

use clashtb_common::{Signal, Value};
use clashtb_repl::Simulator;
use tracing::debug;

use crate::error::BenchError;
use crate::session::Testbench;

/// A synthesizable entity defined in a design file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    design: PathBuf,
    name: String,
}

impl Entity {
    /// Names `name` in the design file `design`.
    pub fn new(design: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            design: design.into(),
            name: name.into(),
        }
    }

    /// The design file.
    pub fn design(&self) -> &Path {
        &self.design
    }

    /// The entity name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// An empty session for this entity.
    pub fn testbench(&self) -> Testbench {
        Testbench::new(self.design.clone(), self.name.clone())
    }

    /// Runs one session with the given inputs and expected outputs and
    /// returns it for inspection.
    pub fn test(
        &self,
        inputs: Vec<Signal>,
        outputs: Vec<Signal>,
        sim: &mut impl Simulator,
    ) -> Result<Testbench, BenchError> {
        let mut tb = self.testbench();
        tb.set_inputs(inputs)?;
        tb.set_expected_outputs(outputs)?;
        tb.run(sim)?;
        Ok(tb)
    }
}

/// A combinational function evaluated once with concrete arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    design: PathBuf,
    name: String,
}

impl Function {
    /// Names `name` in the design file `design`.
    ///
    /// # Errors
    ///
    /// Fails with [`BenchError::MissingDesign`] if the file does not exist.
    pub fn new(design: impl Into<PathBuf>, name: impl Into<String>) -> Result<Self, BenchError> {
        let design = design.into();
        if !design.exists() {
            return Err(BenchError::MissingDesign(design));
        }
        Ok(Self {
            design,
            name: name.into(),
        })
    }

    /// The design file.
    pub fn design(&self) -> &Path {
        &self.design
    }

    /// The function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Loads the design and evaluates `name arg1 arg2 ...`, returning the
    /// result text.
    pub fn test(&self, sim: &mut impl Simulator, args: &[Value]) -> Result<String, BenchError> {
        let args: Vec<String> = args.iter().map(Value::to_literal).collect();
        sim.load(&self.design)?;
        let result = sim.evaluate(&self.name, &args)?;
        debug!(function = %self.name, %result, "evaluated function");
        Ok(result)
    }
}
