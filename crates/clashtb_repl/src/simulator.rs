//! The seam between a test session and whatever runs the design.

use std::path::Path;

use crate::error::ReplError;

/// A simulator that can load a design, sample an entity, and evaluate
/// plain functions.
///
/// [`ReplClient`](crate::ReplClient) implements this against a live
/// `clashi`; sessions take `&mut impl Simulator` so tests can substitute an
/// in-memory fake.
pub trait Simulator {
    /// Loads a design source file.
    fn load(&mut self, path: &Path) -> Result<(), ReplError>;

    /// Samples `entity` applied to `inputs` for `count` clock cycles.
    ///
    /// Returns one list of raw values per output, in output order.
    fn sample_n(
        &mut self,
        count: usize,
        entity: &str,
        inputs: &str,
        single_value: bool,
    ) -> Result<Vec<Vec<String>>, ReplError>;

    /// Evaluates `function` applied to `args` once.
    fn evaluate(&mut self, function: &str, args: &[String]) -> Result<String, ReplError>;
}
