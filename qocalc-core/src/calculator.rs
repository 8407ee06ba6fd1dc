//! The calculator abstraction
//!
//! A calculator pairs a strongly-typed input struct with a pure calculation. The
//! [`Calculator`] trait exposes the pieces every calculator shares (parameter
//! catalog, validation and calculation) and [`run`] strings them together the
//! same way for all of them.

use crate::errors::QoResult;
use crate::parameter::ParameterDefinition;
use tracing::{debug, warn};

/// Results of a calculation that can be reported to the user
pub trait CalculationOutput {
    /// The main result, as printed on standard output
    fn primary(&self) -> String;

    /// Named values for the multi-line summary, as `(label, value)` pairs
    fn summary(&self) -> Vec<(String, String)>;
}

/// A closed-form calculation over a typed set of inputs
///
/// Implementations must be pure: calling [`Calculator::calculate`] twice with the
/// same inputs returns the same outputs.
pub trait Calculator {
    type Inputs: std::fmt::Debug;
    type Outputs: CalculationOutput;

    /// Short identifier, also used for the default log file name
    fn name(&self) -> &'static str;

    /// Metadata of every input, intermediate and output parameter
    fn parameters(&self) -> &'static [ParameterDefinition];

    /// Check the inputs against their declared constraints
    fn validate(&self, inputs: &Self::Inputs) -> QoResult<()>;

    fn calculate(&self, inputs: &Self::Inputs) -> QoResult<Self::Outputs>;
}

/// Optionally validate, then calculate
///
/// Advisory validation failures are logged and ignored; fatal ones abort.
pub fn run<C: Calculator>(
    calculator: &C,
    inputs: &C::Inputs,
    validate: bool,
) -> QoResult<C::Outputs> {
    debug!(calculator = calculator.name(), ?inputs, validate, "Starting calculation");

    if validate {
        match calculator.validate(inputs) {
            Err(e) if e.is_advisory() => {
                warn!(calculator = calculator.name(), "Dubious inputs: {e}");
            }
            other => other?,
        }
    }

    calculator.calculate(inputs)
}

/// Multi-line summary of the outputs of a calculation
pub fn format_summary<C: Calculator>(calculator: &C, outputs: &C::Outputs) -> String {
    let mut lines = vec![format!(" {} outputs", calculator.name())];
    lines.extend(
        outputs
            .summary()
            .into_iter()
            .map(|(label, value)| format!("  {label} = {value}")),
    );
    lines.join("\n")
}
