//! Four-wave mixing detuning
//!
//! Two pump photons with angular frequencies $\omega_{0,1}$ and $\omega_{0,2}$
//! impinging on a non-linear medium may generate a signal photon ($\omega_1$) and
//! an idler photon ($\omega_2$). The detuning is the difference between the
//! output and input sum frequencies.

use qocalc_core::array::{ArrayValue, FloatValue};
use qocalc_core::calculator::{CalculationOutput, Calculator};
use qocalc_core::errors::QoResult;
use qocalc_core::parameter::{Flow, Interval, ParameterDefinition};
use qocalc_core::validation::{validate, Constraint, ParameterCheck};

pub const PARAMETERS: &[ParameterDefinition] = &[
    ParameterDefinition {
        name: "pump1",
        description: "angular frequency of pump 1 photon",
        valid_range: Interval::non_negative(),
        default: 0.0,
        datatype: "float",
        unit: "rad s^{-1}",
        flow: Flow::Input,
    },
    ParameterDefinition {
        name: "pump2",
        description: "angular frequency of pump 2 photon",
        valid_range: Interval::non_negative(),
        default: 0.0,
        datatype: "float",
        unit: "rad s^{-1}",
        flow: Flow::Input,
    },
    ParameterDefinition {
        name: "signal",
        description: "angular frequency of signal",
        valid_range: Interval::non_negative(),
        default: 0.0,
        datatype: "float",
        unit: "rad s^{-1}",
        flow: Flow::Input,
    },
    ParameterDefinition {
        name: "idler",
        description: "angular frequency of idler",
        valid_range: Interval::non_negative(),
        default: 0.0,
        datatype: "float",
        unit: "rad s^{-1}",
        flow: Flow::Input,
    },
    ParameterDefinition {
        name: "detuning",
        description: "angular frequency of detuning",
        valid_range: Interval::real_line(),
        default: 0.0,
        datatype: "float",
        unit: "rad s^{-1}",
        flow: Flow::Output,
    },
];

/// Photon angular frequencies (rad s^-1)
#[derive(Debug, Clone, PartialEq)]
pub struct FwmDetuningInputs {
    pub pump1: FloatValue,
    pub signal: FloatValue,
    /// Defaults to `pump1` when absent
    pub pump2: Option<FloatValue>,
    /// Defaults to `signal` when absent
    pub idler: Option<FloatValue>,
}

impl FwmDetuningInputs {
    /// Degenerate pumps and degenerate outputs
    pub fn new(pump1: FloatValue, signal: FloatValue) -> Self {
        Self {
            pump1,
            signal,
            pump2: None,
            idler: None,
        }
    }

    pub fn with_pump2(mut self, pump2: FloatValue) -> Self {
        self.pump2 = Some(pump2);
        self
    }

    pub fn with_idler(mut self, idler: FloatValue) -> Self {
        self.idler = Some(idler);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FwmDetuningOutputs {
    /// Output minus input sum frequency (rad s^-1)
    pub detuning: FloatValue,
}

impl CalculationOutput for FwmDetuningOutputs {
    fn primary(&self) -> String {
        self.detuning.to_string()
    }

    fn summary(&self) -> Vec<(String, String)> {
        vec![("detuning [rad s^{-1}]".to_string(), self.detuning.to_string())]
    }
}

/// Four-wave mixing detuning
///
/// $$\Delta\omega = (\omega_1 + \omega_2) - (\omega_{0,1} + \omega_{0,2})$$
#[derive(Debug, Clone, Copy, Default)]
pub struct FwmDetuning;

impl FwmDetuning {
    /// The closed-form detuning; total over all inputs
    pub fn detuning(&self, inputs: &FwmDetuningInputs) -> FloatValue {
        let pump2 = inputs.pump2.unwrap_or(inputs.pump1);
        let idler = inputs.idler.unwrap_or(inputs.signal);
        (inputs.signal + idler) - (inputs.pump1 + pump2)
    }
}

impl Calculator for FwmDetuning {
    type Inputs = FwmDetuningInputs;
    type Outputs = FwmDetuningOutputs;

    fn name(&self) -> &'static str {
        "fwm_detuning"
    }

    fn parameters(&self) -> &'static [ParameterDefinition] {
        PARAMETERS
    }

    /// Frequencies must be non-negative, checked in the order pump1, pump2, signal, idler
    fn validate(&self, inputs: &FwmDetuningInputs) -> QoResult<()> {
        let pump1 = ArrayValue::from(inputs.pump1);
        let pump2 = inputs.pump2.map(ArrayValue::from);
        let signal = ArrayValue::from(inputs.signal);
        let idler = inputs.idler.map(ArrayValue::from);

        const NON_NEGATIVE: &[Constraint] = &[Constraint::NonNegative];
        validate(
            self.name(),
            &[
                ParameterCheck::new("pump1", Some(&pump1), NON_NEGATIVE),
                ParameterCheck::new("pump2", pump2.as_ref(), NON_NEGATIVE),
                ParameterCheck::new("signal", Some(&signal), NON_NEGATIVE),
                ParameterCheck::new("idler", idler.as_ref(), NON_NEGATIVE),
            ],
        )
    }

    fn calculate(&self, inputs: &FwmDetuningInputs) -> QoResult<FwmDetuningOutputs> {
        Ok(FwmDetuningOutputs {
            detuning: self.detuning(inputs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qocalc_core::errors::QoError;

    #[test]
    fn test_degenerate_defaults() {
        // (110 + 110) - (100 + 100)
        let detuning = FwmDetuning.detuning(&FwmDetuningInputs::new(100.0, 110.0));
        assert_eq!(detuning, 20.0);
    }

    #[test]
    fn test_explicit_pump2_and_idler() {
        let inputs = FwmDetuningInputs::new(100.0, 110.0)
            .with_pump2(230.0)
            .with_idler(250.0);
        // (110 + 250) - (100 + 230)
        assert_eq!(FwmDetuning.detuning(&inputs), 30.0);
    }

    #[test]
    fn test_negative_frequencies_are_listed_in_order() {
        let inputs = FwmDetuningInputs::new(-1.0, 110.0).with_idler(-2.0);
        let err = FwmDetuning.validate(&inputs).unwrap_err();
        let QoError::InvalidValue(report) = err else {
            panic!("expected a fatal validation error");
        };
        let names: Vec<&str> = report
            .violations()
            .iter()
            .map(|v| v.parameter.as_str())
            .collect();
        assert_eq!(names, vec!["pump1", "idler"]);
    }

    #[test]
    fn test_valid_inputs_pass() {
        let inputs = FwmDetuningInputs::new(1.22e15, 1.92e15).with_pump2(1.0e15);
        assert!(FwmDetuning.validate(&inputs).is_ok());
    }
}
