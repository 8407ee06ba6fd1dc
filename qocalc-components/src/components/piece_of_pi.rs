//! A piece of pi
//!
//! Minimal calculator showing how a new calculation is wired up: a parameter
//! catalog, a validation list, an input struct and an output struct.

use qocalc_core::array::{ArrayValue, FloatValue};
use qocalc_core::calculator::{CalculationOutput, Calculator};
use qocalc_core::errors::QoResult;
use qocalc_core::parameter::{Bound, Flow, Interval, ParameterDefinition};
use qocalc_core::validation::{validate, Constraint, ParameterCheck};
use std::f64::consts::PI;

const UNIT_FRACTION: Interval = Interval::new(Bound::Open(0.0), Bound::Closed(1.0));

pub const PARAMETERS: &[ParameterDefinition] = &[
    ParameterDefinition {
        name: "fraction",
        description: "fraction of pi",
        valid_range: UNIT_FRACTION,
        default: 0.5,
        datatype: "float",
        unit: "1",
        flow: Flow::Input,
    },
    ParameterDefinition {
        name: "piece",
        description: "the piece of pi",
        valid_range: Interval::new(Bound::Open(0.0), Bound::Closed(PI)),
        default: 0.0,
        datatype: "float",
        unit: "rad",
        flow: Flow::IntermediateOutput,
    },
    ParameterDefinition {
        name: "result",
        description: "tan, sin or natural log of the piece",
        valid_range: Interval::real_line(),
        default: 0.0,
        datatype: "float",
        unit: "1",
        flow: Flow::Output,
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceOfPiInputs {
    pub fraction: FloatValue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceOfPiOutputs {
    pub result: FloatValue,
    pub piece: FloatValue,
}

impl CalculationOutput for PieceOfPiOutputs {
    fn primary(&self) -> String {
        self.result.to_string()
    }

    fn summary(&self) -> Vec<(String, String)> {
        vec![
            ("result [1]".to_string(), self.result.to_string()),
            ("piece [rad]".to_string(), self.piece.to_string()),
        ]
    }
}

/// `tan`, `sin` or `ln` of $x \pi$, depending on which side of one half $x$ lies
#[derive(Debug, Clone, Copy, Default)]
pub struct PieceOfPi;

impl Calculator for PieceOfPi {
    type Inputs = PieceOfPiInputs;
    type Outputs = PieceOfPiOutputs;

    fn name(&self) -> &'static str {
        "piece_of_pi"
    }

    fn parameters(&self) -> &'static [ParameterDefinition] {
        PARAMETERS
    }

    fn validate(&self, inputs: &PieceOfPiInputs) -> QoResult<()> {
        let fraction = ArrayValue::from(inputs.fraction);
        validate(
            self.name(),
            &[ParameterCheck::new(
                "fraction",
                Some(&fraction),
                &[Constraint::Within(UNIT_FRACTION)],
            )],
        )
    }

    fn calculate(&self, inputs: &PieceOfPiInputs) -> QoResult<PieceOfPiOutputs> {
        let x = inputs.fraction;
        let piece = x * PI;
        let result = if x > 0.5 {
            piece.tan()
        } else if x < 0.5 {
            piece.sin()
        } else {
            piece.ln()
        };
        Ok(PieceOfPiOutputs { result, piece })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn piece_of_pi(fraction: FloatValue) -> PieceOfPiOutputs {
        PieceOfPi.calculate(&PieceOfPiInputs { fraction }).unwrap()
    }

    #[test]
    fn test_sine_branch() {
        let outputs = piece_of_pi(0.2);
        assert_relative_eq!(outputs.result, 0.5877852522924731);
        assert_relative_eq!(outputs.piece, 0.6283185307179586);
    }

    #[test]
    fn test_tangent_and_log_branches() {
        assert_relative_eq!(piece_of_pi(0.75).result, -1.0, epsilon = 1e-12);
        assert_relative_eq!(piece_of_pi(0.5).result, (PI / 2.0).ln());
    }

    #[test]
    fn test_fraction_outside_unit_interval() {
        for fraction in [0.0, -0.1, 1.5, FloatValue::NAN] {
            let err = PieceOfPi.validate(&PieceOfPiInputs { fraction }).unwrap_err();
            assert!(!err.is_advisory());
            assert!(err.to_string().contains("All fraction values must be in (0, 1]"));
        }
        assert!(PieceOfPi.validate(&PieceOfPiInputs { fraction: 1.0 }).is_ok());
    }
}
