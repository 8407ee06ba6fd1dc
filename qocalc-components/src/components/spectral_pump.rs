//! Spectral response of a ring resonator to a pump
//!
//! For every frequency component, a pump wave with amplitude $a$ travelling in a
//! bus waveguide couples into the ring with coupling $g$. The ring response is
//!
//! $$r = \frac{-i g^*}{-i k v + \Gamma}$$
//!
//! and the pump amplitude inside the ring is $b = r a$.

use ndarray::{ArrayD, Zip};
use num::complex::Complex64;
use qocalc_core::array::{broadcast_shapes, broadcast_to, format_array, ArrayValue, Shape};
use qocalc_core::calculator::{CalculationOutput, Calculator};
use qocalc_core::errors::{QoError, QoResult};
use qocalc_core::parameter::{Flow, Interval, ParameterDefinition};
use qocalc_core::validation::{validate, Constraint, ParameterCheck, Severity};
use tracing::debug;

const DENOMINATOR: &str = "-1j*wavevec*velocity+damping";

pub const PARAMETERS: &[ParameterDefinition] = &[
    ParameterDefinition {
        name: "wavevec",
        description: "wavevector offset of each frequency component",
        valid_range: Interval::real_line(),
        default: 0.0,
        datatype: "float",
        unit: "m^{-1}",
        flow: Flow::Input,
    },
    ParameterDefinition {
        name: "couplings",
        description: "coupling between bus waveguide and ring",
        valid_range: Interval::non_negative(),
        default: 0.0,
        datatype: "complex",
        unit: "rad s^{-1} m^{1/2} s^{-1/2}",
        flow: Flow::Input,
    },
    ParameterDefinition {
        name: "velocities",
        description: "group velocity in the bus waveguide",
        valid_range: Interval::non_negative(),
        default: 0.0,
        datatype: "float",
        unit: "m s^{-1}",
        flow: Flow::Input,
    },
    ParameterDefinition {
        name: "damping",
        description: "total ring damping rate",
        valid_range: Interval::non_negative(),
        default: 0.0,
        datatype: "float",
        unit: "rad s^{-1}",
        flow: Flow::Input,
    },
    ParameterDefinition {
        name: "pump_input",
        description: "pump amplitude in the bus waveguide",
        valid_range: Interval::non_negative(),
        default: 0.0,
        datatype: "complex",
        unit: "m^{-1/2}",
        flow: Flow::Input,
    },
    ParameterDefinition {
        name: "ring_response",
        description: "spectral response of the ring",
        valid_range: Interval::real_line(),
        default: 0.0,
        datatype: "complex",
        unit: "s^{1/2} m^{-1/2}",
        flow: Flow::IntermediateOutput,
    },
    ParameterDefinition {
        name: "pump_ring",
        description: "pump amplitude inside the ring",
        valid_range: Interval::real_line(),
        default: 0.0,
        datatype: "complex",
        unit: "s^{1/2} m^{-1}",
        flow: Flow::Output,
    },
];

/// Per-frequency inputs, broadcast against each other
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralPumpInputs {
    pub wavevec: ArrayValue,
    pub couplings: ArrayValue,
    pub velocities: ArrayValue,
    pub damping: ArrayValue,
    pub pump_input: ArrayValue,
}

impl SpectralPumpInputs {
    pub fn new(
        wavevec: impl Into<ArrayValue>,
        couplings: impl Into<ArrayValue>,
        velocities: impl Into<ArrayValue>,
        damping: impl Into<ArrayValue>,
        pump_input: impl Into<ArrayValue>,
    ) -> Self {
        Self {
            wavevec: wavevec.into(),
            couplings: couplings.into(),
            velocities: velocities.into(),
            damping: damping.into(),
            pump_input: pump_input.into(),
        }
    }

    fn shapes(&self) -> [Shape; 5] {
        [
            self.wavevec.shape(),
            self.couplings.shape(),
            self.velocities.shape(),
            self.damping.shape(),
            self.pump_input.shape(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpectralPumpOutputs {
    /// Pump amplitude inside the ring, $b$
    pub pump_ring: ArrayD<Complex64>,
    /// Ring response, $r$
    pub ring_response: ArrayD<Complex64>,
}

impl CalculationOutput for SpectralPumpOutputs {
    fn primary(&self) -> String {
        format_array(&self.pump_ring)
    }

    fn summary(&self) -> Vec<(String, String)> {
        vec![
            (
                "pump_ring [s^{1/2} m^{-1}]".to_string(),
                format_array(&self.pump_ring),
            ),
            (
                "ring_response [s^{1/2} m^{-1/2}]".to_string(),
                format_array(&self.ring_response),
            ),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralPump;

impl SpectralPump {
    /// Ring response $r$ for every frequency component
    ///
    /// Every denominator is checked for exact zeros before any division happens.
    pub fn ring_response(&self, inputs: &SpectralPumpInputs) -> QoResult<ArrayD<Complex64>> {
        let shape = broadcast_shapes(&inputs.shapes())?;
        let wavevec = inputs.wavevec.require_complex("wavevec")?;
        let couplings = inputs.couplings.require_complex("couplings")?;
        let velocities = inputs.velocities.require_complex("velocities")?;
        let damping = inputs.damping.require_complex("damping")?;

        let denominator = Zip::from(&broadcast_to(&wavevec, &shape)?)
            .and(&broadcast_to(&velocities, &shape)?)
            .and(&broadcast_to(&damping, &shape)?)
            .map_collect(|k, v, gamma| -Complex64::i() * k * v + gamma);

        let zeros: Vec<usize> = denominator
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == Complex64::new(0.0, 0.0))
            .map(|(i, _)| i)
            .collect();
        if !zeros.is_empty() {
            return Err(QoError::DivisionByZero {
                expression: DENOMINATOR.to_string(),
                indices: zeros,
            });
        }
        debug!(%shape, "Denominators checked");

        Ok(Zip::from(&broadcast_to(&couplings, &shape)?)
            .and(&denominator)
            .map_collect(|g, d| -Complex64::i() * g.conj() / d))
    }
}

impl Calculator for SpectralPump {
    type Inputs = SpectralPumpInputs;
    type Outputs = SpectralPumpOutputs;

    fn name(&self) -> &'static str {
        "spectral_pump"
    }

    fn parameters(&self) -> &'static [ParameterDefinition] {
        PARAMETERS
    }

    fn validate(&self, inputs: &SpectralPumpInputs) -> QoResult<()> {
        use Constraint::*;

        // Every array must broadcast against wavevec
        const MAY_BE_NEGATIVE: &[Constraint] =
            &[Numeric, Real(Severity::Advisory), OneDimensional];
        const COMPLEX_RATE: &[Constraint] = &[
            Numeric,
            OneDimensional,
            NonNegative,
            BroadcastsWith("wavevec"),
        ];
        const REAL_RATE: &[Constraint] = &[
            Numeric,
            Real(Severity::Advisory),
            OneDimensional,
            NonNegative,
            BroadcastsWith("wavevec"),
        ];

        validate(
            self.name(),
            &[
                ParameterCheck::new("wavevec", Some(&inputs.wavevec), MAY_BE_NEGATIVE),
                ParameterCheck::new("couplings", Some(&inputs.couplings), COMPLEX_RATE),
                ParameterCheck::new("velocities", Some(&inputs.velocities), REAL_RATE),
                ParameterCheck::new("damping", Some(&inputs.damping), REAL_RATE),
                ParameterCheck::new("pump_input", Some(&inputs.pump_input), COMPLEX_RATE),
            ],
        )
    }

    fn calculate(&self, inputs: &SpectralPumpInputs) -> QoResult<SpectralPumpOutputs> {
        let ring_response = self.ring_response(inputs)?;
        let pump_input = inputs.pump_input.require_complex("pump_input")?;
        let shape = Shape::from(ring_response.shape());
        let pump_ring = Zip::from(&ring_response)
            .and(&broadcast_to(&pump_input, &shape)?)
            .map_collect(|r, a| r * a);

        Ok(SpectralPumpOutputs {
            pump_ring,
            ring_response,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn assert_all_close(actual: &ArrayD<Complex64>, expected: &[Complex64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            // Reference values carry 8 significant digits
            assert_relative_eq!(a.re, e.re, epsilon = 1e-8, max_relative = 1e-5);
            assert_relative_eq!(a.im, e.im, epsilon = 1e-8, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_scalars() {
        let outputs = SpectralPump
            .calculate(&SpectralPumpInputs::new(1.0, 2.0, 3.0, 4.0, 5.0))
            .unwrap();
        assert_eq!(outputs.pump_ring.ndim(), 0);
        assert_all_close(&outputs.pump_ring, &[c(1.2, -1.6)]);
        assert_all_close(&outputs.ring_response, &[c(0.24, -0.32)]);
    }

    #[test]
    fn test_arrays() {
        let outputs = SpectralPump
            .calculate(&SpectralPumpInputs::new(
                vec![1.0, 6.0],
                vec![2.0, 7.0],
                vec![3.0, 8.0],
                vec![4.0, 9.0],
                vec![5.0, 10.0],
            ))
            .unwrap();
        assert_all_close(
            &outputs.pump_ring,
            &[c(1.2, -1.6), c(1.40880503, -0.26415094)],
        );
        assert_all_close(
            &outputs.ring_response,
            &[c(0.24, -0.32), c(0.1408805, -0.02641509)],
        );
    }

    #[test]
    fn test_scalars_broadcast_against_arrays() {
        let outputs = SpectralPump
            .calculate(&SpectralPumpInputs::new(
                vec![1.0, 6.0],
                2.7,
                3.1,
                vec![4.0, 9.0],
                vec![5.0, 10.0],
            ))
            .unwrap();
        assert_all_close(
            &outputs.pump_ring,
            &[c(1.63412729, -2.10855135), c(1.17622260, -0.56913997)],
        );
    }

    #[test]
    fn test_complex_coupling_is_conjugated() {
        let outputs = SpectralPump
            .calculate(&SpectralPumpInputs::new(0.0, c(0.0, 2.0), 1.0, 2.0, 1.0))
            .unwrap();
        // -i * conj(2i) / 2 = -1
        assert_all_close(&outputs.ring_response, &[c(-1.0, 0.0)]);
    }

    #[test]
    fn test_zero_denominator_is_fatal() {
        let inputs = SpectralPumpInputs::new(vec![1.0, 0.0], 2.0, 3.0, vec![4.0, 0.0], 5.0);
        let err = SpectralPump.calculate(&inputs).unwrap_err();
        match err {
            QoError::DivisionByZero { expression, indices } => {
                assert_eq!(expression, DENOMINATOR);
                assert_eq!(indices, vec![1]);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_incompatible_shapes() {
        let inputs = SpectralPumpInputs::new(vec![1.0, 2.0], 2.0, 3.0, vec![4.0, 5.0, 6.0], 5.0);
        assert!(matches!(
            SpectralPump.calculate(&inputs),
            Err(QoError::ShapeMismatch(_, _))
        ));
    }

    #[test]
    fn test_validation() {
        let valid = SpectralPumpInputs::new(vec![-1.0, 6.0], c(2.0, 1.0), 3.0, 4.0, c(5.0, 0.5));
        assert!(SpectralPump.validate(&valid).is_ok());

        let dubious = SpectralPumpInputs::new(c(1.0, 1.0), 2.0, 3.0, 4.0, 5.0);
        assert!(SpectralPump.validate(&dubious).unwrap_err().is_advisory());

        let negative = SpectralPumpInputs::new(1.0, 2.0, 3.0, -4.0, 5.0);
        let err = SpectralPump.validate(&negative).unwrap_err();
        assert!(!err.is_advisory());
        assert!(err.to_string().contains("All damping values must be >=0"));

        let mismatched = SpectralPumpInputs::new(vec![1.0, 2.0], 2.0, 3.0, vec![4.0, 5.0, 6.0], 5.0);
        let err = SpectralPump.validate(&mismatched).unwrap_err();
        assert!(matches!(err, QoError::InvalidValue(_)));
        assert!(err
            .to_string()
            .starts_with("operands could not be broadcast together with shapes (2,) (3,)"));

        let text = SpectralPumpInputs::new(1.0, 2.0, "fast".to_string(), 4.0, 5.0);
        let err = SpectralPump.validate(&text).unwrap_err();
        assert!(err
            .to_string()
            .contains("Received velocities data type kind: U"));
    }
}
