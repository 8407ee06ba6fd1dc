//! Ring resonator damping
//!
//! A ring resonator loses energy through every channel it is coupled to. The
//! damping rate contributed by one channel is $|g_j|^2 / (2 v_j)$ where $g_j$ is
//! the coupling and $v_j$ the group velocity in that channel.

use ndarray::{ArrayD, Zip};
use qocalc_core::array::{broadcast_shapes, broadcast_to, format_array, ArrayValue, FloatValue};
use qocalc_core::calculator::{CalculationOutput, Calculator};
use qocalc_core::errors::QoResult;
use qocalc_core::parameter::{Flow, Interval, ParameterDefinition};
use qocalc_core::validation::{validate, Constraint, ParameterCheck, Severity};

pub const PARAMETERS: &[ParameterDefinition] = &[
    ParameterDefinition {
        name: "couplings",
        description: "coupling rates between ring and each channel",
        valid_range: Interval::non_negative(),
        default: 0.0,
        datatype: "float",
        unit: "rad s^{-1} m^{1/2} s^{-1/2}",
        flow: Flow::Input,
    },
    ParameterDefinition {
        name: "velocities",
        description: "group velocities in each channel",
        valid_range: Interval::non_negative(),
        default: 0.0,
        datatype: "float",
        unit: "m s^{-1}",
        flow: Flow::Input,
    },
    ParameterDefinition {
        name: "path_losses",
        description: "damping contribution of each channel",
        valid_range: Interval::non_negative(),
        default: 0.0,
        datatype: "float",
        unit: "rad s^{-1}",
        flow: Flow::IntermediateOutput,
    },
    ParameterDefinition {
        name: "damping",
        description: "total ring damping rate",
        valid_range: Interval::non_negative(),
        default: 0.0,
        datatype: "float",
        unit: "rad s^{-1}",
        flow: Flow::Output,
    },
];

/// Per-channel couplings and group velocities
///
/// Either may be a scalar or a one-dimensional array; a scalar is shared by all
/// channels.
#[derive(Debug, Clone, PartialEq)]
pub struct RingDampingInputs {
    pub couplings: ArrayValue,
    pub velocities: ArrayValue,
}

impl RingDampingInputs {
    pub fn new(couplings: impl Into<ArrayValue>, velocities: impl Into<ArrayValue>) -> Self {
        Self {
            couplings: couplings.into(),
            velocities: velocities.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RingDampingOutputs {
    pub damping: FloatValue,
    /// Damping contribution of each channel, in the broadcast shape of the inputs
    pub path_losses: ArrayD<FloatValue>,
}

impl CalculationOutput for RingDampingOutputs {
    fn primary(&self) -> String {
        self.damping.to_string()
    }

    fn summary(&self) -> Vec<(String, String)> {
        vec![
            ("damping [rad s^{-1}]".to_string(), self.damping.to_string()),
            (
                "path losses [rad s^{-1}]".to_string(),
                format_array(&self.path_losses),
            ),
        ]
    }
}

/// Total damping of a ring coupled to several channels
///
/// $$\Gamma = \sum_j \frac{|g_j|^2}{2 v_j}$$
#[derive(Debug, Clone, Copy, Default)]
pub struct RingDamping;

impl RingDamping {
    /// Damping contribution of each channel
    ///
    /// A zero velocity yields an infinite (or NaN) loss rather than an error.
    pub fn path_losses(&self, inputs: &RingDampingInputs) -> QoResult<ArrayD<FloatValue>> {
        let couplings = inputs.couplings.require_complex("couplings")?;
        let velocities = inputs.velocities.require_real("velocities")?;

        let shape = broadcast_shapes([&inputs.couplings.shape(), &inputs.velocities.shape()])?;
        let couplings = broadcast_to(&couplings, &shape)?;
        let velocities = broadcast_to(&velocities, &shape)?;

        Ok(Zip::from(&couplings)
            .and(&velocities)
            .map_collect(|g, v| g.norm_sqr() / (2.0 * v)))
    }
}

impl Calculator for RingDamping {
    type Inputs = RingDampingInputs;
    type Outputs = RingDampingOutputs;

    fn name(&self) -> &'static str {
        "ring_damping"
    }

    fn parameters(&self) -> &'static [ParameterDefinition] {
        PARAMETERS
    }

    fn validate(&self, inputs: &RingDampingInputs) -> QoResult<()> {
        validate(
            self.name(),
            &[
                ParameterCheck::new(
                    "couplings",
                    Some(&inputs.couplings),
                    &[
                        Constraint::Numeric,
                        Constraint::OneDimensional,
                        Constraint::NonNegative,
                    ],
                ),
                ParameterCheck::new(
                    "velocities",
                    Some(&inputs.velocities),
                    &[
                        Constraint::Numeric,
                        Constraint::Real(Severity::Fatal),
                        Constraint::OneDimensional,
                        Constraint::NonNegative,
                        Constraint::NonZero(Severity::Advisory),
                        Constraint::BroadcastsWith("couplings"),
                    ],
                ),
            ],
        )
    }

    fn calculate(&self, inputs: &RingDampingInputs) -> QoResult<RingDampingOutputs> {
        let path_losses = self.path_losses(inputs)?;
        Ok(RingDampingOutputs {
            damping: path_losses.sum(),
            path_losses,
        })
    }
}
