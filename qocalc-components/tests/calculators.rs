//! Behaviour shared by every calculator.

use approx::assert_relative_eq;
use qocalc_components::components::{
    fwm_detuning, piece_of_pi, ring_damping, spectral_pump, FwmDetuning, FwmDetuningInputs, PieceOfPi, PieceOfPiInputs, RingDamping,
    RingDampingInputs, SpectralPump, SpectralPumpInputs,
};
use qocalc_core::calculator::{format_summary, run, Calculator};
use qocalc_core::errors::{ErrorClass, QoError};
use qocalc_core::parameter::{with_flow, Flow};

fn assert_idempotent<C>(calculator: &C, inputs: &C::Inputs)
where
    C: Calculator,
    C::Outputs: PartialEq + std::fmt::Debug,
{
    let first = calculator.calculate(inputs).unwrap();
    let second = calculator.calculate(inputs).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_repeated_calls_are_identical() {
    assert_idempotent(&FwmDetuning, &FwmDetuningInputs::new(100.0, 110.0));
    assert_idempotent(
        &RingDamping,
        &RingDampingInputs::new(vec![12.0, 20.0], vec![3.0, 4.0]),
    );
    assert_idempotent(
        &SpectralPump,
        &SpectralPumpInputs::new(vec![1.0, 6.0], 2.7, 3.1, vec![4.0, 9.0], vec![5.0, 10.0]),
    );
    assert_idempotent(&PieceOfPi, &PieceOfPiInputs { fraction: 0.2 });
}

#[test]
fn test_every_catalog_has_inputs_and_an_output() {
    for (name, parameters) in [
        ("fwm_detuning", fwm_detuning::PARAMETERS),
        ("ring_damping", ring_damping::PARAMETERS),
        ("spectral_pump", spectral_pump::PARAMETERS),
        ("piece_of_pi", piece_of_pi::PARAMETERS),
    ] {
        assert!(!with_flow(parameters, Flow::Input).is_empty(), "{name}");
        assert_eq!(with_flow(parameters, Flow::Output).len(), 1, "{name}");
    }
}

#[test]
fn test_validator_reports_negative_couplings() {
    let inputs = RingDampingInputs::new(vec![-1.0, 2.0, -3.0], vec![1.0, 2.0, 3.0]);
    let err = run(&RingDamping, &inputs, true).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Value);
    let QoError::InvalidValue(report) = &err else {
        panic!("expected a validation failure, got {err}");
    };
    let violation = &report.violations()[0];
    assert_eq!(violation.parameter, "couplings");
    assert_eq!(violation.indices, vec![0, 2]);
    assert_eq!(violation.values, vec!["-1", "-3"]);
}

#[test]
fn test_validator_reports_incompatible_shapes() {
    let inputs = RingDampingInputs::new(vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0, 4.0]);
    let err = RingDamping.validate(&inputs).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("(3,)"));
    assert!(message.contains("(4,)"));

    let inputs = RingDampingInputs::new(vec![1.0, 2.0, 3.0], 6.0);
    assert!(RingDamping.validate(&inputs).is_ok());
}

#[test]
fn test_validation_can_be_skipped() {
    let outputs = run(&RingDamping, &RingDampingInputs::new(-12.0, 3.0), false).unwrap();
    assert_eq!(outputs.damping, 24.0);
}

#[test]
fn test_summary_lists_outputs() {
    let outputs = run(&PieceOfPi, &PieceOfPiInputs { fraction: 0.2 }, true).unwrap();
    assert_relative_eq!(outputs.result, 0.5877852522924731);
    let summary = format_summary(&PieceOfPi, &outputs);
    assert!(summary.starts_with(" piece_of_pi outputs\n  result [1] = 0.58778525229247"));
    assert!(summary.contains("piece [rad] = 0.6283185307179586"));
}
