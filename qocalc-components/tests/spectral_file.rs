use approx::assert_relative_eq;
use qocalc_components::components::SpectralPump;
use qocalc_components::spectral_inputs::{read_spectral_inputs, SpectralFileOptions};
use qocalc_core::array::ArrayValue;
use qocalc_core::calculator::run;
use qocalc_core::errors::{ErrorClass, QoError};
use std::io::Write;

fn write_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_file_inputs_drive_the_calculation() {
    let file = write_file(
        "wavevec,couplings,velocities,damping,pump_input\n\
         m^-1,rad s^-1,m s^-1,rad s^-1,m^-1/2\n\
         1,2,3,4,5\n\
         6,7,8,9,10\n",
    );
    let inputs = read_spectral_inputs(file.path(), &SpectralFileOptions::default()).unwrap();
    assert_eq!(inputs.couplings, ArrayValue::from(vec![2.0, 7.0]));
    assert_eq!(inputs.velocities, ArrayValue::from(vec![3.0, 8.0]));

    let outputs = run(&SpectralPump, &inputs, true).unwrap();
    let second = outputs.pump_ring[1];
    assert_relative_eq!(second.re, 1.40880503, epsilon = 1e-8, max_relative = 1e-5);
    assert_relative_eq!(second.im, -0.26415094, epsilon = 1e-8, max_relative = 1e-5);
}

#[test]
fn test_semicolon_delimited_without_headings() {
    let file = write_file("1;2;3;4;5\n");
    let options = SpectralFileOptions {
        delimiter: b';',
        num_header_rows: 0,
    };
    let inputs = read_spectral_inputs(file.path(), &options).unwrap();
    assert_eq!(inputs.damping, ArrayValue::from(vec![4.0]));
}

#[test]
fn test_missing_column_is_fatal() {
    let file = write_file("wavevec,couplings,velocities,damping\nunits\n1,2,3,4\n");
    let err = read_spectral_inputs(file.path(), &SpectralFileOptions::default()).unwrap_err();
    assert!(matches!(err, QoError::ColumnMismatch { .. }));
    assert_eq!(err.class(), ErrorClass::Value);
}

#[test]
fn test_non_finite_entry_is_fatal() {
    let file = write_file("wavevec,couplings,velocities,damping,pump_input\nunits\n1,2,nan,4,5\n");
    let err = read_spectral_inputs(file.path(), &SpectralFileOptions::default()).unwrap_err();
    assert!(matches!(err, QoError::InvalidInputFile { line: 3, .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_spectral_inputs(&dir.path().join("absent.csv"), &SpectralFileOptions::default())
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Io);
}
