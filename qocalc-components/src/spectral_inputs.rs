//! Reading spectral pump inputs from delimited text
//!
//! The file holds one row per frequency component and one column per input:
//!
//! ```text
//! wavevec,couplings,velocities,damping,pump_input
//! m^-1,rad s^-1,m s^-1,rad s^-1,m^-1/2
//! 1,2,3,4,5
//! 6,7,8,9,10
//! ```
//!
//! The heading row may list the columns in any order. Rows after the headings
//! and before the data (such as the units above) are skipped according to
//! [`SpectralFileOptions::num_header_rows`].

use crate::components::SpectralPumpInputs;
use qocalc_core::array::{ArrayValue, FloatValue};
use qocalc_core::errors::{QoError, QoResult};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Column headings, in the order used when the file has no heading row
pub const COLUMN_HEADINGS: [&str; 5] = ["wavevec", "couplings", "velocities", "damping", "pump_input"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpectralFileOptions {
    pub delimiter: u8,
    /// Rows before the data. With zero there is no heading row; otherwise the
    /// first row names the columns and the remaining header rows are ignored.
    pub num_header_rows: usize,
}

impl Default for SpectralFileOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            num_header_rows: 2,
        }
    }
}

pub fn read_spectral_inputs(
    path: &Path,
    options: &SpectralFileOptions,
) -> QoResult<SpectralPumpInputs> {
    let file = File::open(path).map_err(|source| QoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_spectral_inputs(file, &path.display().to_string(), options)
}

/// Parse spectral inputs from any reader; `source_name` is used in error messages
pub fn parse_spectral_inputs<R: Read>(
    reader: R,
    source_name: &str,
    options: &SpectralFileOptions,
) -> QoResult<SpectralPumpInputs> {
    debug!(
        source = source_name,
        delimiter = %(options.delimiter as char),
        num_header_rows = options.num_header_rows,
        "Reading spectral inputs"
    );

    let mut records = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(options.delimiter)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
        .into_records();

    let delimited = |err: csv::Error| read_error(source_name, err);

    // Position of each canonical column within a row
    let mut columns: Vec<usize> = (0..COLUMN_HEADINGS.len()).collect();
    if options.num_header_rows > 0 {
        let headings: Vec<String> = match records.next() {
            Some(record) => record.map_err(delimited)?.iter().map(str::to_string).collect(),
            None => Vec::new(),
        };
        columns = column_positions(&headings)?;
        for _ in 1..options.num_header_rows {
            if let Some(record) = records.next() {
                record.map_err(delimited)?;
            }
        }
    }

    let mut values: Vec<Vec<FloatValue>> = vec![Vec::new(); COLUMN_HEADINGS.len()];
    for record in records {
        let record = record.map_err(delimited)?;
        let line = record.position().map_or(0, |p| p.line() as usize);
        let invalid = |details: String| {
            let err = QoError::InvalidInputFile {
                path: source_name.to_string(),
                line,
                details,
            };
            error!("{err}");
            err
        };

        if record.len() != COLUMN_HEADINGS.len() {
            return Err(invalid(format!(
                "expected {} fields, found {}",
                COLUMN_HEADINGS.len(),
                record.len()
            )));
        }
        for (column, &position) in values.iter_mut().zip(&columns) {
            let entry = &record[position];
            let value: FloatValue = entry
                .parse()
                .map_err(|_| invalid(format!("could not parse {entry:?} as a number")))?;
            if !value.is_finite() {
                return Err(invalid(format!(
                    "expected all entries populated and finite, found {entry}"
                )));
            }
            column.push(value);
        }
    }

    if values[0].is_empty() {
        return Err(QoError::InvalidInputFile {
            path: source_name.to_string(),
            line: options.num_header_rows,
            details: "no data rows".to_string(),
        });
    }

    let [wavevec, couplings, velocities, damping, pump_input] = values
        .try_into()
        .map_err(|_| QoError::InvalidInputFile {
            path: source_name.to_string(),
            line: 0,
            details: "unexpected number of columns".to_string(),
        })?;
    debug!(rows = wavevec.len(), "Spectral inputs read");

    Ok(SpectralPumpInputs {
        wavevec: ArrayValue::from(wavevec),
        couplings: ArrayValue::from(couplings),
        velocities: ArrayValue::from(velocities),
        damping: ArrayValue::from(damping),
        pump_input: ArrayValue::from(pump_input),
    })
}

/// Classify a reader failure: IO problems stay IO errors, bad content is invalid input
fn read_error(source_name: &str, err: csv::Error) -> QoError {
    let line = err.position().map_or(0, |p| p.line() as usize);
    if let csv::ErrorKind::Utf8 { err: utf8, .. } = err.kind() {
        let err = QoError::InvalidInputFile {
            path: source_name.to_string(),
            line,
            details: format!("invalid UTF-8 ({utf8})"),
        };
        error!("{err}");
        return err;
    }
    if !err.is_io_error() {
        return QoError::Delimited {
            path: source_name.to_string(),
            source: Box::new(err),
        };
    }
    match err.into_kind() {
        csv::ErrorKind::Io(source) => QoError::Io {
            path: PathBuf::from(source_name),
            source,
        },
        kind => QoError::Delimited {
            path: source_name.to_string(),
            source: format!("{kind:?}").into(),
        },
    }
}

/// Map each canonical heading to its position in the heading row
fn column_positions(headings: &[String]) -> QoResult<Vec<usize>> {
    let received: BTreeSet<&str> = headings.iter().map(String::as_str).collect();
    let expected: BTreeSet<&str> = COLUMN_HEADINGS.into_iter().collect();
    let positions: Option<Vec<usize>> = COLUMN_HEADINGS
        .iter()
        .map(|name| headings.iter().position(|h| h == name))
        .collect();

    match positions {
        Some(positions) if received == expected && headings.len() == COLUMN_HEADINGS.len() => {
            Ok(positions)
        }
        _ => {
            let err = QoError::ColumnMismatch {
                received: headings.to_vec(),
                expected: COLUMN_HEADINGS.iter().map(|h| h.to_string()).collect(),
            };
            error!("{err}");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str, num_header_rows: usize) -> QoResult<SpectralPumpInputs> {
        parse_spectral_inputs(
            contents.as_bytes(),
            "inline",
            &SpectralFileOptions {
                num_header_rows,
                ..SpectralFileOptions::default()
            },
        )
    }

    #[test]
    fn test_columns_in_any_order() {
        let inputs = parse(
            "damping, wavevec, couplings, velocities, pump_input\n\
             rad/s, 1/m, rad/s, m/s, 1\n\
             4, 1, 2, 3, 5\n\
             9, 6, 7, 8, 10\n",
            2,
        )
        .unwrap();
        assert_eq!(inputs.wavevec, ArrayValue::from(vec![1.0, 6.0]));
        assert_eq!(inputs.damping, ArrayValue::from(vec![4.0, 9.0]));
        assert_eq!(inputs.pump_input, ArrayValue::from(vec![5.0, 10.0]));
    }

    #[test]
    fn test_no_heading_row_uses_canonical_order() {
        let inputs = parse("1,2,3,4,5\n", 0).unwrap();
        assert_eq!(inputs.wavevec, ArrayValue::from(vec![1.0]));
        assert_eq!(inputs.pump_input, ArrayValue::from(vec![5.0]));
    }

    #[test]
    fn test_mismatched_headings() {
        let err = parse("wavevec,couplings,velocities,damping\n1,2,3,4\n", 1).unwrap_err();
        assert!(matches!(err, QoError::ColumnMismatch { .. }));
        assert!(err.to_string().starts_with("Received name headings = "));

        let err = parse(
            "wavevec,couplings,velocities,damping,pump_input,extra\n1,2,3,4,5,6\n",
            1,
        )
        .unwrap_err();
        assert!(matches!(err, QoError::ColumnMismatch { .. }));
    }

    #[test]
    fn test_bad_entries() {
        let header = "wavevec,couplings,velocities,damping,pump_input\n";

        let err = parse(&format!("{header}1,2,,4,5\n"), 1).unwrap_err();
        assert!(matches!(err, QoError::InvalidInputFile { line: 2, .. }));

        let err = parse(&format!("{header}1,2,inf,4,5\n"), 1).unwrap_err();
        assert!(err.to_string().contains("finite"));

        let err = parse(&format!("{header}1,2,3,4\n"), 1).unwrap_err();
        assert!(err.to_string().contains("expected 5 fields, found 4"));
    }

    #[test]
    fn test_non_utf8_entry_is_invalid_input() {
        let contents = b"wavevec,couplings,velocities,damping,pump_input\n1,2,\xff,4,5\n";
        let err = parse_spectral_inputs(
            &contents[..],
            "inline",
            &SpectralFileOptions {
                num_header_rows: 1,
                ..SpectralFileOptions::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, QoError::InvalidInputFile { line: 2, .. }));
        assert_eq!(err.class(), qocalc_core::errors::ErrorClass::Value);
    }

    #[test]
    fn test_empty_data_is_invalid() {
        let err = parse("wavevec,couplings,velocities,damping,pump_input\n", 1).unwrap_err();
        assert!(matches!(err, QoError::InvalidInputFile { .. }));
    }
}
