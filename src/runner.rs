//! Running one calculator invocation inside its own logging context

use qocalc_core::calculator::{format_summary, run, CalculationOutput, Calculator};
use qocalc_core::config::RunConfig;
use qocalc_core::errors::{QoError, QoResult};
use qocalc_core::parameter::{render_table, ParameterDefinition};
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, error, info};

/// Outcome of one command
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => ExitCode::SUCCESS,
            Status::Failure => ExitCode::FAILURE,
        }
    }
}

/// Load inputs, optionally validate and then calculate, reporting the outcome
///
/// Inputs are loaded inside the logging context so that input file errors end up
/// in the log file too.
pub fn execute<C, F>(calculator: &C, config: &RunConfig, load: F) -> Status
where
    C: Calculator,
    F: FnOnce() -> QoResult<C::Inputs>,
{
    let outcome = config
        .log_settings(calculator.name())
        .and_then(|settings| settings.scope(|| report(calculator, config, load)));

    match outcome {
        Ok(code) => code,
        Err(err) => {
            print_failure(&err);
            Status::Failure
        }
    }
}

fn report<C, F>(calculator: &C, config: &RunConfig, load: F) -> Status
where
    C: Calculator,
    F: FnOnce() -> QoResult<C::Inputs>,
{
    debug!(calculator = calculator.name(), ?config, "Run configuration");
    match load().and_then(|inputs| run(calculator, &inputs, config.validate)) {
        Ok(outputs) => {
            if config.verbosity < 2 {
                println!("{}", outputs.primary());
            } else {
                info!("{}", format_summary(calculator, &outputs));
            }
            Status::Success
        }
        Err(err) => {
            log_failure(&err);
            Status::Failure
        }
    }
}

/// Log the class and message of an error followed by its source chain
pub fn log_failure(err: &QoError) {
    error!("{}: {err}", err.class());
    error!("<TRACEBACK>\n{}\n</TRACEBACK>", traceback(err));
}

/// Report an error on stderr when no logging context is available
pub fn print_failure(err: &QoError) {
    eprintln!("{}: {err}", err.class());
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}

fn traceback(err: &QoError) -> String {
    let mut lines = vec![format!("{err:?}")];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("caused by: {cause}"));
        source = cause.source();
    }
    lines.join("\n")
}

/// Render a parameter catalog as an aligned table or as JSON
pub fn describe_parameters(
    parameters: &[ParameterDefinition],
    json: bool,
) -> Result<String, serde_json::Error> {
    if json {
        serde_json::to_string_pretty(parameters)
    } else {
        Ok(render_table(parameters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qocalc_components::components::{ring_damping, RingDamping, RingDampingInputs};
    use std::path::Path;

    fn config_in(dir: &Path, verbosity: u8) -> RunConfig {
        RunConfig {
            validate: true,
            verbosity,
            log_file: Some(dir.join("ring_damping.log")),
            log_entry_format: "{level} {message}".to_string(),
        }
    }

    #[test]
    fn test_summary_is_logged_at_info() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), 2);
        let code = execute(&RingDamping, &config, || {
            Ok(RingDampingInputs::new(vec![12.0, 20.0], vec![3.0, 4.0]))
        });
        assert_eq!(code, Status::Success);

        let log = std::fs::read_to_string(dir.path().join("ring_damping.log")).unwrap();
        assert!(log.contains("INFO  ring_damping outputs\n  damping [rad s^{-1}] = 74\n"));
        assert!(log.contains("path losses [rad s^{-1}] = [24 50]"));
    }

    #[test]
    fn test_failure_is_logged_with_traceback() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), 0);
        let code = execute(&RingDamping, &config, || {
            Ok(RingDampingInputs::new(vec![-12.0, 20.0], vec![3.0, 4.0]))
        });
        assert_eq!(code, Status::Failure);

        let log = std::fs::read_to_string(dir.path().join("ring_damping.log")).unwrap();
        assert!(log.contains("ERROR ValueError: All couplings values must be >=0"));
        assert!(log.contains("<TRACEBACK>"));
        assert!(log.contains("</TRACEBACK>"));
    }

    #[test]
    fn test_load_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), 0);
        let missing = dir.path().join("absent.csv");
        let code = execute(&RingDamping, &config, || {
            Err(QoError::Io {
                path: missing.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        });
        assert_eq!(code, Status::Failure);

        let log = std::fs::read_to_string(dir.path().join("ring_damping.log")).unwrap();
        assert!(log.contains("ERROR IOError: Could not access"));
        assert!(log.contains("caused by: "));
    }

    #[test]
    fn test_bad_log_template_fails_before_running() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            log_entry_format: "{levelname}".to_string(),
            ..config_in(dir.path(), 0)
        };
        let code = execute(&RingDamping, &config, || unreachable!("inputs must not be loaded"));
        assert_eq!(code, Status::Failure);
    }

    #[test]
    fn test_describe_parameters() {
        let table = describe_parameters(ring_damping::PARAMETERS, false).unwrap();
        assert!(table.contains("velocities"));

        let json = describe_parameters(ring_damping::PARAMETERS, true).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["name"], "couplings");
        assert_eq!(parsed[0]["valid_range"], "[0, inf)");
        assert_eq!(parsed[3]["flow"], "output");
    }
}
