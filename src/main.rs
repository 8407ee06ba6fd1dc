//! qocalc
//!
//! Closed-form calculators for integrated quantum optics.
//!
//! # Usage
//!
//! ```bash
//! qocalc ring-damping --couplings 12 20 --velocities 3 4 --validate
//! qocalc spectral-pump --spectral-inputs spectrum.csv -vv
//! qocalc parameters fwm-detuning --json
//! ```

mod cli;
mod runner;

use clap::Parser;
use qocalc_components::components::{FwmDetuning, PieceOfPi, RingDamping, SpectralPump};
use qocalc_components::spectral_inputs::read_spectral_inputs;
use qocalc_core::config::RunConfig;
use std::process::ExitCode;

use crate::cli::{Cli, Command, CommonArgs};
use crate::runner::{describe_parameters, execute, print_failure, Status};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let status = match cli.command {
        Command::Parameters { calculator, json } => {
            match describe_parameters(calculator.parameters(), json) {
                Ok(text) => {
                    println!("{text}");
                    Status::Success
                }
                Err(e) => {
                    eprintln!("Failed to render parameters: {e}");
                    Status::Failure
                }
            }
        }
        Command::FwmDetuning { inputs, common } => with_config(&common, |config| {
            execute(&FwmDetuning, config, || Ok(inputs.into()))
        }),
        Command::RingDamping { inputs, common } => with_config(&common, |config| {
            execute(&RingDamping, config, || Ok(inputs.into()))
        }),
        Command::SpectralPump { inputs, common } => with_config(&common, |config| {
            execute(&SpectralPump, config, || {
                read_spectral_inputs(&inputs.spectral_inputs, &inputs.file_options())
            })
        }),
        Command::PieceOfPi { inputs, common } => with_config(&common, |config| {
            execute(&PieceOfPi, config, || Ok(inputs.into()))
        }),
    };

    status.into()
}

/// Resolve the run configuration, reporting configuration errors on stderr
fn with_config(
    common: &CommonArgs,
    f: impl FnOnce(&RunConfig) -> Status,
) -> Status {
    match common.run_config() {
        Ok(config) => f(&config),
        Err(e) => {
            print_failure(&e);
            Status::Failure
        }
    }
}
