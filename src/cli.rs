//! Command-line arguments

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use qocalc_components::components::{
    fwm_detuning, piece_of_pi, ring_damping, spectral_pump, FwmDetuningInputs, PieceOfPiInputs,
    RingDampingInputs,
};
use qocalc_components::spectral_inputs::SpectralFileOptions;
use qocalc_core::array::ArrayValue;
use qocalc_core::config::RunConfig;
use qocalc_core::errors::QoResult;
use qocalc_core::parameter::{render_table, ParameterDefinition};
use std::path::PathBuf;

/// Quantum-optics calculators
#[derive(Parser, Debug)]
#[command(
    name = "qocalc",
    version,
    disable_version_flag = true,
    propagate_version = true,
    infer_long_args = true
)]
pub struct Cli {
    /// Print name and version
    #[arg(long = "Version", action = ArgAction::Version, global = true)]
    #[allow(dead_code)]
    version: Option<bool>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detuning of four-wave mixing
    #[command(infer_long_args = true, disable_version_flag = true, after_long_help = render_table(fwm_detuning::PARAMETERS))]
    FwmDetuning {
        #[command(flatten)]
        inputs: FwmDetuningArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Damping of a ring resonator coupled to several channels
    #[command(infer_long_args = true, disable_version_flag = true, after_long_help = render_table(ring_damping::PARAMETERS))]
    RingDamping {
        #[command(flatten)]
        inputs: RingDampingArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Spectral ring response and pump amplitude in the ring
    #[command(infer_long_args = true, disable_version_flag = true, after_long_help = render_table(spectral_pump::PARAMETERS))]
    SpectralPump {
        #[command(flatten)]
        inputs: SpectralPumpArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// tan, sin or log of a piece of pi
    #[command(infer_long_args = true, disable_version_flag = true, after_long_help = render_table(piece_of_pi::PARAMETERS))]
    PieceOfPi {
        #[command(flatten)]
        inputs: PieceOfPiArgs,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Print the parameter catalog of a calculator
    #[command(disable_version_flag = true)]
    Parameters {
        calculator: CalculatorName,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CalculatorName {
    FwmDetuning,
    RingDamping,
    SpectralPump,
    PieceOfPi,
}

impl CalculatorName {
    pub fn parameters(&self) -> &'static [ParameterDefinition] {
        match self {
            CalculatorName::FwmDetuning => fwm_detuning::PARAMETERS,
            CalculatorName::RingDamping => ring_damping::PARAMETERS,
            CalculatorName::SpectralPump => spectral_pump::PARAMETERS,
            CalculatorName::PieceOfPi => piece_of_pi::PARAMETERS,
        }
    }
}

/// Options shared by every calculator
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Validate inputs before calculating
    #[arg(long, overrides_with = "no_validate")]
    pub validate: bool,

    /// Calculate without validating inputs (default)
    #[arg(long, overrides_with = "validate")]
    pub no_validate: bool,

    /// Increase verbosity (-v warnings, -vv info and summary, -vvv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log file, truncated on every run [default: <calculator>.log]
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log entry template using {time}, {level}, {target} and {message}
    #[arg(long, value_name = "TEMPLATE")]
    pub log_entry_format: Option<String>,

    /// TOML run configuration; flags given on the command line take precedence
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl CommonArgs {
    pub fn run_config(&self) -> QoResult<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_toml_file(path)?,
            None => RunConfig::default(),
        };
        if self.validate {
            config.validate = true;
        } else if self.no_validate {
            config.validate = false;
        }
        if self.verbose > 0 {
            config.verbosity = self.verbose;
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }
        if let Some(template) = &self.log_entry_format {
            config.log_entry_format = template.clone();
        }
        Ok(config)
    }
}

#[derive(Args, Debug, Clone)]
pub struct FwmDetuningArgs {
    /// Angular frequency of pump 1 photon (rad s^-1)
    #[arg(long, allow_negative_numbers = true)]
    pub pump1: f64,

    /// Angular frequency of signal photon (rad s^-1)
    #[arg(long, allow_negative_numbers = true)]
    pub signal: f64,

    /// Angular frequency of pump 2 photon (rad s^-1) [default: pump1]
    #[arg(long, allow_negative_numbers = true)]
    pub pump2: Option<f64>,

    /// Angular frequency of idler photon (rad s^-1) [default: signal]
    #[arg(long, allow_negative_numbers = true)]
    pub idler: Option<f64>,
}

impl From<FwmDetuningArgs> for FwmDetuningInputs {
    fn from(args: FwmDetuningArgs) -> Self {
        FwmDetuningInputs {
            pump1: args.pump1,
            signal: args.signal,
            pump2: args.pump2,
            idler: args.idler,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RingDampingArgs {
    /// Coupling rate of each channel
    #[arg(long, required = true, num_args = 1.., allow_negative_numbers = true)]
    pub couplings: Vec<f64>,

    /// Group velocity of each channel (m s^-1)
    #[arg(long, required = true, num_args = 1.., allow_negative_numbers = true)]
    pub velocities: Vec<f64>,
}

impl From<RingDampingArgs> for RingDampingInputs {
    fn from(args: RingDampingArgs) -> Self {
        RingDampingInputs {
            couplings: ArrayValue::from_values(args.couplings),
            velocities: ArrayValue::from_values(args.velocities),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SpectralPumpArgs {
    /// Delimited file with columns wavevec, couplings, velocities, damping and pump_input
    #[arg(long, value_name = "PATH")]
    pub spectral_inputs: PathBuf,

    /// Rows before the data; the first names the columns, 0 means no heading row
    #[arg(long, default_value_t = 2)]
    pub num_header_rows: usize,

    /// Field delimiter of the spectral inputs file
    #[arg(long, default_value = ",", value_parser = ascii_delimiter)]
    pub delimiter: u8,
}

impl SpectralPumpArgs {
    pub fn file_options(&self) -> SpectralFileOptions {
        SpectralFileOptions {
            delimiter: self.delimiter,
            num_header_rows: self.num_header_rows,
        }
    }
}

fn ascii_delimiter(value: &str) -> Result<u8, String> {
    match value.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(format!("expected a single ASCII character, got {value:?}")),
    }
}

#[derive(Args, Debug, Clone)]
pub struct PieceOfPiArgs {
    /// Fraction of pi, in (0, 1]
    #[arg(long, allow_negative_numbers = true)]
    pub fraction: f64,
}

impl From<PieceOfPiArgs> for PieceOfPiInputs {
    fn from(args: PieceOfPiArgs) -> Self {
        PieceOfPiInputs {
            fraction: args.fraction,
        }
    }
}
