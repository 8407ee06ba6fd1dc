pub mod fwm_detuning;
pub mod piece_of_pi;
pub mod ring_damping;
pub mod spectral_pump;

pub use fwm_detuning::{FwmDetuning, FwmDetuningInputs, FwmDetuningOutputs};
pub use piece_of_pi::{PieceOfPi, PieceOfPiInputs, PieceOfPiOutputs};
pub use ring_damping::{RingDamping, RingDampingInputs, RingDampingOutputs};
pub use spectral_pump::{SpectralPump, SpectralPumpInputs, SpectralPumpOutputs};

