//! Quantum-optics calculators
//!
//! Each calculator implements [`qocalc_core::calculator::Calculator`] and ships
//! with its own parameter catalog. Spectral pump inputs can also be read from a
//! delimited text file, see [`spectral_inputs`].

pub mod components;
pub mod spectral_inputs;
