//! Core building blocks for closed-form quantum-optics calculators
//!
//! - [`parameter`]: static parameter catalogs (description, range, unit, flow role)
//! - [`array`]: scalar/array input values with element kinds and broadcasting
//! - [`validation`]: declarative, accumulating input validation
//! - [`calculator`]: the [`Calculator`](calculator::Calculator) trait and run driver
//! - [`logging`] and [`config`]: per-invocation logging context and run settings

pub mod array;
pub mod calculator;
pub mod config;
pub mod logging;
pub mod parameter;
pub mod validation;

pub mod errors;
