//! Declarative input validation
//!
//! A calculator describes its inputs as a list of [`ParameterCheck`]s: a parameter
//! name, its (possibly absent) value and the constraints it must satisfy. The
//! checks are evaluated in order and every violation is accumulated into a
//! [`ValidationReport`]; nothing short-circuits, so the message lists every
//! problem in a deterministic order.
//!
//! The outcome is classified as:
//!
//! - **fatal** when at least one fatal violation exists ([`QoError::InvalidValue`]),
//!   the message then also carries any advisory violations
//! - **advisory** when only advisory violations exist ([`QoError::DubiousValue`])
//! - a pass otherwise
//!
//! ```rust
//! use qocalc_core::array::ArrayValue;
//! use qocalc_core::validation::{validate, Constraint, ParameterCheck};
//!
//! let couplings = ArrayValue::from(vec![-1.0, 2.0, -3.0]);
//! let err = validate(
//!     "ring_damping",
//!     &[ParameterCheck::new("couplings", Some(&couplings), &[Constraint::NonNegative])],
//! )
//! .unwrap_err();
//!
//! assert!(err.to_string().contains("Bad couplings indices: [0 2]"));
//! ```

use crate::array::{broadcast_shape, format_values, ArrayValue, Kind};
use crate::errors::{QoError, QoResult};
use crate::parameter::Interval;
use num::complex::Complex64;
use std::fmt;
use tracing::{debug, error, warn};

/// How a violation affects the calculation
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    /// The calculation must not proceed
    Fatal,
    /// Dubious but tolerable; reported and then ignored
    Advisory,
}

/// A numeric constraint on a parameter value
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Constraint {
    /// Every element must be >= 0 (complex values compare by real part, then imaginary part)
    NonNegative,
    /// Every element must differ from zero
    NonZero(Severity),
    /// Every element must lie inside the interval
    Within(Interval),
    /// Every element must be finite
    Finite,
    /// Elements must be of a numeric kind (`b`, `i`, `u`, `f` or `c`)
    Numeric,
    /// At most one dimension; scalars are accepted
    OneDimensional,
    /// Complex values are flagged with the given severity
    Real(Severity),
    /// Shape must broadcast against the named parameter when both are present
    BroadcastsWith(&'static str),
}

/// One entry of a declarative validation list
#[derive(Clone, Debug)]
pub struct ParameterCheck<'a> {
    pub name: &'a str,
    pub value: Option<&'a ArrayValue>,
    pub constraints: &'a [Constraint],
}

impl<'a> ParameterCheck<'a> {
    pub fn new(
        name: &'a str,
        value: Option<&'a ArrayValue>,
        constraints: &'a [Constraint],
    ) -> Self {
        Self {
            name,
            value,
            constraints,
        }
    }
}

/// A single failed constraint
#[derive(Clone, Debug, PartialEq)]
pub struct Violation {
    pub parameter: String,
    pub constraint: Constraint,
    pub severity: Severity,
    /// Flat (row-major) indices of the offending elements
    pub indices: Vec<usize>,
    /// Offending values, or the two shapes for a broadcasting violation
    pub values: Vec<String>,
    pub message: String,
}

/// Accumulated outcome of a validation pass
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn has_fatal(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Fatal)
    }

    pub fn has_advisory(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Advisory)
    }

    fn messages(&self, severity: Severity) -> String {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Log the accumulated messages and convert into a classified result
    pub fn into_result(self, calculator: &str) -> QoResult<()> {
        if self.has_advisory() {
            warn!(calculator, "{}", self.messages(Severity::Advisory));
        }
        if self.has_fatal() {
            error!(calculator, "{}", self.messages(Severity::Fatal));
            return Err(QoError::InvalidValue(self));
        }
        if self.has_advisory() {
            return Err(QoError::DubiousValue(self));
        }
        Ok(())
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [Severity::Advisory, Severity::Fatal]
            .into_iter()
            .map(|s| self.messages(s))
            .filter(|m| !m.is_empty())
            .collect();
        write!(f, "{}", parts.join("\n"))
    }
}

/// Validate a list of parameter checks, logging the inputs and the outcome
pub fn validate(calculator: &str, checks: &[ParameterCheck<'_>]) -> QoResult<()> {
    debug!(calculator, "Inputs for validation:\n{}", describe_inputs(checks));
    inspect(checks).into_result(calculator)
}

/// Evaluate every check without logging or classifying the outcome
pub fn inspect(checks: &[ParameterCheck<'_>]) -> ValidationReport {
    let mut report = ValidationReport::new();
    for check in checks {
        let Some(value) = check.value else {
            continue;
        };
        for constraint in check.constraints {
            evaluate(check.name, value, *constraint, checks, &mut report);
        }
    }
    report
}

fn describe_inputs(checks: &[ParameterCheck<'_>]) -> String {
    let mut names: Vec<&ParameterCheck<'_>> = checks.iter().collect();
    names.sort_by_key(|c| c.name);
    names
        .iter()
        .map(|c| match c.value {
            Some(v) => format!("  {} = {}", c.name, v),
            None => format!("  {} = None", c.name),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn evaluate(
    name: &str,
    value: &ArrayValue,
    constraint: Constraint,
    checks: &[ParameterCheck<'_>],
    report: &mut ValidationReport,
) {
    match constraint {
        Constraint::NonNegative => {
            flag_elements(name, value, constraint, Severity::Fatal, report, |c| {
                c.re < 0.0 || (c.re == 0.0 && c.im < 0.0)
            })
        }
        Constraint::NonZero(severity) => {
            flag_elements(name, value, constraint, severity, report, |c| {
                c.re == 0.0 && c.im == 0.0
            })
        }
        Constraint::Within(interval) => {
            flag_elements(name, value, constraint, Severity::Fatal, report, |c| {
                c.im != 0.0 || !interval.contains(c.re)
            })
        }
        Constraint::Finite => {
            flag_elements(name, value, constraint, Severity::Fatal, report, |c| {
                !(c.re.is_finite() && c.im.is_finite())
            })
        }
        Constraint::Numeric => {
            let kind = value.kind();
            if !kind.is_numeric() {
                let expected: Vec<String> =
                    Kind::NUMERIC.iter().map(|k| format!("'{k}'")).collect();
                report.push(Violation {
                    parameter: name.to_string(),
                    constraint,
                    severity: Severity::Fatal,
                    indices: vec![],
                    values: vec![kind.to_string()],
                    message: format!(
                        "Received {name} data type kind: {kind}\nExpected {name} data type kind: [{}]",
                        expected.join(", ")
                    ),
                });
            }
        }
        Constraint::OneDimensional => {
            let ndim = value.ndim();
            if ndim > 1 {
                report.push(Violation {
                    parameter: name.to_string(),
                    constraint,
                    severity: Severity::Fatal,
                    indices: vec![],
                    values: vec![ndim.to_string()],
                    message: format!(
                        "Received {name} dimensions: {ndim}\nExpected {name} dimensions: 1"
                    ),
                });
            }
        }
        Constraint::Real(severity) => {
            if value.kind() == Kind::Complex {
                report.push(Violation {
                    parameter: name.to_string(),
                    constraint,
                    severity,
                    indices: vec![],
                    values: vec![],
                    message: format!("Received {name} in: complex\nExpected {name} in: real"),
                });
            }
        }
        Constraint::BroadcastsWith(other) => {
            let other_value = checks
                .iter()
                .find(|c| c.name == other)
                .and_then(|c| c.value);
            if let Some(other_value) = other_value {
                let (shape, other_shape) = (value.shape(), other_value.shape());
                if broadcast_shape(&shape, &other_shape).is_none() {
                    let width = name.len().max(other.len());
                    report.push(Violation {
                        parameter: name.to_string(),
                        constraint,
                        severity: Severity::Fatal,
                        indices: vec![],
                        values: vec![other_shape.to_string(), shape.to_string()],
                        message: format!(
                            "operands could not be broadcast together with shapes {other_shape} {shape}\n\
                             Same shape required:\n  \
                             {other:<width$} shape = {other_shape}\n  \
                             {name:<width$} shape = {shape}"
                        ),
                    });
                }
            }
        }
    }
}

/// Record one violation listing every element for which `is_bad` holds
fn flag_elements<F>(
    name: &str,
    value: &ArrayValue,
    constraint: Constraint,
    severity: Severity,
    report: &mut ValidationReport,
    is_bad: F,
) where
    F: Fn(Complex64) -> bool,
{
    // Non-numeric data is reported by `Constraint::Numeric`
    let Some(elements) = value.to_complex() else {
        return;
    };
    let indices: Vec<usize> = elements
        .iter()
        .enumerate()
        .filter(|(_, c)| is_bad(**c))
        .map(|(i, _)| i)
        .collect();
    if indices.is_empty() {
        return;
    }

    let rendered = value.element_strings();
    let values: Vec<String> = indices.iter().map(|&i| rendered[i].clone()).collect();
    let requirement = match constraint {
        Constraint::NonNegative => ">=0".to_string(),
        Constraint::NonZero(_) => "!=0".to_string(),
        Constraint::Within(interval) => format!("in {interval}"),
        _ => "finite".to_string(),
    };
    let message = format!(
        "All {name} values must be {requirement}\nBad {name} indices: {}\nBad {name} values:  {}",
        format_values(&indices),
        format_values(&values)
    );

    report.push(Violation {
        parameter: name.to_string(),
        constraint,
        severity,
        indices,
        values,
        message,
    });
}
