//! Parameter catalogs
//!
//! Every calculator declares a static table describing the quantities it reads,
//! derives and produces. The table is pure metadata: it feeds help text and the
//! `parameters` listing of the command-line tool, and is never mutated.
//!
//! ```rust
//! use qocalc_core::parameter::{Bound, Flow, Interval, ParameterDefinition};
//!
//! const PARAMETERS: &[ParameterDefinition] = &[ParameterDefinition {
//!     name: "velocities",
//!     description: "Speed of light for each channel",
//!     valid_range: Interval::new(Bound::Closed(0.0), Bound::Unbounded),
//!     default: 0.0,
//!     datatype: "float (scalar or array)",
//!     unit: "rad s^{-1}",
//!     flow: Flow::Input,
//! }];
//!
//! assert_eq!(PARAMETERS[0].valid_range.to_string(), "[0, inf)");
//! ```

use crate::array::FloatValue;
use serde::{Serialize, Serializer};
use std::fmt;

/// One end of an [`Interval`]
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Bound {
    /// The end point belongs to the interval
    Closed(FloatValue),
    /// The end point is excluded
    Open(FloatValue),
    /// No limit in this direction
    Unbounded,
}

/// A range of valid values written in interval notation, e.g. `(0, 1]`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interval {
    pub lower: Bound,
    pub upper: Bound,
}

impl Interval {
    pub const fn new(lower: Bound, upper: Bound) -> Self {
        Self { lower, upper }
    }

    /// `(-inf, inf)`
    pub const fn real_line() -> Self {
        Self::new(Bound::Unbounded, Bound::Unbounded)
    }

    /// `[0, inf)`
    pub const fn non_negative() -> Self {
        Self::new(Bound::Closed(0.0), Bound::Unbounded)
    }

    pub fn contains(&self, value: FloatValue) -> bool {
        if value.is_nan() {
            return false;
        }
        let above = match self.lower {
            Bound::Closed(lo) => value >= lo,
            Bound::Open(lo) => value > lo,
            Bound::Unbounded => true,
        };
        let below = match self.upper {
            Bound::Closed(hi) => value <= hi,
            Bound::Open(hi) => value < hi,
            Bound::Unbounded => true,
        };
        above && below
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lower {
            Bound::Closed(lo) => write!(f, "[{lo}, ")?,
            Bound::Open(lo) => write!(f, "({lo}, ")?,
            Bound::Unbounded => write!(f, "(-inf, ")?,
        }
        match self.upper {
            Bound::Closed(hi) => write!(f, "{hi}]"),
            Bound::Open(hi) => write!(f, "{hi})"),
            Bound::Unbounded => write!(f, "inf)"),
        }
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Placement of a parameter in the calculation flow
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Input,
    Intermediate,
    /// An intermediate value that is also returned to the caller
    IntermediateOutput,
    Output,
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Flow::Input => "input",
            Flow::Intermediate => "intermediate",
            Flow::IntermediateOutput => "intermediate output",
            Flow::Output => "output",
        };
        write!(f, "{name}")
    }
}

/// Metadata for a single calculation parameter
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParameterDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub valid_range: Interval,
    pub default: FloatValue,
    /// Human readable data type, e.g. `float (scalar or array)`
    pub datatype: &'static str,
    pub unit: &'static str,
    pub flow: Flow,
}

/// Parameters with the given flow role, in catalog order
pub fn with_flow(parameters: &[ParameterDefinition], flow: Flow) -> Vec<&ParameterDefinition> {
    parameters.iter().filter(|p| p.flow == flow).collect()
}

/// Render a catalog as an aligned plain-text table
pub fn render_table(parameters: &[ParameterDefinition]) -> String {
    let headings = ["name", "flow", "range", "default", "unit", "description"];
    let rows: Vec<[String; 6]> = parameters
        .iter()
        .map(|p| {
            [
                p.name.to_string(),
                p.flow.to_string(),
                p.valid_range.to_string(),
                p.default.to_string(),
                p.unit.to_string(),
                p.description.to_string(),
            ]
        })
        .collect();

    let mut widths = headings.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut lines = vec![format_row(&headings.map(String::from)[..])];
    lines.extend(rows.iter().map(|row| format_row(&row[..])));
    lines.join("\n")
}
