//! Scalar and array values for calculator inputs
//!
//! Calculator inputs arrive either as single numbers or as short ordered sequences
//! (one value per channel or per spectral sample). [`ArrayValue`] holds either form
//! together with its element *kind*, so that validation can reason about data types
//! and shapes before any arithmetic is attempted.
//!
//! Scalars are stored as zero-dimensional arrays, which lets the usual broadcasting
//! rules combine a scalar with an array of any length:
//!
//! ```rust
//! use qocalc_core::array::{broadcast_shape, ArrayValue};
//!
//! let couplings = ArrayValue::from(vec![12.0, 20.0]);
//! let velocities = ArrayValue::from(2.0);
//!
//! let shape = broadcast_shape(&couplings.shape(), &velocities.shape()).unwrap();
//! assert_eq!(shape.to_string(), "(2,)");
//! ```

use crate::errors::{QoError, QoResult};
use ndarray::{arr0, Array1, ArrayD, ArrayViewD, IxDyn};
use num::complex::Complex64;
use std::fmt;

/// Floating point type used for all real-valued physical quantities
pub type FloatValue = f64;

/// Element kind of an array, following the single-character codes used by
/// numerical array libraries (`b`, `i`, `u`, `f`, `c`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    Bool,
    Int,
    UInt,
    Float,
    Complex,
    /// Textual data that could not be interpreted as numbers
    Text,
}

impl Kind {
    /// Kinds accepted as numeric
    pub const NUMERIC: [Kind; 5] = [Kind::Bool, Kind::Int, Kind::UInt, Kind::Float, Kind::Complex];

    /// Single character code of the kind
    pub fn code(&self) -> char {
        match self {
            Kind::Bool => 'b',
            Kind::Int => 'i',
            Kind::UInt => 'u',
            Kind::Float => 'f',
            Kind::Complex => 'c',
            Kind::Text => 'U',
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Kind::Text)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Shape of an array, displayed as a tuple (`()`, `(3,)`, `(2, 3)`)
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Shape(pub Vec<usize>);

impl Shape {
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Total number of elements
    pub fn size(&self) -> usize {
        self.0.iter().product()
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape(dims.to_vec())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "()"),
            [n] => write!(f, "({n},)"),
            dims => {
                let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}

/// Combined shape of two operands under broadcasting rules
///
/// Dimensions are aligned from the trailing end; each aligned pair must be equal or
/// one of them must be 1. A missing leading dimension behaves as 1.
/// Returns `None` when the shapes cannot be combined.
pub fn broadcast_shape(a: &Shape, b: &Shape) -> Option<Shape> {
    let ndim = a.ndim().max(b.ndim());
    let mut dims = vec![0; ndim];

    for i in 0..ndim {
        let da = dim_from_end(a, i);
        let db = dim_from_end(b, i);
        dims[ndim - 1 - i] = match (da, db) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            _ => return None,
        };
    }
    Some(Shape(dims))
}

fn dim_from_end(shape: &Shape, i: usize) -> usize {
    if i < shape.ndim() {
        shape.0[shape.ndim() - 1 - i]
    } else {
        1
    }
}

/// Common broadcast shape of any number of operands
///
/// The error reports the first pair of shapes that could not be combined.
pub fn broadcast_shapes<'a, I>(shapes: I) -> QoResult<Shape>
where
    I: IntoIterator<Item = &'a Shape>,
{
    let mut combined = Shape::default();
    for shape in shapes {
        combined = broadcast_shape(&combined, shape)
            .ok_or_else(|| QoError::ShapeMismatch(combined.clone(), shape.clone()))?;
    }
    Ok(combined)
}

/// View an array as if it had the target shape
pub fn broadcast_to<'a, A>(array: &'a ArrayD<A>, shape: &Shape) -> QoResult<ArrayViewD<'a, A>> {
    array.broadcast(IxDyn(shape.dims())).ok_or_else(|| {
        QoError::ShapeMismatch(Shape::from(array.shape()), shape.clone())
    })
}

/// Render values the way array libraries print them: `[1 2 3]`
pub fn format_values<T: fmt::Display>(values: &[T]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(" "))
}

/// Render an array; zero-dimensional arrays print as the bare value
pub fn format_array<T: fmt::Display>(array: &ArrayD<T>) -> String {
    if array.ndim() == 0 {
        return array.iter().map(|v| v.to_string()).collect();
    }
    let values: Vec<&T> = array.iter().collect();
    format_values(&values)
}

/// A scalar or array input value with a known element kind
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayValue {
    Bool(ArrayD<bool>),
    Int(ArrayD<i64>),
    UInt(ArrayD<u64>),
    Float(ArrayD<FloatValue>),
    Complex(ArrayD<Complex64>),
    Text(ArrayD<String>),
}

impl ArrayValue {
    /// Build a value from command-line style input: one number becomes a scalar,
    /// several become a one-dimensional array.
    pub fn from_values(values: Vec<FloatValue>) -> Self {
        match values.as_slice() {
            [single] => ArrayValue::from(*single),
            _ => ArrayValue::from(values),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            ArrayValue::Bool(_) => Kind::Bool,
            ArrayValue::Int(_) => Kind::Int,
            ArrayValue::UInt(_) => Kind::UInt,
            ArrayValue::Float(_) => Kind::Float,
            ArrayValue::Complex(_) => Kind::Complex,
            ArrayValue::Text(_) => Kind::Text,
        }
    }

    pub fn shape(&self) -> Shape {
        let dims = match self {
            ArrayValue::Bool(a) => a.shape(),
            ArrayValue::Int(a) => a.shape(),
            ArrayValue::UInt(a) => a.shape(),
            ArrayValue::Float(a) => a.shape(),
            ArrayValue::Complex(a) => a.shape(),
            ArrayValue::Text(a) => a.shape(),
        };
        Shape::from(dims)
    }

    pub fn ndim(&self) -> usize {
        self.shape().ndim()
    }

    /// Elements rendered as strings, in logical (row-major) order
    pub fn element_strings(&self) -> Vec<String> {
        fn render<T: fmt::Display>(a: &ArrayD<T>) -> Vec<String> {
            a.iter().map(|v| v.to_string()).collect()
        }
        match self {
            ArrayValue::Bool(a) => render(a),
            ArrayValue::Int(a) => render(a),
            ArrayValue::UInt(a) => render(a),
            ArrayValue::Float(a) => render(a),
            ArrayValue::Complex(a) => render(a),
            ArrayValue::Text(a) => render(a),
        }
    }

    /// Numeric values promoted to complex numbers
    ///
    /// Returns `None` for textual data.
    pub fn to_complex(&self) -> Option<ArrayD<Complex64>> {
        let promoted = match self {
            ArrayValue::Bool(a) => a.mapv(|v| Complex64::new(if v { 1.0 } else { 0.0 }, 0.0)),
            ArrayValue::Int(a) => a.mapv(|v| Complex64::new(v as FloatValue, 0.0)),
            ArrayValue::UInt(a) => a.mapv(|v| Complex64::new(v as FloatValue, 0.0)),
            ArrayValue::Float(a) => a.mapv(|v| Complex64::new(v, 0.0)),
            ArrayValue::Complex(a) => a.clone(),
            ArrayValue::Text(_) => return None,
        };
        Some(promoted)
    }

    /// Numeric values promoted to floats
    ///
    /// Returns `None` for complex and textual data, which have no lossless real
    /// representation.
    pub fn to_real(&self) -> Option<ArrayD<FloatValue>> {
        let promoted = match self {
            ArrayValue::Bool(a) => a.mapv(|v| if v { 1.0 } else { 0.0 }),
            ArrayValue::Int(a) => a.mapv(|v| v as FloatValue),
            ArrayValue::UInt(a) => a.mapv(|v| v as FloatValue),
            ArrayValue::Float(a) => a.clone(),
            ArrayValue::Complex(_) | ArrayValue::Text(_) => return None,
        };
        Some(promoted)
    }

    /// Real view of the data, failing with the parameter name for complex or text
    pub fn require_real(&self, parameter: &str) -> QoResult<ArrayD<FloatValue>> {
        self.to_real().ok_or_else(|| QoError::UnsupportedKind {
            parameter: parameter.to_string(),
            kind: self.kind(),
        })
    }

    /// Complex view of the data, failing with the parameter name for text
    pub fn require_complex(&self, parameter: &str) -> QoResult<ArrayD<Complex64>> {
        self.to_complex().ok_or_else(|| QoError::UnsupportedKind {
            parameter: parameter.to_string(),
            kind: self.kind(),
        })
    }
}

impl fmt::Display for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elements = self.element_strings();
        if self.ndim() == 0 {
            write!(f, "{}", elements.concat())
        } else {
            write!(f, "{}", format_values(&elements))
        }
    }
}

macro_rules! impl_array_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ArrayValue {
                fn from(value: $ty) -> Self {
                    ArrayValue::$variant(arr0(value).into_dyn())
                }
            }

            impl From<Vec<$ty>> for ArrayValue {
                fn from(values: Vec<$ty>) -> Self {
                    ArrayValue::$variant(Array1::from(values).into_dyn())
                }
            }

            impl From<ArrayD<$ty>> for ArrayValue {
                fn from(values: ArrayD<$ty>) -> Self {
                    ArrayValue::$variant(values)
                }
            }
        )*
    };
}

impl_array_value_from!(
    bool => Bool,
    i64 => Int,
    u64 => UInt,
    FloatValue => Float,
    Complex64 => Complex,
    String => Text,
);
