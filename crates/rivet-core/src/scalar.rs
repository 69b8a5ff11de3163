//! Type coercion from extracted strings into scalar fields.
//!
//! Coercion dispatches over the closed set [`ScalarKind`]. Each kind carries
//! the bit width of the receiving field, so `"300"` is rejected for a `u8`
//! field rather than silently wrapped.
//!
//! Field types opt in through [`Scalar`]; the binder only ever touches them
//! through the object-safe [`ScalarSlot`].

use std::fmt;
use std::num::IntErrorKind;

use crate::error::CoerceError;

/// The kinds of field a raw string can be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// UTF-8 string, taken as-is.
    Str,
    /// Signed integer of the given bit width.
    Int(u32),
    /// Unsigned integer of the given bit width.
    Uint(u32),
    /// Boolean.
    Bool,
    /// Floating point of the given bit width.
    Float(u32),
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str => f.write_str("string"),
            Self::Int(bits) => write!(f, "i{bits}"),
            Self::Uint(bits) => write!(f, "u{bits}"),
            Self::Bool => f.write_str("bool"),
            Self::Float(bits) => write!(f, "f{bits}"),
        }
    }
}

/// A coerced value, widened to the largest representation of its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Str(String),
    Int(i64),
    Uint(u64),
    Bool(bool),
    Float(f64),
}

impl ScalarValue {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "signed integer",
            Self::Uint(_) => "unsigned integer",
            Self::Bool(_) => "bool",
            Self::Float(_) => "float",
        }
    }
}

/// Coerces `raw` into a value of `kind`.
///
/// Integers are base 10 and must fit the kind's bit width. Booleans accept
/// `1 t T TRUE true True` and `0 f F FALSE false False` only. Floats that
/// overflow the width are rejected unless the literal itself spells infinity.
pub fn coerce(raw: &str, kind: ScalarKind) -> Result<ScalarValue, CoerceError> {
    match kind {
        ScalarKind::Str => Ok(ScalarValue::Str(raw.to_owned())),
        ScalarKind::Int(bits) => parse_int(raw, kind, bits).map(ScalarValue::Int),
        ScalarKind::Uint(bits) => parse_uint(raw, kind, bits).map(ScalarValue::Uint),
        ScalarKind::Bool => parse_bool(raw).map(ScalarValue::Bool),
        ScalarKind::Float(bits) => parse_float(raw, kind, bits).map(ScalarValue::Float),
    }
}

fn parse_error(raw: &str, kind: ScalarKind) -> CoerceError {
    CoerceError::Parse {
        kind,
        value: raw.to_owned(),
    }
}

fn int_error(raw: &str, kind: ScalarKind, e: &std::num::ParseIntError) -> CoerceError {
    match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => CoerceError::OutOfRange {
            kind,
            value: raw.to_owned(),
        },
        _ => parse_error(raw, kind),
    }
}

fn parse_int(raw: &str, kind: ScalarKind, bits: u32) -> Result<i64, CoerceError> {
    let parsed = match bits {
        8 => raw.parse::<i8>().map(i64::from),
        16 => raw.parse::<i16>().map(i64::from),
        32 => raw.parse::<i32>().map(i64::from),
        64 => raw.parse::<i64>(),
        _ => return Err(parse_error(raw, kind)),
    };
    parsed.map_err(|e| int_error(raw, kind, &e))
}

fn parse_uint(raw: &str, kind: ScalarKind, bits: u32) -> Result<u64, CoerceError> {
    let parsed = match bits {
        8 => raw.parse::<u8>().map(u64::from),
        16 => raw.parse::<u16>().map(u64::from),
        32 => raw.parse::<u32>().map(u64::from),
        64 => raw.parse::<u64>(),
        _ => return Err(parse_error(raw, kind)),
    };
    parsed.map_err(|e| int_error(raw, kind, &e))
}

fn parse_bool(raw: &str) -> Result<bool, CoerceError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(parse_error(raw, ScalarKind::Bool)),
    }
}

fn spells_infinity(raw: &str) -> bool {
    let digits = raw.trim_start_matches(['+', '-']);
    digits.eq_ignore_ascii_case("inf") || digits.eq_ignore_ascii_case("infinity")
}

fn parse_float(raw: &str, kind: ScalarKind, bits: u32) -> Result<f64, CoerceError> {
    let value = match bits {
        32 => raw.parse::<f32>().map(f64::from),
        64 => raw.parse::<f64>(),
        _ => return Err(parse_error(raw, kind)),
    }
    .map_err(|_| parse_error(raw, kind))?;

    if value.is_infinite() && !spells_infinity(raw) {
        return Err(CoerceError::OutOfRange {
            kind,
            value: raw.to_owned(),
        });
    }
    Ok(value)
}

// ============================================================================
// Field-side traits
// ============================================================================

/// A field type that can receive coerced values.
pub trait Scalar: Sized {
    /// The coercion kind for this type.
    const KIND: ScalarKind;

    /// Narrows a coerced value back into this type.
    ///
    /// Returns `None` if the value is of another kind or does not fit.
    fn from_scalar(value: ScalarValue) -> Option<Self>;

    /// Whether this value equals the type's zero value.
    fn is_zero(&self) -> bool;
}

/// Object-safe view of a [`Scalar`] field used by the walker.
pub trait ScalarSlot {
    /// The coercion kind of the underlying field.
    fn kind(&self) -> ScalarKind;

    /// Whether the field still holds its zero value.
    fn is_zero(&self) -> bool;

    /// Stores an already coerced value.
    fn assign(&mut self, value: ScalarValue) -> Result<(), CoerceError>;

    /// Coerces `raw` to this field's kind and stores it.
    fn set_str(&mut self, raw: &str) -> Result<(), CoerceError> {
        let value = coerce(raw, self.kind())?;
        self.assign(value)
    }
}

impl<T: Scalar> ScalarSlot for T {
    fn kind(&self) -> ScalarKind {
        T::KIND
    }

    fn is_zero(&self) -> bool {
        Scalar::is_zero(self)
    }

    fn assign(&mut self, value: ScalarValue) -> Result<(), CoerceError> {
        let got = value.kind_name();
        *self = T::from_scalar(value).ok_or(CoerceError::Mismatch {
            expected: T::KIND,
            got,
        })?;
        Ok(())
    }
}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::Str;

    fn from_scalar(value: ScalarValue) -> Option<Self> {
        match value {
            ScalarValue::Str(s) => Some(s),
            _ => None,
        }
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn from_scalar(value: ScalarValue) -> Option<Self> {
        match value {
            ScalarValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {
        $(
            impl Scalar for $ty {
                const KIND: ScalarKind = ScalarKind::Int(<$ty>::BITS);

                fn from_scalar(value: ScalarValue) -> Option<Self> {
                    match value {
                        ScalarValue::Int(i) => <$ty>::try_from(i).ok(),
                        _ => None,
                    }
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Scalar for $ty {
                const KIND: ScalarKind = ScalarKind::Uint(<$ty>::BITS);

                fn from_scalar(value: ScalarValue) -> Option<Self> {
                    match value {
                        ScalarValue::Uint(u) => <$ty>::try_from(u).ok(),
                        _ => None,
                    }
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);

impl Scalar for f32 {
    const KIND: ScalarKind = ScalarKind::Float(32);

    fn from_scalar(value: ScalarValue) -> Option<Self> {
        match value {
            // Lossless: the value was parsed at 32-bit width.
            #[allow(clippy::cast_possible_truncation)]
            ScalarValue::Float(v) => Some(v as f32),
            _ => None,
        }
    }

    fn is_zero(&self) -> bool {
        self.to_bits() == 0
    }
}

impl Scalar for f64 {
    const KIND: ScalarKind = ScalarKind::Float(64);

    fn from_scalar(value: ScalarValue) -> Option<Self> {
        match value {
            ScalarValue::Float(v) => Some(v),
            _ => None,
        }
    }

    fn is_zero(&self) -> bool {
        self.to_bits() == 0
    }
}
