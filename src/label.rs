//! The label value type and its conversions.
//!
//! Every public operation of the registry normalizes its label argument
//! through `Into<Label>` before touching any map. This is the single place
//! where the "integer-valued numerics are integers" rule lives: `3.0`,
//! `3u8` and `3i64` all convert to the same `Label::Int(3)`.

use std::fmt;
use std::hash::{Hash, Hasher};


/// The user-facing identity of a variable.
///
/// A label is any of the hashable value kinds the registry accepts: an
/// integer, a float that is not equal to any integer, or a string. The
/// conversions are the normalization boundary: a float exactly equal to an
/// integer `k` converts to `Label::Int(k)`, never to `Label::Float`, so
/// `Label::from(3.0) == Label::from(3)` holds. The `Float` variant can
/// therefore only be obtained from a genuinely non-integral value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Label {
    /// An integer label. All integer-valued inputs normalize to this.
    Int(i64),
    /// A float label that is not equal to any integer.
    Float(FloatLabel),
    /// A text label.
    Str(Box<str>),
}

/// A float label, compared and hashed by bit pattern.
///
/// Bit equality is only sound because `Label`'s conversions never put an
/// integral value in here: `-0.0` and `0.0` both normalize to
/// `Label::Int(0)` before this type is involved. A NaN is a valid label and
/// equals exactly the NaN with the same bit pattern.
#[derive(Clone, Copy)]
pub struct FloatLabel(f64);

impl FloatLabel {
    /// Returns the raw float value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for FloatLabel {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatLabel {}

impl Hash for FloatLabel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.to_bits());
    }
}

impl fmt::Debug for FloatLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),* $(,)?) => {$(
        impl From<$ty> for Label {
            fn from(v: $ty) -> Self {
                Label::Int(v as i64)
            }
        }
    )*}
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32, usize);

impl From<f64> for Label {
    fn from(v: f64) -> Self {
        // `i64::MAX as f64` rounds up to 2^63, so it is an exclusive bound;
        // `i64::MIN as f64` is exactly -2^63 and inclusive.
        if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
            Label::Int(v as i64)
        } else {
            Label::Float(FloatLabel(v))
        }
    }
}

impl From<f32> for Label {
    fn from(v: f32) -> Self {
        Label::from(v as f64)
    }
}

impl From<&str> for Label {
    fn from(v: &str) -> Self {
        Label::Str(v.into())
    }
}

impl From<String> for Label {
    fn from(v: String) -> Self {
        Label::Str(v.into_boxed_str())
    }
}

impl From<Box<str>> for Label {
    fn from(v: Box<str>) -> Self {
        Label::Str(v)
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Label::Int(v) => fmt::Debug::fmt(v, f),
            Label::Float(v) => fmt::Debug::fmt(v, f),
            Label::Str(v) => fmt::Debug::fmt(v, f),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Label::Int(v) => fmt::Display::fmt(v, f),
            Label::Float(v) => fmt::Display::fmt(&v.0, f),
            Label::Str(v) => fmt::Display::fmt(v, f),
        }
    }
}
