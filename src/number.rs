// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.
#![allow(clippy::as_conversions, clippy::float_cmp)]

use core::cmp::Ordering;
use core::fmt::{Debug, Display, Formatter};

use num_traits::ToPrimitive;
use serde::ser::Serializer;
use serde::Serialize;

const F64_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0; // 2^53

/// A decoded number.
///
/// Every signed width collapses into `Int`, every unsigned width into `UInt`
/// and both float widths into `Float`. Decoders such as `serde_json` hand out
/// non-negative integers as `UInt` and negative ones as `Int`.
#[derive(Clone, Copy)]
pub enum Number {
    UInt(u64),
    Int(i64),
    Float(f64),
}

impl Number {
    /// Signed view of the number.
    ///
    /// Unsigned values above `i64::MAX` are rejected rather than wrapped.
    /// Floats are truncated toward zero and rejected when NaN or outside
    /// the `i64` range.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Number::Int(v) => Some(*v),
            Number::UInt(v) => i64::try_from(*v).ok(),
            Number::Float(f) => f.to_i64(),
        }
    }

    /// Unsigned view of the number.
    ///
    /// Negative values (including negative floats) are rejected. Floats are
    /// truncated toward zero and clamped to `u64::MAX`.
    pub fn to_u64(&self) -> Option<u64> {
        match self {
            Number::UInt(v) => Some(*v),
            Number::Int(v) => u64::try_from(*v).ok(),
            Number::Float(f) if f.is_nan() || *f < 0.0 => None,
            Number::Float(f) => Some(f.to_u64().unwrap_or(u64::MAX)),
        }
    }

    /// Float view of the number. Never fails; large integers lose precision.
    pub fn to_f64(&self) -> f64 {
        match self {
            Number::UInt(v) => *v as f64,
            Number::Int(v) => *v as f64,
            Number::Float(v) => *v,
        }
    }

    pub fn is_integer(&self) -> bool {
        match self {
            Number::Float(f) => f.is_finite() && f.fract() == 0.0,
            _ => true,
        }
    }

    fn as_i128(&self) -> Option<i128> {
        match self {
            Number::UInt(v) => Some(i128::from(*v)),
            Number::Int(v) => Some(i128::from(*v)),
            Number::Float(_) => None,
        }
    }
}

impl Debug for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Number::UInt(v) => write!(f, "{v}"),
            Number::Int(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Number::UInt(v) => serializer.serialize_u64(*v),
            Number::Int(v) => serializer.serialize_i64(*v),
            // Integral floats are written without a fractional part.
            Number::Float(v) if self.is_integer() && v.abs() <= F64_SAFE_INTEGER => {
                serializer.serialize_i64(*v as i64)
            }
            Number::Float(v) => serializer.serialize_f64(*v),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if let (Some(a), Some(b)) = (self.as_i128(), other.as_i128()) {
            return Some(a.cmp(&b));
        }
        self.to_f64().partial_cmp(&other.to_f64())
    }
}

macro_rules! number_from {
    ($variant:ident, $target:ty, $($source:ty),+) => {
        $(
            impl From<$source> for Number {
                fn from(value: $source) -> Self {
                    Number::$variant(value as $target)
                }
            }
        )+
    };
}

number_from!(Int, i64, i8, i16, i32, i64, isize);
number_from!(UInt, u64, u8, u16, u32, u64, usize);
number_from!(Float, f64, f32, f64);
