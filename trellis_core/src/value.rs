// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Length values and optional scalars.
//!
//! [`Length`] is the closed set of units a style property can be expressed in.
//! [`OptionalScalar`] is the engine's notion of "maybe a number": undefined is
//! a distinct state rather than NaN, and arithmetic over it propagates
//! undefined instead of poisoning results.

use core::ops::{Add, Mul, Neg, Sub};

/// A style length.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Length {
    /// No value; the property falls back to its resolution chain or default.
    #[default]
    Undefined,
    /// Sized by the layout algorithm (content or available space).
    Auto,
    /// Absolute length in points.
    Points(f64),
    /// Percentage of a reference length (`50.0` is half).
    Percent(f64),
}

impl Length {
    /// Zero points.
    pub const ZERO: Self = Self::Points(0.0);

    /// Resolves this length against `reference`.
    ///
    /// Percentages of an undefined reference are undefined, as are
    /// [`Undefined`](Self::Undefined) and [`Auto`](Self::Auto).
    #[must_use]
    pub fn resolve(self, reference: OptionalScalar) -> OptionalScalar {
        match self {
            Self::Points(v) => OptionalScalar::new(v),
            Self::Percent(p) => reference.map(|r| r * p / 100.0),
            Self::Undefined | Self::Auto => OptionalScalar::UNDEFINED,
        }
    }

    /// Returns `true` for [`Auto`](Self::Auto).
    #[inline]
    #[must_use]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Returns `true` for [`Undefined`](Self::Undefined).
    #[inline]
    #[must_use]
    pub const fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` if the payload of a points or percent value is finite.
    pub(crate) fn is_finite(self) -> bool {
        match self {
            Self::Points(v) | Self::Percent(v) => v.is_finite(),
            Self::Undefined | Self::Auto => true,
        }
    }
}

/// A scalar that may be undefined.
///
/// Constructing from NaN yields undefined. `+`, `-` and `*` return undefined
/// if either operand is undefined. [`min`](Self::min) and [`max`](Self::max)
/// treat undefined as "no constraint" and return the other operand.
#[derive(Clone, Copy, Default, PartialEq)]
pub struct OptionalScalar(Option<f64>);

impl OptionalScalar {
    /// The undefined scalar.
    pub const UNDEFINED: Self = Self(None);

    /// Creates a scalar, mapping NaN to undefined.
    #[inline]
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self(None)
        } else {
            Self(Some(value))
        }
    }

    /// Converts an `Option<f64>`, mapping `Some(NaN)` to undefined.
    #[inline]
    #[must_use]
    pub fn from_option(value: Option<f64>) -> Self {
        value.map_or(Self::UNDEFINED, Self::new)
    }

    /// Returns the value, if defined.
    #[inline]
    #[must_use]
    pub const fn get(self) -> Option<f64> {
        self.0
    }

    /// Returns `true` if the scalar holds a number.
    #[inline]
    #[must_use]
    pub const fn is_defined(self) -> bool {
        self.0.is_some()
    }

    /// Returns the value, or `default` if undefined.
    #[inline]
    #[must_use]
    pub fn unwrap_or(self, default: f64) -> f64 {
        self.0.unwrap_or(default)
    }

    /// Applies `f` to a defined value.
    #[inline]
    #[must_use]
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self.0 {
            Some(v) => Self::new(f(v)),
            None => Self::UNDEFINED,
        }
    }

    /// Returns the smaller value, ignoring an undefined operand.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Self(Some(a.min(b))),
            (Some(_), None) => self,
            (None, _) => other,
        }
    }

    /// Returns the larger value, ignoring an undefined operand.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Self(Some(a.max(b))),
            (Some(_), None) => self,
            (None, _) => other,
        }
    }
}

impl core::fmt::Debug for OptionalScalar {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("undefined"),
        }
    }
}

impl From<f64> for OptionalScalar {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Option<f64>> for OptionalScalar {
    fn from(value: Option<f64>) -> Self {
        Self::from_option(value)
    }
}

impl Add for OptionalScalar {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Self::new(a + b),
            _ => Self::UNDEFINED,
        }
    }
}

impl Add<f64> for OptionalScalar {
    type Output = Self;

    fn add(self, rhs: f64) -> Self {
        self.map(|v| v + rhs)
    }
}

impl Sub for OptionalScalar {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Self::new(a - b),
            _ => Self::UNDEFINED,
        }
    }
}

impl Sub<f64> for OptionalScalar {
    type Output = Self;

    fn sub(self, rhs: f64) -> Self {
        self.map(|v| v - rhs)
    }
}

impl Mul for OptionalScalar {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Self::new(a * b),
            _ => Self::UNDEFINED,
        }
    }
}

impl Mul<f64> for OptionalScalar {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.map(|v| v * rhs)
    }
}

impl Neg for OptionalScalar {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|v| -v)
    }
}
