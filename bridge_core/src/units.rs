//! # Unit Types
//!
//! Lightweight newtype wrappers for the SI units used in Indian bridge design
//! practice (IRC / IS 456). They serialize as bare numbers.
//!
//! ## Conventions
//!
//! - Length: metres (m) for geometry, millimetres (mm) for section design
//! - Force: kilonewtons (kN)
//! - Moment: kilonewton-metres (kN·m)
//! - Pressure: kN/m² (kPa)
//! - Steel area: mm²
//! - Mass: kilograms (kg), tonnes (t)
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::units::{Meters, Millimeters, Kilograms, Tonnes};
//!
//! let thickness = Meters(1.5);
//! let thickness_mm: Millimeters = thickness.into();
//! assert_eq!(thickness_mm.0, 1500.0);
//!
//! let steel: Tonnes = Kilograms(2500.0).into();
//! assert_eq!(steel.0, 2.5);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

// ============================================================================
// Force, Moment and Pressure
// ============================================================================

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

/// Moment in kilonewton-metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnM(pub f64);

/// Moment in newton-millimetres (section design)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NMm(pub f64);

impl From<KnM> for NMm {
    fn from(m: KnM) -> Self {
        NMm(m.0 * 1.0e6)
    }
}

impl From<NMm> for KnM {
    fn from(m: NMm) -> Self {
        KnM(m.0 / 1.0e6)
    }
}

/// Pressure in kN/m²
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnPerM2(pub f64);

// ============================================================================
// Area and Volume
// ============================================================================

/// Area in square millimetres (reinforcement)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMm(pub f64);

/// Area in square metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqM(pub f64);

impl From<SqM> for SqMm {
    fn from(a: SqM) -> Self {
        SqMm(a.0 * 1.0e6)
    }
}

impl From<SqMm> for SqM {
    fn from(a: SqMm) -> Self {
        SqM(a.0 / 1.0e6)
    }
}

/// Volume in cubic metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeters(pub f64);

// ============================================================================
// Mass
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Mass in metric tonnes
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tonnes(pub f64);

impl From<Kilograms> for Tonnes {
    fn from(kg: Kilograms) -> Self {
        Tonnes(kg.0 / 1000.0)
    }
}

impl From<Tonnes> for Kilograms {
    fn from(t: Tonnes) -> Self {
        Kilograms(t.0 * 1000.0)
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(KiloNewtons);
impl_arithmetic!(KnM);
impl_arithmetic!(NMm);
impl_arithmetic!(KnPerM2);
impl_arithmetic!(SqMm);
impl_arithmetic!(SqM);
impl_arithmetic!(CubicMeters);
impl_arithmetic!(Kilograms);
impl_arithmetic!(Tonnes);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_to_millimeters() {
        let mm: Millimeters = Meters(1.5).into();
        assert_eq!(mm.0, 1500.0);
        let back: Meters = mm.into();
        assert_eq!(back.0, 1.5);
    }

    #[test]
    fn test_moment_conversion() {
        let nmm: NMm = KnM(393.216).into();
        assert!((nmm.0 - 393_216_000.0).abs() < 1e-3);
    }

    #[test]
    fn test_mass_conversion() {
        let t: Tonnes = Kilograms(14_130.0).into();
        assert!((t.0 - 14.13).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a = Meters(10.0);
        let b = Meters(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let area = SqMm(1800.0);
        let json = serde_json::to_string(&area).unwrap();
        assert_eq!(json, "1800.0");
        let roundtrip: SqMm = serde_json::from_str(&json).unwrap();
        assert_eq!(area, roundtrip);
    }
}
