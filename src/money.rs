//! Currency amounts
//!
//! Every monetary quantity in the engine is held in whole pounds. Source
//! files record turnover and liability in thousands; the loader converts
//! them once and nothing downstream deals in thousands again.

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

/// An amount in pounds sterling
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pounds(pub f64);

impl Pounds {
    pub const ZERO: Pounds = Pounds(0.0);

    /// Convert an amount recorded in thousands of pounds
    pub fn from_thousands(thousands: f64) -> Self {
        Pounds(thousands * 1_000.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn to_millions(self) -> f64 {
        self.0 / 1e6
    }

    pub fn to_billions(self) -> f64 {
        self.0 / 1e9
    }

    pub fn max(self, other: Pounds) -> Pounds {
        Pounds(self.0.max(other.0))
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl Add for Pounds {
    type Output = Pounds;
    fn add(self, rhs: Pounds) -> Pounds {
        Pounds(self.0 + rhs.0)
    }
}

impl AddAssign for Pounds {
    fn add_assign(&mut self, rhs: Pounds) {
        self.0 += rhs.0;
    }
}

impl Sub for Pounds {
    type Output = Pounds;
    fn sub(self, rhs: Pounds) -> Pounds {
        Pounds(self.0 - rhs.0)
    }
}

/// Scaling by a weight, multiplier or rate
impl Mul<f64> for Pounds {
    type Output = Pounds;
    fn mul(self, rhs: f64) -> Pounds {
        Pounds(self.0 * rhs)
    }
}

impl Sum for Pounds {
    fn sum<I: Iterator<Item = Pounds>>(iter: I) -> Pounds {
        Pounds(iter.map(|p| p.0).sum())
    }
}

impl std::fmt::Display for Pounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "£{:.0}", self.0)
    }
}
