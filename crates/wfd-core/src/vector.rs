//! Immutable 2D vector used for positions, offsets, and deltas.
//!
//! Every operation returns a new value; nothing mutates in place.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, v: Vector) -> Vector {
        Vector::new(self.x + v.x, self.y + v.y)
    }

    pub fn subtract(self, v: Vector) -> Vector {
        Vector::new(self.x - v.x, self.y - v.y)
    }

    pub fn multiply_const(self, k: f64) -> Vector {
        Vector::new(self.x * k, self.y * k)
    }

    pub fn divide_const(self, k: f64) -> Vector {
        Vector::new(self.x / k, self.y / k)
    }

    /// Rounds to the nearest integer on both axes; halves round up, so
    /// `-0.5` becomes `0` and `-1.5` becomes `-1`.
    pub fn round(self) -> Vector {
        Vector::new((self.x + 0.5).floor(), (self.y + 0.5).floor())
    }

    pub fn distance(self, v: Vector) -> f64 {
        (self.x - v.x).hypot(self.y - v.y)
    }

    /// Angle of the vector pointing from `v` to `self`, in degrees.
    pub fn angle_deg(self, v: Vector) -> f64 {
        (self.y - v.y).atan2(self.x - v.x).to_degrees()
    }

    /// Midpoint between two vectors.
    pub fn midpoint(self, v: Vector) -> Vector {
        Vector::new((self.x + v.x) / 2.0, (self.y + v.y) / 2.0)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::add(self, rhs)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        self.subtract(rhs)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        self.multiply_const(rhs)
    }
}

impl Div<f64> for Vector {
    type Output = Vector;

    fn div(self, rhs: f64) -> Vector {
        self.divide_const(rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Vector {
    fn from((x, y): (f64, f64)) -> Self {
        Vector::new(x, y)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
