use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

use libm::hypot;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Rotation2d;

/// A 2‑D vector `(x, y)` in meters.
///
/// Used both for positions on the field and for module offsets from the
/// robot's center of rotation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Translation2d {
    x: f64,
    y: f64,
}

impl Translation2d {
    /// The origin.
    pub const ZERO: Translation2d = Translation2d { x: 0.0, y: 0.0 };

    /// Construct a new translation.
    pub const fn new(x: f64, y: f64) -> Self {
        Translation2d { x, y }
    }

    /// Construct a translation from polar coordinates.
    ///
    /// # Arguments
    ///
    /// * `distance`: Length of the vector in meters.
    /// * `angle`: Direction of the vector.
    pub fn from_polar(distance: f64, angle: Rotation2d) -> Self {
        Translation2d {
            x: distance * angle.cos(),
            y: distance * angle.sin(),
        }
    }

    /// X component (m).
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y component (m).
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Length of the vector.
    pub fn norm(&self) -> f64 {
        hypot(self.x, self.y)
    }

    /// Direction of the vector. The zero vector has the zero rotation.
    pub fn angle(&self) -> Rotation2d {
        Rotation2d::from_components(self.x, self.y)
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Translation2d) -> f64 {
        hypot(other.x - self.x, other.y - self.y)
    }

    /// Rotate this vector counter-clockwise about the origin.
    pub fn rotate_by(&self, rotation: &Rotation2d) -> Translation2d {
        Translation2d {
            x: self.x * rotation.cos() - self.y * rotation.sin(),
            y: self.x * rotation.sin() + self.y * rotation.cos(),
        }
    }
}

impl Add for Translation2d {
    type Output = Translation2d;

    fn add(self, rhs: Translation2d) -> Translation2d {
        Translation2d::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Translation2d {
    type Output = Translation2d;

    fn sub(self, rhs: Translation2d) -> Translation2d {
        Translation2d::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Translation2d {
    type Output = Translation2d;

    fn neg(self) -> Translation2d {
        Translation2d::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Translation2d {
    type Output = Translation2d;

    fn mul(self, scalar: f64) -> Translation2d {
        Translation2d::new(self.x * scalar, self.y * scalar)
    }
}

impl Div<f64> for Translation2d {
    type Output = Translation2d;

    fn div(self, scalar: f64) -> Translation2d {
        Translation2d::new(self.x / scalar, self.y / scalar)
    }
}

impl fmt::Display for Translation2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2} m, y: {:.2} m)", self.x, self.y)
    }
}
