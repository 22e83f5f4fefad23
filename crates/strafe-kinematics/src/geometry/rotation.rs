use core::f64::consts::PI;
use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use libm::{atan2, cos, hypot, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Below this vector length a rotation cannot be recovered from its components.
const MIN_COMPONENT_NORM: f64 = 1e-6;

/// A planar orientation.
///
/// Stored as the unit vector `(cos θ, sin θ)` instead of a bare angle, so that
/// composition and inversion stay exact at every angle, including ±180°. The
/// pair is renormalized whenever a rotation is built from arbitrary input.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawRotation"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation2d {
    cos: f64,
    sin: f64,
}

/// Deserialized components, renormalized on the way into [`Rotation2d`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawRotation {
    cos: f64,
    sin: f64,
}

#[cfg(feature = "serde")]
impl From<RawRotation> for Rotation2d {
    fn from(raw: RawRotation) -> Self {
        Rotation2d::from_components(raw.cos, raw.sin)
    }
}

impl Rotation2d {
    /// The zero rotation.
    pub const IDENTITY: Rotation2d = Rotation2d { cos: 1.0, sin: 0.0 };

    /// Construct a rotation from an angle in radians.
    pub fn new(radians: f64) -> Self {
        Rotation2d {
            cos: cos(radians),
            sin: sin(radians),
        }
    }

    /// Construct a rotation from an angle in degrees.
    pub fn from_degrees(degrees: f64) -> Self {
        Self::new(degrees.to_radians())
    }

    /// Construct a rotation pointing along the vector `(x, y)`.
    ///
    /// The vector does not need to be normalized. A (near) zero-length vector
    /// has no direction; in that case the zero rotation is returned and a
    /// warning is logged.
    pub fn from_components(x: f64, y: f64) -> Self {
        let magnitude = hypot(x, y);
        if magnitude > MIN_COMPONENT_NORM {
            Rotation2d {
                cos: x / magnitude,
                sin: y / magnitude,
            }
        } else {
            tracing::warn!(x, y, "rotation requested from a zero-length vector, using zero rotation");
            Self::IDENTITY
        }
    }

    /// The angle in radians, in `(-PI, PI]`.
    pub fn radians(&self) -> f64 {
        atan2(self.sin, self.cos)
    }

    /// The angle in degrees, in `(-180, 180]`.
    pub fn degrees(&self) -> f64 {
        self.radians().to_degrees()
    }

    /// Cosine of the angle.
    pub fn cos(&self) -> f64 {
        self.cos
    }

    /// Sine of the angle.
    pub fn sin(&self) -> f64 {
        self.sin
    }

    /// Tangent of the angle.
    pub fn tan(&self) -> f64 {
        self.sin / self.cos
    }

    /// Compose with `other`: the resulting angle is the sum of both angles.
    ///
    /// This is complex multiplication of the two unit vectors.
    pub fn rotate_by(&self, other: &Rotation2d) -> Rotation2d {
        Self::from_components(
            self.cos * other.cos - self.sin * other.sin,
            self.cos * other.sin + self.sin * other.cos,
        )
    }

    /// The rotation that undoes this one.
    pub fn inverse(&self) -> Rotation2d {
        Rotation2d {
            cos: self.cos,
            sin: -self.sin,
        }
    }

    /// This rotation turned by a half revolution.
    pub fn flipped(&self) -> Rotation2d {
        Rotation2d {
            cos: -self.cos,
            sin: -self.sin,
        }
    }
}

impl Default for Rotation2d {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Add for Rotation2d {
    type Output = Rotation2d;

    fn add(self, rhs: Rotation2d) -> Rotation2d {
        self.rotate_by(&rhs)
    }
}

impl Sub for Rotation2d {
    type Output = Rotation2d;

    fn sub(self, rhs: Rotation2d) -> Rotation2d {
        self.rotate_by(&rhs.inverse())
    }
}

impl Neg for Rotation2d {
    type Output = Rotation2d;

    fn neg(self) -> Rotation2d {
        self.inverse()
    }
}

/// Scales the angle. The result is wrapped, so `180° * 2` is the zero rotation.
impl Mul<f64> for Rotation2d {
    type Output = Rotation2d;

    fn mul(self, scalar: f64) -> Rotation2d {
        Rotation2d::new(self.radians() * scalar)
    }
}

impl fmt::Display for Rotation2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°", self.degrees())
    }
}

/// Wrap an angle in radians into `(-PI, PI]`.
pub fn wrap_angle(radians: f64) -> f64 {
    let wrapped = radians % (2.0 * PI);
    if wrapped > PI {
        wrapped - 2.0 * PI
    } else if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}
