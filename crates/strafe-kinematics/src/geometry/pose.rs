use core::fmt;

use libm::{cos, fabs, hypot, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Rotation2d, Translation2d, Twist2d};

/// Below this magnitude the closed-form SE(2) terms switch to their Taylor
/// expansions.
const SMALL_ANGLE: f64 = 1e-9;

/// A rigid-body placement on the plane: a translation plus a heading.
///
/// Poses are immutable values. Every operation returns a new pose.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose2d {
    translation: Translation2d,
    rotation: Rotation2d,
}

impl Pose2d {
    /// Construct a new pose.
    pub const fn new(translation: Translation2d, rotation: Rotation2d) -> Self {
        Pose2d {
            translation,
            rotation,
        }
    }

    /// Construct a pose from coordinates in meters and a heading.
    pub const fn from_xy(x: f64, y: f64, rotation: Rotation2d) -> Self {
        Pose2d {
            translation: Translation2d::new(x, y),
            rotation,
        }
    }

    /// Position component.
    pub fn translation(&self) -> Translation2d {
        self.translation
    }

    /// Heading component.
    pub fn rotation(&self) -> Rotation2d {
        self.rotation
    }

    /// X position (m).
    pub fn x(&self) -> f64 {
        self.translation.x()
    }

    /// Y position (m).
    pub fn y(&self) -> f64 {
        self.translation.y()
    }

    /// Apply `other` in this pose's frame.
    ///
    /// `other`'s translation is rotated by this heading and added to this
    /// translation; the headings add.
    pub fn compose(&self, other: &Pose2d) -> Pose2d {
        Pose2d {
            translation: self.translation + other.translation.rotate_by(&self.rotation),
            rotation: self.rotation + other.rotation,
        }
    }

    /// The pose that composes with this one to give the identity.
    pub fn inverse(&self) -> Pose2d {
        let rotation = self.rotation.inverse();
        Pose2d {
            translation: (-self.translation).rotate_by(&rotation),
            rotation,
        }
    }

    /// This pose expressed in the frame of `origin`, i.e. `origin⁻¹ ∘ self`.
    pub fn relative_to(&self, origin: &Pose2d) -> Pose2d {
        origin.inverse().compose(self)
    }

    /// Integrate a body-frame twist starting from this pose.
    ///
    /// The robot is assumed to travel along a constant-curvature arc over the
    /// step, which is exact for constant chassis velocities and keeps large
    /// per-step rotations from skewing the translation.
    pub fn exp(&self, twist: &Twist2d) -> Pose2d {
        let Twist2d { dx, dy, dtheta } = *twist;
        let sin_theta = sin(dtheta);
        let cos_theta = cos(dtheta);

        let (s, c) = if fabs(dtheta) < SMALL_ANGLE {
            (1.0 - dtheta * dtheta / 6.0, 0.5 * dtheta)
        } else {
            (sin_theta / dtheta, (1.0 - cos_theta) / dtheta)
        };

        let step = Pose2d {
            translation: Translation2d::new(dx * s - dy * c, dx * c + dy * s),
            rotation: Rotation2d::from_components(cos_theta, sin_theta),
        };
        self.compose(&step)
    }

    /// The twist that takes this pose to `end` under [`Pose2d::exp`].
    pub fn log(&self, end: &Pose2d) -> Twist2d {
        let transform = end.relative_to(self);
        let dtheta = transform.rotation.radians();
        let half_dtheta = dtheta / 2.0;
        let cos_minus_one = transform.rotation.cos() - 1.0;

        let half_theta_by_tan_of_half_dtheta = if fabs(cos_minus_one) < SMALL_ANGLE {
            1.0 - dtheta * dtheta / 12.0
        } else {
            -(half_dtheta * transform.rotation.sin()) / cos_minus_one
        };

        let translation = transform
            .translation
            .rotate_by(&Rotation2d::from_components(
                half_theta_by_tan_of_half_dtheta,
                -half_dtheta,
            ))
            * hypot(half_theta_by_tan_of_half_dtheta, half_dtheta);

        Twist2d::new(translation.x(), translation.y(), dtheta)
    }

    /// Same position, different heading.
    pub fn with_rotation(&self, rotation: Rotation2d) -> Pose2d {
        Pose2d {
            translation: self.translation,
            rotation,
        }
    }

    /// Same heading, different position.
    pub fn with_translation(&self, translation: Translation2d) -> Pose2d {
        Pose2d {
            translation,
            rotation: self.rotation,
        }
    }
}

impl fmt::Display for Pose2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x: {:.2} m, y: {:.2} m, θ: {:.2} rad)",
            self.x(),
            self.y(),
            self.rotation.radians()
        )
    }
}
