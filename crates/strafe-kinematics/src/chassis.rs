//! Chassis-level velocities.

use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{Pose2d, Rotation2d, Translation2d};

/// Linear and angular chassis velocities.
///
/// `vx` and `vy` are expressed in the robot frame (x forward, y left);
/// `omega` is counter-clockwise positive.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChassisSpeeds {
    /// Forward velocity (m/s).
    pub vx: f64,
    /// Leftward velocity (m/s).
    pub vy: f64,
    /// Angular velocity (rad/s).
    pub omega: f64,
}

impl ChassisSpeeds {
    /// Construct chassis speeds.
    ///
    /// # Arguments
    ///
    /// * `vx`: Forward velocity in m/s.
    /// * `vy`: Leftward velocity in m/s.
    /// * `omega`: Angular velocity in rad/s.
    pub const fn new(vx: f64, vy: f64, omega: f64) -> Self {
        ChassisSpeeds { vx, vy, omega }
    }

    /// Convert field-relative velocities into robot-relative chassis speeds.
    ///
    /// # Arguments
    ///
    /// * `vx`, `vy`: Velocity along the field axes in m/s.
    /// * `omega`: Angular velocity in rad/s.
    /// * `robot_angle`: The robot's heading on the field.
    pub fn from_field_relative(vx: f64, vy: f64, omega: f64, robot_angle: Rotation2d) -> Self {
        let robot_relative = Translation2d::new(vx, vy).rotate_by(&robot_angle.inverse());
        ChassisSpeeds::new(robot_relative.x(), robot_relative.y(), omega)
    }

    /// Express these robot-relative speeds along the field axes.
    pub fn to_field_relative(&self, robot_angle: Rotation2d) -> Self {
        let field_relative = Translation2d::new(self.vx, self.vy).rotate_by(&robot_angle);
        ChassisSpeeds::new(field_relative.x(), field_relative.y(), self.omega)
    }

    /// Correct for commanding a twisting motion over a discrete loop period.
    ///
    /// Holding `(vx, vy, omega)` for `dt` seconds moves the robot along an
    /// arc, which drifts sideways when the robot translates while rotating.
    /// This returns the speeds whose arc over `dt` ends at the pose a straight
    /// translation of `(vx·dt, vy·dt)` with rotation `omega·dt` would reach.
    pub fn discretize(&self, dt: f64) -> Self {
        let desired = Pose2d::from_xy(self.vx * dt, self.vy * dt, Rotation2d::new(self.omega * dt));
        let twist = Pose2d::default().log(&desired);
        ChassisSpeeds::new(twist.dx / dt, twist.dy / dt, twist.dtheta / dt)
    }
}

impl Add for ChassisSpeeds {
    type Output = ChassisSpeeds;

    fn add(self, rhs: ChassisSpeeds) -> ChassisSpeeds {
        ChassisSpeeds::new(self.vx + rhs.vx, self.vy + rhs.vy, self.omega + rhs.omega)
    }
}

impl Sub for ChassisSpeeds {
    type Output = ChassisSpeeds;

    fn sub(self, rhs: ChassisSpeeds) -> ChassisSpeeds {
        ChassisSpeeds::new(self.vx - rhs.vx, self.vy - rhs.vy, self.omega - rhs.omega)
    }
}

impl Neg for ChassisSpeeds {
    type Output = ChassisSpeeds;

    fn neg(self) -> ChassisSpeeds {
        ChassisSpeeds::new(-self.vx, -self.vy, -self.omega)
    }
}

impl Mul<f64> for ChassisSpeeds {
    type Output = ChassisSpeeds;

    fn mul(self, scalar: f64) -> ChassisSpeeds {
        ChassisSpeeds::new(self.vx * scalar, self.vy * scalar, self.omega * scalar)
    }
}

impl Div<f64> for ChassisSpeeds {
    type Output = ChassisSpeeds;

    fn div(self, scalar: f64) -> ChassisSpeeds {
        ChassisSpeeds::new(self.vx / scalar, self.vy / scalar, self.omega / scalar)
    }
}

impl fmt::Display for ChassisSpeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(vx: {:.2} m/s, vy: {:.2} m/s, ω: {:.2} rad/s)",
            self.vx, self.vy, self.omega
        )
    }
}
