use core::fmt;
use core::ops::Mul;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An incremental rigid-body displacement expressed in the robot's own frame.
///
/// Twists are what forward kinematics produces from one step of wheel
/// travel. Integrate one into a pose with [`Pose2d::exp`](super::Pose2d::exp).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Twist2d {
    /// Displacement along the robot's x-axis (m).
    pub dx: f64,
    /// Displacement along the robot's y-axis (m).
    pub dy: f64,
    /// Change in heading (rad).
    pub dtheta: f64,
}

impl Twist2d {
    /// Construct a new twist.
    ///
    /// # Arguments
    ///
    /// * `dx`: Forward displacement in meters.
    /// * `dy`: Leftward displacement in meters.
    /// * `dtheta`: Counter-clockwise heading change in radians.
    pub const fn new(dx: f64, dy: f64, dtheta: f64) -> Self {
        Twist2d { dx, dy, dtheta }
    }
}

impl Mul<f64> for Twist2d {
    type Output = Twist2d;

    fn mul(self, scalar: f64) -> Twist2d {
        Twist2d::new(self.dx * scalar, self.dy * scalar, self.dtheta * scalar)
    }
}

impl fmt::Display for Twist2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(dx: {:.3} m, dy: {:.3} m, dθ: {:.3} rad)",
            self.dx, self.dy, self.dtheta
        )
    }
}
