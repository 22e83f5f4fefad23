//! Per-module value types.
//!
//! A swerve module is one independently driven and independently steered
//! wheel. Its instantaneous motion is a [`SwerveModuleState`]; its cumulative
//! encoder reading is a [`SwerveModulePosition`]. Both are plain `Copy`
//! values: callers keep their own accumulators and hand snapshots to the
//! kinematics and odometry.

use core::fmt;

use libm::fabs;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Rotation2d;

/// Speed and steering angle of one module.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SwerveModuleState {
    /// Signed wheel surface speed (m/s).
    pub speed: f64,
    /// Steering angle of the wheel relative to the robot's x-axis.
    pub angle: Rotation2d,
}

impl SwerveModuleState {
    /// Construct a module state.
    pub const fn new(speed: f64, angle: Rotation2d) -> Self {
        SwerveModuleState { speed, angle }
    }

    /// Minimize steering travel toward this state from `current_angle`.
    ///
    /// If the target is more than 90° away, the same wheel motion is obtained
    /// by driving backwards with the steering flipped by 180°, so the module
    /// never has to turn more than a quarter revolution.
    pub fn optimize(&self, current_angle: Rotation2d) -> SwerveModuleState {
        let delta = self.angle - current_angle;
        if fabs(delta.degrees()) > 90.0 {
            SwerveModuleState::new(-self.speed, self.angle.flipped())
        } else {
            *self
        }
    }

    /// Scale the speed by the cosine of the steering error.
    ///
    /// A module that has not finished turning then only drives the component
    /// of the requested motion it is actually pointed along.
    pub fn cosine_scale(&self, current_angle: Rotation2d) -> SwerveModuleState {
        SwerveModuleState::new(self.speed * (self.angle - current_angle).cos(), self.angle)
    }
}

impl fmt::Display for SwerveModuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(v: {:.2} m/s, angle: {})", self.speed, self.angle)
    }
}

/// Cumulative distance and steering angle of one module.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SwerveModulePosition {
    /// Distance the wheel has rolled since the encoder was zeroed (m).
    pub distance: f64,
    /// Current steering angle of the wheel.
    pub angle: Rotation2d,
}

impl SwerveModulePosition {
    /// Construct a module position.
    pub const fn new(distance: f64, angle: Rotation2d) -> Self {
        SwerveModulePosition { distance, angle }
    }

    /// Distance rolled since `previous`, paired with the current angle.
    ///
    /// The steering angle over the step is approximated by the latest reading.
    pub fn delta_since(&self, previous: &SwerveModulePosition) -> SwerveModulePosition {
        SwerveModulePosition::new(self.distance - previous.distance, self.angle)
    }
}

impl fmt::Display for SwerveModulePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(d: {:.3} m, angle: {})", self.distance, self.angle)
    }
}
