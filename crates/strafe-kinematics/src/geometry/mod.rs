//! Planar geometry.
//!
//! Rotations, translations, poses and twists, with exact composition and the
//! SE(2) exponential and logarithm maps used to integrate odometry.
//!
//! Conventions: x forward, y left, angles counter-clockwise positive, all
//! lengths in meters.

mod pose;
mod rotation;
mod translation;
mod twist;

pub use pose::Pose2d;
pub use rotation::{Rotation2d, wrap_angle};
pub use translation::Translation2d;
pub use twist::Twist2d;
