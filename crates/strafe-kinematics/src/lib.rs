#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for swerve-drive kinematics and odometry."]
#![doc = ""]
#![doc = "This crate provides planar geometry with exact SE(2) exponential and logarithm maps,"]
#![doc = "forward and inverse kinematics for drivetrains with any number of independently"]
#![doc = "steered modules, and an odometry integrator that fuses wheel travel with a gyro heading."]
#![doc = ""]
#![doc = "```"]
#![doc = "use strafe_kinematics::*;"]
#![doc = ""]
#![doc = "let kinematics = SwerveDriveKinematics::new(&["]
#![doc = "    Translation2d::new(0.3, 0.3),"]
#![doc = "    Translation2d::new(0.3, -0.3),"]
#![doc = "    Translation2d::new(-0.3, 0.3),"]
#![doc = "    Translation2d::new(-0.3, -0.3),"]
#![doc = "])?;"]
#![doc = "let start = [SwerveModulePosition::default(); 4];"]
#![doc = "let mut odometry = SwerveDriveOdometry::new(kinematics, Rotation2d::IDENTITY, &start)?;"]
#![doc = ""]
#![doc = "let moved = [SwerveModulePosition::new(0.5, Rotation2d::IDENTITY); 4];"]
#![doc = "let pose = odometry.update(Rotation2d::IDENTITY, &moved)?;"]
#![doc = "assert!((pose.x() - 0.5).abs() < 1e-9);"]
#![doc = "# Ok::<(), KinematicsError>(())"]
#![doc = "```"]

extern crate alloc;

pub mod chassis;
pub mod error;
pub mod geometry;
pub mod module;
pub mod odometry;
pub mod swerve;

pub use chassis::ChassisSpeeds;
pub use error::KinematicsError;
pub use geometry::{Pose2d, Rotation2d, Translation2d, Twist2d, wrap_angle};
pub use module::{SwerveModulePosition, SwerveModuleState};
pub use odometry::SwerveDriveOdometry;
pub use swerve::{
    SwerveDriveKinematics, desaturate_wheel_speeds, desaturate_wheel_speeds_for_chassis,
};
