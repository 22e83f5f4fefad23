//! Gyro-fused swerve odometry.
//!
//! Integrates module encoder readings into a field pose. Translation comes
//! from the wheels through forward kinematics and the SE(2) exponential map;
//! heading comes from the gyro alone.

use alloc::vec::Vec;
use core::f64::consts::FRAC_PI_2;

use libm::fabs;

use crate::error::{KinematicsError, check_module_count};
use crate::geometry::{Pose2d, Rotation2d, Translation2d};
use crate::module::SwerveModulePosition;
use crate::swerve::SwerveDriveKinematics;

/// A gyro change larger than this in one update is logged as suspect.
const HEADING_JUMP_WARNING: f64 = FRAC_PI_2;

/// Tracks a swerve robot's pose on the field from module positions and a
/// gyro heading.
///
/// Call [`update`](Self::update) once per control-loop tick. The integrator
/// is owned by one caller; sharing it between threads needs external
/// locking, which `&mut self` on every mutating method already enforces.
#[derive(Debug, Clone)]
pub struct SwerveDriveOdometry {
    kinematics: SwerveDriveKinematics,
    pose: Pose2d,
    /// Added to raw gyro readings to get the field heading.
    gyro_offset: Rotation2d,
    /// Raw gyro reading at the previous update or reset.
    previous_gyro_angle: Rotation2d,
    /// Module positions at the previous update or reset.
    previous_positions: Vec<SwerveModulePosition>,
}

impl SwerveDriveOdometry {
    /// Construct odometry at the field origin, facing the gyro's current
    /// reading. Headings reported afterwards are the raw gyro readings.
    ///
    /// # Arguments
    ///
    /// * `kinematics`: The drivetrain's kinematics.
    /// * `gyro_angle`: The current raw gyro reading.
    /// * `module_positions`: The current module encoder readings.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::ModuleCountMismatch)` if
    /// `module_positions` does not have one entry per module.
    pub fn new(
        kinematics: SwerveDriveKinematics,
        gyro_angle: Rotation2d,
        module_positions: &[SwerveModulePosition],
    ) -> Result<Self, KinematicsError> {
        let initial_pose = Pose2d::new(Translation2d::ZERO, gyro_angle);
        Self::with_initial_pose(kinematics, gyro_angle, module_positions, initial_pose)
    }

    /// Construct odometry starting at `initial_pose`.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::ModuleCountMismatch)` if
    /// `module_positions` does not have one entry per module.
    pub fn with_initial_pose(
        kinematics: SwerveDriveKinematics,
        gyro_angle: Rotation2d,
        module_positions: &[SwerveModulePosition],
        initial_pose: Pose2d,
    ) -> Result<Self, KinematicsError> {
        check_module_count(kinematics.module_count(), module_positions.len())?;
        Ok(SwerveDriveOdometry {
            kinematics,
            pose: initial_pose,
            gyro_offset: initial_pose.rotation() - gyro_angle,
            previous_gyro_angle: gyro_angle,
            previous_positions: module_positions.to_vec(),
        })
    }

    /// The current pose estimate.
    pub fn pose(&self) -> Pose2d {
        self.pose
    }

    /// The raw gyro reading supplied at the previous update or reset.
    pub fn previous_gyro_angle(&self) -> Rotation2d {
        self.previous_gyro_angle
    }

    /// The kinematics this odometry integrates with.
    pub fn kinematics(&self) -> &SwerveDriveKinematics {
        &self.kinematics
    }

    /// Advance the pose estimate with new sensor readings.
    ///
    /// The distance each module rolled since the last call, paired with its
    /// current steering angle, goes through forward kinematics to give a
    /// body-frame twist. The twist is integrated along its arc, wheel rotation
    /// included, to place the robot; the resulting pose then takes the gyro
    /// heading outright. The wheels never set the heading.
    ///
    /// # Arguments
    ///
    /// * `gyro_angle`: The current raw gyro reading.
    /// * `module_positions`: The current module encoder readings.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::ModuleCountMismatch)` if
    /// `module_positions` does not have one entry per module. The odometry is
    /// left untouched in that case.
    ///
    /// # Returns
    ///
    /// The new pose estimate.
    pub fn update(
        &mut self,
        gyro_angle: Rotation2d,
        module_positions: &[SwerveModulePosition],
    ) -> Result<Pose2d, KinematicsError> {
        check_module_count(self.kinematics.module_count(), module_positions.len())?;

        let angle = gyro_angle + self.gyro_offset;
        let gyro_step = (gyro_angle - self.previous_gyro_angle).radians();
        if fabs(gyro_step) > HEADING_JUMP_WARNING {
            tracing::warn!(
                from = self.previous_gyro_angle.radians(),
                to = gyro_angle.radians(),
                "gyro heading jumped in a single update"
            );
        }
        let deltas: Vec<SwerveModulePosition> = module_positions
            .iter()
            .zip(&self.previous_positions)
            .map(|(current, previous)| current.delta_since(previous))
            .collect();

        let twist = self.kinematics.to_twist(&deltas)?;
        let new_pose = self.pose.exp(&twist);

        self.previous_positions.copy_from_slice(module_positions);
        self.previous_gyro_angle = gyro_angle;
        self.pose = new_pose.with_rotation(angle);

        tracing::trace!(
            x = self.pose.x(),
            y = self.pose.y(),
            theta = angle.radians(),
            gyro_step,
            "odometry updated"
        );
        Ok(self.pose)
    }

    /// Re-anchor the odometry to a known pose.
    ///
    /// Subsequent updates measure module travel from `module_positions` and
    /// report headings relative to `gyro_angle`, so the gyro itself never has
    /// to be zeroed.
    ///
    /// # Arguments
    ///
    /// * `pose`: Where the robot is on the field.
    /// * `gyro_angle`: The current raw gyro reading.
    /// * `module_positions`: The current module encoder readings.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::ModuleCountMismatch)` if
    /// `module_positions` does not have one entry per module. The odometry is
    /// left untouched in that case.
    pub fn reset_position(
        &mut self,
        pose: Pose2d,
        gyro_angle: Rotation2d,
        module_positions: &[SwerveModulePosition],
    ) -> Result<(), KinematicsError> {
        check_module_count(self.kinematics.module_count(), module_positions.len())?;

        self.pose = pose;
        self.gyro_offset = pose.rotation() - gyro_angle;
        self.previous_gyro_angle = gyro_angle;
        self.previous_positions.copy_from_slice(module_positions);

        tracing::debug!(%pose, "odometry position reset");
        Ok(())
    }

    /// Move the pose estimate without re-reading the sensors.
    ///
    /// The module baseline is kept; the gyro offset shifts by however much the
    /// heading changed.
    pub fn reset_pose(&mut self, pose: Pose2d) {
        self.gyro_offset = self.gyro_offset + (pose.rotation() - self.pose.rotation());
        self.pose = pose;
        tracing::debug!(%pose, "odometry pose reset");
    }

    /// Move the position estimate, keeping the heading.
    pub fn reset_translation(&mut self, translation: Translation2d) {
        self.pose = self.pose.with_translation(translation);
    }

    /// Change the heading estimate, keeping the position.
    pub fn reset_rotation(&mut self, rotation: Rotation2d) {
        self.gyro_offset = self.gyro_offset + (rotation - self.pose.rotation());
        self.pose = self.pose.with_rotation(rotation);
    }
}
