//! Swerve-drive kinematics.
//!
//! Converts between chassis motion and the motion of each of N ≥ 2
//! independently steered modules.
//!
//! Module `i` at offset `(x_i, y_i)` from the center of rotation moves with
//!
//! ```text
//! [vx_i]   [1  0  -y_i] [vx   ]
//! [vy_i] = [0  1   x_i] [vy   ]
//!                       [omega]
//! ```
//!
//! Stacking these rows gives the 2N×3 inverse-kinematics matrix `A`. Forward
//! kinematics solves the overdetermined system in the least-squares sense with
//! the pseudo-inverse `(AᵀA)⁻¹Aᵀ`, which only depends on the module layout and
//! is computed once at construction.

use alloc::vec::Vec;

use libm::{fabs, hypot};
use nalgebra::{DVector, Matrix3xX, MatrixXx3, Vector3};

use crate::chassis::ChassisSpeeds;
use crate::error::{KinematicsError, check_module_count};
use crate::geometry::{Rotation2d, Translation2d, Twist2d};
use crate::module::{SwerveModulePosition, SwerveModuleState};

/// `det(AᵀA)` below this is treated as a degenerate module layout.
const SINGULARITY_THRESHOLD: f64 = 1e-9;

/// A required module speed below this counts as standing still.
const STANDSTILL_SPEED: f64 = 1e-9;

/// Kinematics for a swerve drive with a fixed set of modules.
///
/// Immutable after construction, so one instance can be shared freely
/// between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct SwerveDriveKinematics {
    /// Module offsets from the center of rotation, in module order.
    module_locations: Vec<Translation2d>,
    /// Least-squares solution matrix `(AᵀA)⁻¹Aᵀ`, 3×2N.
    forward_kinematics: Matrix3xX<f64>,
}

impl SwerveDriveKinematics {
    /// Construct the kinematics for the given module layout.
    ///
    /// # Arguments
    ///
    /// * `module_locations`: Offset of each module from the robot's center of
    ///   rotation. The order is kept: every per-module slice passed to or
    ///   returned from this type uses the same order.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::TooFewModules)` if fewer than two
    /// locations are given.
    /// Returns `Err(KinematicsError::SingularGeometry)` if the layout does not
    /// determine the chassis motion (for example all modules on one point).
    pub fn new(module_locations: &[Translation2d]) -> Result<Self, KinematicsError> {
        let count = module_locations.len();
        if count < 2 {
            return Err(KinematicsError::TooFewModules(count));
        }

        let inverse_kinematics = inverse_kinematics_matrix(module_locations);
        let normal = inverse_kinematics.tr_mul(&inverse_kinematics);
        if fabs(normal.determinant()) < SINGULARITY_THRESHOLD {
            return Err(KinematicsError::SingularGeometry(
                "module locations do not span a rigid-body motion",
            ));
        }
        let normal_inverse = normal.try_inverse().ok_or(KinematicsError::SingularGeometry(
            "least-squares normal matrix is not invertible",
        ))?;
        let forward_kinematics = normal_inverse * inverse_kinematics.transpose();

        tracing::debug!(modules = count, "swerve kinematics constructed");

        Ok(SwerveDriveKinematics {
            module_locations: module_locations.to_vec(),
            forward_kinematics,
        })
    }

    /// Number of modules.
    pub fn module_count(&self) -> usize {
        self.module_locations.len()
    }

    /// Module offsets from the center of rotation, in module order.
    pub fn module_locations(&self) -> &[Translation2d] {
        &self.module_locations
    }

    /// Calculates the module states needed to achieve the given chassis
    /// speeds, rotating about the robot's center. This is the inverse
    /// kinematics problem.
    ///
    /// # Arguments
    ///
    /// * `chassis_speeds`: The desired robot-relative chassis speeds.
    /// * `previous`: The last states commanded to the modules. A module whose
    ///   required speed is zero keeps its previous angle instead of snapping
    ///   to an arbitrary heading.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::ModuleCountMismatch)` if `previous` does
    /// not have one entry per module.
    pub fn to_module_states(
        &self,
        chassis_speeds: &ChassisSpeeds,
        previous: &[SwerveModuleState],
    ) -> Result<Vec<SwerveModuleState>, KinematicsError> {
        self.to_module_states_about(chassis_speeds, Translation2d::ZERO, previous)
    }

    /// Like [`to_module_states`](Self::to_module_states), but rotating about
    /// `center_of_rotation` (robot frame) instead of the robot's center.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::ModuleCountMismatch)` if `previous` does
    /// not have one entry per module.
    pub fn to_module_states_about(
        &self,
        chassis_speeds: &ChassisSpeeds,
        center_of_rotation: Translation2d,
        previous: &[SwerveModuleState],
    ) -> Result<Vec<SwerveModuleState>, KinematicsError> {
        check_module_count(self.module_count(), previous.len())?;

        let states = self
            .module_locations
            .iter()
            .zip(previous)
            .map(|(location, previous)| {
                let offset = *location - center_of_rotation;
                let vx = chassis_speeds.vx - chassis_speeds.omega * offset.y();
                let vy = chassis_speeds.vy + chassis_speeds.omega * offset.x();
                let speed = hypot(vx, vy);
                if speed < STANDSTILL_SPEED {
                    SwerveModuleState::new(0.0, previous.angle)
                } else {
                    SwerveModuleState::new(speed, Rotation2d::from_components(vx, vy))
                }
            })
            .collect();
        Ok(states)
    }

    /// Calculates the chassis speeds from measured module states. This is the
    /// forward kinematics problem.
    ///
    /// With more than two modules the system is overdetermined; the result is
    /// the least-squares fit, so one inconsistent module (a slipping wheel) is
    /// averaged against the others rather than trusted outright.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::ModuleCountMismatch)` if `states` does not
    /// have one entry per module.
    pub fn to_chassis_speeds(
        &self,
        states: &[SwerveModuleState],
    ) -> Result<ChassisSpeeds, KinematicsError> {
        check_module_count(self.module_count(), states.len())?;
        let solution = self.solve(states.iter().map(|state| (state.speed, state.angle)));
        Ok(ChassisSpeeds::new(solution.x, solution.y, solution.z))
    }

    /// Calculates the chassis displacement from the distance each module
    /// travelled over one step.
    ///
    /// The result is a displacement, not a velocity: it is not divided by any
    /// time step.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::ModuleCountMismatch)` if `deltas` does not
    /// have one entry per module.
    pub fn to_twist(&self, deltas: &[SwerveModulePosition]) -> Result<Twist2d, KinematicsError> {
        check_module_count(self.module_count(), deltas.len())?;
        let solution = self.solve(deltas.iter().map(|delta| (delta.distance, delta.angle)));
        Ok(Twist2d::new(solution.x, solution.y, solution.z))
    }

    /// Calculates the chassis displacement between two sets of module
    /// positions.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::ModuleCountMismatch)` if either slice does
    /// not have one entry per module.
    pub fn to_twist_between(
        &self,
        start: &[SwerveModulePosition],
        end: &[SwerveModulePosition],
    ) -> Result<Twist2d, KinematicsError> {
        check_module_count(self.module_count(), start.len())?;
        check_module_count(self.module_count(), end.len())?;
        let deltas: Vec<SwerveModulePosition> = end
            .iter()
            .zip(start)
            .map(|(end, start)| end.delta_since(start))
            .collect();
        self.to_twist(&deltas)
    }

    /// Least-squares `(vx, vy, omega)` from per-module `(magnitude, angle)`.
    fn solve(&self, modules: impl Iterator<Item = (f64, Rotation2d)>) -> Vector3<f64> {
        let mut module_velocities = DVector::<f64>::zeros(2 * self.module_count());
        for (i, (magnitude, angle)) in modules.enumerate() {
            module_velocities[2 * i] = magnitude * angle.cos();
            module_velocities[2 * i + 1] = magnitude * angle.sin();
        }
        &self.forward_kinematics * module_velocities
    }
}

/// Renormalize module speeds so that none exceeds `max_speed`.
///
/// Inverse kinematics can ask a module for more speed than it can deliver.
/// If the fastest module exceeds `max_speed`, every speed is scaled by the
/// same factor, so the direction of the commanded chassis motion is preserved
/// and only its magnitude is reduced.
///
/// # Arguments
///
/// * `states`: Module states to rescale in place.
/// * `max_speed`: The fastest a module can drive (m/s). Only its magnitude
///   is used.
pub fn desaturate_wheel_speeds(states: &mut [SwerveModuleState], max_speed: f64) {
    let max_speed = fabs(max_speed);
    let fastest = fastest_module_speed(states);
    if fastest > max_speed {
        let scale = max_speed / fastest;
        for state in states.iter_mut() {
            state.speed *= scale;
        }
    }
}

/// Renormalize module speeds against module, translational and rotational
/// limits of the whole chassis.
///
/// The scale applied is the fraction of the chassis limits that
/// `desired` asks for, mapped onto `max_module_speed`, and never above 1.
/// Nothing is changed if any limit or every module speed is zero. Only the
/// magnitudes of the limits are used.
///
/// # Arguments
///
/// * `states`: Module states to rescale in place.
/// * `desired`: The chassis speeds the states were computed from.
/// * `max_module_speed`: The fastest a module can drive (m/s).
/// * `max_translational_speed`: The fastest the chassis can translate (m/s).
/// * `max_rotational_speed`: The fastest the chassis can rotate (rad/s).
pub fn desaturate_wheel_speeds_for_chassis(
    states: &mut [SwerveModuleState],
    desired: &ChassisSpeeds,
    max_module_speed: f64,
    max_translational_speed: f64,
    max_rotational_speed: f64,
) {
    let max_module_speed = fabs(max_module_speed);
    let max_translational_speed = fabs(max_translational_speed);
    let max_rotational_speed = fabs(max_rotational_speed);
    let fastest = fastest_module_speed(states);
    if max_translational_speed == 0.0 || max_rotational_speed == 0.0 || fastest == 0.0 {
        return;
    }

    let translational_k = hypot(desired.vx, desired.vy) / max_translational_speed;
    let rotational_k = fabs(desired.omega) / max_rotational_speed;
    let k = translational_k.max(rotational_k);
    let scale = (k * max_module_speed / fastest).min(1.0);
    for state in states.iter_mut() {
        state.speed *= scale;
    }
}

fn fastest_module_speed(states: &[SwerveModuleState]) -> f64 {
    states
        .iter()
        .map(|state| fabs(state.speed))
        .fold(0.0, f64::max)
}

/// Build the 2N×3 matrix mapping chassis speeds to module velocity components.
fn inverse_kinematics_matrix(module_locations: &[Translation2d]) -> MatrixXx3<f64> {
    MatrixXx3::from_fn(2 * module_locations.len(), |row, col| {
        let offset = module_locations[row / 2];
        match (row % 2, col) {
            (0, 0) => 1.0,
            (0, 1) => 0.0,
            (0, _) => -offset.y(),
            (_, 0) => 0.0,
            (_, 1) => 1.0,
            (_, _) => offset.x(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use core::f64::consts::PI;

    const EPSILON: f64 = 1e-9;

    fn square_kinematics() -> SwerveDriveKinematics {
        SwerveDriveKinematics::new(&[
            Translation2d::new(12.0, 12.0),
            Translation2d::new(12.0, -12.0),
            Translation2d::new(-12.0, 12.0),
            Translation2d::new(-12.0, -12.0),
        ])
        .unwrap()
    }

    fn at_rest(count: usize) -> Vec<SwerveModuleState> {
        vec![SwerveModuleState::default(); count]
    }

    #[test]
    fn test_constructor_too_few_modules() {
        let result = SwerveDriveKinematics::new(&[Translation2d::new(1.0, 1.0)]);
        assert_eq!(result, Err(KinematicsError::TooFewModules(1)));
        let result = SwerveDriveKinematics::new(&[]);
        assert_eq!(result, Err(KinematicsError::TooFewModules(0)));
        assert!(KinematicsError::TooFewModules(0).is_configuration());
    }

    #[test]
    fn test_constructor_singular_geometry() {
        let location = Translation2d::new(0.3, 0.3);
        let result = SwerveDriveKinematics::new(&[location, location, location]);
        assert!(matches!(result, Err(KinematicsError::SingularGeometry(_))));
    }

    #[test]
    fn test_two_modules_are_enough() {
        let kinematics = SwerveDriveKinematics::new(&[
            Translation2d::new(0.5, 0.0),
            Translation2d::new(-0.5, 0.0),
        ])
        .unwrap();
        assert_eq!(kinematics.module_count(), 2);
        let speeds = ChassisSpeeds::new(0.3, -0.2, 1.0);
        let states = kinematics.to_module_states(&speeds, &at_rest(2)).unwrap();
        let recovered = kinematics.to_chassis_speeds(&states).unwrap();
        assert_abs_diff_eq!(recovered.vx, 0.3, epsilon = EPSILON);
        assert_abs_diff_eq!(recovered.vy, -0.2, epsilon = EPSILON);
        assert_abs_diff_eq!(recovered.omega, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_straight_line_inverse_kinematics() {
        let kinematics = square_kinematics();
        let states = kinematics
            .to_module_states(&ChassisSpeeds::new(5.0, 0.0, 0.0), &at_rest(4))
            .unwrap();
        for state in &states {
            assert_abs_diff_eq!(state.speed, 5.0, epsilon = EPSILON);
            assert_abs_diff_eq!(state.angle.degrees(), 0.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_straight_strafe_inverse_kinematics() {
        let kinematics = square_kinematics();
        let states = kinematics
            .to_module_states(&ChassisSpeeds::new(0.0, 5.0, 0.0), &at_rest(4))
            .unwrap();
        for state in &states {
            assert_abs_diff_eq!(state.speed, 5.0, epsilon = EPSILON);
            assert_abs_diff_eq!(state.angle.degrees(), 90.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_turn_in_place_inverse_kinematics() {
        let kinematics = square_kinematics();
        let states = kinematics
            .to_module_states(&ChassisSpeeds::new(0.0, 0.0, 2.0 * PI), &at_rest(4))
            .unwrap();

        // Every module sits 16.97 units from the center: 2π·16.97 = 106.63.
        let expected_angles = [135.0, 45.0, -135.0, -45.0];
        for (state, expected) in states.iter().zip(expected_angles) {
            assert_abs_diff_eq!(state.speed, 106.629, epsilon = 0.001);
            assert_abs_diff_eq!(state.angle.degrees(), expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_off_center_rotation_inverse_kinematics() {
        let kinematics = square_kinematics();
        let states = kinematics
            .to_module_states_about(
                &ChassisSpeeds::new(0.0, 0.0, 2.0 * PI),
                Translation2d::new(12.0, 12.0),
                &at_rest(4),
            )
            .unwrap();

        assert_abs_diff_eq!(states[0].speed, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(states[1].speed, 150.796, epsilon = 0.001);
        assert_abs_diff_eq!(states[2].speed, 150.796, epsilon = 0.001);
        assert_abs_diff_eq!(states[3].speed, 213.258, epsilon = 0.001);

        assert_abs_diff_eq!(states[1].angle.degrees(), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(states[2].angle.degrees(), -90.0, epsilon = 1e-6);
        assert_abs_diff_eq!(states[3].angle.degrees(), -45.0, epsilon = 1e-6);
    }

    #[test]
    fn test_standstill_keeps_previous_angles() {
        let kinematics = square_kinematics();
        let moving = kinematics
            .to_module_states(&ChassisSpeeds::new(1.0, 1.0, 0.0), &at_rest(4))
            .unwrap();
        let stopped = kinematics
            .to_module_states(&ChassisSpeeds::default(), &moving)
            .unwrap();
        for (stopped, moving) in stopped.iter().zip(&moving) {
            assert_eq!(stopped.speed, 0.0);
            assert_eq!(stopped.angle, moving.angle);
            assert_abs_diff_eq!(stopped.angle.degrees(), 45.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_standstill_module_only_keeps_its_own_angle() {
        let kinematics = square_kinematics();
        let previous = vec![SwerveModuleState::new(0.0, Rotation2d::from_degrees(30.0)); 4];
        let states = kinematics
            .to_module_states_about(
                &ChassisSpeeds::new(0.0, 0.0, 1.0),
                Translation2d::new(12.0, 12.0),
                &previous,
            )
            .unwrap();
        assert_abs_diff_eq!(states[0].angle.degrees(), 30.0, epsilon = EPSILON);
        assert_abs_diff_eq!(states[1].angle.degrees(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_straight_line_forward_kinematics() {
        let kinematics = square_kinematics();
        let state = SwerveModuleState::new(5.0, Rotation2d::from_degrees(0.0));
        let speeds = kinematics.to_chassis_speeds(&[state; 4]).unwrap();
        assert_abs_diff_eq!(speeds.vx, 5.0, epsilon = EPSILON);
        assert_abs_diff_eq!(speeds.vy, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(speeds.omega, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_turn_in_place_forward_kinematics() {
        let kinematics = square_kinematics();
        let states = [
            SwerveModuleState::new(106.629, Rotation2d::from_degrees(135.0)),
            SwerveModuleState::new(106.629, Rotation2d::from_degrees(45.0)),
            SwerveModuleState::new(106.629, Rotation2d::from_degrees(-135.0)),
            SwerveModuleState::new(106.629, Rotation2d::from_degrees(-45.0)),
        ];
        let speeds = kinematics.to_chassis_speeds(&states).unwrap();
        assert_abs_diff_eq!(speeds.vx, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(speeds.vy, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(speeds.omega, 2.0 * PI, epsilon = 0.001);
    }

    #[test]
    fn test_forward_kinematics_averages_inconsistent_module() {
        let kinematics = square_kinematics();
        let good = SwerveModuleState::new(1.0, Rotation2d::IDENTITY);
        let slipping = SwerveModuleState::new(2.0, Rotation2d::IDENTITY);
        let speeds = kinematics
            .to_chassis_speeds(&[good, good, good, slipping])
            .unwrap();
        assert_abs_diff_eq!(speeds.vx, 1.25, epsilon = EPSILON);
        assert_abs_diff_eq!(speeds.vy, 0.0, epsilon = EPSILON);
        // Extra forward speed on the right side reads as a slight left turn.
        assert!(speeds.omega > 0.0);
    }

    #[test]
    fn test_round_trip_through_module_states() {
        let kinematics = square_kinematics();
        let speeds = ChassisSpeeds::new(1.5, -0.75, 0.3);
        let states = kinematics.to_module_states(&speeds, &at_rest(4)).unwrap();
        let recovered = kinematics.to_chassis_speeds(&states).unwrap();
        assert_abs_diff_eq!(recovered.vx, speeds.vx, epsilon = EPSILON);
        assert_abs_diff_eq!(recovered.vy, speeds.vy, epsilon = EPSILON);
        assert_abs_diff_eq!(recovered.omega, speeds.omega, epsilon = EPSILON);
    }

    #[test]
    fn test_to_twist_between() {
        let kinematics = square_kinematics();
        let start = [SwerveModulePosition::default(); 4];
        let end = [SwerveModulePosition::new(0.5, Rotation2d::from_degrees(90.0)); 4];
        let twist = kinematics.to_twist_between(&start, &end).unwrap();
        assert_abs_diff_eq!(twist.dx, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(twist.dy, 0.5, epsilon = EPSILON);
        assert_abs_diff_eq!(twist.dtheta, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_module_count_mismatch() {
        let kinematics = square_kinematics();
        let mismatch = KinematicsError::ModuleCountMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            kinematics.to_chassis_speeds(&[SwerveModuleState::default(); 3]),
            Err(mismatch.clone())
        );
        assert_eq!(
            kinematics.to_twist(&[SwerveModulePosition::default(); 3]),
            Err(mismatch.clone())
        );
        assert_eq!(
            kinematics.to_module_states(&ChassisSpeeds::default(), &at_rest(3)),
            Err(mismatch.clone())
        );
        assert!(!mismatch.is_configuration());
    }

    #[test]
    fn test_desaturate() {
        let mut states = [
            SwerveModuleState::new(5.0, Rotation2d::IDENTITY),
            SwerveModuleState::new(6.0, Rotation2d::IDENTITY),
            SwerveModuleState::new(4.0, Rotation2d::IDENTITY),
            SwerveModuleState::new(7.0, Rotation2d::IDENTITY),
        ];
        desaturate_wheel_speeds(&mut states, 5.5);
        let factor = 5.5 / 7.0;
        assert_abs_diff_eq!(states[0].speed, 5.0 * factor, epsilon = EPSILON);
        assert_abs_diff_eq!(states[1].speed, 6.0 * factor, epsilon = EPSILON);
        assert_abs_diff_eq!(states[2].speed, 4.0 * factor, epsilon = EPSILON);
        assert_abs_diff_eq!(states[3].speed, 7.0 * factor, epsilon = EPSILON);
    }

    #[test]
    fn test_desaturate_negative_speeds() {
        let mut states = [
            SwerveModuleState::new(1.0, Rotation2d::IDENTITY),
            SwerveModuleState::new(1.0, Rotation2d::IDENTITY),
            SwerveModuleState::new(-2.0, Rotation2d::IDENTITY),
            SwerveModuleState::new(-2.0, Rotation2d::IDENTITY),
        ];
        desaturate_wheel_speeds(&mut states, 1.0);
        assert_abs_diff_eq!(states[0].speed, 0.5, epsilon = EPSILON);
        assert_abs_diff_eq!(states[1].speed, 0.5, epsilon = EPSILON);
        assert_abs_diff_eq!(states[2].speed, -1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(states[3].speed, -1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_desaturate_negative_limit_keeps_direction() {
        let mut states = [SwerveModuleState::new(2.0, Rotation2d::from_degrees(30.0)); 4];
        desaturate_wheel_speeds(&mut states, -1.0);
        for state in &states {
            assert_abs_diff_eq!(state.speed, 1.0, epsilon = EPSILON);
            assert_abs_diff_eq!(state.angle.degrees(), 30.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_desaturate_within_limit_is_unchanged() {
        let original = [SwerveModuleState::new(0.8, Rotation2d::from_degrees(20.0)); 4];
        let mut states = original;
        desaturate_wheel_speeds(&mut states, 1.0);
        assert_eq!(states, original);
    }

    #[test]
    fn test_desaturate_preserves_chassis_direction() {
        let kinematics = square_kinematics();
        let speeds = ChassisSpeeds::new(3.0, 4.0, 0.5);
        let mut states = kinematics.to_module_states(&speeds, &at_rest(4)).unwrap();
        desaturate_wheel_speeds(&mut states, 2.0);
        assert!(states.iter().all(|state| state.speed.abs() <= 2.0 + EPSILON));
        let scaled = kinematics.to_chassis_speeds(&states).unwrap();
        let factor = scaled.vx / speeds.vx;
        assert!(factor < 1.0);
        assert_abs_diff_eq!(scaled.vy, speeds.vy * factor, epsilon = EPSILON);
        assert_abs_diff_eq!(scaled.omega, speeds.omega * factor, epsilon = EPSILON);
    }

    #[test]
    fn test_desaturate_for_chassis() {
        let mut states = [
            SwerveModuleState::new(5.0, Rotation2d::IDENTITY),
            SwerveModuleState::new(6.0, Rotation2d::IDENTITY),
            SwerveModuleState::new(4.0, Rotation2d::IDENTITY),
            SwerveModuleState::new(7.0, Rotation2d::IDENTITY),
        ];
        desaturate_wheel_speeds_for_chassis(
            &mut states,
            &ChassisSpeeds::new(1.0, 1.0, 1.0),
            5.5,
            5.5,
            3.5,
        );
        // k = max(√2 / 5.5, 1 / 3.5) = 0.2857; scale = k · 5.5 / 7.
        let factor = (1.0 / 3.5) * 5.5 / 7.0;
        assert_abs_diff_eq!(states[0].speed, 5.0 * factor, epsilon = EPSILON);
        assert_abs_diff_eq!(states[3].speed, 7.0 * factor, epsilon = EPSILON);
    }

    #[test]
    fn test_desaturate_for_chassis_zero_limits() {
        let original = [SwerveModuleState::new(3.0, Rotation2d::IDENTITY); 4];
        let mut states = original;
        desaturate_wheel_speeds_for_chassis(
            &mut states,
            &ChassisSpeeds::new(1.0, 0.0, 0.0),
            2.0,
            0.0,
            1.0,
        );
        assert_eq!(states, original);
    }
}
