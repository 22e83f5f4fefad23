//! Error types for the kinematics library.
//!
//! Configuration errors come from building a [`SwerveDriveKinematics`] with
//! unusable module geometry. Argument errors come from calls that pass a
//! module slice of the wrong length. Neither is transient, so nothing in this
//! crate retries.
//!
//! [`SwerveDriveKinematics`]: crate::SwerveDriveKinematics

use core::fmt;

/// Errors that can occur in kinematic calculations.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// Fewer than two module locations were supplied.
    /// The payload is the number of modules that was given.
    TooFewModules(usize),
    /// The module locations do not determine the chassis motion, for example
    /// because all modules sit on the same point.
    SingularGeometry(&'static str),
    /// A module slice did not match the configured number of modules.
    ModuleCountMismatch {
        /// Number of modules the kinematics was built with.
        expected: usize,
        /// Number of entries that were passed.
        actual: usize,
    },
}

impl KinematicsError {
    /// Whether this error is raised when the kinematics is constructed, as
    /// opposed to by a single call.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            KinematicsError::TooFewModules(_) | KinematicsError::SingularGeometry(_)
        )
    }
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::TooFewModules(count) => {
                write!(f, "Too few swerve modules: need at least 2, got {}", count)
            }
            KinematicsError::SingularGeometry(msg) => write!(f, "Singular module geometry: {}", msg),
            KinematicsError::ModuleCountMismatch { expected, actual } => write!(
                f,
                "Module count mismatch: expected {} modules, got {}",
                expected, actual
            ),
        }
    }
}

impl core::error::Error for KinematicsError {}

/// Check that a per-module slice has one entry per configured module.
pub(crate) fn check_module_count(expected: usize, actual: usize) -> Result<(), KinematicsError> {
    if expected == actual {
        Ok(())
    } else {
        Err(KinematicsError::ModuleCountMismatch { expected, actual })
    }
}
