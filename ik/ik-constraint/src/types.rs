//! Jacobian row type for single-DOF constraints.

use ik_types::Twist;
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One Jacobian row of a 1-DOF constraint.
///
/// Maps the velocities of the two connected bones to the rate of change of
/// the constraint's scalar error:
///
/// ```text
/// dC/dt = linear_a . v_a + angular_a . w_a + linear_b . v_b + angular_b . w_b
/// ```
///
/// The row is sized to the constraint's actual degree of freedom. Multi-DOF
/// constraints expose one row per DOF rather than padding a fixed-size
/// matrix with zero rows.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JacobianRow {
    /// Linear Jacobian for bone A.
    pub linear_a: Vector3<f64>,
    /// Angular Jacobian for bone A.
    pub angular_a: Vector3<f64>,
    /// Linear Jacobian for bone B.
    pub linear_b: Vector3<f64>,
    /// Angular Jacobian for bone B.
    pub angular_b: Vector3<f64>,
}

impl Default for JacobianRow {
    fn default() -> Self {
        Self::zero()
    }
}

impl JacobianRow {
    /// A zero row (inert constraint).
    #[must_use]
    pub fn zero() -> Self {
        Self {
            linear_a: Vector3::zeros(),
            angular_a: Vector3::zeros(),
            linear_b: Vector3::zeros(),
            angular_b: Vector3::zeros(),
        }
    }

    /// Project the bone velocities through this row.
    ///
    /// This is the `J * v` term the outer solver compares against the
    /// velocity bias when computing a corrective impulse.
    #[must_use]
    pub fn relative_velocity(&self, twist_a: &Twist, twist_b: &Twist) -> f64 {
        self.linear_a.dot(&twist_a.linear)
            + self.angular_a.dot(&twist_a.angular)
            + self.linear_b.dot(&twist_b.linear)
            + self.angular_b.dot(&twist_b.angular)
    }

    /// Check if every entry of the row is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.linear_a == Vector3::zeros()
            && self.angular_a == Vector3::zeros()
            && self.linear_b == Vector3::zeros()
            && self.angular_b == Vector3::zeros()
    }
}
