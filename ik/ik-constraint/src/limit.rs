//! The limit trait shared by all one-sided constraints.

use ik_types::{BoneId, BoneSet, Result};

use crate::JacobianRow;

/// Violations smaller than this are treated as resolved.
pub const ERROR_EPSILON: f64 = 1e-4;

/// Trait for limits connecting two bones.
///
/// A limit is a one-sided constraint: it produces a corrective direction and
/// bias only when (or before) a bound is crossed, and the outer solver turns
/// those into impulses. All derived state is recomputed by
/// [`update_jacobians_and_velocity_bias`](Limit::update_jacobians_and_velocity_bias)
/// once per solver iteration; the accessors read the last computed values.
///
/// Other limit kinds (angular bands, swing-twist cones) plug in at this
/// seam with the same row-per-DOF shape.
pub trait Limit {
    /// Get the first connected bone.
    fn bone_a(&self) -> BoneId;

    /// Get the second connected bone.
    fn bone_b(&self) -> BoneId;

    /// Get the last computed violation magnitude (>= 0).
    ///
    /// Zero whenever the limit is inside its band; this is a normal output,
    /// not a failure signal.
    fn error(&self) -> f64;

    /// Get the last computed velocity bias.
    ///
    /// Positive when correcting a violation, negative for the soft lead-in
    /// toward the nearer band edge, zero when degenerate.
    fn velocity_bias(&self) -> f64;

    /// Get the last computed Jacobian row.
    fn jacobians(&self) -> &JacobianRow;

    /// Get the gain converting positional error into velocity bias.
    fn error_correction_factor(&self) -> f64;

    /// Get the constraint-force regularization term.
    ///
    /// Added to the diagonal of the effective mass by the outer solver;
    /// zero means a hard constraint.
    fn softness(&self) -> f64;

    /// Recompute the Jacobian row and velocity bias from current bone poses.
    ///
    /// # Errors
    ///
    /// Returns [`IkError::InvalidBoneId`](ik_types::IkError::InvalidBoneId)
    /// if either bone handle is not in `bones`. The geometry itself never
    /// fails: degenerate configurations produce an inert constraint.
    fn update_jacobians_and_velocity_bias(&mut self, bones: &BoneSet) -> Result<()>;

    /// Check whether this limit still needs correction.
    fn has_error(&self) -> bool {
        !(self.error().abs() < ERROR_EPSILON)
    }
}
