//! Distance-range limit between two bone anchors.

use ik_types::{Bone, BoneId, BoneSet, IkError, Point3, Result, Vector3};

use crate::{JacobianRow, Limit};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Below this separation the push direction is undefined and the limit goes
/// inert for the iteration.
const LENGTH_EPSILON: f64 = 1e-7;

/// Keeps the distance between two bone anchors inside a `[min, max]` band.
///
/// Each anchor is stored in its bone's local frame, fixed at configuration
/// time. Every solver iteration,
/// [`update_jacobians_and_velocity_bias`](Limit::update_jacobians_and_velocity_bias)
/// reclassifies the current separation into one of four states:
///
/// - **above max** - violated; bias restores proportionally to the overshoot,
///   direction pulls the bones together
/// - **below min** - violated; bias restores proportionally to the
///   undershoot, direction flipped to push the bones apart
/// - **in band, nearer the max** - satisfied; small negative lead-in bias
///   toward the max, direction kept
/// - **in band, nearer the min** - satisfied; negative lead-in toward the
///   min, direction flipped
///
/// The flip exists because a limit can only push along its row, never pull.
///
/// No invariant ties `min` to `max`; configuring `min > max` is undefined
/// input and produces a degenerate band split.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceLimit {
    /// First connected bone.
    bone_a: BoneId,
    /// Second connected bone.
    bone_b: BoneId,
    /// Anchor on bone A, in A's local frame.
    local_anchor_a: Point3<f64>,
    /// Anchor on bone B, in B's local frame.
    local_anchor_b: Point3<f64>,
    /// Lower edge of the distance band (>= 0).
    minimum_distance: f64,
    /// Upper edge of the distance band (>= 0).
    maximum_distance: f64,
    /// Gain from positional error to velocity bias.
    error_correction_factor: f64,
    /// Regularization for the outer solver's effective mass.
    softness: f64,
    /// Last computed anchor separation.
    current_distance: f64,
    /// Last computed violation magnitude (>= 0).
    error: f64,
    /// Last computed velocity bias.
    velocity_bias: f64,
    /// Last computed Jacobian row.
    jacobians: JacobianRow,
}

impl DistanceLimit {
    /// Create a distance limit between two bones.
    ///
    /// `world_anchor_a` and `world_anchor_b` are given in world space and
    /// converted to the bones' local frames immediately, using the bones'
    /// current poses. Distances are clamped to be non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`IkError::InvalidBoneId`] if either handle is not in `bones`.
    pub fn new(
        bones: &BoneSet,
        bone_a: BoneId,
        bone_b: BoneId,
        world_anchor_a: Point3<f64>,
        world_anchor_b: Point3<f64>,
        minimum_distance: f64,
        maximum_distance: f64,
    ) -> Result<Self> {
        let mut limit = Self {
            bone_a,
            bone_b,
            local_anchor_a: Point3::origin(),
            local_anchor_b: Point3::origin(),
            minimum_distance: 0.0,
            maximum_distance: 0.0,
            error_correction_factor: 0.2,
            softness: 0.0,
            current_distance: 0.0,
            error: 0.0,
            velocity_bias: 0.0,
            jacobians: JacobianRow::zero(),
        };
        limit.set_anchor_a(bones, world_anchor_a)?;
        limit.set_anchor_b(bones, world_anchor_b)?;
        limit.set_minimum_distance(minimum_distance);
        limit.set_maximum_distance(maximum_distance);
        Ok(limit)
    }

    /// Set the error correction gain (clamped to >= 0).
    #[must_use]
    pub fn with_error_correction_factor(mut self, factor: f64) -> Self {
        self.error_correction_factor = factor.max(0.0);
        self
    }

    /// Set the softness term (clamped to >= 0).
    #[must_use]
    pub fn with_softness(mut self, softness: f64) -> Self {
        self.softness = softness.max(0.0);
        self
    }

    fn bone<'a>(&self, bones: &'a BoneSet, id: BoneId) -> Result<&'a Bone> {
        bones.get(id).ok_or(IkError::InvalidBoneId(id.raw()))
    }

    /// Get the world-space anchor point on bone A.
    ///
    /// Pure function of A's current pose.
    ///
    /// # Errors
    ///
    /// Returns [`IkError::InvalidBoneId`] if the handle is dangling.
    pub fn anchor_a(&self, bones: &BoneSet) -> Result<Point3<f64>> {
        let bone = self.bone(bones, self.bone_a)?;
        Ok(bone.pose.transform_point(&self.local_anchor_a))
    }

    /// Set the anchor point on bone A from a world-space point.
    ///
    /// Meant for configuration time, not for use mid-solve.
    ///
    /// # Errors
    ///
    /// Returns [`IkError::InvalidBoneId`] if the handle is dangling.
    pub fn set_anchor_a(&mut self, bones: &BoneSet, world: Point3<f64>) -> Result<()> {
        let bone = self.bone(bones, self.bone_a)?;
        self.local_anchor_a = bone.pose.inverse_transform_point(&world);
        Ok(())
    }

    /// Get the world-space anchor point on bone B.
    ///
    /// # Errors
    ///
    /// Returns [`IkError::InvalidBoneId`] if the handle is dangling.
    pub fn anchor_b(&self, bones: &BoneSet) -> Result<Point3<f64>> {
        let bone = self.bone(bones, self.bone_b)?;
        Ok(bone.pose.transform_point(&self.local_anchor_b))
    }

    /// Set the anchor point on bone B from a world-space point.
    ///
    /// # Errors
    ///
    /// Returns [`IkError::InvalidBoneId`] if the handle is dangling.
    pub fn set_anchor_b(&mut self, bones: &BoneSet, world: Point3<f64>) -> Result<()> {
        let bone = self.bone(bones, self.bone_b)?;
        self.local_anchor_b = bone.pose.inverse_transform_point(&world);
        Ok(())
    }

    /// Get the anchor on bone A in A's local frame.
    #[must_use]
    pub fn local_anchor_a(&self) -> Point3<f64> {
        self.local_anchor_a
    }

    /// Set the anchor on bone A directly in A's local frame.
    pub fn set_local_anchor_a(&mut self, anchor: Point3<f64>) {
        self.local_anchor_a = anchor;
    }

    /// Get the anchor on bone B in B's local frame.
    #[must_use]
    pub fn local_anchor_b(&self) -> Point3<f64> {
        self.local_anchor_b
    }

    /// Set the anchor on bone B directly in B's local frame.
    pub fn set_local_anchor_b(&mut self, anchor: Point3<f64>) {
        self.local_anchor_b = anchor;
    }

    /// Get the minimum distance the anchors are kept apart.
    #[must_use]
    pub fn minimum_distance(&self) -> f64 {
        self.minimum_distance
    }

    /// Set the minimum distance (clamped to >= 0).
    ///
    /// Not cross-validated against the maximum.
    pub fn set_minimum_distance(&mut self, distance: f64) {
        self.minimum_distance = distance.max(0.0);
    }

    /// Get the maximum distance the anchors may separate.
    #[must_use]
    pub fn maximum_distance(&self) -> f64 {
        self.maximum_distance
    }

    /// Set the maximum distance (clamped to >= 0).
    ///
    /// Not cross-validated against the minimum.
    pub fn set_maximum_distance(&mut self, distance: f64) {
        self.maximum_distance = distance.max(0.0);
    }

    /// Get the anchor separation measured by the last update.
    #[must_use]
    pub fn current_distance(&self) -> f64 {
        self.current_distance
    }
}

impl Limit for DistanceLimit {
    fn bone_a(&self) -> BoneId {
        self.bone_a
    }

    fn bone_b(&self) -> BoneId {
        self.bone_b
    }

    fn error(&self) -> f64 {
        self.error
    }

    fn velocity_bias(&self) -> f64 {
        self.velocity_bias
    }

    fn jacobians(&self) -> &JacobianRow {
        &self.jacobians
    }

    fn error_correction_factor(&self) -> f64 {
        self.error_correction_factor
    }

    fn softness(&self) -> f64 {
        self.softness
    }

    fn update_jacobians_and_velocity_bias(&mut self, bones: &BoneSet) -> Result<()> {
        let a = self.bone(bones, self.bone_a)?;
        let b = self.bone(bones, self.bone_b)?;

        // Anchors and center-to-anchor offsets in world space.
        let offset_a = a.pose.transform_vector(&self.local_anchor_a.coords);
        let offset_b = b.pose.transform_vector(&self.local_anchor_b.coords);
        let anchor_a = a.pose.position + offset_a;
        let anchor_b = b.pose.position + offset_b;

        let separation = anchor_b - anchor_a;
        self.current_distance = separation.norm();

        let linear_a = if self.current_distance > LENGTH_EPSILON {
            let mut direction = separation / self.current_distance;

            if self.current_distance > self.maximum_distance {
                // Past the maximum: restore, pulling the bones together.
                self.error = self.current_distance - self.maximum_distance;
                self.velocity_bias = self.error_correction_factor * self.error;
            } else if self.current_distance < self.minimum_distance {
                // Past the minimum: restore, and flip the row since the
                // limit can only push the bones apart.
                self.error = self.minimum_distance - self.current_distance;
                self.velocity_bias = self.error_correction_factor * self.error;
                direction = -direction;
            } else if self.current_distance - self.minimum_distance
                > (self.maximum_distance - self.minimum_distance) * 0.5
            {
                // In the band, nearer the maximum: negative lead-in bias so
                // the solver starts resisting before the edge is hit.
                self.error = 0.0;
                self.velocity_bias = self.current_distance - self.maximum_distance;
            } else {
                // In the band, nearer the minimum: lead-in toward the min,
                // flipped like the hard minimum case.
                self.error = 0.0;
                self.velocity_bias = self.minimum_distance - self.current_distance;
                direction = -direction;
            }

            direction
        } else {
            // Coincident anchors: the push direction is undefined, so the
            // constraint goes inert for this iteration.
            self.error = 0.0;
            self.velocity_bias = 0.0;
            Vector3::zeros()
        };

        // linear_b = -linear_a, so swap the cross operand order instead of
        // negating a second time.
        let angular_a = offset_a.cross(&linear_a);
        let angular_b = linear_a.cross(&offset_b);

        self.jacobians = JacobianRow {
            linear_a,
            angular_a,
            linear_b: -linear_a,
            angular_b,
        };

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ik_types::{Bone, Pose, UnitQuaternion};

    /// Two unit-mass bones on the X axis, anchors at the bone centers.
    fn pair_at_distance(d: f64) -> (BoneSet, DistanceLimit) {
        let mut bones = BoneSet::new();
        let a = bones.insert(Bone::from_pose(Pose::identity()));
        let b = bones.insert(Bone::from_pose(Pose::from_position(Point3::new(
            d, 0.0, 0.0,
        ))));

        let limit = DistanceLimit::new(
            &bones,
            a,
            b,
            Point3::origin(),
            Point3::new(d, 0.0, 0.0),
            1.0,
            2.0,
        )
        .unwrap()
        .with_error_correction_factor(1.0);

        (bones, limit)
    }

    #[test]
    fn test_minimum_distance_clamped() {
        let (_, mut limit) = pair_at_distance(1.5);

        limit.set_minimum_distance(0.75);
        assert_relative_eq!(limit.minimum_distance(), 0.75, epsilon = 1e-12);

        limit.set_minimum_distance(-3.0);
        assert_relative_eq!(limit.minimum_distance(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_maximum_distance_clamped() {
        let (_, mut limit) = pair_at_distance(1.5);

        limit.set_maximum_distance(4.0);
        assert_relative_eq!(limit.maximum_distance(), 4.0, epsilon = 1e-12);

        limit.set_maximum_distance(-0.1);
        assert_relative_eq!(limit.maximum_distance(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_anchor_round_trip_under_rotated_pose() {
        let mut bones = BoneSet::new();
        let a = bones.insert(Bone::from_pose(Pose::from_position_rotation(
            Point3::new(1.0, -2.0, 0.5),
            UnitQuaternion::from_euler_angles(0.4, -1.1, 2.0),
        )));
        let b = bones.insert(Bone::from_pose(Pose::from_position(Point3::new(
            3.0, 0.0, 0.0,
        ))));

        let mut limit = DistanceLimit::new(
            &bones,
            a,
            b,
            Point3::origin(),
            Point3::new(3.0, 0.0, 0.0),
            0.0,
            1.0,
        )
        .unwrap();

        let world = Point3::new(0.7, -1.3, 2.2);
        limit.set_anchor_a(&bones, world).unwrap();
        let back = limit.anchor_a(&bones).unwrap();

        assert_relative_eq!(back.x, world.x, epsilon = 1e-12);
        assert_relative_eq!(back.y, world.y, epsilon = 1e-12);
        assert_relative_eq!(back.z, world.z, epsilon = 1e-12);
    }

    #[test]
    fn test_above_maximum_pulls_together() {
        // Band [1, 2], separation 2.5: violated by 0.5 on the high side.
        let (bones, mut limit) = pair_at_distance(2.5);
        limit.update_jacobians_and_velocity_bias(&bones).unwrap();

        assert_relative_eq!(limit.error(), 0.5, epsilon = 1e-12);
        assert!(limit.has_error());
        assert_relative_eq!(limit.velocity_bias(), 0.5, epsilon = 1e-12);

        // A's row points from A toward B.
        let row = limit.jacobians();
        assert_relative_eq!(row.linear_a.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(row.linear_b.x, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_below_minimum_pushes_apart() {
        // Band [1, 2], separation 0.6: violated by 0.4 on the low side.
        let (bones, mut limit) = pair_at_distance(0.6);
        limit.update_jacobians_and_velocity_bias(&bones).unwrap();

        assert_relative_eq!(limit.error(), 0.4, epsilon = 1e-12);
        assert!(limit.has_error());

        // Row flipped relative to the high-side case: A is pushed away from B.
        let row = limit.jacobians();
        assert_relative_eq!(row.linear_a.x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(row.linear_b.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_exact_maximum_boundary() {
        // Separation exactly at the maximum is not a violation: it lands in
        // the nearer-the-max soft branch with zero lead-in.
        let (bones, mut limit) = pair_at_distance(2.0);
        limit.update_jacobians_and_velocity_bias(&bones).unwrap();

        assert_relative_eq!(limit.error(), 0.0, epsilon = 1e-12);
        assert!(!limit.has_error());
        assert_relative_eq!(limit.velocity_bias(), 0.0, epsilon = 1e-12);
        // Direction kept (not flipped).
        assert_relative_eq!(limit.jacobians().linear_a.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_soft_zone_near_maximum() {
        // Band [1, 2], separation 1.8: satisfied, nearer the max half.
        let (bones, mut limit) = pair_at_distance(1.8);
        limit.update_jacobians_and_velocity_bias(&bones).unwrap();

        assert_relative_eq!(limit.error(), 0.0, epsilon = 1e-12);
        assert!(!limit.has_error());
        // Negative lead-in toward the max edge.
        assert_relative_eq!(limit.velocity_bias(), -0.2, epsilon = 1e-12);
        assert_relative_eq!(limit.jacobians().linear_a.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_soft_zone_near_minimum() {
        // Band [1, 2], separation 1.2: satisfied, nearer the min half.
        let (bones, mut limit) = pair_at_distance(1.2);
        limit.update_jacobians_and_velocity_bias(&bones).unwrap();

        assert_relative_eq!(limit.error(), 0.0, epsilon = 1e-12);
        // Negative lead-in toward the min edge, row flipped.
        assert_relative_eq!(limit.velocity_bias(), -0.2, epsilon = 1e-12);
        assert_relative_eq!(limit.jacobians().linear_a.x, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_coincident_anchors_go_inert() {
        let (bones, mut limit) = pair_at_distance(0.0);
        limit.update_jacobians_and_velocity_bias(&bones).unwrap();

        assert_eq!(limit.error(), 0.0);
        assert_eq!(limit.velocity_bias(), 0.0);
        assert!(limit.jacobians().is_zero());
        assert!(limit.current_distance().is_finite());
    }

    #[test]
    fn test_angular_row_swapped_cross_order() {
        // Give B an off-center anchor so offset_b is nonzero.
        let mut bones = BoneSet::new();
        let a = bones.insert(Bone::from_pose(Pose::identity()));
        let b = bones.insert(Bone::from_pose(Pose::from_position(Point3::new(
            3.0, 0.0, 0.0,
        ))));

        let mut limit = DistanceLimit::new(
            &bones,
            a,
            b,
            Point3::origin(),
            Point3::new(3.0, 0.5, 0.3),
            1.0,
            2.0,
        )
        .unwrap();
        limit.update_jacobians_and_velocity_bias(&bones).unwrap();

        let row = limit.jacobians();
        let offset_b = Vector3::new(0.0, 0.5, 0.3); // identity rotation on B
        let negated = -offset_b.cross(&row.linear_a);

        // Swapping the cross operand order is the same as negating.
        assert_relative_eq!(row.angular_b.x, negated.x, epsilon = 1e-12);
        assert_relative_eq!(row.angular_b.y, negated.y, epsilon = 1e-12);
        assert_relative_eq!(row.angular_b.z, negated.z, epsilon = 1e-12);
    }

    #[test]
    fn test_update_is_idempotent() {
        let (bones, mut limit) = pair_at_distance(2.5);
        limit.update_jacobians_and_velocity_bias(&bones).unwrap();

        let first_row = *limit.jacobians();
        let first_error = limit.error();
        let first_bias = limit.velocity_bias();

        limit.update_jacobians_and_velocity_bias(&bones).unwrap();

        // Bit-identical outputs when the poses have not changed.
        assert_eq!(*limit.jacobians(), first_row);
        assert_eq!(limit.error(), first_error);
        assert_eq!(limit.velocity_bias(), first_bias);
    }

    #[test]
    fn test_dangling_bone_handle() {
        let (bones, limit) = pair_at_distance(1.5);

        let mut orphan = limit.clone();
        let empty = BoneSet::new();
        assert_eq!(
            orphan.update_jacobians_and_velocity_bias(&empty),
            Err(IkError::InvalidBoneId(limit.bone_a().raw()))
        );

        // The original set still resolves.
        assert!(orphan.update_jacobians_and_velocity_bias(&bones).is_ok());
    }
}
