//! Bone state types.
//!
//! A bone is a rigid body participating in a kinematic chain. This module
//! provides its identity handle, its pose and velocity, and its mass
//! properties as read by constraint formulations.

use nalgebra::{Matrix3, Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for a bone in a [`BoneSet`](crate::BoneSet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoneId(pub u64);

impl BoneId {
    /// Create a new bone ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for BoneId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bone({})", self.0)
    }
}

/// Position and orientation of a bone.
///
/// # Example
///
/// ```
/// use ik_types::Pose;
/// use nalgebra::Point3;
///
/// let pose = Pose::from_position(Point3::new(1.0, 2.0, 3.0));
///
/// let local = Point3::new(1.0, 0.0, 0.0);
/// let world = pose.transform_point(&local);
/// assert_eq!(world, Point3::new(2.0, 2.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    /// Position in world coordinates.
    pub position: Point3<f64>,
    /// Orientation as a unit quaternion.
    ///
    /// Assumed to stay normalized; nothing in this crate renormalizes it.
    pub rotation: UnitQuaternion<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// Create an identity pose (origin, no rotation).
    #[must_use]
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a pose from position only (identity rotation).
    #[must_use]
    pub fn from_position(position: Point3<f64>) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a pose from position and rotation.
    #[must_use]
    pub const fn from_position_rotation(
        position: Point3<f64>,
        rotation: UnitQuaternion<f64>,
    ) -> Self {
        Self { position, rotation }
    }

    /// Transform a point from bone-local to world coordinates.
    #[must_use]
    pub fn transform_point(&self, local: &Point3<f64>) -> Point3<f64> {
        self.position + self.rotation * local.coords
    }

    /// Transform a vector from bone-local to world coordinates (rotation only).
    #[must_use]
    pub fn transform_vector(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * local
    }

    /// Transform a point from world to bone-local coordinates.
    #[must_use]
    pub fn inverse_transform_point(&self, world: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation.inverse() * (world - self.position))
    }

    /// Transform a vector from world to bone-local coordinates.
    #[must_use]
    pub fn inverse_transform_vector(&self, world: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.inverse() * world
    }

    /// Check if the pose contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|x| x.is_finite())
            && self.rotation.coords.iter().all(|x| x.is_finite())
    }
}

/// Linear and angular velocity of a bone.
///
/// Read by velocity-level solvers when projecting constraint Jacobians;
/// the positional constraint update itself never touches it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Twist {
    /// Linear velocity in world coordinates (m/s).
    pub linear: Vector3<f64>,
    /// Angular velocity in world coordinates (rad/s).
    pub angular: Vector3<f64>,
}

impl Default for Twist {
    fn default() -> Self {
        Self::zero()
    }
}

impl Twist {
    /// Create a twist with specified linear and angular velocity.
    #[must_use]
    pub const fn new(linear: Vector3<f64>, angular: Vector3<f64>) -> Self {
        Self { linear, angular }
    }

    /// Create a zero twist (at rest).
    #[must_use]
    pub fn zero() -> Self {
        Self {
            linear: Vector3::zeros(),
            angular: Vector3::zeros(),
        }
    }
}

/// A rigid body in a kinematic chain.
///
/// Constraints only ever read bones; the outer solver mutates poses between
/// iterations. Mass properties are stored inverted so that pinned bones are
/// the zero case rather than a division hazard.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bone {
    /// Current pose in world coordinates.
    pub pose: Pose,
    /// Current velocity.
    pub twist: Twist,
    /// Inverse mass (0 for pinned bones).
    pub inverse_mass: f64,
    /// Inverse inertia tensor in world coordinates (zero for pinned bones).
    pub inverse_inertia: Matrix3<f64>,
}

impl Bone {
    /// Create a bone with explicit mass properties.
    #[must_use]
    pub fn new(pose: Pose, inverse_mass: f64, inverse_inertia: Matrix3<f64>) -> Self {
        Self {
            pose,
            twist: Twist::zero(),
            inverse_mass: inverse_mass.max(0.0),
            inverse_inertia,
        }
    }

    /// Create a dynamic bone with unit mass properties.
    #[must_use]
    pub fn from_pose(pose: Pose) -> Self {
        Self::new(pose, 1.0, Matrix3::identity())
    }

    /// Create a pinned bone that the solver never moves.
    #[must_use]
    pub fn fixed(position: Point3<f64>) -> Self {
        Self {
            pose: Pose::from_position(position),
            twist: Twist::zero(),
            inverse_mass: 0.0,
            inverse_inertia: Matrix3::zeros(),
        }
    }

    /// Check whether this bone is pinned (infinite mass).
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.inverse_mass == 0.0
    }
}
