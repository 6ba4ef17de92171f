//! Core types for inverse kinematics constraint solving.
//!
//! This crate provides the foundational types shared by the constraint layer
//! and any outer solver:
//!
//! - [`Bone`] - Pose, velocity, and mass properties of a rigid body in a chain
//! - [`BoneSet`] - Arena that owns bones and hands out [`BoneId`] handles
//! - [`Pose`] - Position and orientation with frame transforms
//! - [`Twist`] - Linear and angular velocity
//!
//! # Design Philosophy
//!
//! These types are **pure data** plus frame transforms. They have no solver
//! behavior, no integration. They're the common language between:
//!
//! - Constraint formulations (distance limits, angular limits, ...)
//! - Sequential-correction solvers that integrate bone poses
//! - Posing and retargeting tools that read solved chains
//!
//! # Ownership Model
//!
//! Bones are shared between many constraints without any constraint owning
//! them. The [`BoneSet`] arena is the single lifetime authority; constraints
//! hold lightweight [`BoneId`] handles and resolve them at update time. A
//! dangling handle surfaces as [`IkError::InvalidBoneId`] instead of a
//! dangling pointer.
//!
//! # Example
//!
//! ```
//! use ik_types::{Bone, BoneSet, Pose};
//! use nalgebra::Point3;
//!
//! let mut bones = BoneSet::new();
//! let root = bones.insert(Bone::fixed(Point3::origin()));
//! let tip = bones.insert(Bone::from_pose(Pose::from_position(Point3::new(0.0, 0.0, 1.0))));
//!
//! assert!(bones.get(root).is_some_and(Bone::is_pinned));
//! assert!(!bones.get(tip).expect("live handle").is_pinned());
//! ```

#![doc(html_root_url = "https://docs.rs/ik-types/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn, // Many methods can't be const due to nalgebra
)]

mod arena;
mod bone;
mod error;

pub use arena::BoneSet;
pub use bone::{Bone, BoneId, Pose, Twist};
pub use error::IkError;

// Re-export math types for convenience
pub use nalgebra::{Matrix3, Point3, UnitQuaternion, Vector3};

/// Result type for IK operations.
pub type Result<T> = std::result::Result<T, IkError>;
