//! Distance-range limit constraints for iterative inverse kinematics solvers.
//!
//! This crate turns a one-sided distance band between two bones into the
//! linear algebra an impulse-based solver consumes: a direction Jacobian
//! row and a scalar velocity bias.
//!
//! # Constraint Formulation
//!
//! A [`DistanceLimit`] keeps the separation `d` between two bone anchors
//! inside a band `[min, max]`:
//!
//! ```text
//! C(q):  min <= |anchor_b - anchor_a| <= max
//! ```
//!
//! Outside the band the limit acts as a hard one-sided stop with a
//! restorative bias proportional to the penetration depth. Inside the band
//! it still produces a small negative lead-in bias toward the nearer edge,
//! which keeps the limit cooperative when many constraints are solved
//! sequentially. The limit can only push along its direction, never pull,
//! so the Jacobian sign flips between the two sides of the band.
//!
//! # Solver Contract
//!
//! The outer loop calls [`Limit::update_jacobians_and_velocity_bias`] once
//! per constraint per iteration, then reads [`Limit::jacobians`] and
//! [`Limit::velocity_bias`] to accumulate a corrective impulse.
//! [`Limit::has_error`] lets it skip constraints that are already satisfied.
//! The update is a pure function of the constraint's configuration and the
//! current bone poses; no state survives a call except the last computed
//! outputs.
//!
//! The outer loop is responsible for serializing access to bones shared
//! between constraints; nothing here synchronizes.
//!
//! # Example
//!
//! ```
//! use ik_constraint::{DistanceLimit, Limit};
//! use ik_types::{Bone, BoneSet, Pose};
//! use nalgebra::Point3;
//!
//! let mut bones = BoneSet::new();
//! let a = bones.insert(Bone::fixed(Point3::origin()));
//! let b = bones.insert(Bone::from_pose(Pose::from_position(Point3::new(3.0, 0.0, 0.0))));
//!
//! // Keep the two bone centers between 1 and 2 units apart.
//! let mut limit = DistanceLimit::new(
//!     &bones,
//!     a,
//!     b,
//!     Point3::origin(),
//!     Point3::new(3.0, 0.0, 0.0),
//!     1.0,
//!     2.0,
//! )?;
//!
//! limit.update_jacobians_and_velocity_bias(&bones)?;
//!
//! // One unit past the maximum: the limit reports the violation and a
//! // direction that pulls the bones back together.
//! assert!(limit.has_error());
//! assert!((limit.error() - 1.0).abs() < 1e-12);
//! # Ok::<(), ik_types::IkError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/ik-constraint/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn, // Many methods can't be const due to nalgebra
)]

mod distance_limit;
mod limit;
mod types;

pub use distance_limit::DistanceLimit;
pub use limit::{Limit, ERROR_EPSILON};
pub use types::JacobianRow;

// Re-export types needed to drive the constraints
pub use ik_types::{Bone, BoneId, BoneSet, IkError, Pose, Result, Twist};
