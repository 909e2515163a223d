//! Hierarchical skeletal pose blending
//!
//! This crate combines sampled animation clips into one consistent pose per
//! frame:
//!
//! - [`Transform`]: per-bone translation, rotation and scale with
//!   composition, inversion, interpolation and relative transforms
//! - [`Pose`]: one transform per bone, with lerp, masked override, masked
//!   additive blending and local/global conversion
//! - [`BoneMask`]: per-bone weights for partial-body blends
//! - [`Skeleton`]: hierarchy, bind pose and current pose with layer calls
//! - [`Disc`]: two-axis directional blend over five clips
//! - [`BlendStack`]: fading layers of [`PoseNode`]s
//!
//! # Example
//!
//! ```rust,ignore
//! use skelmix_pose::{BoneInfo, BoneMask, LayerFlags, Skeleton};
//!
//! let mut skeleton = Skeleton::from_bones(bones, bind_pose)?;
//!
//! let mut upper = BoneMask::zeros(skeleton.bone_count());
//! upper.mask_children_of(skeleton.hierarchy(), "Spine", 1.0)?;
//!
//! skeleton.blend_layer(&walk, frame, &run, frame, speed, LayerFlags::USE_LOCAL_POSE);
//! skeleton.override_layer(&aim, 0, 1.0, LayerFlags::USE_LOCAL_POSE, Some(&upper));
//!
//! let matrices = skeleton.skin_matrices();
//! ```

pub mod clip;
pub mod disc;
pub mod error;
pub mod hierarchy;
pub mod mask;
pub mod pose;
pub mod skeleton;
pub mod skinning;
pub mod stack;
pub mod transform;

pub use clip::{Clip, FrameSync};
pub use disc::{Disc, DiscClips, DiscConfig};
pub use error::{PoseError, Result};
pub use hierarchy::{BoneInfo, Hierarchy};
pub use mask::BoneMask;
pub use pose::{BoneSegment, Pose};
pub use skeleton::{LayerFlags, Skeleton};
pub use stack::{
    AdditiveNode, BlendStack, ClipNode, DiscInput, DiscNode, EvalContext, FadeConfig, LayerState,
    PoseNode,
};
pub use transform::Transform;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
