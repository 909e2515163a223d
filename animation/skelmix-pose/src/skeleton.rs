//! Skeleton state and layer application
//!
//! A [`Skeleton`] owns its hierarchy, bind pose and current global pose.
//! Layer calls replace the current pose; with
//! [`LayerFlags::USE_LOCAL_POSE`] the inputs are converted to local space,
//! blended there and accumulated back to global space once at the end.
//! Without the flag the blend happens directly on global transforms.
//!
//! Layers that touch a clip without frames, or with a bone count other than
//! the skeleton's, are skipped and leave the current pose untouched.

use bitflags::bitflags;
use glam::Mat4;

use crate::clip::Clip;
use crate::error::Result;
use crate::hierarchy::{BoneInfo, Hierarchy};
use crate::mask::BoneMask;
use crate::pose::{BoneSegment, Pose};

bitflags! {
    /// Options for layer application
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct LayerFlags: u32 {
        /// Blend in parent-relative space and convert back to global
        const USE_LOCAL_POSE = 0x1;
    }
}

/// Bone hierarchy with a bind pose and a current pose
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    hierarchy: Hierarchy,
    bind_pose: Pose,
    pose: Pose,
}

impl Skeleton {
    /// Create a skeleton whose current pose starts at the bind pose
    pub fn new(hierarchy: Hierarchy, bind_pose: Pose) -> Result<Self> {
        hierarchy.check_len("bind pose", bind_pose.len())?;

        Ok(Self {
            hierarchy,
            pose: bind_pose.clone(),
            bind_pose,
        })
    }

    /// Validate `bones` and create a skeleton from them
    pub fn from_bones(bones: Vec<BoneInfo>, bind_pose: Pose) -> Result<Self> {
        Self::new(Hierarchy::new(bones)?, bind_pose)
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn bind_pose(&self) -> &Pose {
        &self.bind_pose
    }

    /// Current global pose
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn bone_count(&self) -> usize {
        self.hierarchy.len()
    }

    /// Return the current pose to the bind pose
    pub fn reset(&mut self) {
        self.pose.clone_from(&self.bind_pose);
    }

    /// Replace the current pose
    pub fn set_pose(&mut self, pose: &Pose) -> Result<()> {
        self.hierarchy.check_len("pose", pose.len())?;
        self.pose.clone_from(pose);
        Ok(())
    }

    /// Replace only the bones whose mask weight is non-zero
    pub fn set_pose_masked(&mut self, pose: &Pose, mask: &BoneMask) -> Result<()> {
        self.hierarchy.check_len("pose", pose.len())?;
        self.hierarchy.check_len("bone mask", mask.len())?;
        self.pose.set_masked(pose, mask);
        Ok(())
    }

    /// Frame of `clip`, or `None` when the clip cannot drive this skeleton
    fn sample<'a>(&self, clip: &'a Clip, frame: i32) -> Option<&'a Pose> {
        if clip.bone_count() != self.bone_count() {
            log::debug!(
                "Skipping clip '{}': {} bones, skeleton has {}",
                clip.name(),
                clip.bone_count(),
                self.bone_count()
            );
            return None;
        }

        let pose = clip
            .frame(frame)
            .filter(|pose| pose.len() == self.bone_count());
        if pose.is_none() {
            log::debug!("Skipping clip '{}': no usable frame", clip.name());
        }
        pose
    }

    /// Set the current pose to a clip frame, wrapping the frame index
    pub fn apply_clip(&mut self, clip: &Clip, frame: i32) {
        if let Some(pose) = self.sample(clip, frame) {
            log::trace!("Applying '{}' frame {frame}", clip.name());
            self.pose.clone_from(pose);
        }
    }

    /// Set the current pose to the interpolation of two clip frames
    pub fn blend_layer(
        &mut self,
        clip_a: &Clip,
        frame_a: i32,
        clip_b: &Clip,
        frame_b: i32,
        factor: f32,
        flags: LayerFlags,
    ) {
        let (Some(a), Some(b)) = (self.sample(clip_a, frame_a), self.sample(clip_b, frame_b))
        else {
            return;
        };

        self.pose = if flags.contains(LayerFlags::USE_LOCAL_POSE) {
            let h = &self.hierarchy;
            a.to_local(h).lerp(&b.to_local(h), factor).to_global(h)
        } else {
            a.lerp(b, factor)
        };
    }

    /// Override-blend a clip frame over the current pose
    ///
    /// Does nothing when `factor` is zero.
    pub fn override_layer(
        &mut self,
        clip: &Clip,
        frame: i32,
        factor: f32,
        flags: LayerFlags,
        mask: Option<&BoneMask>,
    ) {
        if factor == 0.0 {
            return;
        }
        let Some(target) = self.sample(clip, frame) else {
            return;
        };

        self.pose = if flags.contains(LayerFlags::USE_LOCAL_POSE) {
            let h = &self.hierarchy;
            self.pose
                .to_local(h)
                .override_blend(&target.to_local(h), factor, mask)
                .to_global(h)
        } else {
            self.pose.override_blend(target, factor, mask)
        };
    }

    /// Add the difference between a clip frame and `reference` onto the
    /// current pose
    ///
    /// `reference` is in the same (global) space as the clip frames. Does
    /// nothing when `factor` is zero or `reference` has the wrong length.
    pub fn additive_layer(
        &mut self,
        clip: &Clip,
        frame: i32,
        reference: &Pose,
        factor: f32,
        flags: LayerFlags,
        mask: Option<&BoneMask>,
    ) {
        if factor == 0.0 {
            return;
        }
        if reference.len() != self.bone_count() {
            log::debug!(
                "Skipping additive '{}': reference has {} bones",
                clip.name(),
                reference.len()
            );
            return;
        }
        let Some(target) = self.sample(clip, frame) else {
            return;
        };

        self.pose = if flags.contains(LayerFlags::USE_LOCAL_POSE) {
            let h = &self.hierarchy;
            let delta = target.to_local(h).generate_additive(&reference.to_local(h));
            self.pose
                .to_local(h)
                .additive_blend(&delta, 1.0, factor, mask)
                .to_global(h)
        } else {
            let delta = target.generate_additive(reference);
            self.pose.additive_blend(&delta, 1.0, factor, mask)
        };
    }

    /// Move the current pose toward `target` by `factor`
    ///
    /// Used to smooth in a freshly evaluated pose, e.g. with a disc's lag
    /// factor. Poses of the wrong length are ignored.
    pub fn blend_toward(&mut self, target: &Pose, factor: f32, flags: LayerFlags) {
        if target.len() != self.bone_count() {
            log::debug!("Skipping blend toward pose with {} bones", target.len());
            return;
        }

        self.pose = if flags.contains(LayerFlags::USE_LOCAL_POSE) {
            let h = &self.hierarchy;
            self.pose
                .to_local(h)
                .lerp(&target.to_local(h), factor)
                .to_global(h)
        } else {
            self.pose.lerp(target, factor)
        };
    }

    /// Skin matrices carrying the bind pose onto the current pose
    pub fn skin_matrices(&self) -> Vec<Mat4> {
        crate::skinning::skin_matrices(&self.bind_pose, &self.pose)
    }

    /// Drawing data for the current pose
    pub fn segments(&self, model: Mat4) -> Vec<BoneSegment> {
        self.pose.segments(&self.hierarchy, model)
    }
}
