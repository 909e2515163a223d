//! Sampled animation clips
//!
//! A [`Clip`] is a named run of per-frame poses, normally global poses as
//! delivered by an asset loader. Frame lookups wrap in both directions, so
//! a negative frame plays the clip backwards.

use crate::error::{PoseError, Result};
use crate::hierarchy::Hierarchy;
use crate::pose::Pose;

/// Named sequence of per-frame poses
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clip {
    name: String,
    bone_count: usize,
    frames: Vec<Pose>,
}

impl Clip {
    /// Create a clip, rejecting zero frames and frames of the wrong length
    pub fn new(name: impl Into<String>, bone_count: usize, frames: Vec<Pose>) -> Result<Self> {
        let clip = Self {
            name: name.into(),
            bone_count,
            frames,
        };
        clip.validate()?;
        Ok(clip)
    }

    /// Check the invariants [`Clip::new`] enforces
    ///
    /// Deserialized clips skip construction and should be checked here
    /// before use.
    pub fn validate(&self) -> Result<()> {
        if self.frames.is_empty() {
            return Err(PoseError::EmptyClip {
                name: self.name.clone(),
            });
        }

        for (index, frame) in self.frames.iter().enumerate() {
            if frame.len() != self.bone_count {
                return Err(PoseError::BoneCountMismatch {
                    context: format!("clip '{}' frame {index}", self.name),
                    expected: self.bone_count,
                    actual: frame.len(),
                });
            }
        }

        Ok(())
    }

    /// Whether the clip has frames and every frame covers `bone_count` bones
    pub fn is_playable(&self) -> bool {
        !self.frames.is_empty() && self.frames.iter().all(|f| f.len() == self.bone_count)
    }

    /// Clip name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bones per frame
    pub fn bone_count(&self) -> usize {
        self.bone_count
    }

    /// Number of frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frames as global poses
    pub fn frames(&self) -> &[Pose] {
        &self.frames
    }

    /// Wrap `frame` into `0..frame_count`, `None` for a clip without frames
    pub fn wrap_frame(&self, frame: i32) -> Option<usize> {
        let count = i64::try_from(self.frames.len()).ok()?;
        if count == 0 {
            return None;
        }
        usize::try_from(i64::from(frame).rem_euclid(count)).ok()
    }

    /// Pose at `frame`, wrapping past either end
    pub fn frame(&self, frame: i32) -> Option<&Pose> {
        self.wrap_frame(frame).and_then(|index| self.frames.get(index))
    }

    /// Copy of this clip with every frame converted to parent-relative form
    pub fn to_local(&self, hierarchy: &Hierarchy) -> Self {
        Self {
            name: self.name.clone(),
            bone_count: self.bone_count,
            frames: self.frames.iter().map(|f| f.to_local(hierarchy)).collect(),
        }
    }

    /// Copy of this clip limited to its first `frame_count` frames
    pub fn truncated(&self, frame_count: usize) -> Self {
        Self {
            name: self.name.clone(),
            bone_count: self.bone_count,
            frames: self.frames.iter().take(frame_count).cloned().collect(),
        }
    }
}

/// Keeps two clips of different length looping in step while blended
///
/// The blended cycle length is interpolated between both clip lengths by
/// the blend factor, and each cursor advances so that it completes exactly
/// one loop per blended cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameSync {
    frame_a: f32,
    frame_b: f32,
}

impl FrameSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fractional cursor positions
    pub fn positions(&self) -> (f32, f32) {
        (self.frame_a, self.frame_b)
    }

    /// Whole frame indices of both cursors
    pub fn frames(&self) -> (i32, i32) {
        (self.frame_a.floor() as i32, self.frame_b.floor() as i32)
    }

    /// Step both cursors for clips of `len_a` and `len_b` frames blended by
    /// `factor`; clips without frames leave the cursors in place
    pub fn advance(&mut self, len_a: usize, len_b: usize, factor: f32) {
        if len_a == 0 || len_b == 0 {
            return;
        }

        let len_a = len_a as f32;
        let len_b = len_b as f32;
        let blended = len_a + (len_b - len_a) * factor;

        self.frame_a = (self.frame_a + len_a / blended).rem_euclid(len_a);
        self.frame_b = (self.frame_b + len_b / blended).rem_euclid(len_b);
    }

    /// Lerp the current frames of both clips, then advance
    ///
    /// Returns `None` without advancing when either clip has no frames.
    pub fn sample(&mut self, clip_a: &Clip, clip_b: &Clip, factor: f32) -> Option<Pose> {
        let (frame_a, frame_b) = self.frames();
        let pose = clip_a.frame(frame_a)?.lerp(clip_b.frame(frame_b)?, factor);
        self.advance(clip_a.frame_count(), clip_b.frame_count(), factor);
        Some(pose)
    }
}
