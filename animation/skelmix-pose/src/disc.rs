//! Two-axis directional blend over five clips
//!
//! A [`Disc`] maps an up/down and left/right input onto idle, forward,
//! backward and sideways clips, the usual setup for omnidirectional
//! locomotion. A second disc can be superimposed (walk under run, for
//! instance) and blended in by a caller-supplied factor.
//!
//! Direction reversals on the up/down axis drop the lag factor to a small
//! value which then recovers by a fixed step per call. Callers use it to
//! ease the skeleton toward the disc output, see
//! [`Skeleton::blend_toward`](crate::Skeleton::blend_toward).

use std::sync::Arc;

use crate::clip::Clip;
use crate::error::{PoseError, Result};
use crate::pose::Pose;

/// The five clips a disc blends between
#[derive(Debug, Clone)]
pub struct DiscClips {
    pub idle: Arc<Clip>,
    pub up: Arc<Clip>,
    pub down: Arc<Clip>,
    pub left: Arc<Clip>,
    pub right: Arc<Clip>,
}

impl DiscClips {
    fn iter(&self) -> impl Iterator<Item = &Arc<Clip>> {
        [&self.idle, &self.up, &self.down, &self.left, &self.right].into_iter()
    }
}

/// Tunables for a disc
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiscConfig {
    /// Swap left/right and play them backwards while moving down
    ///
    /// Suits clip sets whose sideways clips were authored facing forward.
    pub invert_lr_on_down: bool,
    /// Lag factor after an up/down reversal
    pub lag_reset: f32,
    /// Lag factor recovery per call
    pub lag_step: f32,
}

impl Default for DiscConfig {
    fn default() -> Self {
        Self {
            invert_lr_on_down: true,
            lag_reset: 0.02,
            lag_step: 0.01,
        }
    }
}

fn sign(value: f32) -> f32 {
    if value < 0.0 { -1.0 } else { 1.0 }
}

/// Directional blend node with an optional nested disc
#[derive(Debug, Clone)]
pub struct Disc {
    clips: DiscClips,
    config: DiscConfig,
    bone_count: usize,
    frame: i32,
    previous_up_down: f32,
    lag_factor: f32,
    superimposed: Option<Box<Disc>>,
}

impl Disc {
    /// Create a disc; every clip must be playable and share one bone count
    pub fn new(clips: DiscClips, config: DiscConfig) -> Result<Self> {
        let bone_count = clips.idle.bone_count();
        for clip in clips.iter() {
            clip.validate()?;
            if clip.bone_count() != bone_count {
                return Err(PoseError::BoneCountMismatch {
                    context: format!("disc clip '{}'", clip.name()),
                    expected: bone_count,
                    actual: clip.bone_count(),
                });
            }
        }

        Ok(Self {
            clips,
            config,
            bone_count,
            frame: 0,
            previous_up_down: 0.0,
            lag_factor: 1.0,
            superimposed: None,
        })
    }

    /// Nest `disc` under this one
    pub fn with_superimposed(mut self, disc: Self) -> Result<Self> {
        self.set_superimposed(Some(disc))?;
        Ok(self)
    }

    /// Replace the nested disc; it must drive the same number of bones
    pub fn set_superimposed(&mut self, disc: Option<Self>) -> Result<()> {
        if let Some(disc) = &disc
            && disc.bone_count != self.bone_count
        {
            return Err(PoseError::BoneCountMismatch {
                context: "superimposed disc".to_string(),
                expected: self.bone_count,
                actual: disc.bone_count,
            });
        }
        self.superimposed = disc.map(Box::new);
        Ok(())
    }

    pub fn superimposed(&self) -> Option<&Self> {
        self.superimposed.as_deref()
    }

    pub fn superimposed_mut(&mut self) -> Option<&mut Self> {
        self.superimposed.as_deref_mut()
    }

    pub fn clips(&self) -> &DiscClips {
        &self.clips
    }

    pub fn config(&self) -> &DiscConfig {
        &self.config
    }

    pub fn bone_count(&self) -> usize {
        self.bone_count
    }

    /// Frame the next call will sample
    pub fn frame(&self) -> i32 {
        self.frame
    }

    pub fn lag_factor(&self) -> f32 {
        self.lag_factor
    }

    pub fn set_lag_factor(&mut self, lag_factor: f32) {
        self.lag_factor = lag_factor;
    }

    fn update_lag(&mut self, up_down: f32) {
        if sign(up_down) == sign(self.previous_up_down) {
            self.lag_factor = (self.lag_factor + self.config.lag_step).min(1.0);
        } else {
            log::debug!("Disc direction reversed, lag factor reset");
            self.lag_factor = self.config.lag_reset;
        }
        self.previous_up_down = up_down;
    }

    /// Evaluate the disc for one frame and advance its frame counter
    ///
    /// `up_down` and `left_right` are expected in `-1..=1`. When a nested
    /// disc exists and `superimpose` is non-zero, it is evaluated with the
    /// same input and blended in by `superimpose`. Returns `None` if a clip
    /// cannot be sampled.
    pub fn get_pose(&mut self, up_down: f32, left_right: f32, superimpose: f32) -> Option<Pose> {
        let frame = self.frame;
        self.frame = self
            .clips
            .up
            .wrap_frame(frame.wrapping_add(1))
            .and_then(|f| i32::try_from(f).ok())
            .unwrap_or(0);

        let reversing = self.config.invert_lr_on_down && up_down < 0.0;
        let side_frame = if reversing { -frame } else { frame };
        let (right, left) = if reversing {
            (&self.clips.left, &self.clips.right)
        } else {
            (&self.clips.right, &self.clips.left)
        };

        let vertical = if up_down >= 0.0 {
            &self.clips.up
        } else {
            &self.clips.down
        };
        let horizontal = if left_right >= 0.0 { right } else { left };

        let ud = up_down.abs();
        let lr = left_right.abs();
        let side_weight = lr.clamp(0.0, 1.0) / (lr.clamp(0.0001, 1.0) + ud.clamp(0.0001, 1.0));

        let base = vertical
            .frame(frame)?
            .lerp(horizontal.frame(side_frame)?, side_weight);
        let idle = self.clips.idle.frame(frame)?.clone();

        self.update_lag(up_down);

        let motion = match self.superimposed.as_deref_mut() {
            Some(nested) if superimpose != 0.0 => match nested.get_pose(up_down, left_right, superimpose) {
                Some(pose) => base.lerp(&pose, superimpose),
                None => base,
            },
            _ => base,
        };

        Some(idle.lerp(&motion, ud.hypot(lr)))
    }
}
