//! Layered blend stacks
//!
//! A [`BlendStack`] runs a list of [`PoseNode`]s bottom to top. Each node
//! sees the pose produced so far and returns a new one, which is blended
//! over the running pose by the layer's weight. Layers fade in when
//! pushed, and fade out and drop off the stack once told to exit.

use std::sync::Arc;

use crate::clip::Clip;
use crate::disc::Disc;
use crate::hierarchy::Hierarchy;
use crate::mask::BoneMask;
use crate::pose::Pose;
use crate::skeleton::LayerFlags;

/// Shared inputs for one evaluation pass
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub hierarchy: &'a Hierarchy,
    pub flags: LayerFlags,
}

impl<'a> EvalContext<'a> {
    pub fn new(hierarchy: &'a Hierarchy, flags: LayerFlags) -> Self {
        Self { hierarchy, flags }
    }

    fn local(&self) -> bool {
        self.flags.contains(LayerFlags::USE_LOCAL_POSE)
    }

    /// Interpolate in the space selected by the flags; `from` and `to` are
    /// global poses
    pub fn lerp(&self, from: &Pose, to: &Pose, factor: f32) -> Pose {
        if self.local() {
            let h = self.hierarchy;
            from.to_local(h).lerp(&to.to_local(h), factor).to_global(h)
        } else {
            from.lerp(to, factor)
        }
    }
}

/// Something that produces a pose from the pose beneath it
pub trait PoseNode {
    fn evaluate(&mut self, ctx: &EvalContext<'_>, previous: &Pose) -> Pose;
}

/// Plays a clip one frame per evaluation
#[derive(Debug, Clone)]
pub struct ClipNode {
    clip: Arc<Clip>,
    frame: i32,
}

impl ClipNode {
    pub fn new(clip: Arc<Clip>) -> Self {
        Self { clip, frame: 0 }
    }

    /// Start playback at `frame`
    pub fn starting_at(mut self, frame: i32) -> Self {
        self.frame = frame;
        self
    }

    pub fn frame(&self) -> i32 {
        self.frame
    }
}

impl PoseNode for ClipNode {
    fn evaluate(&mut self, _ctx: &EvalContext<'_>, previous: &Pose) -> Pose {
        let pose = match self.clip.frame(self.frame) {
            Some(pose) if pose.len() == previous.len() => pose.clone(),
            _ => {
                log::debug!("Clip node '{}' has no usable frame", self.clip.name());
                return previous.clone();
            }
        };

        self.frame = self
            .clip
            .wrap_frame(self.frame.wrapping_add(1))
            .and_then(|f| i32::try_from(f).ok())
            .unwrap_or(0);
        pose
    }
}

/// Input for a [`DiscNode`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiscInput {
    pub up_down: f32,
    pub left_right: f32,
    pub superimpose: f32,
}

/// Drives a [`Disc`], easing its output in by the disc's lag factor
#[derive(Debug, Clone)]
pub struct DiscNode {
    disc: Disc,
    input: DiscInput,
    last: Option<Pose>,
}

impl DiscNode {
    pub fn new(disc: Disc) -> Self {
        Self {
            disc,
            input: DiscInput::default(),
            last: None,
        }
    }

    pub fn set_input(&mut self, input: DiscInput) {
        self.input = input;
    }

    pub fn input(&self) -> DiscInput {
        self.input
    }

    pub fn disc(&self) -> &Disc {
        &self.disc
    }

    pub fn disc_mut(&mut self) -> &mut Disc {
        &mut self.disc
    }
}

impl PoseNode for DiscNode {
    fn evaluate(&mut self, ctx: &EvalContext<'_>, previous: &Pose) -> Pose {
        let input = self.input;
        let Some(pose) = self
            .disc
            .get_pose(input.up_down, input.left_right, input.superimpose)
            .filter(|pose| pose.len() == previous.len())
        else {
            return self.last.clone().unwrap_or_else(|| previous.clone());
        };

        let smoothed = match &self.last {
            Some(last) => ctx.lerp(last, &pose, self.disc.lag_factor()),
            None => pose,
        };
        self.last = Some(smoothed.clone());
        smoothed
    }
}

/// Adds the difference between a clip and a reference pose
#[derive(Debug, Clone)]
pub struct AdditiveNode {
    clip: Arc<Clip>,
    reference: Pose,
    frame: i32,
    factor: f32,
    mask: Option<BoneMask>,
}

impl AdditiveNode {
    pub fn new(clip: Arc<Clip>, reference: Pose, factor: f32) -> Self {
        Self {
            clip,
            reference,
            frame: 0,
            factor,
            mask: None,
        }
    }

    pub fn with_mask(mut self, mask: BoneMask) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn set_frame(&mut self, frame: i32) {
        self.frame = frame;
    }

    pub fn set_factor(&mut self, factor: f32) {
        self.factor = factor;
    }
}

impl PoseNode for AdditiveNode {
    fn evaluate(&mut self, ctx: &EvalContext<'_>, previous: &Pose) -> Pose {
        let Some(target) = self
            .clip
            .frame(self.frame)
            .filter(|pose| pose.len() == previous.len() && self.reference.len() == previous.len())
        else {
            return previous.clone();
        };
        if self.factor == 0.0 {
            return previous.clone();
        }

        let mask = self.mask.as_ref();
        if ctx.local() {
            let h = ctx.hierarchy;
            let delta = target
                .to_local(h)
                .generate_additive(&self.reference.to_local(h));
            previous
                .to_local(h)
                .additive_blend(&delta, 1.0, self.factor, mask)
                .to_global(h)
        } else {
            let delta = target.generate_additive(&self.reference);
            previous.additive_blend(&delta, 1.0, self.factor, mask)
        }
    }
}

/// Lifecycle of a stack layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerState {
    /// Weight is rising toward one
    Entering,
    /// Fully weighted
    Running,
    /// Weight is falling; the layer is removed at zero
    Exiting,
}

/// Weight change per [`BlendStack::advance`]
///
/// A non-positive rate switches instantly.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FadeConfig {
    pub fade_in_rate: f32,
    pub fade_out_rate: f32,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            fade_in_rate: 0.1,
            fade_out_rate: 0.1,
        }
    }
}

impl FadeConfig {
    /// Switch layers on and off without fading
    pub const INSTANT: Self = Self {
        fade_in_rate: 0.0,
        fade_out_rate: 0.0,
    };
}

struct Layer {
    node: Box<dyn PoseNode>,
    state: LayerState,
    weight: f32,
    fade: FadeConfig,
}

/// Ordered layers evaluated over a base pose
#[derive(Default)]
pub struct BlendStack {
    layers: Vec<Layer>,
}

impl BlendStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Add a layer on top; it enters at weight zero unless the fade-in is
    /// instant. Returns its index.
    pub fn push(&mut self, node: Box<dyn PoseNode>, fade: FadeConfig) -> usize {
        let (state, weight) = if fade.fade_in_rate > 0.0 {
            (LayerState::Entering, 0.0)
        } else {
            (LayerState::Running, 1.0)
        };

        self.layers.push(Layer {
            node,
            state,
            weight,
            fade,
        });
        self.layers.len() - 1
    }

    /// Start fading out the layer at `index`
    ///
    /// Returns false if there is no such layer.
    pub fn exit(&mut self, index: usize) -> bool {
        match self.layers.get_mut(index) {
            Some(layer) => {
                layer.state = LayerState::Exiting;
                true
            }
            None => false,
        }
    }

    pub fn layer_state(&self, index: usize) -> Option<LayerState> {
        self.layers.get(index).map(|layer| layer.state)
    }

    pub fn layer_weight(&self, index: usize) -> Option<f32> {
        self.layers.get(index).map(|layer| layer.weight)
    }

    /// Step every fade and drop layers that have finished exiting
    pub fn advance(&mut self) {
        for layer in &mut self.layers {
            match layer.state {
                LayerState::Entering => {
                    layer.weight = if layer.fade.fade_in_rate > 0.0 {
                        (layer.weight + layer.fade.fade_in_rate).min(1.0)
                    } else {
                        1.0
                    };
                    if layer.weight >= 1.0 {
                        layer.state = LayerState::Running;
                    }
                }
                LayerState::Running => {}
                LayerState::Exiting => {
                    layer.weight = if layer.fade.fade_out_rate > 0.0 {
                        (layer.weight - layer.fade.fade_out_rate).max(0.0)
                    } else {
                        0.0
                    };
                }
            }
        }

        let before = self.layers.len();
        self.layers
            .retain(|layer| !(layer.state == LayerState::Exiting && layer.weight <= 0.0));
        if self.layers.len() != before {
            log::trace!("Removed {} finished layers", before - self.layers.len());
        }
    }

    /// Run every layer over `base`, bottom to top
    pub fn evaluate(&mut self, ctx: &EvalContext<'_>, base: &Pose) -> Pose {
        let mut pose = base.clone();
        for layer in &mut self.layers {
            let next = layer.node.evaluate(ctx, &pose);
            pose = ctx.lerp(&pose, &next, layer.weight);
        }
        pose
    }
}
