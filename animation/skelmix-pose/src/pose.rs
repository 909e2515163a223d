//! Poses and the blending algebra
//!
//! A [`Pose`] holds one [`Transform`] per bone. It does not record whether
//! it is a local pose (parent-relative) or a global pose (model-relative);
//! callers track that, and convert with [`Pose::to_local`] and
//! [`Pose::to_global`].
//!
//! Every operator borrows its inputs and returns a new pose. Inputs are
//! expected to have the same bone count; when they do not, the result only
//! covers the shorter of the two.

use std::ops::{Index, IndexMut};

use glam::{Mat4, Vec3};

use crate::hierarchy::Hierarchy;
use crate::mask::BoneMask;
use crate::transform::Transform;

/// One transform per bone, index-aligned with a [`Hierarchy`]
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Pose {
    transforms: Vec<Transform>,
}

/// Marker and parent line for drawing one bone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneSegment {
    pub bone: usize,
    pub position: Vec3,
    /// `None` for root bones
    pub parent_position: Option<Vec3>,
    pub marker_size: Vec3,
}

/// Mask weight for a bone; a missing mask means every bone is fully
/// weighted, a missing entry keeps the base pose.
fn mask_weight(mask: Option<&BoneMask>, bone: usize) -> f32 {
    mask.map_or(1.0, |m| m.get(bone).unwrap_or(0.0))
}

impl Pose {
    /// Every bone at the identity transform
    pub fn identity(bone_count: usize) -> Self {
        Self {
            transforms: vec![Transform::IDENTITY; bone_count],
        }
    }

    /// Wrap one transform per bone
    pub fn from_transforms(transforms: Vec<Transform>) -> Self {
        Self { transforms }
    }

    /// Number of bones
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Whether the pose has no bones
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Transform of `bone`, if in range
    pub fn get(&self, bone: usize) -> Option<&Transform> {
        self.transforms.get(bone)
    }

    /// All transforms in bone order
    pub fn as_slice(&self) -> &[Transform] {
        &self.transforms
    }

    /// Iterate transforms in bone order
    pub fn iter(&self) -> std::slice::Iter<'_, Transform> {
        self.transforms.iter()
    }

    /// Unwrap into the transform list
    pub fn into_transforms(self) -> Vec<Transform> {
        self.transforms
    }

    /// Per-bone interpolation toward `other`
    pub fn lerp(&self, other: &Self, factor: f32) -> Self {
        self.iter()
            .zip(other.iter())
            .map(|(a, b)| a.lerp(b, factor))
            .collect()
    }

    /// Masked interpolation toward `other`
    ///
    /// Each bone uses `factor * mask[bone]`; without a mask this is a plain
    /// [`Pose::lerp`]. Bones with a zero weight are returned unchanged.
    pub fn override_blend(&self, other: &Self, factor: f32, mask: Option<&BoneMask>) -> Self {
        self.iter()
            .zip(other.iter())
            .enumerate()
            .map(|(bone, (a, b))| a.lerp(b, factor * mask_weight(mask, bone)))
            .collect()
    }

    /// Compose a weighted delta pose onto this one
    ///
    /// `self` is scaled by `weight_base` and `delta` by
    /// `weight_delta * mask[bone]`, then the delta is composed on top. Unlike
    /// interpolation the result can move past either input.
    pub fn additive_blend(
        &self,
        delta: &Self,
        weight_base: f32,
        weight_delta: f32,
        mask: Option<&BoneMask>,
    ) -> Self {
        self.iter()
            .zip(delta.iter())
            .enumerate()
            .map(|(bone, (base, add))| {
                let add = add.scale(weight_delta * mask_weight(mask, bone));
                base.scale(weight_base).compose(&add)
            })
            .collect()
    }

    /// Delta pose of `self` relative to `reference`, for use with
    /// [`Pose::additive_blend`]
    pub fn generate_additive(&self, reference: &Self) -> Self {
        self.iter()
            .zip(reference.iter())
            .map(|(target, reference)| target.relative(reference))
            .collect()
    }

    /// Convert a global pose to parent-relative transforms
    ///
    /// Every parent's global transform is already in `self`, so bones can be
    /// processed in any order. Roots are copied as-is.
    pub fn to_local(&self, hierarchy: &Hierarchy) -> Self {
        self.iter()
            .enumerate()
            .map(|(bone, transform)| match hierarchy.parent(bone) {
                Some(parent) if parent < self.len() => transform.relative(&self.transforms[parent]),
                _ => *transform,
            })
            .collect()
    }

    /// Convert a local pose to model-relative transforms
    ///
    /// Bones are visited in the hierarchy's parents-first order, so each
    /// parent is already global when its children are composed onto it.
    pub fn to_global(&self, hierarchy: &Hierarchy) -> Self {
        let mut global = self.clone();

        for &bone in hierarchy.traversal_order() {
            if bone >= self.len() {
                continue;
            }
            if let Some(parent) = hierarchy.parent(bone)
                && parent < self.len()
            {
                global.transforms[bone] = global.transforms[parent].compose(&self.transforms[bone]);
            }
        }

        global
    }

    /// Per-bone transform carrying `self` (normally the bind pose) onto
    /// `target`
    pub fn delta_to(&self, target: &Self) -> Self {
        self.iter()
            .zip(target.iter())
            .map(|(from, to)| from.delta_to(to))
            .collect()
    }

    /// Weight every bone by `factor`, see [`Transform::scale`]
    pub fn scale(&self, factor: f32) -> Self {
        self.iter().map(|t| t.scale(factor)).collect()
    }

    /// Per-bone inverse
    pub fn invert(&self) -> Self {
        self.iter().map(Transform::invert).collect()
    }

    /// Per-bone composition of `other` inside `self`
    pub fn compose(&self, other: &Self) -> Self {
        self.iter()
            .zip(other.iter())
            .map(|(a, b)| a.compose(b))
            .collect()
    }

    /// One matrix per bone, see [`Transform::to_matrix`]
    pub fn to_matrices(&self) -> Vec<Mat4> {
        self.iter().map(Transform::to_matrix).collect()
    }

    /// Copy bones from `source` wherever the mask weight is non-zero
    pub fn set_masked(&mut self, source: &Self, mask: &BoneMask) {
        for (bone, (dst, src)) in self
            .transforms
            .iter_mut()
            .zip(source.iter())
            .enumerate()
        {
            if mask.get(bone).is_some_and(|w| w != 0.0) {
                *dst = *src;
            }
        }
    }

    /// Drawing data for a global pose: one marker per bone and a line to its
    /// parent, positioned through `model`
    pub fn segments(&self, hierarchy: &Hierarchy, model: Mat4) -> Vec<BoneSegment> {
        self.iter()
            .enumerate()
            .map(|(bone, transform)| BoneSegment {
                bone,
                position: model.transform_point3(transform.translation),
                parent_position: hierarchy
                    .parent(bone)
                    .and_then(|parent| self.get(parent))
                    .map(|parent| model.transform_point3(parent.translation)),
                marker_size: transform.scale * 0.05,
            })
            .collect()
    }

    /// Component-wise comparison of every bone within `epsilon`
    pub fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl FromIterator<Transform> for Pose {
    fn from_iter<I: IntoIterator<Item = Transform>>(iter: I) -> Self {
        Self {
            transforms: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Transform>> for Pose {
    fn from(transforms: Vec<Transform>) -> Self {
        Self { transforms }
    }
}

impl Index<usize> for Pose {
    type Output = Transform;

    fn index(&self, bone: usize) -> &Transform {
        &self.transforms[bone]
    }
}

impl IndexMut<usize> for Pose {
    fn index_mut(&mut self, bone: usize) -> &mut Transform {
        &mut self.transforms[bone]
    }
}

impl<'a> IntoIterator for &'a Pose {
    type Item = &'a Transform;
    type IntoIter = std::slice::Iter<'a, Transform>;

    fn into_iter(self) -> Self::IntoIter {
        self.transforms.iter()
    }
}
