//! Rigid bone transforms
//!
//! A [`Transform`] is the per-bone unit every pose is built from: a
//! translation, a unit rotation and a per-axis scale. Whether it is
//! relative to the parent bone or to the model root depends on the pose
//! it lives in; the value itself does not know.
//!
//! All operators return new values. Translations are never multiplied by
//! scale in [`Transform::compose`], [`Transform::relative`] or
//! [`Transform::invert`], so the three stay exact inverses of each other.

use glam::{Mat4, Quat, Vec3};

/// Translation, rotation and scale of a single bone
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No translation, no rotation, unit scale
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a new transform
    pub const fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Pure translation
    pub const fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Pure rotation
    pub const fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Pure scale
    pub const fn from_scale(scale: Vec3) -> Self {
        Self {
            scale,
            ..Self::IDENTITY
        }
    }

    /// Weight this transform's contribution by `factor`
    ///
    /// Translation is scaled linearly and rotation is slerped from identity,
    /// so `factor == 0` is the identity and `factor == 1` is `self`. Scale is
    /// weighted geometrically (`scale^factor`) so a zero weight leaves unit
    /// scale instead of collapsing the bone. The power is taken on the
    /// magnitude and keeps the sign, so mirrored axes stay finite.
    pub fn scale(&self, factor: f32) -> Self {
        if factor == 0.0 {
            return Self::IDENTITY;
        }
        if factor == 1.0 {
            return *self;
        }

        Self {
            translation: self.translation * factor,
            rotation: Quat::IDENTITY.slerp(self.rotation, factor),
            scale: self.scale.signum() * self.scale.abs().powf(factor),
        }
    }

    /// Interpolate toward `other`
    ///
    /// Linear on translation and scale, spherical on rotation. Factors
    /// outside `0..=1` extrapolate. The endpoints return the inputs exactly.
    pub fn lerp(&self, other: &Self, factor: f32) -> Self {
        if factor == 0.0 {
            return *self;
        }
        if factor == 1.0 {
            return *other;
        }

        Self {
            translation: self.translation.lerp(other.translation, factor),
            rotation: self.rotation.slerp(other.rotation, factor),
            scale: self.scale.lerp(other.scale, factor),
        }
    }

    /// Apply `child` inside this transform's frame
    ///
    /// Rotations multiply, the child's translation is rotated into this frame
    /// and then added, scales multiply.
    pub fn compose(&self, child: &Self) -> Self {
        Self {
            translation: self.translation + self.rotation * child.translation,
            rotation: self.rotation * child.rotation,
            scale: self.scale * child.scale,
        }
    }

    /// Inverse transform, so that `t.compose(&t.invert())` is the identity
    ///
    /// Zero scale components produce non-finite results.
    pub fn invert(&self) -> Self {
        let rotation = self.rotation.inverse();

        Self {
            translation: rotation * -self.translation,
            rotation,
            scale: self.scale.recip(),
        }
    }

    /// Express this transform in the frame of `reference`
    ///
    /// The result is the delta that, composed onto `reference`, gives back
    /// `self`.
    pub fn relative(&self, reference: &Self) -> Self {
        let inverse = reference.rotation.inverse();

        Self {
            translation: inverse * (self.translation - reference.translation),
            rotation: inverse * self.rotation,
            scale: self.scale / reference.scale,
        }
    }

    /// Transform that carries this (bind) transform onto `target`
    ///
    /// Used for skin matrices: the inverse of `self` is taken first, then
    /// `target` is applied with its scale acting on the inverted translation.
    pub fn delta_to(&self, target: &Self) -> Self {
        let inverse = self.invert();

        Self {
            translation: target.rotation * (target.scale * inverse.translation)
                + target.translation,
            rotation: target.rotation * inverse.rotation,
            scale: target.scale * inverse.scale,
        }
    }

    /// 4x4 matrix applying rotation, then translation, then scale
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale(self.scale)
            * Mat4::from_translation(self.translation)
            * Mat4::from_quat(self.rotation)
    }

    /// Component-wise comparison within `epsilon`
    ///
    /// Rotations are compared up to sign, since `q` and `-q` describe the
    /// same orientation.
    pub fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.translation.abs_diff_eq(other.translation, epsilon)
            && self.scale.abs_diff_eq(other.scale, epsilon)
            && (self.rotation.abs_diff_eq(other.rotation, epsilon)
                || self.rotation.abs_diff_eq(-other.rotation, epsilon))
    }

    /// Whether every component is finite
    pub fn is_finite(&self) -> bool {
        self.translation.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}
