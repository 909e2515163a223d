//! Per-bone blend weights
//!
//! A [`BoneMask`] restricts a blend to part of the body. A weight of `0`
//! keeps the base pose for that bone, `1` applies the full contribution of
//! the blended pose.

use regex::Regex;

use crate::error::Result;
use crate::hierarchy::Hierarchy;

/// Weight in `0..=1` for every bone, index-aligned with the hierarchy
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct BoneMask {
    weights: Vec<f32>,
}

impl BoneMask {
    /// Every bone set to `value`
    pub fn filled(bone_count: usize, value: f32) -> Self {
        Self {
            weights: vec![value; bone_count],
        }
    }

    /// Every bone keeps the base pose
    pub fn zeros(bone_count: usize) -> Self {
        Self::filled(bone_count, 0.0)
    }

    /// Every bone takes the full blend
    pub fn ones(bone_count: usize) -> Self {
        Self::filled(bone_count, 1.0)
    }

    /// Every bone takes half the blend
    pub fn half(bone_count: usize) -> Self {
        Self::filled(bone_count, 0.5)
    }

    /// Wrap explicit weights
    pub fn from_weights(weights: Vec<f32>) -> Self {
        Self { weights }
    }

    /// Number of bones covered
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weight of `bone`, `None` past the end
    pub fn get(&self, bone: usize) -> Option<f32> {
        self.weights.get(bone).copied()
    }

    /// Set the weight of `bone`; out-of-range indices are ignored
    pub fn set(&mut self, bone: usize, value: f32) {
        if let Some(weight) = self.weights.get_mut(bone) {
            *weight = value;
        }
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Complementary mask where every weight `w` becomes `1 - w`
    pub fn inverted(&self) -> Self {
        Self {
            weights: self.weights.iter().map(|w| 1.0 - w).collect(),
        }
    }

    /// Give `value` to every strict descendant of the bone called `name`
    ///
    /// Returns the number of bones changed.
    pub fn mask_children_of(
        &mut self,
        hierarchy: &Hierarchy,
        name: &str,
        value: f32,
    ) -> Result<usize> {
        hierarchy.check_len("bone mask", self.len())?;
        hierarchy.index_of(name)?;

        let mut changed = 0;
        for bone in 0..hierarchy.len() {
            let under = hierarchy
                .ancestors(bone)
                .any(|ancestor| hierarchy.bones()[ancestor].name == name);
            if under {
                self.weights[bone] = value;
                changed += 1;
            }
        }

        log::debug!("Masked {changed} bones below '{name}'");
        Ok(changed)
    }

    /// Give `value` to every bone whose name matches `pattern`
    ///
    /// The mask is left untouched when the pattern does not compile.
    pub fn mask_by_regex(
        &mut self,
        hierarchy: &Hierarchy,
        pattern: &str,
        value: f32,
    ) -> Result<usize> {
        hierarchy.check_len("bone mask", self.len())?;
        let regex = Regex::new(pattern)?;

        let mut changed = 0;
        for (index, bone) in hierarchy.bones().iter().enumerate() {
            if regex.is_match(&bone.name) {
                log::debug!("Bone '{}' matches /{pattern}/", bone.name);
                self.weights[index] = value;
                changed += 1;
            }
        }

        Ok(changed)
    }

    /// Reset to zero, then give `value` to every bone with an ancestor whose
    /// name matches `pattern`
    ///
    /// The mask is left untouched when the pattern does not compile.
    pub fn mask_children_by_parent_regex(
        &mut self,
        hierarchy: &Hierarchy,
        pattern: &str,
        value: f32,
    ) -> Result<usize> {
        hierarchy.check_len("bone mask", self.len())?;
        let regex = Regex::new(pattern)?;

        self.weights.fill(0.0);

        let mut changed = 0;
        for bone in 0..hierarchy.len() {
            let under = hierarchy
                .ancestors(bone)
                .any(|ancestor| regex.is_match(&hierarchy.bones()[ancestor].name));
            if under {
                log::debug!(
                    "Bone '{}' is below a match of /{pattern}/",
                    hierarchy.bones()[bone].name
                );
                self.weights[bone] = value;
                changed += 1;
            }
        }

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PoseError;
    use crate::hierarchy::BoneInfo;
    use test_case::test_case;

    fn legs() -> Hierarchy {
        Hierarchy::new(vec![
            BoneInfo::new("Hips", -1),
            BoneInfo::new("LeftLeg", 0),
            BoneInfo::new("LeftFoot", 1),
            BoneInfo::new("RightLeg", 0),
            BoneInfo::new("RightFoot", 3),
            BoneInfo::new("Spine", 0),
            BoneInfo::new("Head", 5),
        ])
        .unwrap()
    }

    #[test_case(BoneMask::zeros(3), 0.0 ; "zeros")]
    #[test_case(BoneMask::ones(3), 1.0 ; "ones")]
    #[test_case(BoneMask::half(3), 0.5 ; "half")]
    fn test_constructors(mask: BoneMask, expected: f32) {
        assert_eq!(mask.len(), 3);
        assert!(mask.weights().iter().all(|&w| w == expected));
    }

    #[test]
    fn test_get_set() {
        let mut mask = BoneMask::zeros(2);
        mask.set(1, 0.25);
        mask.set(9, 1.0);
        assert_eq!(mask.get(1), Some(0.25));
        assert_eq!(mask.get(9), None);
    }

    #[test]
    fn test_inverted() {
        let mask = BoneMask::from_weights(vec![0.0, 0.25, 1.0]);
        assert_eq!(mask.inverted().weights(), &[1.0, 0.75, 0.0]);
    }

    #[test]
    fn test_mask_children_of() {
        let hierarchy = legs();
        let mut mask = BoneMask::zeros(hierarchy.len());
        let changed = mask.mask_children_of(&hierarchy, "Spine", 1.0).unwrap();
        assert_eq!(changed, 1);
        assert_eq!(mask.weights(), &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_mask_children_of_unknown_bone() {
        let hierarchy = legs();
        let mut mask = BoneMask::zeros(hierarchy.len());
        assert!(matches!(
            mask.mask_children_of(&hierarchy, "Tail", 1.0),
            Err(PoseError::UnknownBone(_))
        ));
    }

    #[test]
    fn test_mask_by_regex() {
        let hierarchy = legs();
        let mut mask = BoneMask::zeros(hierarchy.len());
        let changed = mask.mask_by_regex(&hierarchy, "Leg$", 1.0).unwrap();
        assert_eq!(changed, 2);
        assert_eq!(mask.weights(), &[0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_invalid_pattern_leaves_mask() {
        let hierarchy = legs();
        let mut mask = BoneMask::half(hierarchy.len());
        let result = mask.mask_children_by_parent_regex(&hierarchy, "(", 1.0);
        assert!(matches!(result, Err(PoseError::InvalidPattern(_))));
        assert_eq!(mask, BoneMask::half(hierarchy.len()));
    }

    #[test]
    fn test_mask_length_checked() {
        let hierarchy = legs();
        let mut mask = BoneMask::zeros(2);
        assert!(matches!(
            mask.mask_by_regex(&hierarchy, "Leg", 1.0),
            Err(PoseError::BoneCountMismatch { .. })
        ));
    }

    #[test]
    fn test_lower_and_upper_body_split() {
        let hierarchy = legs();
        let mut lower = BoneMask::zeros(hierarchy.len());
        lower
            .mask_children_by_parent_regex(&hierarchy, "Leg", 1.0)
            .unwrap();
        lower.mask_by_regex(&hierarchy, "Leg", 1.0).unwrap();
        lower.set(0, 1.0);
        assert_eq!(lower.weights(), &[1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0]);

        let upper = lower.inverted();
        assert_eq!(upper.weights(), &[0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0]);
    }
}
