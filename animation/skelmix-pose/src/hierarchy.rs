//! Bone hierarchy description and traversal
//!
//! Parent indices are not required to be smaller than child indices, so the
//! hierarchy is validated once on construction and a parents-first
//! traversal order is cached for global pose accumulation.

use std::collections::VecDeque;

use crate::error::{PoseError, Result};

/// Name and parent index of a single bone (`-1` for roots)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoneInfo {
    pub name: String,
    pub parent: i32,
}

impl BoneInfo {
    /// Create a new bone entry
    pub fn new(name: impl Into<String>, parent: i32) -> Self {
        Self {
            name: name.into(),
            parent,
        }
    }

    /// Whether this bone has no parent
    pub fn is_root(&self) -> bool {
        self.parent < 0
    }
}

/// Validated bone forest
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<BoneInfo>", into = "Vec<BoneInfo>")
)]
pub struct Hierarchy {
    bones: Vec<BoneInfo>,
    /// Bone indices with every parent listed before its children
    order: Vec<usize>,
}

impl Hierarchy {
    /// Validate parent links and build the traversal order
    ///
    /// Rejects an empty bone list, parent indices outside `-1..len`, and
    /// parent chains that never reach a root.
    pub fn new(bones: Vec<BoneInfo>) -> Result<Self> {
        if bones.is_empty() {
            return Err(PoseError::EmptyHierarchy);
        }

        let count = bones.len();
        let mut children = vec![Vec::new(); count];
        let mut queue = VecDeque::new();

        for (index, bone) in bones.iter().enumerate() {
            match usize::try_from(bone.parent) {
                Ok(parent) if parent < count => children[parent].push(index),
                Ok(_) => {
                    return Err(PoseError::InvalidParent {
                        bone: index,
                        parent: bone.parent,
                        bone_count: count,
                    });
                }
                Err(_) if bone.parent == -1 => queue.push_back(index),
                Err(_) => {
                    return Err(PoseError::InvalidParent {
                        bone: index,
                        parent: bone.parent,
                        bone_count: count,
                    });
                }
            }
        }

        let mut order = Vec::with_capacity(count);
        while let Some(index) = queue.pop_front() {
            order.push(index);
            queue.extend(children[index].iter().copied());
        }

        // Every bone has exactly one parent, so anything not reached from a
        // root sits on (or hangs below) a cycle.
        if order.len() != count {
            let mut reached = vec![false; count];
            for &index in &order {
                reached[index] = true;
            }
            let bone = reached.iter().position(|r| !r).unwrap_or(0);
            return Err(PoseError::CyclicHierarchy { bone });
        }

        log::trace!("Validated hierarchy with {count} bones");

        Ok(Self { bones, order })
    }

    /// Number of bones
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    /// Always false for a validated hierarchy
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// All bones in array order
    pub fn bones(&self) -> &[BoneInfo] {
        &self.bones
    }

    /// Bone at `index`
    pub fn bone(&self, index: usize) -> Option<&BoneInfo> {
        self.bones.get(index)
    }

    /// Parent of `index`, `None` for roots
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.bones
            .get(index)
            .and_then(|bone| usize::try_from(bone.parent).ok())
    }

    /// Bone indices ordered so that parents precede their children
    pub fn traversal_order(&self) -> &[usize] {
        &self.order
    }

    /// Index of the first bone called `name`
    pub fn find(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|bone| bone.name == name)
    }

    /// Like [`Hierarchy::find`], failing with [`PoseError::UnknownBone`]
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.find(name)
            .ok_or_else(|| PoseError::UnknownBone(name.to_string()))
    }

    /// Indices of root bones
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.bones
            .iter()
            .enumerate()
            .filter(|(_, bone)| bone.is_root())
            .map(|(index, _)| index)
    }

    /// Direct children of `index`
    pub fn children(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.bones
            .iter()
            .enumerate()
            .filter(move |(_, bone)| usize::try_from(bone.parent).ok() == Some(index))
            .map(|(child, _)| child)
    }

    /// Parent chain of `index`, nearest first, excluding the bone itself
    pub fn ancestors(&self, index: usize) -> Ancestors<'_> {
        Ancestors {
            hierarchy: self,
            current: self.parent(index),
        }
    }

    /// Whether `ancestor` lies on the parent chain of `bone`
    pub fn is_ancestor(&self, ancestor: usize, bone: usize) -> bool {
        self.ancestors(bone).any(|index| index == ancestor)
    }

    /// Number of parent links between `index` and its root
    pub fn depth(&self, index: usize) -> usize {
        self.ancestors(index).count()
    }

    /// Deepest bone depth in the hierarchy
    pub fn max_depth(&self) -> usize {
        (0..self.len()).map(|i| self.depth(i)).max().unwrap_or(0)
    }

    /// Fail unless `actual` matches the bone count
    pub fn check_len(&self, context: &str, actual: usize) -> Result<()> {
        if actual == self.len() {
            Ok(())
        } else {
            Err(PoseError::BoneCountMismatch {
                context: context.to_string(),
                expected: self.len(),
                actual,
            })
        }
    }
}

impl TryFrom<Vec<BoneInfo>> for Hierarchy {
    type Error = PoseError;

    fn try_from(bones: Vec<BoneInfo>) -> Result<Self> {
        Self::new(bones)
    }
}

impl From<Hierarchy> for Vec<BoneInfo> {
    fn from(hierarchy: Hierarchy) -> Self {
        hierarchy.bones
    }
}

/// Iterator over the parent chain of a bone
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    hierarchy: &'a Hierarchy,
    current: Option<usize>,
}

impl Iterator for Ancestors<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let index = self.current?;
        self.current = self.hierarchy.parent(index);
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Hierarchy {
        Hierarchy::new(vec![
            BoneInfo::new("Root", -1),
            BoneInfo::new("Spine", 0),
            BoneInfo::new("Head", 1),
            BoneInfo::new("LeftLeg", 0),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_hierarchy_rejected() {
        assert!(matches!(
            Hierarchy::new(Vec::new()),
            Err(PoseError::EmptyHierarchy)
        ));
    }

    #[test]
    fn test_parent_out_of_range() {
        let result = Hierarchy::new(vec![BoneInfo::new("Root", -1), BoneInfo::new("Bad", 5)]);
        assert!(matches!(
            result,
            Err(PoseError::InvalidParent {
                bone: 1,
                parent: 5,
                bone_count: 2
            })
        ));

        let result = Hierarchy::new(vec![BoneInfo::new("Root", -2)]);
        assert!(matches!(result, Err(PoseError::InvalidParent { bone: 0, .. })));
    }

    #[test]
    fn test_cycle_rejected() {
        let result = Hierarchy::new(vec![
            BoneInfo::new("Root", -1),
            BoneInfo::new("A", 2),
            BoneInfo::new("B", 1),
        ]);
        assert!(matches!(result, Err(PoseError::CyclicHierarchy { bone: 1 })));
    }

    #[test]
    fn test_self_parent_rejected() {
        let result = Hierarchy::new(vec![BoneInfo::new("Root", -1), BoneInfo::new("Loop", 1)]);
        assert!(matches!(result, Err(PoseError::CyclicHierarchy { bone: 1 })));
    }

    #[test]
    fn test_traversal_order_parents_first() {
        // Child stored before its parent
        let hierarchy = Hierarchy::new(vec![
            BoneInfo::new("Hand", 2),
            BoneInfo::new("Root", -1),
            BoneInfo::new("Arm", 1),
        ])
        .unwrap();

        let order = hierarchy.traversal_order();
        let position = |bone: usize| order.iter().position(|&i| i == bone).unwrap();
        assert_eq!(order.len(), 3);
        assert!(position(1) < position(2));
        assert!(position(2) < position(0));
    }

    #[test]
    fn test_lookup_and_relations() {
        let hierarchy = chain();
        assert_eq!(hierarchy.len(), 4);
        assert_eq!(hierarchy.find("Head"), Some(2));
        assert!(matches!(
            hierarchy.index_of("Tail"),
            Err(PoseError::UnknownBone(name)) if name == "Tail"
        ));
        assert_eq!(hierarchy.parent(0), None);
        assert_eq!(hierarchy.parent(2), Some(1));
        assert_eq!(hierarchy.roots().collect::<Vec<_>>(), vec![0]);
        assert_eq!(hierarchy.children(0).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(hierarchy.ancestors(2).collect::<Vec<_>>(), vec![1, 0]);
        assert!(hierarchy.is_ancestor(0, 2));
        assert!(!hierarchy.is_ancestor(3, 2));
        assert_eq!(hierarchy.depth(2), 2);
        assert_eq!(hierarchy.max_depth(), 2);
    }

    #[test]
    fn test_check_len() {
        let hierarchy = chain();
        assert!(hierarchy.check_len("pose", 4).is_ok());
        assert!(matches!(
            hierarchy.check_len("pose", 3),
            Err(PoseError::BoneCountMismatch {
                expected: 4,
                actual: 3,
                ..
            })
        ));
    }
}
