use thiserror::Error;

/// Error types for skeleton construction, clip loading and mask building
#[derive(Error, Debug)]
pub enum PoseError {
    /// A hierarchy with no bones
    #[error("Bone hierarchy is empty")]
    EmptyHierarchy,

    /// Parent index that is neither -1 nor a valid bone index
    #[error("Bone {bone} has parent index {parent}, expected -1 or 0..{bone_count}")]
    InvalidParent {
        bone: usize,
        parent: i32,
        bone_count: usize,
    },

    /// Parent links of a bone never reach a root
    #[error("Bone {bone} is part of a parent cycle")]
    CyclicHierarchy { bone: usize },

    /// Pose, mask or frame length disagrees with the hierarchy
    #[error("Bone count mismatch in {context}: expected {expected}, got {actual}")]
    BoneCountMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Clip without frames
    #[error("Clip '{name}' has no frames")]
    EmptyClip { name: String },

    /// Bone name pattern failed to compile
    #[error("Invalid bone name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Lookup by bone name failed
    #[error("Unknown bone: {0}")]
    UnknownBone(String),
}

/// Result type using PoseError
pub type Result<T> = std::result::Result<T, PoseError>;
