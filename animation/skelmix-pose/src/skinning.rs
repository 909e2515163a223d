//! Skin matrix output for renderers
//!
//! The matrices map each bone's bind transform onto its current transform.
//! Renderers copy them into their per-mesh bone matrix buffers.

use glam::Mat4;

use crate::pose::Pose;

/// One skin matrix per bone, carrying `bind` onto `current`
pub fn skin_matrices(bind: &Pose, current: &Pose) -> Vec<Mat4> {
    bind.delta_to(current).to_matrices()
}

/// Copy skin matrices into a mesh's bone buffer
///
/// Meshes may reference fewer bones than the skeleton has; only the
/// overlapping prefix is written. Returns the number of matrices copied.
pub fn copy_into_buffer(matrices: &[Mat4], buffer: &mut [Mat4]) -> usize {
    let count = matrices.len().min(buffer.len());
    buffer[..count].copy_from_slice(&matrices[..count]);
    count
}

/// Column-major 4x3 layout (bottom row dropped) for GPU upload
pub fn as_4x3(matrix: &Mat4) -> [f32; 12] {
    let m = matrix.to_cols_array();
    [
        m[0], m[1], m[2], // Column 0
        m[4], m[5], m[6], // Column 1
        m[8], m[9], m[10], // Column 2
        m[12], m[13], m[14], // Column 3
    ]
}

/// Flatten skin matrices into 4x3 blocks, 12 floats per bone
pub fn pack_4x3(matrices: &[Mat4]) -> Vec<f32> {
    let mut data = Vec::with_capacity(matrices.len() * 12);
    for matrix in matrices {
        data.extend_from_slice(&as_4x3(matrix));
    }
    data
}
