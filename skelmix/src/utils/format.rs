//! Formatting utilities

use glam::{Quat, Vec3};

/// Format a vector with three decimals
pub fn format_vec3(v: Vec3) -> String {
    format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z)
}

/// Format a quaternion as `(x, y, z, w)` with three decimals
pub fn format_quat(q: Quat) -> String {
    format!("({:.3}, {:.3}, {:.3}, {:.3})", q.x, q.y, q.z, q.w)
}

/// Format a mask weight as a percentage
pub fn format_weight(weight: f32) -> String {
    format!("{:.1}%", weight * 100.0)
}

/// Format a row of floats with four decimals
pub fn format_floats(values: &[f32]) -> String {
    values
        .iter()
        .map(|v| format!("{v:.4}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_vec3() {
        assert_eq!(format_vec3(Vec3::new(1.0, -0.5, 2.25)), "(1.000, -0.500, 2.250)");
    }

    #[test]
    fn test_format_quat() {
        assert_eq!(format_quat(Quat::IDENTITY), "(0.000, 0.000, 0.000, 1.000)");
    }

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(1.0), "100.0%");
        assert_eq!(format_weight(0.25), "25.0%");
        assert_eq!(format_weight(0.0), "0.0%");
    }

    #[test]
    fn test_format_floats() {
        assert_eq!(format_floats(&[1.0, 0.5]), "1.0000 0.5000");
    }
}
