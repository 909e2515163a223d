//! Pose sampling and blending commands

use anyhow::{Context, Result, anyhow};
use skelmix_pose::skinning::as_4x3;
use skelmix_pose::{BoneMask, LayerFlags};
use std::path::PathBuf;

use crate::rig::Rig;
use crate::utils::{add_table_row, create_table, format_floats, pose_table};

/// Options of the `blend` command
pub struct BlendArgs {
    pub from: String,
    pub to: String,
    pub factor: f32,
    pub frame: i32,
    pub global: bool,
    pub mask_regex: Option<String>,
    pub additive: bool,
}

/// Layer flags for a CLI blend
///
/// Blends run in parent-relative space unless `global` is requested.
pub fn layer_flags(global: bool) -> LayerFlags {
    if global {
        LayerFlags::empty()
    } else {
        LayerFlags::USE_LOCAL_POSE
    }
}

pub fn handle_sample(path: PathBuf, clip_name: &str, frame: i32, local: bool) -> Result<()> {
    let rig = Rig::load(&path)?;
    let clip = rig.clip(clip_name)?;
    let hierarchy = rig.skeleton.hierarchy();

    let index = clip
        .wrap_frame(frame)
        .ok_or_else(|| anyhow!("Clip '{clip_name}' has no frames"))?;
    let pose = &clip.frames()[index];
    hierarchy
        .check_len(&format!("clip '{clip_name}'"), pose.len())
        .context("Clip does not fit the skeleton")?;

    let space = if local { "local" } else { "global" };
    println!(
        "Clip '{}' frame {} of {} ({space})",
        clip.name(),
        index,
        clip.frame_count()
    );

    let pose = if local {
        pose.to_local(hierarchy)
    } else {
        pose.clone()
    };
    pose_table(hierarchy, &pose).printstd();

    Ok(())
}

pub fn handle_blend(path: PathBuf, args: BlendArgs) -> Result<()> {
    let mut rig = Rig::load(&path)?;
    let from = rig.clip(&args.from)?;
    let to = rig.clip(&args.to)?;
    let flags = layer_flags(args.global);
    let skeleton = &mut rig.skeleton;

    if args.additive {
        let reference = skeleton.bind_pose().clone();
        skeleton.apply_clip(&from, args.frame);
        skeleton.additive_layer(&to, args.frame, &reference, args.factor, flags, None);
        println!(
            "Additive '{}' over '{}' at {:.2}",
            args.to, args.from, args.factor
        );
    } else if let Some(pattern) = &args.mask_regex {
        let mut mask = BoneMask::zeros(skeleton.bone_count());
        let matched = mask
            .mask_by_regex(skeleton.hierarchy(), pattern, 1.0)
            .with_context(|| format!("Invalid mask pattern '{pattern}'"))?;
        log::info!("Mask pattern /{pattern}/ matched {matched} bones");

        skeleton.apply_clip(&from, args.frame);
        skeleton.override_layer(&to, args.frame, args.factor, flags, Some(&mask));
        println!(
            "Override '{}' over '{}' at {:.2} on {matched} bones",
            args.to, args.from, args.factor
        );
    } else {
        skeleton.blend_layer(&from, args.frame, &to, args.frame, args.factor, flags);
        println!("Blend '{}' -> '{}' at {:.2}", args.from, args.to, args.factor);
    }

    pose_table(skeleton.hierarchy(), skeleton.pose()).printstd();
    Ok(())
}

pub fn handle_skin(path: PathBuf, clip_name: &str, frame: i32) -> Result<()> {
    let mut rig = Rig::load(&path)?;
    let clip = rig.clip(clip_name)?;
    rig.skeleton.apply_clip(&clip, frame);

    let hierarchy = rig.skeleton.hierarchy();
    let mut table = create_table(vec!["#", "Bone", "Matrix (4x3, column-major)"]);
    for (index, matrix) in rig.skeleton.skin_matrices().iter().enumerate() {
        let name = hierarchy.bone(index).map_or("", |b| b.name.as_str());
        add_table_row(
            &mut table,
            vec![
                index.to_string(),
                name.to_string(),
                format_floats(&as_4x3(matrix)),
            ],
        );
    }
    table.printstd();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_flags_default_to_local_space() {
        assert_eq!(layer_flags(false), LayerFlags::USE_LOCAL_POSE);
        assert_eq!(layer_flags(true), LayerFlags::empty());
    }
}
