//! Directional disc command

use anyhow::{Result, anyhow};
use skelmix_pose::{Disc, DiscClips, DiscConfig};
use std::path::PathBuf;

use crate::commands::pose::layer_flags;
use crate::rig::Rig;
use crate::utils::{add_table_row, create_table, format_vec3};

/// Options of the `disc` command
pub struct DiscArgs {
    pub idle: String,
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
    pub ud: f32,
    pub lr: f32,
    pub reverse_after: Option<usize>,
    pub steps: usize,
    pub no_invert: bool,
    pub global: bool,
}

pub fn handle_disc(path: PathBuf, args: DiscArgs) -> Result<()> {
    let mut rig = Rig::load(&path)?;

    let clips = DiscClips {
        idle: rig.clip(&args.idle)?,
        up: rig.clip(&args.up)?,
        down: rig.clip(&args.down)?,
        left: rig.clip(&args.left)?,
        right: rig.clip(&args.right)?,
    };
    let config = DiscConfig {
        invert_lr_on_down: !args.no_invert,
        ..DiscConfig::default()
    };
    let mut disc = Disc::new(clips, config)?;
    let flags = layer_flags(args.global);

    let root = rig
        .skeleton
        .hierarchy()
        .roots()
        .next()
        .ok_or_else(|| anyhow!("Skeleton has no root bone"))?;

    println!(
        "Disc ud={:.2} lr={:.2} for {} steps",
        args.ud, args.lr, args.steps
    );

    let mut table = create_table(vec!["Step", "Frame", "Up/Down", "Lag", "Root"]);
    for step in 0..args.steps {
        let ud = match args.reverse_after {
            Some(after) if step >= after => -args.ud,
            _ => args.ud,
        };

        let frame = disc.frame();
        let pose = disc
            .get_pose(ud, args.lr, 0.0)
            .ok_or_else(|| anyhow!("Disc clips could not be sampled at frame {frame}"))?;
        let lag = disc.lag_factor();
        rig.skeleton.blend_toward(&pose, lag, flags);

        let translation = rig
            .skeleton
            .pose()
            .get(root)
            .map(|t| t.translation)
            .unwrap_or_default();
        add_table_row(
            &mut table,
            vec![
                step.to_string(),
                frame.to_string(),
                format!("{ud:.2}"),
                format!("{lag:.2}"),
                format_vec3(translation),
            ],
        );
    }
    table.printstd();

    Ok(())
}
