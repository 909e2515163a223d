//! Bone mask command

use anyhow::{Context, Result, bail};
use skelmix_pose::BoneMask;
use std::path::PathBuf;

use crate::rig::Rig;
use crate::utils::{add_table_row, create_table, format_weight};

/// Options of the `mask` command
pub struct MaskArgs {
    pub regex: Option<String>,
    pub children_of: Option<String>,
    pub parent_regex: Option<String>,
    pub weight: f32,
    pub invert: bool,
}

pub fn handle_mask(path: PathBuf, args: MaskArgs) -> Result<()> {
    if args.regex.is_none() && args.children_of.is_none() && args.parent_regex.is_none() {
        bail!("Specify at least one of --regex, --children-of or --parent-regex");
    }

    let rig = Rig::load(&path)?;
    let hierarchy = rig.skeleton.hierarchy();
    let mut mask = BoneMask::zeros(hierarchy.len());

    // Runs first since it resets the whole mask
    if let Some(pattern) = &args.parent_regex {
        let changed = mask
            .mask_children_by_parent_regex(hierarchy, pattern, args.weight)
            .with_context(|| format!("Invalid parent pattern '{pattern}'"))?;
        log::info!("Parent pattern /{pattern}/ marked {changed} bones");
    }
    if let Some(pattern) = &args.regex {
        let changed = mask
            .mask_by_regex(hierarchy, pattern, args.weight)
            .with_context(|| format!("Invalid pattern '{pattern}'"))?;
        log::info!("Pattern /{pattern}/ marked {changed} bones");
    }
    if let Some(name) = &args.children_of {
        let changed = mask.mask_children_of(hierarchy, name, args.weight)?;
        log::info!("Marked {changed} bones below '{name}'");
    }
    if args.invert {
        mask = mask.inverted();
    }

    let mut table = create_table(vec!["#", "Bone", "Weight"]);
    for (index, (bone, weight)) in hierarchy.bones().iter().zip(mask.weights()).enumerate() {
        add_table_row(
            &mut table,
            vec![index.to_string(), bone.name.clone(), format_weight(*weight)],
        );
    }
    table.printstd();

    let marked = mask.weights().iter().filter(|w| **w != 0.0).count();
    println!("{marked} of {} bones weighted", mask.len());

    Ok(())
}
