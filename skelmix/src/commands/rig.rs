//! Rig inspection commands

use anyhow::Result;
use std::path::PathBuf;

use crate::rig::Rig;
use crate::utils::{TreeOptions, add_table_row, bone_tree, create_table, render_tree};

pub fn handle_info(path: PathBuf) -> Result<()> {
    println!("Loading rig: {}", path.display());
    let rig = Rig::load(&path)?;
    let hierarchy = rig.skeleton.hierarchy();

    println!("\n=== Skeleton ===");
    println!("Bones: {}", hierarchy.len());
    let roots: Vec<&str> = hierarchy
        .roots()
        .filter_map(|i| hierarchy.bone(i))
        .map(|b| b.name.as_str())
        .collect();
    println!("Roots: {}", roots.join(", "));
    println!("Max depth: {}", hierarchy.max_depth());

    println!("\n=== Clips ===");
    if rig.clips.is_empty() {
        println!("(none)");
        return Ok(());
    }

    let mut table = create_table(vec!["Name", "Frames", "Bones", "Playable"]);
    for clip in &rig.clips {
        let playable = clip.is_playable() && clip.bone_count() == hierarchy.len();
        add_table_row(
            &mut table,
            vec![
                clip.name().to_string(),
                clip.frame_count().to_string(),
                clip.bone_count().to_string(),
                if playable { "yes" } else { "no" }.to_string(),
            ],
        );
    }
    table.printstd();

    Ok(())
}

pub fn handle_tree(
    path: PathBuf,
    max_depth: Option<usize>,
    no_color: bool,
    show_indices: bool,
) -> Result<()> {
    let rig = Rig::load(&path)?;

    let title = path
        .file_stem()
        .map_or_else(|| "Skeleton".to_string(), |s| s.to_string_lossy().into_owned());
    let root = bone_tree(rig.skeleton.hierarchy(), &title, show_indices);

    let options = TreeOptions {
        max_depth,
        no_color,
        ..TreeOptions::default()
    };

    print!("{}", render_tree(&root, &options));
    Ok(())
}
