//! Command implementations

pub mod disc;
pub mod mask;
pub mod pose;
pub mod rig;

use anyhow::Result;

use crate::cli::Commands;

/// Run a parsed command
///
/// `Completions` is handled by the binary since it needs the clap command.
pub fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Info { file } => rig::handle_info(file),
        Commands::Tree {
            file,
            depth,
            no_color,
            indices,
        } => rig::handle_tree(file, depth, no_color, indices),
        Commands::Sample {
            file,
            clip,
            frame,
            local,
        } => pose::handle_sample(file, &clip, frame, local),
        Commands::Blend {
            file,
            from,
            to,
            factor,
            frame,
            global,
            mask_regex,
            additive,
        } => pose::handle_blend(
            file,
            pose::BlendArgs {
                from,
                to,
                factor,
                frame,
                global,
                mask_regex,
                additive,
            },
        ),
        Commands::Skin { file, clip, frame } => pose::handle_skin(file, &clip, frame),
        Commands::Mask {
            file,
            regex,
            children_of,
            parent_regex,
            weight,
            invert,
        } => mask::handle_mask(
            file,
            mask::MaskArgs {
                regex,
                children_of,
                parent_regex,
                weight,
                invert,
            },
        ),
        Commands::Disc {
            file,
            idle,
            up,
            down,
            left,
            right,
            ud,
            lr,
            reverse_after,
            steps,
            no_invert,
            global,
        } => disc::handle_disc(
            file,
            disc::DiscArgs {
                idle,
                up,
                down,
                left,
                right,
                ud,
                lr,
                reverse_after,
                steps,
                no_invert,
                global,
            },
        ),
        Commands::Completions { .. } => Ok(()),
    }
}
