//! Root CLI structure for skelmix

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skelmix")]
#[command(about = "Inspect skeletal rigs and preview pose blends", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display bone and clip information for a rig file
    Info {
        /// Path to the rig JSON file
        file: PathBuf,
    },

    /// Display the bone hierarchy as a tree
    Tree {
        /// Path to the rig JSON file
        file: PathBuf,

        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Show bone indices
        #[arg(short, long)]
        indices: bool,
    },

    /// Print the transforms of one clip frame
    Sample {
        /// Path to the rig JSON file
        file: PathBuf,

        /// Clip name
        #[arg(short, long)]
        clip: String,

        /// Frame index (wraps around the clip length)
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        frame: i32,

        /// Print parent-relative transforms
        #[arg(short, long)]
        local: bool,
    },

    /// Blend two clips on the rig's skeleton and print the result
    Blend {
        /// Path to the rig JSON file
        file: PathBuf,

        /// Base clip
        #[arg(long)]
        from: String,

        /// Clip blended over the base
        #[arg(long)]
        to: String,

        /// Blend factor
        #[arg(long, default_value = "0.5", allow_hyphen_values = true)]
        factor: f32,

        /// Frame sampled from both clips
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        frame: i32,

        /// Blend global transforms directly instead of parent-relative ones
        #[arg(short, long)]
        global: bool,

        /// Only override bones whose name matches this pattern
        #[arg(long)]
        mask_regex: Option<String>,

        /// Layer the clip additively against the bind pose instead
        #[arg(long, conflicts_with = "mask_regex")]
        additive: bool,
    },

    /// Build a bone mask and print its weights
    Mask {
        /// Path to the rig JSON file
        file: PathBuf,

        /// Mark bones whose name matches this pattern
        #[arg(long)]
        regex: Option<String>,

        /// Mark every descendant of the named bone
        #[arg(long)]
        children_of: Option<String>,

        /// Mark every bone below a bone whose name matches this pattern
        #[arg(long)]
        parent_regex: Option<String>,

        /// Weight given to marked bones
        #[arg(long, default_value = "1.0")]
        weight: f32,

        /// Invert the final mask
        #[arg(long)]
        invert: bool,
    },

    /// Step a directional disc and print lag and root motion per step
    Disc {
        /// Path to the rig JSON file
        file: PathBuf,

        /// Idle clip
        #[arg(long)]
        idle: String,

        /// Forward clip
        #[arg(long)]
        up: String,

        /// Backward clip
        #[arg(long)]
        down: String,

        /// Left strafe clip
        #[arg(long)]
        left: String,

        /// Right strafe clip
        #[arg(long)]
        right: String,

        /// Up/down input in -1..=1
        #[arg(long, default_value = "1.0", allow_hyphen_values = true)]
        ud: f32,

        /// Left/right input in -1..=1
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        lr: f32,

        /// Flip the up/down input after this many steps
        #[arg(long)]
        reverse_after: Option<usize>,

        /// Number of steps
        #[arg(short, long, default_value = "10")]
        steps: usize,

        /// Keep left/right clips unchanged while moving down
        #[arg(long)]
        no_invert: bool,

        /// Ease toward the disc pose in global space instead of parent-relative
        #[arg(short, long)]
        global: bool,
    },

    /// Print 4x3 skin matrices for a clip frame
    Skin {
        /// Path to the rig JSON file
        file: PathBuf,

        /// Clip name
        #[arg(short, long)]
        clip: String,

        /// Frame index (wraps around the clip length)
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        frame: i32,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
