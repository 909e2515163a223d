//! skelmix library
//!
//! Command-line front end for `skelmix-pose`: rig file loading, inspection
//! and blend previews.

pub mod cli;
pub mod commands;
pub mod rig;
pub mod utils;
