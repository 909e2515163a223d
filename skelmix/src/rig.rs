//! Rig file loading
//!
//! A rig file is JSON holding a bone list, a bind pose and any number of
//! clips:
//!
//! ```json
//! {
//!   "bones": [{ "name": "Hips", "parent": -1 }],
//!   "bind_pose": [{ "translation": [0, 1, 0], "rotation": [0, 0, 0, 1], "scale": [1, 1, 1] }],
//!   "clips": [{ "name": "walk", "bone_count": 1, "frames": [[ ... ]] }]
//! }
//! ```

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use skelmix_pose::{BoneInfo, Clip, Pose, Skeleton};
use std::path::Path;
use std::sync::Arc;

/// On-disk layout of a rig file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigFile {
    pub bones: Vec<BoneInfo>,
    pub bind_pose: Pose,
    #[serde(default)]
    pub clips: Vec<Clip>,
}

/// Validated skeleton and clips
#[derive(Debug, Clone)]
pub struct Rig {
    pub skeleton: Skeleton,
    pub clips: Vec<Arc<Clip>>,
}

impl Rig {
    /// Read and validate a rig file
    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading rig: {}", path.display());

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rig file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid rig file {}", path.display()))
    }

    /// Parse and validate rig JSON
    pub fn from_json(text: &str) -> Result<Self> {
        let file: RigFile = serde_json::from_str(text).context("Failed to parse rig JSON")?;
        Self::from_file(file)
    }

    pub fn from_file(file: RigFile) -> Result<Self> {
        let skeleton =
            Skeleton::from_bones(file.bones, file.bind_pose).context("Invalid skeleton")?;

        let mut clips = Vec::with_capacity(file.clips.len());
        for clip in file.clips {
            clip.validate()
                .with_context(|| format!("Invalid clip '{}'", clip.name()))?;
            if clip.bone_count() != skeleton.bone_count() {
                log::warn!(
                    "Clip '{}' has {} bones, skeleton has {}; layers will skip it",
                    clip.name(),
                    clip.bone_count(),
                    skeleton.bone_count()
                );
            }
            clips.push(Arc::new(clip));
        }

        log::debug!(
            "Loaded rig with {} bones and {} clips",
            skeleton.bone_count(),
            clips.len()
        );

        Ok(Self { skeleton, clips })
    }

    /// Clip called `name`
    pub fn clip(&self, name: &str) -> Result<Arc<Clip>> {
        self.clips
            .iter()
            .find(|clip| clip.name() == name)
            .cloned()
            .ok_or_else(|| {
                let known: Vec<&str> = self.clips.iter().map(|c| c.name()).collect();
                anyhow!("Unknown clip '{name}' (available: {})", known.join(", "))
            })
    }
}
