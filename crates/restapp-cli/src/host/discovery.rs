//! Scene discovery from a media directory.
//!
//! Layout: one subdirectory per scene, named after the scene id.
//!
//! ```text
//! scenes/
//!   fire/
//!     loop.ogg        (required)
//!     animation.gif   (required)
//!     thumbnail.png
//!     tap.ogg
//! ```

use std::path::Path;

use restapp_core::{AssetHandle, Scene, SceneId, SceneRegistry};

const LOOP_FILE: &str = "loop.ogg";
const ANIMATION_FILE: &str = "animation.gif";
const THUMBNAIL_FILE: &str = "thumbnail.png";
const TAP_FILE: &str = "tap.ogg";

/// Scan `dir` for scenes. A missing directory yields an empty registry.
///
/// # Errors
///
/// Returns an error if `dir` exists but cannot be listed.
pub fn discover_scenes(dir: &Path) -> std::io::Result<SceneRegistry> {
    let mut registry = SceneRegistry::new();
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "scenes directory not found");
        return Ok(registry);
    }

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(id) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let loop_audio = path.join(LOOP_FILE);
        let animation = path.join(ANIMATION_FILE);
        if !loop_audio.is_file() || !animation.is_file() {
            tracing::warn!(scene = id, "skipping incomplete scene");
            continue;
        }

        let optional = |name: &str| {
            let p = path.join(name);
            p.is_file().then(|| AssetHandle::new(p))
        };
        registry.insert(Scene {
            id: SceneId::from(id),
            loop_audio: AssetHandle::new(loop_audio),
            animation: AssetHandle::new(animation),
            thumbnail: optional(THUMBNAIL_FILE),
            tap_audio: optional(TAP_FILE),
        });
    }

    tracing::debug!(count = registry.len(), dir = %dir.display(), "scenes discovered");
    Ok(registry)
}
