//! Ambient scenes and which one is active.
//!
//! A scene bundles an ambient loop, an animation, an optional thumbnail and
//! an optional tap effect. The registry is built by the host (typically by
//! scanning a media directory); this module only selects from it and hands
//! the relevant asset handles to the audio collaborator.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl Borrow<str> for SceneId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SceneId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque reference to a media asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetHandle(PathBuf);

impl AssetHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: SceneId,
    pub loop_audio: AssetHandle,
    pub animation: AssetHandle,
    #[serde(default)]
    pub thumbnail: Option<AssetHandle>,
    #[serde(default)]
    pub tap_audio: Option<AssetHandle>,
}

/// Scenes by id, iterated in id order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneRegistry {
    scenes: BTreeMap<SceneId, Scene>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a scene.
    pub fn insert(&mut self, scene: Scene) {
        self.scenes.insert(scene.id.clone(), scene);
    }

    pub fn get(&self, id: &str) -> Option<&Scene> {
        self.scenes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SceneId> {
        self.scenes.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    pub fn first(&self) -> Option<&Scene> {
        self.scenes.values().next()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

impl FromIterator<Scene> for SceneRegistry {
    fn from_iter<I: IntoIterator<Item = Scene>>(iter: I) -> Self {
        let mut registry = Self::new();
        for scene in iter {
            registry.insert(scene);
        }
        registry
    }
}

/// Output volume in percent, 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volume(u8);

impl Volume {
    pub const MAX: Volume = Volume(100);
    pub const MUTED: Volume = Volume(0);

    /// Values above 100 are clamped.
    pub fn new(percent: u8) -> Self {
        Self(percent.min(100))
    }

    /// Start-up volume: silent if the previous run ended at zero.
    pub fn initial(was_zero: bool, default: Volume) -> Self {
        if was_zero {
            Self::MUTED
        } else {
            default
        }
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    /// 0.0 ..= 1.0 gain.
    pub fn gain(self) -> f32 {
        f32::from(self.0) / 100.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Assets to start after a successful scene switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSwitch {
    pub scene_id: SceneId,
    pub loop_audio: AssetHandle,
    pub animation: AssetHandle,
    pub tap_audio: Option<AssetHandle>,
}

/// Result of a volume change: the new value and the flag to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeChange {
    pub volume: Volume,
    pub is_zero: bool,
}

/// Holds the active scene selection and the current volume.
#[derive(Debug, Clone)]
pub struct SceneAudioManager {
    registry: SceneRegistry,
    active: Option<SceneId>,
    volume: Volume,
}

impl SceneAudioManager {
    /// Select `default` if registered, otherwise the first scene in id order.
    pub fn new(registry: SceneRegistry, default: Option<&str>, volume: Volume) -> Self {
        let active = default
            .and_then(|id| registry.get(id))
            .or_else(|| registry.first())
            .map(|scene| scene.id.clone());
        Self {
            registry,
            active,
            volume,
        }
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn active_scene(&self) -> Option<&Scene> {
        self.active
            .as_ref()
            .and_then(|id| self.registry.get(id.as_str()))
    }

    pub fn active_id(&self) -> Option<&SceneId> {
        self.active.as_ref()
    }

    /// Assets of the active scene, as a switch to it would return them.
    pub fn current(&self) -> Option<SceneSwitch> {
        self.active_scene().map(scene_switch)
    }

    /// Make `id` the active scene.
    ///
    /// # Errors
    ///
    /// Returns `UnknownScene` if `id` is not registered; the previous
    /// selection stays active.
    pub fn switch_scene(&mut self, id: &str) -> Result<SceneSwitch> {
        let scene = self
            .registry
            .get(id)
            .ok_or_else(|| CoreError::UnknownScene { id: id.to_string() })?;
        let switch = scene_switch(scene);
        self.active = Some(switch.scene_id.clone());
        tracing::debug!(scene = %switch.scene_id, "scene switched");
        Ok(switch)
    }

    /// Tap effect of the active scene, if it defines one.
    pub fn current_tap_effect(&self) -> Option<&AssetHandle> {
        self.active_scene().and_then(|s| s.tap_audio.as_ref())
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn set_volume(&mut self, volume: Volume) -> VolumeChange {
        self.volume = volume;
        VolumeChange {
            volume,
            is_zero: volume.is_zero(),
        }
    }
}

fn scene_switch(scene: &Scene) -> SceneSwitch {
    SceneSwitch {
        scene_id: scene.id.clone(),
        loop_audio: scene.loop_audio.clone(),
        animation: scene.animation.clone(),
        tap_audio: scene.tap_audio.clone(),
    }
}
