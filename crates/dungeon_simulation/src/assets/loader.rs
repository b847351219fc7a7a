//! Asset loader collaborator + headless manifest loader
//!
//! Декодирование мешей/анимаций - не наша забота. Ядру нужен только
//! `load_character_asset(key)` → клипы + instancing операция.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::template::{AnimationClip, InstanceSpawner, LoadedCharacter};
use crate::components::InstanceHandle;
use crate::error::{AssetLoadError, ConfigError};

/// Collaborator: загрузка character asset по ключу
///
/// Вызывается из AsyncComputeTaskPool (не main thread), может блокировать.
pub trait CharacterAssetLoader: Send + Sync + 'static {
    fn load_character_asset(&self, key: &str) -> Result<LoadedCharacter, AssetLoadError>;
}

/// Описание одного персонажа в manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterEntry {
    pub clips: Vec<String>,
}

/// Manifest персонажей (JSON)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterManifest {
    pub characters: HashMap<String, CharacterEntry>,
    /// Искусственная задержка загрузки (имитация IO)
    pub load_latency_ms: u64,
}

impl CharacterManifest {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_character(mut self, key: impl Into<String>, clips: &[&str]) -> Self {
        self.characters.insert(
            key.into(),
            CharacterEntry {
                clips: clips.iter().map(|clip| clip.to_string()).collect(),
            },
        );
        self
    }
}

/// Instancing через общий атомарный счётчик (handles уникальны на процесс loader)
struct SequentialSpawner {
    next_instance: Arc<AtomicU32>,
}

impl InstanceSpawner for SequentialSpawner {
    fn instantiate(&self, _position_hint: Vec3) -> InstanceHandle {
        InstanceHandle(self.next_instance.fetch_add(1, Ordering::Relaxed))
    }
}

/// Headless loader: персонажи описаны manifest'ом, без реальных файлов
pub struct ManifestAssetLoader {
    manifest: CharacterManifest,
    next_instance: Arc<AtomicU32>,
}

impl ManifestAssetLoader {
    pub fn new(manifest: CharacterManifest) -> Self {
        Self {
            manifest,
            next_instance: Arc::new(AtomicU32::new(1)),
        }
    }

    /// Персонажи подземелья по умолчанию
    pub fn dungeon_default() -> Self {
        Self::new(CharacterManifest::default().with_character(
            "deathknight",
            &["Attack", "Idle", "Run", "Walk"],
        ))
    }
}

impl CharacterAssetLoader for ManifestAssetLoader {
    fn load_character_asset(&self, key: &str) -> Result<LoadedCharacter, AssetLoadError> {
        if self.manifest.load_latency_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.manifest.load_latency_ms));
        }

        let entry = self
            .manifest
            .characters
            .get(key)
            .ok_or_else(|| AssetLoadError::NotFound {
                key: key.to_string(),
            })?;

        if entry.clips.is_empty() {
            return Err(AssetLoadError::Decode {
                key: key.to_string(),
                reason: "no animation groups".to_string(),
            });
        }

        Ok(LoadedCharacter {
            clips: entry.clips.iter().map(AnimationClip::new).collect(),
            spawner: Arc::new(SequentialSpawner {
                next_instance: self.next_instance.clone(),
            }),
        })
    }
}
