//! AssetTemplate - загруженный, разделяемый character template

use std::fmt;
use std::sync::Arc;

use bevy::prelude::*;

use crate::animation::AnimationSlots;
use crate::components::InstanceHandle;

/// Клип анимации в составе template
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    /// Blending между переходами (включается один раз при загрузке template)
    pub enable_blending: bool,
    pub blend_speed: f32,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enable_blending: false,
            blend_speed: 0.0,
        }
    }
}

/// Collaborator: instancing операция загруженного asset
pub trait InstanceSpawner: Send + Sync {
    /// Создаёт новый независимо анимируемый instance рядом с `position_hint`
    fn instantiate(&self, position_hint: Vec3) -> InstanceHandle;
}

/// Результат asset loader до пост-обработки кэшем
pub struct LoadedCharacter {
    pub clips: Vec<AnimationClip>,
    pub spawner: Arc<dyn InstanceSpawner>,
}

impl fmt::Debug for LoadedCharacter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedCharacter")
            .field("clips", &self.clips)
            .finish_non_exhaustive()
    }
}

/// Immutable template одного типа персонажа
///
/// Владелец - AssetTemplateCache; instances получают `Arc`.
pub struct AssetTemplate {
    key: String,
    clips: Vec<AnimationClip>,
    slots: AnimationSlots,
    spawner: Arc<dyn InstanceSpawner>,
}

impl AssetTemplate {
    pub(crate) fn new(
        key: String,
        clips: Vec<AnimationClip>,
        slots: AnimationSlots,
        spawner: Arc<dyn InstanceSpawner>,
    ) -> Self {
        Self {
            key,
            clips,
            slots,
            spawner,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    pub fn slots(&self) -> AnimationSlots {
        self.slots
    }

    pub fn instantiate(&self, position_hint: Vec3) -> InstanceHandle {
        self.spawner.instantiate(position_hint)
    }
}

impl fmt::Debug for AssetTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetTemplate")
            .field("key", &self.key)
            .field("clips", &self.clips)
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}
