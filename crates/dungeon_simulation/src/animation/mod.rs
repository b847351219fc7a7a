//! Animation domain - именованные animation groups + collaborator для проигрывания
//!
//! Ядро не знает как проигрываются клипы. Оно только вызывает:
//! - `stop_all(instance)` перед сменой группы (перекрытие клипов запрещено)
//! - `start_clip(instance, clip_index, looping)` при входе в новое behavior state

use bevy::prelude::*;

use crate::assets::AnimationClip;
use crate::components::InstanceHandle;
use crate::error::AssetLoadError;

pub mod recording;

pub use recording::{AnimationCall, RecordingAnimator};

/// Семантическая animation group персонажа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AnimationSlot {
    Attack,
    Idle,
    Run,
    Walk,
}

impl AnimationSlot {
    pub const ALL: [AnimationSlot; 4] = [
        AnimationSlot::Attack,
        AnimationSlot::Idle,
        AnimationSlot::Run,
        AnimationSlot::Walk,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AnimationSlot::Attack => "attack",
            AnimationSlot::Idle => "idle",
            AnimationSlot::Run => "run",
            AnimationSlot::Walk => "walk",
        }
    }

    /// Позиционный layout экспортированных моделей (0=attack, 1=idle, 2=run, 3=walk)
    fn positional_index(&self) -> usize {
        match self {
            AnimationSlot::Attack => 0,
            AnimationSlot::Idle => 1,
            AnimationSlot::Run => 2,
            AnimationSlot::Walk => 3,
        }
    }
}

/// Slot → clip index, резолвится один раз при загрузке template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSlots {
    clip_indices: [usize; 4],
}

impl AnimationSlots {
    /// Резолвит slots по именам клипов, иначе по позиционному layout.
    ///
    /// Имена используются, только если все четыре slot нашлись в разных клипах.
    ///
    /// Fail fast: если клипов не хватает - `MissingClip` для первого нерезолвленного slot.
    pub fn resolve(key: &str, clips: &[AnimationClip]) -> Result<Self, AssetLoadError> {
        let by_name: Vec<Option<usize>> = AnimationSlot::ALL
            .iter()
            .map(|slot| {
                clips
                    .iter()
                    .position(|clip| clip.name.to_ascii_lowercase().contains(slot.name()))
            })
            .collect();

        let mut clip_indices = [0; 4];

        // Name match принимается, только если каждый slot получил свой клип:
        // "RunAttack" не должен отдать один индекс и attack, и run
        let named: Vec<usize> = by_name.into_iter().flatten().collect();
        let distinct = named
            .iter()
            .enumerate()
            .all(|(i, index)| !named[..i].contains(index));

        if named.len() == AnimationSlot::ALL.len() && distinct {
            clip_indices.copy_from_slice(&named);
            return Ok(Self { clip_indices });
        }

        for (i, slot) in AnimationSlot::ALL.iter().enumerate() {
            let index = slot.positional_index();
            if index >= clips.len() {
                return Err(AssetLoadError::MissingClip {
                    key: key.to_string(),
                    slot: slot.name(),
                    clip_count: clips.len(),
                });
            }
            clip_indices[i] = index;
        }

        Ok(Self { clip_indices })
    }

    pub fn clip_index(&self, slot: AnimationSlot) -> usize {
        self.clip_indices[slot as usize]
    }
}

/// Animation groups конкретного instance (у каждого instance свои handles)
#[derive(Component, Debug, Clone, Copy)]
pub struct AnimationGroups {
    pub instance: InstanceHandle,
    pub slots: AnimationSlots,
}

impl AnimationGroups {
    pub fn new(instance: InstanceHandle, slots: AnimationSlots) -> Self {
        Self { instance, slots }
    }

    /// Edge-triggered переход: остановить всё, затем запустить slot в loop
    pub fn transition_to(&self, driver: &mut dyn AnimationDriver, slot: AnimationSlot) {
        driver.stop_all(self.instance);
        driver.start_clip(self.instance, self.slots.clip_index(slot), true);
    }
}

/// Collaborator: проигрывание анимаций (рендер-сторона)
pub trait AnimationDriver: Send + Sync {
    fn stop_all(&mut self, instance: InstanceHandle);
    fn start_clip(&mut self, instance: InstanceHandle, clip_index: usize, looping: bool);
}

/// Resource-обёртка над animation collaborator
#[derive(Resource)]
pub struct AnimationBackend(pub Box<dyn AnimationDriver>);

impl AnimationBackend {
    pub fn new(driver: impl AnimationDriver + 'static) -> Self {
        Self(Box::new(driver))
    }
}
