//! Provisioning events (level start + actor requests)

use bevy::prelude::*;

use crate::components::InstanceHandle;

/// Старт нового уровня
///
/// # Flow
/// 1. resetLevel: despawn акторов прошлого уровня, очистка crowd и pipeline
/// 2. expected_actor_count = число акторов
/// 3. случайный свободный тайл пола на каждого актора (тайл изымается)
/// 4. requestActor для каждого
#[derive(Event, Clone, Debug, Default)]
pub struct StartLevel {
    /// Ключи акторов; None - из `LevelConfig`
    pub actors: Option<Vec<String>>,
}

impl StartLevel {
    pub fn with_actors<I, S>(actors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            actors: Some(actors.into_iter().map(Into::into).collect()),
        }
    }
}

/// requestActor: создать instance `key` в `position`
///
/// Walkability не проверяется - snap делает gate при регистрации.
#[derive(Event, Clone, Debug, PartialEq)]
pub struct SpawnActorRequest {
    pub key: String,
    pub position: Vec3,
}

impl SpawnActorRequest {
    pub fn new(key: impl Into<String>, position: Vec3) -> Self {
        Self {
            key: key.into(),
            position,
        }
    }
}

/// Instance создан (после загрузки template)
#[derive(Event, Clone, Debug)]
pub struct ActorSpawned {
    pub entity: Entity,
    pub key: String,
    pub instance: InstanceHandle,
}
