//! Provisioning systems: level start → requests → async templates → instances

use bevy::prelude::*;
use rand::Rng;

use super::events::{ActorSpawned, SpawnActorRequest, StartLevel};
use super::pipeline::ActorProvisioningPipeline;
use crate::animation::AnimationGroups;
use crate::assets::{AssetTemplate, AssetTemplateCache, TemplateLookup};
use crate::components::ActorInstance;
use crate::config::{AssetConfig, LevelConfig};
use crate::gate::LevelProvisioningState;
use crate::navigation::{FloorGrid, SteeringBackend};
use crate::DeterministicRng;

/// Система: StartLevel → resetLevel + requestActor на случайных свободных тайлах
pub fn handle_start_level(
    mut commands: Commands,
    mut events: EventReader<StartLevel>,
    level_config: Res<LevelConfig>,
    floor: Res<FloorGrid>,
    mut rng: ResMut<DeterministicRng>,
    mut level: ResMut<LevelProvisioningState>,
    mut pipeline: ResMut<ActorProvisioningPipeline>,
    mut steering: ResMut<SteeringBackend>,
) {
    for event in events.read() {
        let actors = event
            .actors
            .clone()
            .unwrap_or_else(|| level_config.actors.clone());

        for &entity in level.spawned() {
            commands.entity(entity).despawn();
        }
        steering.0.clear();
        pipeline.reset();
        level.reset(actors.len());

        crate::log_info(&format!("🗺️ Level start: {} actors expected", actors.len()));

        let mut free_tiles = floor.free_tile_positions();

        for key in actors {
            if free_tiles.is_empty() {
                crate::log_warning(&format!("⚠️ No free floor tile left for '{}', slot released", key));
                level.release_slot();
                continue;
            }

            let tile = free_tiles.remove(rng.rng.gen_range(0..free_tiles.len()));
            pipeline.request_actor(key, tile);
        }
    }
}

/// Система: SpawnActorRequest events → очередь pipeline
///
/// Внешний requestActor поднимает expected_actor_count, пока уровень в LOADING.
/// После READY (или до старта уровня) запрос отклоняется: зарегистрированный
/// набор агентов не меняется.
pub fn collect_spawn_requests(
    mut events: EventReader<SpawnActorRequest>,
    mut level: ResMut<LevelProvisioningState>,
    mut pipeline: ResMut<ActorProvisioningPipeline>,
) {
    for request in events.read() {
        if !level.accept_extra_actor() {
            let phase = if level.is_level_started() {
                format!("{:?}", level.phase())
            } else {
                "not started".to_string()
            };
            crate::log_warning(&format!(
                "⚠️ requestActor '{}' rejected: level {}",
                request.key, phase
            ));
            continue;
        }
        pipeline.request_actor(request.key.clone(), request.position);
    }
}

/// Система: завершённые загрузки → instances; новые запросы → кэш
///
/// Для ключа все instances создаются только после полной загрузки его template.
/// Ошибка загрузки освобождает slot актора (gate не ждёт его вечно).
pub fn provision_actors(
    mut commands: Commands,
    asset_config: Res<AssetConfig>,
    mut cache: ResMut<AssetTemplateCache>,
    mut pipeline: ResMut<ActorProvisioningPipeline>,
    mut level: ResMut<LevelProvisioningState>,
    mut spawned_events: EventWriter<ActorSpawned>,
) {
    for outcome in cache.poll_loads(&asset_config) {
        let positions = pipeline.take_waiting(&outcome.key);

        match outcome.result {
            Ok(template) => {
                for position in positions {
                    let event =
                        spawn_instance(&mut commands, &template, position, &asset_config, &mut level);
                    spawned_events.write(event);
                }
            }
            Err(err) => {
                for _ in positions {
                    crate::log_warning(&format!("⚠️ Actor '{}' dropped: {}", outcome.key, err));
                    level.release_slot();
                }
            }
        }
    }

    for request in pipeline.drain_queued() {
        match cache.get_or_load(&request.key) {
            TemplateLookup::Ready(template) => {
                let event = spawn_instance(
                    &mut commands,
                    &template,
                    request.position,
                    &asset_config,
                    &mut level,
                );
                spawned_events.write(event);
            }
            TemplateLookup::Pending => pipeline.wait_for_template(request),
            TemplateLookup::Failed(err) => {
                crate::log_warning(&format!("⚠️ Actor '{}' dropped: {}", request.key, err));
                level.release_slot();
            }
        }
    }
}

/// createInstance: новый instance template на (x, spawn_height, z)
fn spawn_instance(
    commands: &mut Commands,
    template: &AssetTemplate,
    position: Vec3,
    config: &AssetConfig,
    level: &mut LevelProvisioningState,
) -> ActorSpawned {
    let spawn_position = Vec3::new(position.x, config.spawn_height, position.z);
    let instance = template.instantiate(spawn_position);

    let entity = commands
        .spawn((
            ActorInstance::new(instance, template.key()),
            AnimationGroups::new(instance, template.slots()),
            Transform::from_translation(spawn_position),
        ))
        .id();

    level.record_spawn(entity);

    crate::log(&format!(
        "👹 Spawned '{}' instance {} at {:?} ({}/{})",
        template.key(),
        instance.0,
        spawn_position,
        level.actors_available(),
        level.expected_actor_count()
    ));

    ActorSpawned {
        entity,
        key: template.key().to_string(),
        instance,
    }
}
