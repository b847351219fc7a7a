//! Provisioning domain - ActorProvisioningPipeline
//!
//! Level start выбирает тайлы и ставит requestActor в очередь;
//! `provision_actors` раз в кадр:
//! 1. забирает завершённые загрузки из AssetTemplateCache и создаёт ждавшие instances
//! 2. отправляет новые запросы в кэш (Ready → instance сразу, Pending → ждать)

use bevy::prelude::*;

pub mod events;
pub mod pipeline;
pub mod systems;

pub use events::{ActorSpawned, SpawnActorRequest, StartLevel};
pub use pipeline::ActorProvisioningPipeline;
pub use systems::{collect_spawn_requests, handle_start_level, provision_actors};

use crate::SimulationSet;

/// Provisioning Plugin
///
/// Порядок внутри `SimulationSet::Provisioning`:
/// handle_start_level → collect_spawn_requests → provision_actors
pub struct ProvisioningPlugin;

impl Plugin for ProvisioningPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActorProvisioningPipeline>()
            .add_event::<StartLevel>()
            .add_event::<SpawnActorRequest>()
            .add_event::<ActorSpawned>()
            .add_systems(
                Update,
                (handle_start_level, collect_spawn_requests, provision_actors)
                    .chain()
                    .in_set(SimulationSet::Provisioning),
            );
    }
}
