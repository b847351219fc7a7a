//! Navigation domain - steering service + navigation query (external collaborators)
//!
//! Ядро видит только контракты:
//! - SteeringService: регистрация агентов, seek/teleport, velocity/position
//! - NavigationQuery: nearest walkable point
//!
//! Headless реализации: `Crowd` (steering) и `FloorGrid` (пол подземелья).

use std::sync::Arc;

use bevy::prelude::*;

use crate::config::{AgentParams, CrowdConfig, LevelConfig};
use crate::error::SteeringError;
use crate::SimulationSet;

pub mod crowd;
pub mod floor;

pub use crowd::Crowd;
pub use floor::FloorGrid;

/// Handle агента в steering service (opaque, стабилен после регистрации)
///
/// Висит на entity актора как компонент - 1:1 с ActorInstance.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
#[reflect(Component)]
pub struct AgentHandle(pub u32);

/// Collaborator: navmesh-backed steering (crowd)
pub trait SteeringService: Send + Sync {
    fn register_agent(
        &mut self,
        position: Vec3,
        params: &AgentParams,
    ) -> Result<AgentHandle, SteeringError>;

    /// Непрерывное движение к цели по walkable поверхности
    fn seek(&mut self, agent: AgentHandle, target: Vec3) -> Result<(), SteeringError>;

    /// Мгновенная установка позиции (сбрасывает текущую цель)
    fn teleport(&mut self, agent: AgentHandle, position: Vec3) -> Result<(), SteeringError>;

    fn velocity(&self, agent: AgentHandle) -> Result<Vec3, SteeringError>;

    fn position(&self, agent: AgentHandle) -> Result<Vec3, SteeringError>;

    fn agent_handles(&self) -> Vec<AgentHandle>;

    /// Шаг симуляции crowd (секунды)
    fn update(&mut self, delta: f32);

    /// Снос всех агентов (только между уровнями)
    fn clear(&mut self);
}

/// Collaborator: запросы к navmesh
pub trait NavigationQuery: Send + Sync {
    fn nearest_walkable_point(&self, approximate: Vec3) -> Vec3;
}

#[derive(Resource)]
pub struct SteeringBackend(pub Box<dyn SteeringService>);

impl SteeringBackend {
    pub fn new(service: impl SteeringService + 'static) -> Self {
        Self(Box::new(service))
    }
}

#[derive(Resource, Clone)]
pub struct NavigationBackend(pub Arc<dyn NavigationQuery>);

impl NavigationBackend {
    pub fn nearest_walkable_point(&self, approximate: Vec3) -> Vec3 {
        self.0.nearest_walkable_point(approximate)
    }
}

/// Navigation Plugin
///
/// Вставляет headless collaborators, если хост не предоставил свои:
/// FloorGrid из LevelConfig → NavigationBackend → Crowd.
/// Шаг crowd и sync Transform - в `SimulationSet::Steering`.
pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelConfig>()
            .init_resource::<AgentParams>()
            .init_resource::<CrowdConfig>();

        if !app.world().contains_resource::<FloorGrid>() {
            let floor = FloorGrid::from_level(app.world().resource::<LevelConfig>());
            app.insert_resource(floor);
        }

        if !app.world().contains_resource::<NavigationBackend>() {
            let floor = app.world().resource::<FloorGrid>().clone();
            app.insert_resource(NavigationBackend(Arc::new(floor)));
        }

        if !app.world().contains_resource::<SteeringBackend>() {
            let navigation = app.world().resource::<NavigationBackend>().0.clone();
            let config = app.world().resource::<CrowdConfig>().clone();
            app.insert_resource(SteeringBackend::new(Crowd::new(config, navigation)));
        }

        app.add_systems(
            Update,
            (step_steering, sync_agent_transforms)
                .chain()
                .in_set(SimulationSet::Steering),
        );
    }
}

/// Система: шаг steering service
pub fn step_steering(time: Res<Time>, mut steering: ResMut<SteeringBackend>) {
    steering.0.update(time.delta_secs());
}

/// Система: позиция агента из crowd → Transform актора
pub fn sync_agent_transforms(
    steering: Res<SteeringBackend>,
    mut agents: Query<(&AgentHandle, &mut Transform)>,
) {
    for (handle, mut transform) in agents.iter_mut() {
        if let Ok(position) = steering.0.position(*handle) {
            if transform.translation != position {
                transform.translation = position;
            }
        }
    }
}
