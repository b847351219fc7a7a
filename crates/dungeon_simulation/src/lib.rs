//! Dungeon Simulation Core
//!
//! ECS-симуляция агентов подземелья на Bevy 0.16 (headless).
//!
//! Что внутри:
//! - асинхронная загрузка character templates + provisioning акторов уровня
//! - SimulationGate: регистрация агентов в steering ровно один раз, когда все акторы готовы
//! - behavior FSM агентов (IDLE / WALKING / RUNNING / ATTACKING) + анимации + yaw
//!
//! Рендер, navmesh, декодирование ассетов - внешние collaborators (traits в
//! `assets`, `navigation`, `animation`), здесь только headless реализации.
//!
//! Порядок кадра (Update, chained):
//! Provisioning → Gate → Steering → Behavior

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod animation;
pub mod assets;
pub mod components;
pub mod config;
pub mod error;
pub mod gate;
pub mod logger;
pub mod navigation;
pub mod provisioning;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, BehaviorRecord, BehaviorState};
pub use animation::{AnimationBackend, AnimationGroups, AnimationSlot, RecordingAnimator};
pub use assets::{AssetTemplateCache, AssetsPlugin, CharacterManifest, ManifestAssetLoader};
pub use components::*;
pub use config::{
    AgentParams, AssetConfig, BehaviorConfig, CrowdConfig, LevelConfig, SimulationConfig,
};
pub use error::{AssetLoadError, ConfigError, GateError, SteeringError};
pub use gate::{GatePhase, GatePlugin, LevelProvisioningState};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, LogLevel};
pub use navigation::{AgentHandle, NavigationPlugin, SteeringBackend};
pub use provisioning::{ProvisioningPlugin, SpawnActorRequest, StartLevel};

/// Фазы кадра симуляции (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Level start, requestActor, завершение загрузок, спавн instances
    Provisioning,
    /// LOADING → READY → RUNNING (one-time регистрация агентов)
    Gate,
    /// Шаг crowd + синхронизация Transform
    Steering,
    /// Behavior FSM (только в RUNNING)
    Behavior,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelConfig>();

        // Детерминистичный RNG (если хост не задал seed)
        if !app.world().contains_resource::<DeterministicRng>() {
            let seed = app.world().resource::<LevelConfig>().rng_seed;
            app.insert_resource(DeterministicRng::new(seed));
        }

        // Chain даёт apply_deferred между фазами: агенты, зарегистрированные gate,
        // видны behavior тику в том же кадре
        app.configure_sets(
            Update,
            (
                SimulationSet::Provisioning,
                SimulationSet::Gate,
                SimulationSet::Steering,
                SimulationSet::Behavior,
            )
                .chain(),
        )
        .add_plugins((
            AssetsPlugin,
            NavigationPlugin,
            ProvisioningPlugin,
            GatePlugin,
            AIPlugin,
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Фиксированный шаг кадра headless симуляции
pub const FRAME_DURATION: Duration = Duration::from_nanos(16_666_667);

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время кадра фиксировано (FRAME_DURATION), поэтому шаги crowd не зависят от wall clock.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME_DURATION));

    app
}

/// Снимок агента для сравнения детерминизма
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSnapshot {
    pub agent: AgentHandle,
    pub state: BehaviorState,
    pub reached_destination: bool,
    pub position: Vec3,
    pub yaw: f32,
}

/// Снимок всех зарегистрированных агентов, отсортированный по handle
pub fn agent_snapshot(world: &mut World) -> Vec<AgentSnapshot> {
    let mut query = world.query::<(&BehaviorRecord, &Transform, &Facing)>();
    let mut agents: Vec<_> = query
        .iter(world)
        .map(|(record, transform, facing)| AgentSnapshot {
            agent: record.agent,
            state: record.state,
            reached_destination: record.reached_destination,
            position: transform.translation,
            yaw: facing.yaw,
        })
        .collect();

    agents.sort_by_key(|snapshot| snapshot.agent);
    agents
}
