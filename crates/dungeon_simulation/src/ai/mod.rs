//! AI decision-making module
//!
//! Behavior FSM для агентов подземелья: IDLE / WALKING / RUNNING / ATTACKING
//! по planar дистанции до игрока и скорости агента.
//!
//! - components: BehaviorState, BehaviorRecord
//! - decision: чистая функция перехода (без ECS)
//! - heading: yaw math (shortest arc, dead zone)
//! - systems: agent_behavior_tick

use bevy::prelude::*;

pub mod components;
pub mod decision;
pub mod heading;
pub mod systems;


// Re-export основных типов
pub use components::{BehaviorRecord, BehaviorState};
pub use decision::{decide, BehaviorDecision, FacingMode, SteeringAction};
pub use systems::agent_behavior_tick;

use crate::animation::{AnimationBackend, RecordingAnimator};
use crate::config::BehaviorConfig;
use crate::gate::gate_is_running;
use crate::SimulationSet;

/// AI Plugin
///
/// Behavior tick идёт в `SimulationSet::Behavior` (после gate и шага steering)
/// и только когда gate в фазе Running.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BehaviorConfig>();

        if !app.world().contains_resource::<AnimationBackend>() {
            app.insert_resource(AnimationBackend::new(RecordingAnimator::new()));
        }

        app.add_systems(
            Update,
            agent_behavior_tick
                .in_set(SimulationSet::Behavior)
                .run_if(gate_is_running),
        );
    }
}
