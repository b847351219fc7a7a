//! SimulationGate - readiness latch + one-time регистрация агентов
//!
//! Агенты не создаются для частично загруженного уровня: регистрация в steering
//! происходит один раз, когда заспавнены все ожидаемые акторы.

use bevy::prelude::*;

pub mod registration;
pub mod state;

#[cfg(test)]
mod registration_tests;

pub use registration::advance_simulation_gate;
pub use state::{GatePhase, LevelProvisioningState};

use crate::SimulationSet;

/// Run condition: behavior тикает только в фазе Running
pub fn gate_is_running(level: Res<LevelProvisioningState>) -> bool {
    level.phase() == GatePhase::Running
}

/// Gate Plugin
pub struct GatePlugin;

impl Plugin for GatePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelProvisioningState>()
            .init_resource::<crate::config::AgentParams>()
            .add_systems(Update, advance_simulation_gate.in_set(SimulationSet::Gate));
    }
}
