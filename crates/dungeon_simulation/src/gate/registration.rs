//! One-time registration pass: spawned instances → steering agents + BehaviorRecord

use std::collections::HashSet;

use bevy::prelude::*;

use super::state::LevelProvisioningState;
use crate::ai::BehaviorRecord;
use crate::components::ActorInstance;
use crate::config::AgentParams;
use crate::error::GateError;
use crate::navigation::{NavigationBackend, SteeringBackend};

/// Система: LOADING → READY → RUNNING
///
/// Кадр N: actors_available == expected → READY (latch).
/// Кадр N+1: регистрация всех заспавненных instances ровно один раз → RUNNING.
/// После RUNNING система - no-op до следующего `reset`.
pub fn advance_simulation_gate(
    mut commands: Commands,
    mut level: ResMut<LevelProvisioningState>,
    params: Res<AgentParams>,
    navigation: Res<NavigationBackend>,
    mut steering: ResMut<SteeringBackend>,
    mut instances: Query<(&mut ActorInstance, &Transform)>,
) {
    if level.is_initialized() || level.halted().is_some() {
        return;
    }

    if !level.is_ready() {
        if level.try_mark_ready() {
            crate::log_info(&format!(
                "🚦 Gate READY: {}/{} actors spawned",
                level.actors_available(),
                level.expected_actor_count()
            ));
        }
        return;
    }

    let spawned = level.spawned().to_vec();

    if let Err(err) = validate_unregistered(&spawned, &instances) {
        crate::log_error(&format!("❌ Gate halted: {}", err));
        level.halt(err);
        return;
    }

    let mut registered = 0;

    for entity in spawned {
        let Ok((mut instance, transform)) = instances.get_mut(entity) else {
            crate::log_warning(&format!("⚠️ Spawned actor {:?} vanished before registration", entity));
            continue;
        };

        let position = navigation.nearest_walkable_point(Vec3::new(
            transform.translation.x,
            0.0,
            transform.translation.z,
        ));

        match steering.0.register_agent(position, &params) {
            Ok(handle) => {
                instance.registered_with_steering = true;
                commands
                    .entity(entity)
                    .insert((handle, BehaviorRecord::new(handle)));
                registered += 1;
                crate::log(&format!(
                    "🤖 Agent #{} registered for '{}' instance {} at {:?}",
                    handle.0, instance.template_key, instance.instance.0, position
                ));
            }
            Err(err) => {
                crate::log_error(&format!(
                    "❌ Registration failed for '{}' instance {}: {}",
                    instance.template_key, instance.instance.0, err
                ));
            }
        }
    }

    level.mark_initialized();
    crate::log_info(&format!("🚦 Gate RUNNING: {} agents registered", registered));
}

/// DuplicateRegistration: уже зарегистрированный instance или один instance дважды в списке
fn validate_unregistered(
    spawned: &[Entity],
    instances: &Query<(&mut ActorInstance, &Transform)>,
) -> Result<(), GateError> {
    let mut seen = HashSet::new();

    for &entity in spawned {
        let Ok((instance, _)) = instances.get(entity) else {
            continue;
        };

        if instance.registered_with_steering || !seen.insert(instance.instance) {
            return Err(GateError::DuplicateRegistration {
                instance: instance.instance.0,
            });
        }
    }

    Ok(())
}
