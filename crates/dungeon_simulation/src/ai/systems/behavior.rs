//! Behavior tick: player/agent spatial state → FSM → steering + animation + facing

use std::collections::HashMap;

use bevy::prelude::*;

use crate::ai::components::BehaviorRecord;
use crate::ai::decision::{decide, FacingMode, SteeringAction};
use crate::ai::heading::{blend_toward, heading_along, heading_to, turn_toward};
use crate::animation::{AnimationBackend, AnimationGroups};
use crate::components::{Facing, Player};
use crate::config::BehaviorConfig;
use crate::navigation::{NavigationBackend, SteeringBackend};

/// Система: один тик behavior FSM для каждого зарегистрированного агента
///
/// Обход - по handles steering service; BehaviorRecord ищется по сохранённому
/// `agent`, а не по позиции в списке.
///
/// Изоляция ошибок: если steering не знает handle или отклонил команду,
/// агент пропускается без мутации BehaviorRecord, остальные тикают дальше.
pub fn agent_behavior_tick(
    config: Res<BehaviorConfig>,
    navigation: Res<NavigationBackend>,
    mut steering: ResMut<SteeringBackend>,
    mut animation: ResMut<AnimationBackend>,
    player: Query<&Transform, With<Player>>,
    mut agents: Query<
        (
            Entity,
            &mut BehaviorRecord,
            &AnimationGroups,
            &mut Facing,
            &mut Transform,
        ),
        Without<Player>,
    >,
) {
    // MissingPlayerReference: камера ещё не активна - тик no-op
    let Ok(player_transform) = player.single() else {
        return;
    };
    let player_position = player_transform.translation;

    let by_handle: HashMap<_, _> = agents
        .iter()
        .map(|(entity, record, ..)| (record.agent, entity))
        .collect();

    for handle in steering.0.agent_handles() {
        let Some(&entity) = by_handle.get(&handle) else {
            continue;
        };
        let Ok((_, mut record, groups, mut facing, mut transform)) = agents.get_mut(entity) else {
            continue;
        };

        let (position, velocity) = match (steering.0.position(handle), steering.0.velocity(handle)) {
            (Ok(position), Ok(velocity)) => (position, velocity),
            (Err(err), _) | (_, Err(err)) => {
                crate::log_warning(&format!("⚠️ Behavior tick skipped for agent #{}: {}", handle.0, err));
                continue;
            }
        };

        let distance = Vec2::new(
            player_position.x - position.x,
            player_position.z - position.z,
        )
        .length();
        let speed = velocity.length();

        let decision = decide(&record, distance, speed, &config);

        let command = match decision.steering {
            SteeringAction::None => Ok(()),
            SteeringAction::SeekPlayer => {
                let target = navigation.nearest_walkable_point(Vec3::new(
                    player_position.x,
                    0.0,
                    player_position.z,
                ));
                steering.0.seek(handle, target)
            }
            SteeringAction::HoldPosition => {
                let snap = navigation.nearest_walkable_point(Vec3::new(position.x, 0.0, position.z));
                steering.0.teleport(handle, snap)
            }
        };

        if let Err(err) = command {
            crate::log_warning(&format!(
                "⚠️ Steering command rejected for agent #{}: {}",
                handle.0, err
            ));
            continue;
        }

        let previous = record.state;
        record.state = decision.next_state;
        record.reached_destination = decision.reached_destination;

        // Edge-triggered: анимация только на смену состояния
        if previous != decision.next_state {
            groups.transition_to(&mut *animation.0, decision.next_state.animation_slot());
            crate::log(&format!(
                "🧠 Agent #{}: {} → {} (d={:.1}, v={:.1})",
                handle.0,
                previous.as_str(),
                decision.next_state.as_str(),
                distance,
                speed
            ));
        }

        let yaw = match decision.facing {
            FacingMode::Keep => facing.yaw,
            FacingMode::TowardPlayer => turn_toward(
                facing.yaw,
                heading_to(position, player_position),
                config.turn_rate,
                config.heading_dead_zone,
            ),
            FacingMode::AlongVelocity => match heading_along(velocity) {
                Some(desired) => blend_toward(facing.yaw, desired, config.run_facing_blend),
                None => facing.yaw,
            },
        };

        if yaw != facing.yaw {
            facing.yaw = yaw;
            transform.rotation = facing.rotation();
        }
    }
}
