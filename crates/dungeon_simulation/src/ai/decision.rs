//! Behavior FSM decision (pure function, без ECS)
//!
//! Порядок веток важен - пороги перекрываются на границах:
//! 1. walk band `walk_band_min <= d < walk_band_max` и `v > walk_min_speed` → WALKING
//! 2. `d > approach_distance` → seek к игроку; RUNNING только если ещё `v > run_min_speed` и `d > run_distance`
//! 3. `d < attack_distance` → ATTACKING (+ одноразовый snap на месте)
//! 4. иначе → IDLE

use super::components::{BehaviorRecord, BehaviorState};
use crate::config::BehaviorConfig;

/// Команда steering service на этот тик
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteeringAction {
    /// Ничего не отправляем (агент продолжает последнюю команду)
    None,
    /// seek к nearest walkable point игрока
    SeekPlayer,
    /// teleport в nearest walkable point своей позиции (останавливает seek)
    HoldPosition,
}

/// Куда поворачивать yaw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    Keep,
    TowardPlayer,
    AlongVelocity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BehaviorDecision {
    pub next_state: BehaviorState,
    pub steering: SteeringAction,
    pub facing: FacingMode,
    pub reached_destination: bool,
}

/// Решение FSM по planar дистанции до игрока и модулю скорости агента
pub fn decide(
    record: &BehaviorRecord,
    distance: f32,
    speed: f32,
    config: &BehaviorConfig,
) -> BehaviorDecision {
    let in_walk_band = distance >= config.walk_band_min && distance < config.walk_band_max;

    if in_walk_band && speed > config.walk_min_speed {
        return BehaviorDecision {
            next_state: BehaviorState::Walking,
            steering: SteeringAction::None,
            facing: FacingMode::TowardPlayer,
            reached_destination: record.reached_destination,
        };
    }

    if distance > config.approach_distance {
        let running = speed > config.run_min_speed && distance > config.run_distance;
        return BehaviorDecision {
            // Approach без смены состояния/анимации, пока не разогнались
            next_state: if running {
                BehaviorState::Running
            } else {
                record.state
            },
            steering: SteeringAction::SeekPlayer,
            facing: if running {
                FacingMode::AlongVelocity
            } else {
                FacingMode::Keep
            },
            reached_destination: false,
        };
    }

    if distance < config.attack_distance {
        return BehaviorDecision {
            next_state: BehaviorState::Attacking,
            steering: if record.reached_destination {
                SteeringAction::None
            } else {
                SteeringAction::HoldPosition
            },
            facing: FacingMode::TowardPlayer,
            reached_destination: true,
        };
    }

    BehaviorDecision {
        next_state: BehaviorState::Idle,
        steering: SteeringAction::None,
        facing: FacingMode::Keep,
        reached_destination: record.reached_destination,
    }
}
