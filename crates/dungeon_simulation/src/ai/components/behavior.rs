//! Behavior components (state machine record per registered agent).

use bevy::prelude::*;

use crate::animation::AnimationSlot;
use crate::navigation::AgentHandle;

/// Behavior FSM состояния
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum BehaviorState {
    /// Начальное состояние после регистрации (и mid-range idle band)
    #[default]
    Idle,
    /// Walk band, смотрим на игрока
    Walking,
    /// Далеко и быстро движемся - смотрим по направлению движения
    Running,
    /// Вплотную к игроку
    Attacking,
}

impl BehaviorState {
    /// Animation group, которая запускается при входе в состояние
    pub fn animation_slot(&self) -> AnimationSlot {
        match self {
            BehaviorState::Idle => AnimationSlot::Idle,
            BehaviorState::Walking => AnimationSlot::Walk,
            BehaviorState::Running => AnimationSlot::Run,
            BehaviorState::Attacking => AnimationSlot::Attack,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorState::Idle => "IDLE",
            BehaviorState::Walking => "WALKING",
            BehaviorState::Running => "RUNNING",
            BehaviorState::Attacking => "ATTACKING",
        }
    }
}

/// Per-agent состояние FSM
///
/// Создаётся SimulationGate при регистрации (IDLE, reached = false),
/// мутируется только `agent_behavior_tick`, живёт до конца уровня.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct BehaviorRecord {
    /// Handle в steering service (матчинг по значению, не по позиции в списке)
    pub agent: AgentHandle,
    pub state: BehaviorState,
    /// true после snap в attack band, сбрасывается при уходе в approach
    pub reached_destination: bool,
}

impl BehaviorRecord {
    pub fn new(agent: AgentHandle) -> Self {
        Self {
            agent,
            state: BehaviorState::Idle,
            reached_destination: false,
        }
    }
}
