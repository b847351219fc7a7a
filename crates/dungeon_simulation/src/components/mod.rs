//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: заспавненный instance персонажа (ActorInstance, InstanceHandle, Facing)
//! - player: player marker (источник позиции для behavior FSM)
//!
//! Behavior-компоненты (BehaviorRecord) живут в `ai`, агентские handles - в `navigation`.

pub mod actor;
pub mod player;

// Re-exports для удобного импорта
pub use actor::*;
pub use player::*;
