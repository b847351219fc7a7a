//! LevelProvisioningState - счётчики уровня + latches gate
//!
//! Инварианты (в пределах уровня):
//! - `actors_available` монотонно растёт
//! - `ready` ставится ровно один раз, когда actors_available == expected_actor_count
//! - `initialized` ставится ровно один раз, строго после `ready`
//! - сброс только через `reset()` при старте нового уровня

use bevy::prelude::*;

use crate::error::GateError;

/// Фаза gate (производная от latches)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatePhase {
    /// Акторы ещё грузятся
    Loading,
    /// Все ожидаемые акторы заспавнены, регистрация на следующем кадре
    Ready,
    /// Агенты зарегистрированы, behavior тикает
    Running,
}

#[derive(Resource, Debug, Default)]
pub struct LevelProvisioningState {
    /// false до первого старта уровня - gate не оценивается
    level_started: bool,
    actors_available: usize,
    expected_actor_count: usize,
    ready: bool,
    initialized: bool,
    /// Заспавненные instances в порядке спавна
    spawned: Vec<Entity>,
    /// Слоты, снятые из-за ошибок загрузки / нехватки тайлов
    released_slots: usize,
    halted: Option<GateError>,
}

impl LevelProvisioningState {
    pub fn new(expected_actor_count: usize) -> Self {
        Self {
            level_started: true,
            expected_actor_count,
            ..Default::default()
        }
    }

    /// resetLevel: очищает все per-level коллекции, счётчики и флаги
    pub fn reset(&mut self, expected_actor_count: usize) {
        *self = Self::new(expected_actor_count);
    }

    pub fn phase(&self) -> GatePhase {
        if self.initialized {
            GatePhase::Running
        } else if self.ready {
            GatePhase::Ready
        } else {
            GatePhase::Loading
        }
    }

    pub fn is_level_started(&self) -> bool {
        self.level_started
    }

    pub fn actors_available(&self) -> usize {
        self.actors_available
    }

    pub fn expected_actor_count(&self) -> usize {
        self.expected_actor_count
    }

    pub fn spawned(&self) -> &[Entity] {
        &self.spawned
    }

    pub fn released_slots(&self) -> usize {
        self.released_slots
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn halted(&self) -> Option<&GateError> {
        self.halted.as_ref()
    }

    pub(crate) fn record_spawn(&mut self, entity: Entity) {
        self.spawned.push(entity);
        self.actors_available += 1;
    }

    /// requestActor вне старта уровня: +1 к ожидаемым, только пока уровень в LOADING.
    /// false - запрос надо отклонить (уровня нет или gate уже READY/RUNNING).
    pub(crate) fn accept_extra_actor(&mut self) -> bool {
        if !self.level_started || self.ready {
            return false;
        }
        self.expected_actor_count += 1;
        true
    }

    /// Слот актора, который никогда не появится (не блокируем gate навсегда)
    pub(crate) fn release_slot(&mut self) {
        if self.ready {
            return;
        }
        self.expected_actor_count = self.expected_actor_count.saturating_sub(1);
        self.released_slots += 1;
    }

    /// LOADING → READY; идемпотентно. Возвращает true только на самом переходе.
    pub(crate) fn try_mark_ready(&mut self) -> bool {
        if !self.level_started
            || self.ready
            || self.actors_available != self.expected_actor_count
        {
            return false;
        }
        self.ready = true;
        true
    }

    pub(crate) fn mark_initialized(&mut self) {
        debug_assert!(self.ready, "initialized latch before ready latch");
        self.initialized = true;
    }

    pub(crate) fn halt(&mut self, error: GateError) {
        self.halted = Some(error);
    }
}
