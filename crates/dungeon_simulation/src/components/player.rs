//! Player marker component
//!
//! Отмечает entity активной точки обзора (камеры игрока).

use bevy::prelude::Component;

/// Marker component для player viewpoint
///
/// Behavior FSM читает `Transform` этого entity каждый тик (read-only).
///
/// # Архитектурная заметка
/// - Ровно один entity с этим компонентом, пока камера активна
/// - Нет entity → тик behavior пропускается (MissingPlayerReference, не ошибка)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
