//! Конфигурация симуляции (tunables)
//!
//! Все значения по умолчанию - настроенное поведение игры, менять осторожно:
//! пороги дистанций и операторы сравнения в behavior FSM подобраны вручную.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Параметры behavior FSM (дистанции в метрах, углы в радианах за тик)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// `d < attack_distance` → ATTACKING
    pub attack_distance: f32,
    /// Нижняя граница walk band (включительно)
    pub walk_band_min: f32,
    /// Верхняя граница walk band (исключительно)
    pub walk_band_max: f32,
    /// `d > approach_distance` → seek к игроку
    pub approach_distance: f32,
    /// `d > run_distance` (и достаточная скорость) → RUNNING
    pub run_distance: f32,
    /// Минимальная скорость для WALKING
    pub walk_min_speed: f32,
    /// Минимальная скорость для RUNNING
    pub run_min_speed: f32,
    /// Dead-zone поворота к игроку
    pub heading_dead_zone: f32,
    /// Фиксированный шаг поворота к игроку (рад/тик)
    pub turn_rate: f32,
    /// Blend factor поворота по направлению движения (за тик)
    pub run_facing_blend: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            attack_distance: 8.0,
            walk_band_min: 12.0,
            walk_band_max: 18.0,
            approach_distance: 18.0,
            run_distance: 24.0,
            walk_min_speed: 4.0,
            run_min_speed: 0.2,
            heading_dead_zone: 0.02,
            turn_rate: 0.04,
            run_facing_blend: 0.05,
        }
    }
}

/// Параметры регистрации агента в crowd
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentParams {
    pub radius: f32,
    pub height: f32,
    pub max_acceleration: f32,
    pub max_speed: f32,
    pub collision_query_range: f32,
    pub path_optimization_range: f32,
    pub separation_weight: f32,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            radius: 2.0,
            height: 7.2,
            max_acceleration: 1000.0,
            max_speed: 10.0,
            collision_query_range: 9.0,
            path_optimization_range: 0.0,
            separation_weight: 1.0,
        }
    }
}

/// Параметры headless crowd
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrowdConfig {
    pub max_agents: usize,
    pub max_agent_radius: f32,
    /// Радиус, внутри которого seek считается завершённым
    pub arrival_radius: f32,
}

impl Default for CrowdConfig {
    fn default() -> Self {
        Self {
            max_agents: 10,
            max_agent_radius: 3.6,
            arrival_radius: 0.5,
        }
    }
}

/// Параметры загрузки character assets
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Blend speed между анимациями (применяется один раз на template)
    pub animation_blend_speed: f32,
    /// Высота, на которой появляется новый instance (до snap на navmesh)
    pub spawn_height: f32,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            animation_blend_speed: 0.1,
            spawn_height: 9.1,
        }
    }
}

/// Состав уровня + геометрия пола
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Character keys акторов уровня (по одному instance на запись)
    pub actors: Vec<String>,
    pub floor_columns: u32,
    pub floor_rows: u32,
    pub tile_size: f32,
    pub rng_seed: u64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            actors: vec!["deathknight".to_string(); 3],
            floor_columns: 10,
            floor_rows: 10,
            tile_size: 7.2,
            rng_seed: 42,
        }
    }
}

/// Все конфиги разом (для загрузки из JSON)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub behavior: BehaviorConfig,
    pub agent: AgentParams,
    pub crowd: CrowdConfig,
    pub assets: AssetConfig,
    pub level: LevelConfig,
}

impl SimulationConfig {
    /// Парсит JSON; отсутствующие поля берутся из Default
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Вставляет все конфиги как resources (перезаписывает существующие)
    pub fn insert_into(self, app: &mut App) {
        app.insert_resource(self.behavior)
            .insert_resource(self.agent)
            .insert_resource(self.crowd)
            .insert_resource(self.assets)
            .insert_resource(self.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_behavior_defaults_keep_tuned_thresholds() {
        let config = BehaviorConfig::default();
        assert_eq!(config.attack_distance, 8.0);
        assert_eq!(config.walk_band_min, 12.0);
        assert_eq!(config.walk_band_max, 18.0);
        assert_eq!(config.approach_distance, 18.0);
        assert_eq!(config.run_distance, 24.0);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let json = r#"{ "behavior": { "turn_rate": 0.1 }, "level": { "actors": ["ghoul"] } }"#;
        let config = SimulationConfig::from_json_str(json).unwrap();

        assert_eq!(config.behavior.turn_rate, 0.1);
        assert_eq!(config.behavior.attack_distance, 8.0);
        assert_eq!(config.level.actors, vec!["ghoul".to_string()]);
        assert_eq!(config.level.floor_columns, 10);
        assert_eq!(config.agent, AgentParams::default());
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let result = SimulationConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }
}
