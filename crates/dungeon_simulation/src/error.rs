//! Ошибки симуляции (по доменам)
//!
//! Ни одна из них не должна ронять frame loop:
//! - AssetLoadError - локальна для одного actor slot
//! - SteeringError - пропуск тика одного агента
//! - GateError - останавливает gate, без повторной регистрации

use thiserror::Error;

use crate::navigation::AgentHandle;

/// Ошибка загрузки character asset (fatal для конкретного ключа)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssetLoadError {
    #[error("character asset '{key}' not found")]
    NotFound { key: String },

    #[error("character asset '{key}' failed to decode: {reason}")]
    Decode { key: String, reason: String },

    #[error("character asset '{key}' has no clip for {slot} (loaded {clip_count} clips)")]
    MissingClip {
        key: String,
        slot: &'static str,
        clip_count: usize,
    },

    #[error("load task for '{key}' was dropped before completion")]
    TaskDropped { key: String },
}

impl AssetLoadError {
    pub fn key(&self) -> &str {
        match self {
            AssetLoadError::NotFound { key }
            | AssetLoadError::Decode { key, .. }
            | AssetLoadError::MissingClip { key, .. }
            | AssetLoadError::TaskDropped { key } => key,
        }
    }
}

/// Ошибки steering service (crowd)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SteeringError {
    #[error("unknown agent {0:?}")]
    UnknownAgent(AgentHandle),

    #[error("crowd is full ({max_agents} agents)")]
    CrowdFull { max_agents: usize },
}

/// Нарушение инварианта one-time registration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GateError {
    #[error("actor instance {instance} is already registered with steering")]
    DuplicateRegistration { instance: u32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}
