//! Crowd - headless steering service
//!
//! Упрощённая crowd-симуляция поверх NavigationQuery:
//! - seek: разгон к цели (max_acceleration, max_speed), остановка в arrival_radius
//! - separation: расталкивание перекрывающихся агентов (separation_weight)
//! - позиция после шага всегда проецируется на walkable поверхность
//!
//! Handles = индексы в `agents`, стабильны после регистрации (удаления нет, только clear).

use std::sync::Arc;

use bevy::prelude::*;

use super::{AgentHandle, NavigationQuery, SteeringService};
use crate::config::{AgentParams, CrowdConfig};
use crate::error::SteeringError;

#[derive(Debug, Clone)]
struct CrowdAgent {
    position: Vec3,
    velocity: Vec3,
    target: Option<Vec3>,
    params: AgentParams,
}

pub struct Crowd {
    config: CrowdConfig,
    navigation: Arc<dyn NavigationQuery>,
    agents: Vec<CrowdAgent>,
}

impl Crowd {
    pub fn new(config: CrowdConfig, navigation: Arc<dyn NavigationQuery>) -> Self {
        Self {
            config,
            navigation,
            agents: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Текущая цель seek (None - стоим)
    pub fn target(&self, agent: AgentHandle) -> Result<Option<Vec3>, SteeringError> {
        Ok(self.agent(agent)?.target)
    }

    fn agent(&self, agent: AgentHandle) -> Result<&CrowdAgent, SteeringError> {
        self.agents
            .get(agent.0 as usize)
            .ok_or(SteeringError::UnknownAgent(agent))
    }

    fn agent_mut(&mut self, agent: AgentHandle) -> Result<&mut CrowdAgent, SteeringError> {
        self.agents
            .get_mut(agent.0 as usize)
            .ok_or(SteeringError::UnknownAgent(agent))
    }
}

impl SteeringService for Crowd {
    fn register_agent(
        &mut self,
        position: Vec3,
        params: &AgentParams,
    ) -> Result<AgentHandle, SteeringError> {
        if self.agents.len() >= self.config.max_agents {
            return Err(SteeringError::CrowdFull {
                max_agents: self.config.max_agents,
            });
        }

        let mut params = params.clone();
        params.radius = params.radius.min(self.config.max_agent_radius);

        let handle = AgentHandle(self.agents.len() as u32);
        self.agents.push(CrowdAgent {
            position: self.navigation.nearest_walkable_point(position),
            velocity: Vec3::ZERO,
            target: None,
            params,
        });

        Ok(handle)
    }

    fn seek(&mut self, agent: AgentHandle, target: Vec3) -> Result<(), SteeringError> {
        let target = self.navigation.nearest_walkable_point(target);
        self.agent_mut(agent)?.target = Some(target);
        Ok(())
    }

    fn teleport(&mut self, agent: AgentHandle, position: Vec3) -> Result<(), SteeringError> {
        let agent = self.agent_mut(agent)?;
        agent.position = position;
        agent.velocity = Vec3::ZERO;
        agent.target = None;
        Ok(())
    }

    fn velocity(&self, agent: AgentHandle) -> Result<Vec3, SteeringError> {
        Ok(self.agent(agent)?.velocity)
    }

    fn position(&self, agent: AgentHandle) -> Result<Vec3, SteeringError> {
        Ok(self.agent(agent)?.position)
    }

    fn agent_handles(&self) -> Vec<AgentHandle> {
        (0..self.agents.len() as u32).map(AgentHandle).collect()
    }

    fn update(&mut self, delta: f32) {
        if delta <= 0.0 {
            return;
        }

        let snapshot: Vec<(Vec3, f32)> = self
            .agents
            .iter()
            .map(|agent| (agent.position, agent.params.radius))
            .collect();

        for (index, agent) in self.agents.iter_mut().enumerate() {
            let params = &agent.params;
            let mut desired = Vec3::ZERO;

            if let Some(target) = agent.target {
                let to_target = Vec3::new(target.x - agent.position.x, 0.0, target.z - agent.position.z);
                let distance = to_target.length();

                if distance <= self.config.arrival_radius {
                    agent.target = None;
                    crate::log(&format!("agent #{} reached destination", index));
                } else {
                    // Не перелетаем цель за один шаг
                    let speed = params.max_speed.min(distance / delta);
                    desired = to_target / distance * speed;
                }
            }

            // Separation: только перекрывающиеся агенты внутри collision_query_range
            let mut push = Vec3::ZERO;
            for (other_index, &(other_position, other_radius)) in snapshot.iter().enumerate() {
                if other_index == index {
                    continue;
                }

                let offset = Vec3::new(
                    agent.position.x - other_position.x,
                    0.0,
                    agent.position.z - other_position.z,
                );
                let distance = offset.length();
                let min_distance = params.radius + other_radius;

                if distance > 0.001
                    && distance < params.collision_query_range
                    && distance < min_distance
                {
                    push += offset / distance * ((min_distance - distance) / min_distance);
                }
            }
            desired += push * params.separation_weight * params.max_speed;

            let mut delta_velocity = desired - agent.velocity;
            let max_delta_velocity = params.max_acceleration * delta;
            if delta_velocity.length() > max_delta_velocity {
                delta_velocity = delta_velocity.normalize() * max_delta_velocity;
            }

            agent.velocity = (agent.velocity + delta_velocity).clamp_length_max(params.max_speed);
            agent.position = self
                .navigation
                .nearest_walkable_point(agent.position + agent.velocity * delta);
        }
    }

    fn clear(&mut self) {
        self.agents.clear();
    }
}
