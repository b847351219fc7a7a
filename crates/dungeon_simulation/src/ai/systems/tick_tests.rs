//! agent_behavior_tick: изоляция ошибок steering между агентами

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use super::behavior::agent_behavior_tick;
use crate::ai::{BehaviorRecord, BehaviorState};
use crate::animation::{AnimationCall, AnimationBackend, AnimationGroups, AnimationSlots, RecordingAnimator};
use crate::assets::AnimationClip;
use crate::components::{Facing, InstanceHandle, Player};
use crate::config::{AgentParams, BehaviorConfig};
use crate::error::SteeringError;
use crate::navigation::{AgentHandle, FloorGrid, NavigationBackend, SteeringBackend, SteeringService};

/// Steering, который "потерял" один handle: position/velocity/команды → UnknownAgent
struct LossySteering {
    positions: HashMap<AgentHandle, Vec3>,
    lost: AgentHandle,
    commands: Arc<Mutex<Vec<AgentHandle>>>,
}

impl LossySteering {
    fn check(&self, agent: AgentHandle) -> Result<(), SteeringError> {
        if agent == self.lost || !self.positions.contains_key(&agent) {
            return Err(SteeringError::UnknownAgent(agent));
        }
        Ok(())
    }
}

impl SteeringService for LossySteering {
    fn register_agent(&mut self, _: Vec3, _: &AgentParams) -> Result<AgentHandle, SteeringError> {
        unreachable!("agents are registered up front")
    }

    fn seek(&mut self, agent: AgentHandle, _: Vec3) -> Result<(), SteeringError> {
        self.check(agent)?;
        self.commands.lock().unwrap().push(agent);
        Ok(())
    }

    fn teleport(&mut self, agent: AgentHandle, _: Vec3) -> Result<(), SteeringError> {
        self.check(agent)?;
        self.commands.lock().unwrap().push(agent);
        Ok(())
    }

    fn velocity(&self, agent: AgentHandle) -> Result<Vec3, SteeringError> {
        self.check(agent)?;
        Ok(Vec3::ZERO)
    }

    fn position(&self, agent: AgentHandle) -> Result<Vec3, SteeringError> {
        self.check(agent)?;
        Ok(self.positions[&agent])
    }

    fn agent_handles(&self) -> Vec<AgentHandle> {
        let mut handles: Vec<_> = self.positions.keys().copied().collect();
        handles.sort();
        handles
    }

    fn update(&mut self, _: f32) {}

    fn clear(&mut self) {
        self.positions.clear();
    }
}

fn slots() -> AnimationSlots {
    let clips: Vec<_> = ["Attack", "Idle", "Run", "Walk"]
        .into_iter()
        .map(AnimationClip::new)
        .collect();
    AnimationSlots::resolve("deathknight", &clips).unwrap()
}

#[test]
fn test_unknown_agent_is_skipped_without_mutation() {
    let healthy = AgentHandle(0);
    let lost = AgentHandle(1);
    let agent_position = Vec3::new(10.0, 0.0, 10.0);
    let commands = Arc::new(Mutex::new(Vec::new()));
    let animator = RecordingAnimator::new();

    let mut app = App::new();
    app.insert_resource(BehaviorConfig::default())
        .insert_resource(NavigationBackend(Arc::new(FloorGrid::new(10, 10, 7.2))))
        .insert_resource(SteeringBackend::new(LossySteering {
            positions: HashMap::from([(healthy, agent_position), (lost, agent_position)]),
            lost,
            commands: commands.clone(),
        }))
        .insert_resource(AnimationBackend::new(animator.clone()))
        .add_systems(Update, agent_behavior_tick);

    // Игрок в attack band обоих агентов (d = 5 по +X)
    app.world_mut().spawn((
        Player,
        Transform::from_translation(agent_position + Vec3::new(5.0, 0.0, 0.0)),
    ));

    let spawn_agent = |app: &mut App, handle: AgentHandle, instance: u32| {
        app.world_mut()
            .spawn((
                handle,
                BehaviorRecord::new(handle),
                AnimationGroups::new(InstanceHandle(instance), slots()),
                Facing::default(),
                Transform::from_translation(agent_position),
            ))
            .id()
    };
    let healthy_entity = spawn_agent(&mut app, healthy, 10);
    let lost_entity = spawn_agent(&mut app, lost, 11);

    app.update();

    // Здоровый агент: IDLE → ATTACKING, snap, анимация, поворот
    let record = app.world().get::<BehaviorRecord>(healthy_entity).unwrap();
    assert_eq!(record.state, BehaviorState::Attacking);
    assert!(record.reached_destination);
    assert!(app.world().get::<Facing>(healthy_entity).unwrap().yaw > 0.0);

    // Потерянный агент: record, facing и transform не тронуты
    assert_eq!(
        app.world().get::<BehaviorRecord>(lost_entity),
        Some(&BehaviorRecord::new(lost))
    );
    assert_eq!(app.world().get::<Facing>(lost_entity), Some(&Facing::default()));
    assert_eq!(
        app.world().get::<Transform>(lost_entity).unwrap().rotation,
        Quat::IDENTITY
    );

    assert_eq!(*commands.lock().unwrap(), vec![healthy]);
    assert!(animator.calls_for(InstanceHandle(11)).is_empty());
    assert_eq!(
        animator.calls_for(InstanceHandle(10)),
        vec![
            AnimationCall::StopAll {
                instance: InstanceHandle(10)
            },
            AnimationCall::StartClip {
                instance: InstanceHandle(10),
                clip_index: 0,
                looping: true,
            },
        ]
    );
}
