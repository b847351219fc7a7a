//! Gate registration tests (headless App с одной системой gate)

use std::sync::Arc;

use bevy::prelude::*;

use super::registration::advance_simulation_gate;
use super::state::{GatePhase, LevelProvisioningState};
use crate::ai::BehaviorRecord;
use crate::components::{ActorInstance, InstanceHandle};
use crate::config::{AgentParams, CrowdConfig};
use crate::error::GateError;
use crate::navigation::{AgentHandle, Crowd, FloorGrid, NavigationBackend, NavigationQuery, SteeringBackend};

/// App с gate и заспавненными instances: (instance handle, уже зарегистрирован)
fn gate_app(actors: &[(u32, bool)]) -> App {
    let navigation: Arc<dyn NavigationQuery> = Arc::new(FloorGrid::new(10, 10, 7.2));

    let mut app = App::new();
    app.insert_resource(AgentParams::default())
        .insert_resource(NavigationBackend(navigation.clone()))
        .insert_resource(SteeringBackend::new(Crowd::new(
            CrowdConfig::default(),
            navigation,
        )))
        .add_systems(Update, advance_simulation_gate);

    let mut level = LevelProvisioningState::new(actors.len());
    for (i, &(instance, registered)) in actors.iter().enumerate() {
        let mut actor = ActorInstance::new(InstanceHandle(instance), "deathknight");
        actor.registered_with_steering = registered;

        let entity = app
            .world_mut()
            .spawn((actor, Transform::from_xyz(3.6 + 7.2 * i as f32, 7.2, 3.6)))
            .id();
        level.record_spawn(entity);
    }
    app.insert_resource(level);

    app
}

fn agent_count(app: &App) -> usize {
    app.world().resource::<SteeringBackend>().0.agent_handles().len()
}

fn record_count(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query::<&BehaviorRecord>().iter(world).count()
}

#[test]
fn test_gate_registers_each_instance_once() {
    let mut app = gate_app(&[(1, false), (2, false)]);

    app.update();
    assert_eq!(app.world().resource::<LevelProvisioningState>().phase(), GatePhase::Ready);
    assert_eq!(agent_count(&app), 0);

    app.update();
    assert_eq!(app.world().resource::<LevelProvisioningState>().phase(), GatePhase::Running);
    assert_eq!(agent_count(&app), 2);

    let world = app.world_mut();
    let mut query = world.query::<(&ActorInstance, &AgentHandle, &BehaviorRecord, &Transform)>();
    for (instance, handle, record, transform) in query.iter(world) {
        assert!(instance.registered_with_steering);
        assert_eq!(record.agent, *handle);
        // Transform ещё с высоты спавна - регистрация по snap (x, 0, z)
        assert_eq!(transform.translation.y, 7.2);
    }

    for _ in 0..5 {
        app.update();
    }
    assert_eq!(agent_count(&app), 2);
    assert_eq!(record_count(&mut app), 2);
}

#[test]
fn test_already_registered_instance_halts_gate() {
    let mut app = gate_app(&[(1, false), (2, true)]);

    for _ in 0..5 {
        app.update();
    }

    let level = app.world().resource::<LevelProvisioningState>();
    assert_eq!(
        level.halted(),
        Some(&GateError::DuplicateRegistration { instance: 2 })
    );
    assert_eq!(level.phase(), GatePhase::Ready);

    // Ни одного агента: регистрация не начиналась
    assert_eq!(agent_count(&app), 0);
    assert_eq!(record_count(&mut app), 0);
}

#[test]
fn test_repeated_instance_handle_halts_gate() {
    let mut app = gate_app(&[(7, false), (8, false), (7, false)]);

    for _ in 0..5 {
        app.update();
    }

    let level = app.world().resource::<LevelProvisioningState>();
    assert_eq!(
        level.halted(),
        Some(&GateError::DuplicateRegistration { instance: 7 })
    );
    assert_ne!(level.phase(), GatePhase::Running);
    assert_eq!(agent_count(&app), 0);
    assert_eq!(record_count(&mut app), 0);
}
