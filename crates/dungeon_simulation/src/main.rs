//! Headless симуляция подземелья
//!
//! Стартует уровень по умолчанию (3 × deathknight), ждёт открытия gate и водит
//! игрока по кругу через пол, печатая behavior states агентов.
//!
//! Опционально: путь к JSON с `SimulationConfig` первым аргументом.

use std::time::Duration;

use bevy::prelude::*;
use dungeon_simulation::{
    agent_snapshot, create_headless_app, GatePhase, LevelProvisioningState, Player,
    SimulationConfig, SimulationPlugin, StartLevel,
};

/// Сколько кадров ждём загрузку ассетов
const MAX_LOADING_FRAMES: usize = 5_000;
const SIMULATION_FRAMES: usize = 1_200;

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match load_config(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Failed to load config '{}': {}", path, err);
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    let seed = config.level.rng_seed;
    println!("Starting dungeon headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    config.insert_into(&mut app);
    app.add_plugins(SimulationPlugin);

    let center = Vec3::new(32.4, 7.2, 32.4);
    let player = app
        .world_mut()
        .spawn((Player, Transform::from_translation(center)))
        .id();
    app.world_mut().send_event(StartLevel::default());

    // Загрузка: gate открывается, когда все акторы заспавнены
    let mut loading_frames = 0;
    while app.world().resource::<LevelProvisioningState>().phase() != GatePhase::Running {
        if loading_frames >= MAX_LOADING_FRAMES {
            eprintln!("Gate did not open after {} frames", loading_frames);
            std::process::exit(1);
        }
        app.update();
        loading_frames += 1;
        std::thread::sleep(Duration::from_millis(1));
    }
    println!("Gate open after {} frames", loading_frames);

    for tick in 0..SIMULATION_FRAMES {
        // Игрок ходит по кругу радиусом 25 вокруг центра пола
        let angle = tick as f32 * 0.005;
        let position = center + Vec3::new(angle.cos() * 25.0, 0.0, angle.sin() * 25.0);
        if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
            transform.translation = position;
        }

        app.update();

        if tick % 120 == 0 {
            for agent in agent_snapshot(app.world_mut()) {
                println!(
                    "Tick {}: agent #{} {:?} at ({:.1}, {:.1}) yaw {:.2}",
                    tick, agent.agent.0, agent.state, agent.position.x, agent.position.z, agent.yaw
                );
            }
        }
    }

    println!("Simulation complete!");
}

fn load_config(path: &str) -> Result<SimulationConfig, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(SimulationConfig::from_json_str(&json)?)
}
