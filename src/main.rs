//! Radar Sim entry point
//!
//! Runs a built-in scenario headless and logs what the radar sees each tick.
//! Usage: `radar-sim [config.json]` (set `RUST_LOG=info` to see output).

use glam::DVec2;

use radar_sim::SimConfig;
use radar_sim::sim::{Environment, EnvironmentBuilder, MotionPattern, Shape, Waypoint};

/// Robot position the demo scans from
const SCAN_CENTER: DVec2 = DVec2::new(100.0, 100.0);

fn build_demo_environment(config: &SimConfig) -> radar_sim::Result<Environment> {
    let mut builder = EnvironmentBuilder::new(200.0, 200.0);

    // Walls
    builder.add_obstacle_with_color(
        Shape::rectangle(200.0, 4.0),
        MotionPattern::stationary(DVec2::new(0.0, 0.0)),
        [0x88, 0x88, 0x88],
    )?;
    builder.add_obstacle_with_color(
        Shape::rectangle(4.0, 80.0),
        MotionPattern::stationary(DVec2::new(160.0, 60.0)),
        [0x88, 0x88, 0x88],
    )?;
    builder.add_obstacle(
        Shape::polygon(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(20.0, -10.0),
            DVec2::new(25.0, 15.0),
            DVec2::new(5.0, 20.0),
        ])?,
        MotionPattern::stationary(DVec2::new(40.0, 130.0)),
    )?;

    // Movers
    builder.add_obstacle(
        Shape::circle(6.0),
        MotionPattern::circular(SCAN_CENTER, 35.0, 4.0, 0.0)?,
    )?;
    builder.add_obstacle(
        Shape::ellipse(16.0, 6.0),
        MotionPattern::path(
            &[
                DVec2::new(60.0, 60.0),
                DVec2::new(140.0, 60.0),
                DVec2::new(140.0, 150.0),
            ],
            5.0,
            true,
        )?,
    )?;
    builder.add_obstacle(
        Shape::rectangle(8.0, 8.0),
        MotionPattern::timestamped_path(
            vec![
                Waypoint::new(DVec2::new(100.0, 170.0), 0.0),
                Waypoint::new(DVec2::new(100.0, 120.0), 10.0),
                Waypoint::new(DVec2::new(100.0, 170.0), 30.0),
            ],
            true,
        )?,
    )?;
    builder.add_obstacle(
        Shape::circle(4.0),
        MotionPattern::random_walk(DVec2::new(70.0, 100.0), 2.0, 1.0, config.seed)?,
    )?;

    Ok(builder.build())
}

fn run(config: &SimConfig) -> radar_sim::Result<()> {
    let radar = config.radar()?;
    let mut env = build_demo_environment(config)?;

    log::info!(
        "Scanning from ({}, {}) with {} beams over {} ticks",
        SCAN_CENTER.x,
        SCAN_CENTER.y,
        radar.sample_count(),
        config.ticks
    );

    for _ in 0..config.ticks {
        env.step(config.time_step);

        let scan = radar.scan(&env, SCAN_CENTER);
        let dynamic = radar.scan_dynamic_only(&env, SCAN_CENTER);
        let flags = env.obstacle_flags(SCAN_CENTER);

        match scan.closest() {
            Some((index, distance)) => log::info!(
                "t={:>6.2} hits={:>3} closest {:.2} at {:.1}° (dynamic hits {}){}",
                env.elapsed(),
                scan.hit_count(),
                distance,
                scan.angle_of(index),
                dynamic.hit_count(),
                if flags.any() { " [inside obstacle]" } else { "" }
            ),
            None => log::info!("t={:>6.2} clear", env.elapsed()),
        }

        if let Some(obstacle) = radar.nearest_obstacle_at_angle(&env, SCAN_CENTER, 0.0) {
            log::debug!(
                "  mover {} ({}) ahead at {:?}",
                obstacle.id,
                obstacle.placed().kind(),
                obstacle.coordinate()
            );
        }
    }

    Ok(())
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Radar Sim starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };

    if let Err(e) = run(&config) {
        log::error!("Simulation failed: {e}");
        std::process::exit(1);
    }
}
