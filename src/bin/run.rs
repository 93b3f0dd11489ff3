use std::env;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rotorsim::vehicles::DirectActuation;
use rotorsim::{PhysicsWorld, SimulationConfig};

const DEFAULT_RUN_SECONDS: f64 = 5.0;

fn run(config_path: &str, seconds: f64) -> Result<String, Box<dyn std::error::Error>> {
    let config = SimulationConfig::load(config_path)?;

    let engine = config.physics.create_engine()?;
    let clock = config.physics.create_clock()?;
    let mut world = PhysicsWorld::new(engine, clock, config.physics.physics_loop_period_nanos);

    for vehicle in &config.vehicles {
        let body = config.build_vehicle(vehicle, Box::new(DirectActuation::new(0)))?;
        let id = world.add_body(body)?;
        info!("Added {} as body {}", vehicle.name, id);
    }

    world.enable_state_report(true);
    world.pause(true);
    world.start_async_updater()?;

    info!("Running for {} simulated seconds", seconds);
    world.continue_for_time(seconds);
    world.stop_async_updater();

    world.update_state_report();
    Ok(world.get_debug_report())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(config_path) = args.get(1) else {
        eprintln!("usage: rotorsim_run <config.yaml> [seconds]");
        return ExitCode::FAILURE;
    };

    let seconds = match args.get(2).map(|s| s.parse::<f64>()) {
        None => DEFAULT_RUN_SECONDS,
        Some(Ok(seconds)) if seconds >= 0.0 => seconds,
        Some(_) => {
            eprintln!("seconds must be a non-negative number");
            return ExitCode::FAILURE;
        }
    };

    match run(config_path, seconds) {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
