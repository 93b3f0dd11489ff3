use rotorsim::physics::PhysicsEngine;
use rotorsim::utils::{Clock, SteppableClock};
use rotorsim::PhysicsBody;

/// Steps the clock and the engine `steps` times
pub fn run_steps(
    engine: &mut dyn PhysicsEngine,
    bodies: &mut [PhysicsBody],
    clock: &SteppableClock,
    steps: usize,
) {
    for _ in 0..steps {
        clock.step();
        for body in bodies.iter_mut() {
            let dt = clock.elapsed_since(body.last_kinematics_time());
            body.update(dt);
        }
        engine.update(bodies, clock);
    }
}

/// Inserts every body into the engine at the clock's current time
pub fn insert_all(engine: &mut dyn PhysicsEngine, bodies: &mut [PhysicsBody], clock: &SteppableClock) {
    for body in bodies.iter_mut() {
        engine.insert(body, clock).expect("insert body");
    }
}
