use crossbeam_channel::{Receiver, Sender};
use nalgebra::Vector3;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::command::{BodyId, CommandBatch, WorldCommand};
use super::error::WorldError;
use crate::physics::{CollisionInfo, CollisionResponse, PhysicsBody, PhysicsEngine};
use crate::state::{KinematicsState, Pose};
use crate::utils::{secs_to_nanos, Clock, StateReporter, TimePoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContinueTarget {
    None,
    Time(TimePoint),
    Frame(u64),
}

struct WorldState {
    bodies: Vec<PhysicsBody>,
    engine: Option<Box<dyn PhysicsEngine>>,
    frame: u64,
    paused: bool,
    target: ContinueTarget,
    report_enabled: bool,
    reporter: StateReporter,
}

struct Shared {
    state: Mutex<WorldState>,
    paused_changed: Condvar,
    clock: Arc<dyn Clock>,
    commands: Receiver<WorldCommand>,
    running: AtomicBool,
}

impl Shared {
    /// One physics tick. Returns false while paused.
    fn tick(&self) -> bool {
        self.clock.step();
        let mut state = self.state.lock();

        let batch: CommandBatch = self.commands.try_iter().collect();
        if !batch.is_empty() {
            self.apply(&mut state, batch);
        }

        if state.paused {
            let now = self.clock.now_nanos();
            for body in state.bodies.iter_mut() {
                body.set_last_kinematics_time(now);
            }
            return false;
        }

        let WorldState { bodies, engine, .. } = &mut *state;
        for body in bodies.iter_mut() {
            let dt = self.clock.elapsed_since(body.last_kinematics_time());
            body.update(dt);
        }
        if let Some(engine) = engine {
            engine.update(bodies, self.clock.as_ref());
        }

        state.frame += 1;
        let reached = match state.target {
            ContinueTarget::None => false,
            ContinueTarget::Time(until) => self.clock.now_nanos() >= until,
            ContinueTarget::Frame(until) => state.frame >= until,
        };
        if reached {
            state.target = ContinueTarget::None;
            state.paused = true;
            debug!(frame = state.frame, "continue target reached, pausing");
            self.paused_changed.notify_all();
        }

        if state.report_enabled {
            refresh_report(&mut state);
        }
        true
    }

    fn apply(&self, state: &mut WorldState, batch: CommandBatch) {
        let now = self.clock.now_nanos();
        let WorldState { bodies, engine, .. } = state;

        if batch.reset {
            info!("Resetting physics world");
            match engine.as_mut() {
                Some(engine) => engine.reset(bodies, self.clock.as_ref()),
                None => {
                    for body in bodies.iter_mut() {
                        body.reset();
                        body.set_last_kinematics_time(now);
                    }
                }
            }
        }

        for (id, pose) in batch.poses {
            match bodies.get_mut(id) {
                Some(body) => body.set_pose(pose),
                None => warn!(id, "pose override for unknown body"),
            }
        }

        for (id, info) in batch.collisions {
            match bodies.get_mut(id) {
                Some(body) => body.set_collision_info(info),
                None => warn!(id, "collision info for unknown body"),
            }
        }

        if let (Some(wind), Some(engine)) = (batch.wind, engine.as_mut()) {
            engine.set_wind(wind);
        }
    }
}

fn refresh_report(state: &mut WorldState) {
    let WorldState {
        bodies,
        engine,
        frame,
        reporter,
        ..
    } = state;

    reporter.clear();
    reporter.write_value("Frame", *frame);
    match engine.as_ref() {
        Some(engine) => engine.report_state(bodies, reporter),
        None => {
            for body in bodies.iter() {
                body.report_state(reporter);
            }
        }
    }
}

/// Owns the bodies and the engine, and runs the fixed-period physics loop.
pub struct PhysicsWorld {
    shared: Arc<Shared>,
    command_sender: Sender<WorldCommand>,
    period: Duration,
    updater: Option<JoinHandle<()>>,
}

impl PhysicsWorld {
    pub fn new(
        engine: Option<Box<dyn PhysicsEngine>>,
        clock: Arc<dyn Clock>,
        period_nanos: u64,
    ) -> Self {
        let (command_sender, commands) = crossbeam_channel::unbounded();
        let state = WorldState {
            bodies: Vec::new(),
            engine,
            frame: 0,
            paused: false,
            target: ContinueTarget::None,
            report_enabled: false,
            reporter: StateReporter::new(),
        };

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                paused_changed: Condvar::new(),
                clock,
                commands,
                running: AtomicBool::new(false),
            }),
            command_sender,
            period: Duration::from_nanos(period_nanos),
            updater: None,
        }
    }

    pub fn add_body(&self, mut body: PhysicsBody) -> Result<BodyId, WorldError> {
        let mut state = self.shared.state.lock();
        match state.engine.as_mut() {
            Some(engine) => engine.insert(&mut body, self.shared.clock.as_ref())?,
            None => body.set_last_kinematics_time(self.shared.clock.now_nanos()),
        }
        state.bodies.push(body);
        Ok(state.bodies.len() - 1)
    }

    pub fn body_count(&self) -> usize {
        self.shared.state.lock().bodies.len()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.shared.clock
    }

    /// Runs one tick on the caller's thread.
    pub fn update(&self) {
        self.shared.tick();
    }

    pub fn frame_count(&self) -> u64 {
        self.shared.state.lock().frame
    }

    pub fn start_async_updater(&mut self) -> Result<(), WorldError> {
        if self.updater.is_some() {
            return Err(WorldError::UpdaterRunning);
        }

        self.shared.running.store(true, Ordering::Release);
        let shared = Arc::clone(&self.shared);
        let period = self.period;

        let handle = std::thread::Builder::new()
            .name("physics-world".into())
            .spawn(move || {
                info!("Physics loop started, period {:?}", period);
                while shared.running.load(Ordering::Acquire) {
                    let started = Instant::now();
                    shared.tick();
                    if let Some(remaining) = period.checked_sub(started.elapsed()) {
                        std::thread::sleep(remaining);
                    }
                }
                info!("Physics loop stopped");
            })?;

        self.updater = Some(handle);
        Ok(())
    }

    pub fn stop_async_updater(&mut self) {
        self.shared.running.store(false, Ordering::Release);
        if let Some(handle) = self.updater.take() {
            if handle.join().is_err() {
                warn!("physics thread panicked");
            }
        }
        // wake anyone waiting on a target the loop will no longer reach
        let mut state = self.shared.state.lock();
        if state.target != ContinueTarget::None {
            state.target = ContinueTarget::None;
            state.paused = true;
        }
        self.shared.paused_changed.notify_all();
    }

    pub fn is_async_updater_running(&self) -> bool {
        self.updater.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.shared.state.lock().paused
    }

    /// Pausing also cancels any pending continue-for target.
    pub fn pause(&self, paused: bool) {
        let mut state = self.shared.state.lock();
        state.paused = paused;
        state.target = ContinueTarget::None;
        self.shared.paused_changed.notify_all();
    }

    /// Unpauses for `seconds` of clock time, returning once paused again.
    pub fn continue_for_time(&self, seconds: f64) {
        let until = self.shared.clock.now_nanos() + secs_to_nanos(seconds);
        self.continue_until(ContinueTarget::Time(until));
    }

    /// Unpauses for `frames` ticks, returning once paused again.
    pub fn continue_for_frames(&self, frames: u64) {
        if frames == 0 {
            return;
        }
        let until = self.frame_count() + frames;
        self.continue_until(ContinueTarget::Frame(until));
    }

    fn continue_until(&self, target: ContinueTarget) {
        {
            let mut state = self.shared.state.lock();
            state.target = target;
            state.paused = false;
        }

        if self.updater.is_some() {
            let mut state = self.shared.state.lock();
            while !state.paused {
                self.shared.paused_changed.wait(&mut state);
            }
        } else {
            while !self.is_paused() {
                self.shared.tick();
            }
        }
    }

    pub fn set_pose(&self, body: BodyId, pose: Pose) -> Result<(), WorldError> {
        self.check_body(body)?;
        self.send(WorldCommand::SetPose { body, pose });
        Ok(())
    }

    pub fn set_collision_info(&self, body: BodyId, info: CollisionInfo) -> Result<(), WorldError> {
        self.check_body(body)?;
        self.send(WorldCommand::SetCollisionInfo { body, info });
        Ok(())
    }

    pub fn set_wind(&self, wind: Vector3<f64>) {
        self.send(WorldCommand::SetWind(wind));
    }

    /// Queued; applied at the start of the next tick.
    pub fn reset(&self) {
        self.send(WorldCommand::Reset);
    }

    pub fn command_sender(&self) -> Sender<WorldCommand> {
        self.command_sender.clone()
    }

    fn send(&self, command: WorldCommand) {
        let _ = self.command_sender.send(command);
    }

    fn check_body(&self, body: BodyId) -> Result<(), WorldError> {
        if body < self.body_count() {
            Ok(())
        } else {
            Err(WorldError::UnknownBody(body))
        }
    }

    /// Runs `read` on a body under the world lock.
    pub fn with_body<T>(
        &self,
        body: BodyId,
        read: impl FnOnce(&PhysicsBody) -> T,
    ) -> Result<T, WorldError> {
        let state = self.shared.state.lock();
        state
            .bodies
            .get(body)
            .map(read)
            .ok_or(WorldError::UnknownBody(body))
    }

    pub fn kinematics(&self, body: BodyId) -> Result<KinematicsState, WorldError> {
        self.with_body(body, |b| *b.kinematics())
    }

    pub fn pose(&self, body: BodyId) -> Result<Pose, WorldError> {
        self.with_body(body, |b| b.pose())
    }

    pub fn is_grounded(&self, body: BodyId) -> Result<bool, WorldError> {
        self.with_body(body, |b| b.is_grounded())
    }

    pub fn collision_response(&self, body: BodyId) -> Result<CollisionResponse, WorldError> {
        self.with_body(body, |b| *b.collision_response())
    }

    pub fn enable_state_report(&self, enabled: bool) {
        self.shared.state.lock().report_enabled = enabled;
    }

    pub fn update_state_report(&self) {
        refresh_report(&mut self.shared.state.lock());
    }

    pub fn get_debug_report(&self) -> String {
        self.shared.state.lock().reporter.output().to_string()
    }
}

impl Drop for PhysicsWorld {
    fn drop(&mut self) {
        if self.updater.is_some() {
            self.stop_async_updater();
        }
    }
}
