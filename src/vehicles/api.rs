use parking_lot::RwLock;
use std::sync::Arc;

use crate::environment::EnvironmentState;
use crate::state::KinematicsState;

/// Controller collaborator that turns vehicle state into actuator signals.
pub trait VehicleApi: Send {
    /// Called once per tick after the body has committed its kinematics.
    fn update(&mut self, kinematics: &KinematicsState, environment: &EnvironmentState);

    /// Normalized signal for a channel. Channels that do not exist read as 0.
    fn actuation(&self, index: usize) -> f64;

    fn reset(&mut self);
}

/// Passes externally written signals straight through to the actuators.
#[derive(Debug, Clone)]
pub struct DirectActuation {
    signals: Arc<RwLock<Vec<f64>>>,
    initial: Vec<f64>,
}

/// Cloneable writer for a [`DirectActuation`], safe to use from another thread.
#[derive(Debug, Clone)]
pub struct ActuationHandle {
    signals: Arc<RwLock<Vec<f64>>>,
}

impl DirectActuation {
    pub fn new(channel_count: usize) -> Self {
        Self::with_signals(vec![0.0; channel_count])
    }

    pub fn with_signals(signals: Vec<f64>) -> Self {
        Self {
            initial: signals.clone(),
            signals: Arc::new(RwLock::new(signals)),
        }
    }

    pub fn handle(&self) -> ActuationHandle {
        ActuationHandle {
            signals: Arc::clone(&self.signals),
        }
    }
}

impl ActuationHandle {
    /// Writes one channel, growing the channel list if needed.
    pub fn set(&self, index: usize, value: f64) {
        let mut signals = self.signals.write();
        if index >= signals.len() {
            signals.resize(index + 1, 0.0);
        }
        signals[index] = value;
    }

    pub fn set_all(&self, values: &[f64]) {
        let mut signals = self.signals.write();
        signals.clear();
        signals.extend_from_slice(values);
    }

    pub fn get(&self, index: usize) -> f64 {
        self.signals.read().get(index).copied().unwrap_or(0.0)
    }
}

impl VehicleApi for DirectActuation {
    fn update(&mut self, _kinematics: &KinematicsState, _environment: &EnvironmentState) {}

    fn actuation(&self, index: usize) -> f64 {
        self.signals.read().get(index).copied().unwrap_or(0.0)
    }

    fn reset(&mut self) {
        let mut signals = self.signals.write();
        signals.clear();
        signals.extend_from_slice(&self.initial);
    }
}
