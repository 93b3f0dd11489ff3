use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use super::constants::NANOS_PER_SECOND;

/// Monotonic time in nanoseconds.
pub type TimePoint = u64;

pub fn nanos_to_secs(nanos: u64) -> f64 {
    nanos as f64 / NANOS_PER_SECOND
}

pub fn secs_to_nanos(secs: f64) -> u64 {
    (secs.max(0.0) * NANOS_PER_SECOND).round() as u64
}

/// Monotonic time source shared between the physics loop and its callers.
pub trait Clock: Send + Sync {
    fn now_nanos(&self) -> TimePoint;

    /// Advances the clock by one tick. Wall clocks only count the tick.
    fn step(&self) -> TimePoint;

    fn step_count(&self) -> u64;

    /// Seconds elapsed since `since`.
    fn elapsed_since(&self, since: TimePoint) -> f64 {
        nanos_to_secs(self.now_nanos().saturating_sub(since))
    }

    /// Seconds elapsed since `since`, moving `since` forward to now.
    fn update_since(&self, since: &mut TimePoint) -> f64 {
        let now = self.now_nanos();
        let elapsed = nanos_to_secs(now.saturating_sub(*since));
        *since = now;
        elapsed
    }
}

/// Wall clock running at `clock_speed` times real time.
#[derive(Debug)]
pub struct ScalableClock {
    origin: Instant,
    clock_speed: f64,
    steps: AtomicU64,
}

impl ScalableClock {
    pub fn new(clock_speed: f64) -> Self {
        Self {
            origin: Instant::now(),
            clock_speed,
            steps: AtomicU64::new(0),
        }
    }

    pub fn clock_speed(&self) -> f64 {
        self.clock_speed
    }
}

impl Default for ScalableClock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Clock for ScalableClock {
    fn now_nanos(&self) -> TimePoint {
        let real = self.origin.elapsed().as_nanos() as f64;
        (real * self.clock_speed) as TimePoint
    }

    fn step(&self) -> TimePoint {
        self.steps.fetch_add(1, Ordering::AcqRel);
        self.now_nanos()
    }

    fn step_count(&self) -> u64 {
        self.steps.load(Ordering::Acquire)
    }
}

/// Clock that only moves when stepped, by a fixed amount per step.
#[derive(Debug)]
pub struct SteppableClock {
    step_nanos: u64,
    current: AtomicU64,
    steps: AtomicU64,
}

impl SteppableClock {
    pub fn new(step_seconds: f64) -> Self {
        Self::starting_at(step_seconds, 0)
    }

    pub fn starting_at(step_seconds: f64, start: TimePoint) -> Self {
        Self {
            step_nanos: secs_to_nanos(step_seconds),
            current: AtomicU64::new(start),
            steps: AtomicU64::new(0),
        }
    }

    pub fn step_seconds(&self) -> f64 {
        nanos_to_secs(self.step_nanos)
    }

    /// Moves the clock by an arbitrary amount without counting a step.
    pub fn advance(&self, seconds: f64) -> TimePoint {
        self.current
            .fetch_add(secs_to_nanos(seconds), Ordering::AcqRel)
            + secs_to_nanos(seconds)
    }
}

impl Clock for SteppableClock {
    fn now_nanos(&self) -> TimePoint {
        self.current.load(Ordering::Acquire)
    }

    fn step(&self) -> TimePoint {
        self.steps.fetch_add(1, Ordering::AcqRel);
        self.current.fetch_add(self.step_nanos, Ordering::AcqRel) + self.step_nanos
    }

    fn step_count(&self) -> u64 {
        self.steps.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_steppable_clock_advances_per_step() {
        let clock = SteppableClock::new(0.01);
        let mut last = clock.now_nanos();

        clock.step();
        clock.step();

        assert_eq!(clock.step_count(), 2);
        assert_relative_eq!(clock.elapsed_since(last), 0.02, epsilon = 1e-12);
        assert_relative_eq!(clock.update_since(&mut last), 0.02, epsilon = 1e-12);
        assert_eq!(last, clock.now_nanos());
        assert_eq!(clock.update_since(&mut last), 0.0);
    }

    #[test]
    fn test_elapsed_since_future_point_is_zero() {
        let clock = SteppableClock::starting_at(0.001, 1_000);
        assert_eq!(clock.elapsed_since(5_000), 0.0);
    }

    #[test]
    fn test_scalable_clock_is_monotonic() {
        let clock = ScalableClock::new(2.0);
        let a = clock.now_nanos();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = clock.step();
        assert!(b > a);
        assert_eq!(clock.step_count(), 1);
    }
}
