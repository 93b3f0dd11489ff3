use serde::{Deserialize, Serialize};

/// First-order lag used to model actuator response.
///
/// `output(t+dt) = input + (output(t) - input) * exp(-dt / time_constant)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirstOrderFilter {
    time_constant: f64,
    initial_input: f64,
    initial_output: f64,
    input: f64,
    output: f64,
}

impl FirstOrderFilter {
    pub fn new(time_constant: f64, initial_input: f64, initial_output: f64) -> Self {
        Self {
            time_constant,
            initial_input,
            initial_output,
            input: initial_input,
            output: initial_output,
        }
    }

    pub fn set_input(&mut self, input: f64) {
        self.input = input;
    }

    pub fn input(&self) -> f64 {
        self.input
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn time_constant(&self) -> f64 {
        self.time_constant
    }

    /// Forces the output, leaving the input untouched.
    pub fn set_output(&mut self, output: f64) {
        self.output = output;
    }

    pub fn update(&mut self, dt: f64) -> f64 {
        if self.time_constant > 1e-9 {
            let alpha = (-dt.max(0.0) / self.time_constant).exp();
            self.output = self.input + (self.output - self.input) * alpha;
        } else {
            // zero time constant snaps to the target
            self.output = self.input;
        }
        self.output
    }

    pub fn reset(&mut self) {
        self.input = self.initial_input;
        self.output = self.initial_output;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reaches_63_percent_after_one_time_constant() {
        let mut filter = FirstOrderFilter::new(0.5, 0.0, 0.0);
        filter.set_input(1.0);
        for _ in 0..500 {
            filter.update(0.001);
        }
        assert_relative_eq!(filter.output(), 1.0 - (-1.0f64).exp(), epsilon = 1e-9);
    }

    #[test]
    fn test_zero_time_constant_snaps() {
        let mut filter = FirstOrderFilter::new(0.0, 0.0, 0.0);
        filter.set_input(-0.4);
        assert_eq!(filter.update(0.01), -0.4);
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut filter = FirstOrderFilter::new(0.1, 0.2, 0.3);
        filter.set_input(1.0);
        filter.update(1.0);
        filter.reset();
        assert_eq!(filter.input(), 0.2);
        assert_eq!(filter.output(), 0.3);
    }
}
