use nalgebra::{UnitQuaternion, Vector3};
use std::fmt::{Display, Write};

/// Human-readable key/value dump of simulation state.
///
/// Headings nest by indentation. Output has no parsing contract.
#[derive(Debug, Clone, Default)]
pub struct StateReporter {
    buffer: String,
    depth: usize,
}

impl StateReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_heading(&mut self, title: &str) {
        self.indent();
        let _ = writeln!(self.buffer, "{}:", title);
        self.depth += 1;
    }

    pub fn end_heading(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn write_value<T: Display>(&mut self, name: &str, value: T) {
        self.indent();
        let _ = writeln!(self.buffer, "{}: {}", name, value);
    }

    pub fn write_vector(&mut self, name: &str, v: &Vector3<f64>) {
        self.indent();
        let _ = writeln!(
            self.buffer,
            "{}: ({:.4}, {:.4}, {:.4})",
            name, v.x, v.y, v.z
        );
    }

    /// Writes orientation as roll/pitch/yaw degrees.
    pub fn write_orientation(&mut self, name: &str, q: &UnitQuaternion<f64>) {
        let (roll, pitch, yaw) = q.euler_angles();
        self.indent();
        let _ = writeln!(
            self.buffer,
            "{}: (r={:.2}, p={:.2}, y={:.2}) deg",
            name,
            roll.to_degrees(),
            pitch.to_degrees(),
            yaw.to_degrees()
        );
    }

    pub fn output(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.depth = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str("  ");
        }
    }
}
