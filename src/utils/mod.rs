pub mod clock;
pub mod constants;
pub mod filter;
pub mod math;
pub mod report;

pub use clock::{nanos_to_secs, secs_to_nanos, Clock, ScalableClock, SteppableClock, TimePoint};
pub use constants::*;
pub use filter::FirstOrderFilter;
pub use math::*;
pub use report::StateReporter;
