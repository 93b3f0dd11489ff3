use nalgebra::Vector3;

use super::aero::AeroSurface;
use super::rotor::RotorVertex;
use super::tiltable::TiltableRotor;
use crate::physics::{VertexContext, WrenchSource};
use crate::state::Wrench;
use crate::utils::StateReporter;

/// The force contributors a body can carry.
#[derive(Debug, Clone)]
pub enum WrenchVertex {
    FixedRotor(RotorVertex),
    TiltableRotor(TiltableRotor),
    AeroSurface(AeroSurface),
}

impl WrenchVertex {
    pub fn kind(&self) -> &'static str {
        match self {
            WrenchVertex::FixedRotor(_) => "FixedRotor",
            WrenchVertex::TiltableRotor(_) => "TiltableRotor",
            WrenchVertex::AeroSurface(_) => "AeroSurface",
        }
    }

    fn source(&self) -> &dyn WrenchSource {
        match self {
            WrenchVertex::FixedRotor(rotor) => rotor,
            WrenchVertex::TiltableRotor(rotor) => rotor,
            WrenchVertex::AeroSurface(surface) => surface,
        }
    }

    fn source_mut(&mut self) -> &mut dyn WrenchSource {
        match self {
            WrenchVertex::FixedRotor(rotor) => rotor,
            WrenchVertex::TiltableRotor(rotor) => rotor,
            WrenchVertex::AeroSurface(surface) => surface,
        }
    }
}

impl WrenchSource for WrenchVertex {
    fn position(&self) -> Vector3<f64> {
        self.source().position()
    }

    fn normal(&self) -> Vector3<f64> {
        self.source().normal()
    }

    fn wrench(&self) -> Wrench {
        self.source().wrench()
    }

    fn update(&mut self, dt: f64, context: &VertexContext<'_>) {
        self.source_mut().update(dt, context);
    }

    fn reset(&mut self) {
        self.source_mut().reset();
    }

    fn actuation_width(&self) -> usize {
        self.source().actuation_width()
    }

    fn set_actuation(&mut self, signals: &[f64]) {
        self.source_mut().set_actuation(signals);
    }

    fn report_state(&self, reporter: &mut StateReporter) {
        self.source().report_state(reporter);
    }
}

impl From<RotorVertex> for WrenchVertex {
    fn from(rotor: RotorVertex) -> Self {
        WrenchVertex::FixedRotor(rotor)
    }
}

impl From<TiltableRotor> for WrenchVertex {
    fn from(rotor: TiltableRotor) -> Self {
        WrenchVertex::TiltableRotor(rotor)
    }
}

impl From<AeroSurface> for WrenchVertex {
    fn from(surface: AeroSurface) -> Self {
        WrenchVertex::AeroSurface(surface)
    }
}
