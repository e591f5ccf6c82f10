//! Lampen-Controller: eine Methode pro HTTP-Operation
//!
//! Besitzt Zustand und Strip zusammen, damit jede Mutation synchron
//! rendert, bevor sie zurückkehrt - die Hardware spiegelt den Zustand
//! damit zu jedem Zeitpunkt wider.

use crate::api::{ColorRequest, IntensityRequest, StatusResponse};
use crate::render;
use crate::state::LampState;
use crate::traits::{LedError, StripWriter};

/// Controller über Zustand + Strip
///
/// # Trait-basierte Abstraktion
/// Der generische Parameter `S: StripWriter` ermöglicht:
/// - Real Hardware (RmtStripWriter) im Production-Code
/// - Mock Implementation (MockStripWriter) in Unit Tests
pub struct LampController<S: StripWriter> {
    state: LampState,
    strip: S,
}

impl<S: StripWriter> LampController<S> {
    /// Erstellt einen Controller im Boot-Zustand (aus)
    ///
    /// Rendert noch nicht - der erste Frame geht erst mit `refresh`
    /// auf die Hardware, wenn der Aufrufer bereit ist.
    pub fn new(strip: S) -> Self {
        Self {
            state: LampState::new(),
            strip,
        }
    }

    /// Aktueller Zustand (read-only)
    pub fn state(&self) -> &LampState {
        &self.state
    }

    /// Zugriff auf den Strip (für Assertions in Tests)
    pub fn strip(&self) -> &S {
        &self.strip
    }

    pub fn strip_mut(&mut self) -> &mut S {
        &mut self.strip
    }

    /// Schreibt den aktuellen Zustand erneut auf den Strip
    pub fn refresh(&mut self) -> Result<(), LedError> {
        render::render(&self.state, &mut self.strip)
    }

    /// POST /on
    pub fn power_on(&mut self) -> Result<(), LedError> {
        self.state.power_on();
        self.refresh()
    }

    /// POST /off
    pub fn power_off(&mut self) -> Result<(), LedError> {
        self.state.power_off();
        self.refresh()
    }

    /// POST /color - vorhandene Kanäle übernehmen, dann rendern
    pub fn set_color(&mut self, request: &ColorRequest) -> Result<(), LedError> {
        self.state.apply_color(request);
        self.refresh()
    }

    /// POST /intensity - Wert clampen und übernehmen, dann rendern
    pub fn set_intensity(&mut self, request: &IntensityRequest) -> Result<(), LedError> {
        self.state.apply_intensity(request);
        self.refresh()
    }

    /// GET /status - reine Leseoperation, rendert nicht
    pub fn status(&self) -> StatusResponse {
        StatusResponse::from(&self.state)
    }
}
