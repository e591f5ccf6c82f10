//! Lampen-Zustand
//!
//! Datenstrukturen ohne Hardware-Dependencies

use rgb::RGB8;

use crate::api::{ColorRequest, IntensityRequest};

/// Intensität nach dem Boot (0.0-1.0)
pub const DEFAULT_INTENSITY: f32 = 0.6;

/// Farbe nach dem Boot (warmweiß)
pub const DEFAULT_COLOR: RGB8 = RGB8 {
    r: 255,
    g: 184,
    b: 144,
};

/// Zustand der Lampe
///
/// Eine Instanz pro Prozess, Lebensdauer = Prozess-Lebensdauer.
/// Wird ausschließlich von den Request-Handlern mutiert und
/// überlebt keinen Power-Cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LampState {
    /// Lampe an/aus
    pub is_on: bool,
    /// Intensität, Invariante 0.0 <= intensity <= 1.0
    /// Wird bei jedem Schreibzugriff geclampt
    pub intensity: f32,
    /// Basis-Farbe, ungescaled gespeichert
    /// (Intensität wird erst beim Rendern angewendet)
    pub color: RGB8,
}

impl LampState {
    /// Erstellt den Boot-Zustand: aus, warmweiß, 60% Intensität
    pub const fn new() -> Self {
        Self {
            is_on: false,
            intensity: DEFAULT_INTENSITY,
            color: DEFAULT_COLOR,
        }
    }

    pub fn power_on(&mut self) {
        self.is_on = true;
    }

    pub fn power_off(&mut self) {
        self.is_on = false;
    }

    /// Setzt die Intensität, geclampt auf [0.0, 1.0]
    pub fn set_intensity(&mut self, value: f32) {
        self.intensity = value.clamp(0.0, 1.0);
    }

    /// Übernimmt die im Request vorhandenen Kanäle
    ///
    /// Fehlende Felder lassen den jeweiligen Kanal unverändert
    /// (kein Reset auf Defaults).
    pub fn apply_color(&mut self, request: &ColorRequest) {
        if let Some(r) = request.r {
            self.color.r = r;
        }
        if let Some(g) = request.g {
            self.color.g = g;
        }
        if let Some(b) = request.b {
            self.color.b = b;
        }
    }

    /// Übernimmt die Intensität aus dem Request, falls vorhanden
    pub fn apply_intensity(&mut self, request: &IntensityRequest) {
        if let Some(value) = request.value {
            self.set_intensity(value);
        }
    }
}

impl Default for LampState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LampState {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "LampState {{ on: {}, intensity: {}, rgb: ({}, {}, {}) }}",
            self.is_on,
            self.intensity,
            self.color.r,
            self.color.g,
            self.color.b
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_state() {
        let state = LampState::new();
        assert!(!state.is_on);
        assert_eq!(state.intensity, DEFAULT_INTENSITY);
        assert_eq!(state.color, DEFAULT_COLOR);
    }

    #[test]
    fn test_set_intensity_clamps_above() {
        let mut state = LampState::new();
        state.set_intensity(2.5);
        assert_eq!(state.intensity, 1.0);
    }

    #[test]
    fn test_set_intensity_clamps_below() {
        let mut state = LampState::new();
        state.set_intensity(-0.3);
        assert_eq!(state.intensity, 0.0);
    }

    #[test]
    fn test_apply_color_partial() {
        let mut state = LampState::new();
        state.apply_color(&ColorRequest {
            r: Some(10),
            g: None,
            b: None,
        });
        assert_eq!(state.color.r, 10);
        assert_eq!(state.color.g, DEFAULT_COLOR.g);
        assert_eq!(state.color.b, DEFAULT_COLOR.b);
    }

    #[test]
    fn test_apply_intensity_absent_is_noop() {
        let mut state = LampState::new();
        state.apply_intensity(&IntensityRequest { value: None });
        assert_eq!(state.intensity, DEFAULT_INTENSITY);
    }
}
