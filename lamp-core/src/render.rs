//! Render-Funktion: LampState → Pixel-Farbe
//!
//! Pure Functions ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

use crate::state::LampState;
use crate::traits::{LedError, StripWriter};

/// Berechnet die eine Farbe für alle Pixel des Strips
///
/// Aus: (0,0,0) unabhängig von gespeicherter Farbe und Intensität.
/// An: jeder Kanal wird mit der Intensität skaliert und auf eine
/// Ganzzahl in [0,255] abgeschnitten.
pub fn frame_color(state: &LampState) -> RGB8 {
    if !state.is_on {
        return RGB8::default();
    }
    RGB8 {
        r: scale(state.color.r, state.intensity),
        g: scale(state.color.g, state.intensity),
        b: scale(state.color.b, state.intensity),
    }
}

/// Skaliert einen 8-Bit-Kanal mit der Intensität
///
/// Truncation wie im Hardware-Pfad, kein Runden. Mit der Intensitäts-
/// Invariante 0.0..=1.0 bleibt das Ergebnis immer in [0,255].
fn scale(channel: u8, intensity: f32) -> u8 {
    (f32::from(channel) * intensity) as u8
}

/// Schreibt den aktuellen Zustand auf den Strip
///
/// Alle Pixel bekommen dieselbe Farbe, danach wird geflusht - keine
/// per-Pixel-Variation, keine Animation, kein deferred Rendering.
/// Muss nach jeder Mutation aufgerufen werden, damit die Hardware
/// jederzeit den LampState widerspiegelt.
pub fn render<S: StripWriter>(state: &LampState, strip: &mut S) -> Result<(), LedError> {
    strip.fill(frame_color(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_color_off_is_black() {
        let mut state = LampState::new();
        state.color = RGB8 {
            r: 255,
            g: 255,
            b: 255,
        };
        state.set_intensity(1.0);
        assert_eq!(frame_color(&state), RGB8::default());
    }

    #[test]
    fn test_frame_color_scales_and_truncates() {
        let mut state = LampState::new();
        state.power_on();
        // 255*0.6 = 153.0, 184*0.6 = 110.4, 144*0.6 = 86.4
        assert_eq!(
            frame_color(&state),
            RGB8 {
                r: 153,
                g: 110,
                b: 86,
            }
        );
    }

    #[test]
    fn test_frame_color_full_intensity_is_identity() {
        let mut state = LampState::new();
        state.power_on();
        state.set_intensity(1.0);
        assert_eq!(frame_color(&state), state.color);
    }

    #[test]
    fn test_frame_color_zero_intensity_is_black() {
        let mut state = LampState::new();
        state.power_on();
        state.set_intensity(0.0);
        assert_eq!(frame_color(&state), RGB8::default());
    }
}
