//! Integration Tests für die Lampen-Logik
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen MockStripWriter.
//! Abgedeckt ist der komplette Handler-Pfad ohne Transport:
//! Body-Parsing → Zustands-Mutation → Rendern → Status.

use lamp_core::api::{self, BodyError, ColorRequest, IntensityRequest};
use lamp_core::state::{DEFAULT_COLOR, DEFAULT_INTENSITY};
use lamp_core::{LampController, LampState, LedError, StripWriter, frame_color};
use rgb::RGB8;
use serde::Deserialize;

// ============================================================================
// Mock Strip Writer
// ============================================================================

#[derive(Default)]
pub struct MockStripWriter {
    pub last_color: Option<RGB8>,
    pub fill_count: usize,
    pub fail_next_fill: bool,
}

impl MockStripWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StripWriter for MockStripWriter {
    fn fill(&mut self, color: RGB8) -> Result<(), LedError> {
        if self.fail_next_fill {
            self.fail_next_fill = false;
            return Err(LedError::WriteFailed);
        }

        self.last_color = Some(color);
        self.fill_count += 1;
        Ok(())
    }
}

fn controller() -> LampController<MockStripWriter> {
    LampController::new(MockStripWriter::new())
}

// ============================================================================
// Tests: MockStripWriter
// ============================================================================

#[test]
fn test_mock_strip_writer_fill() {
    let mut mock = MockStripWriter::new();
    let color = RGB8 {
        r: 153,
        g: 110,
        b: 86,
    };

    assert_eq!(mock.fill_count, 0);
    assert_eq!(mock.last_color, None);

    mock.fill(color).unwrap();

    assert_eq!(mock.fill_count, 1);
    assert_eq!(mock.last_color, Some(color));
}

#[test]
fn test_mock_strip_writer_fail() {
    let mut mock = MockStripWriter::new();
    mock.fail_next_fill = true;

    let result = mock.fill(RGB8 { r: 10, g: 0, b: 0 });
    assert_eq!(result, Err(LedError::WriteFailed));
    assert_eq!(mock.fill_count, 0);
    assert_eq!(mock.last_color, None);
}

// ============================================================================
// Tests: Boot-Zustand
// ============================================================================

#[test]
fn test_fresh_boot_state() {
    let state = LampState::new();
    assert!(!state.is_on);
    assert_eq!(state.intensity, 0.6);
    assert_eq!(
        state.color,
        RGB8 {
            r: 255,
            g: 184,
            b: 144,
        }
    );
}

#[test]
fn test_fresh_boot_status_json() {
    let state = LampState::new();
    let mut buffer = [0u8; 128];
    let len = api::write_status(&state, &mut buffer).unwrap();
    assert_eq!(
        core::str::from_utf8(&buffer[..len]).unwrap(),
        r#"{"isOn":false,"intensity":0.6,"r":255,"g":184,"b":144}"#
    );
}

// ============================================================================
// Tests: Intensitäts-Clamping
// ============================================================================

#[test]
fn test_intensity_above_range_clamps_to_one() {
    let mut lamp = controller();
    lamp.set_intensity(&IntensityRequest { value: Some(2.5) })
        .unwrap();
    assert_eq!(lamp.state().intensity, 1.0);
}

#[test]
fn test_intensity_below_range_clamps_to_zero() {
    let mut lamp = controller();
    lamp.set_intensity(&IntensityRequest { value: Some(-1.0) })
        .unwrap();
    assert_eq!(lamp.state().intensity, 0.0);
}

#[test]
fn test_intensity_in_range_is_kept() {
    let mut lamp = controller();
    lamp.set_intensity(&IntensityRequest { value: Some(0.42) })
        .unwrap();
    assert_eq!(lamp.state().intensity, 0.42);
}

#[test]
fn test_intensity_absent_field_is_noop() {
    let mut lamp = controller();
    lamp.set_intensity(&IntensityRequest { value: None }).unwrap();
    assert_eq!(lamp.state().intensity, DEFAULT_INTENSITY);
}

// ============================================================================
// Tests: Farb-Updates
// ============================================================================

#[test]
fn test_color_partial_update_keeps_other_channels() {
    let mut lamp = controller();
    lamp.set_color(&ColorRequest {
        r: Some(10),
        g: None,
        b: None,
    })
    .unwrap();

    let status = lamp.status();
    assert_eq!(status.r, 10);
    assert_eq!(status.g, DEFAULT_COLOR.g);
    assert_eq!(status.b, DEFAULT_COLOR.b);
}

#[test]
fn test_color_full_update() {
    let mut lamp = controller();
    lamp.set_color(&ColorRequest {
        r: Some(1),
        g: Some(2),
        b: Some(3),
    })
    .unwrap();

    assert_eq!(lamp.state().color, RGB8 { r: 1, g: 2, b: 3 });
}

#[test]
fn test_color_updates_are_independent_per_field() {
    let mut lamp = controller();
    lamp.set_color(&ColorRequest {
        r: Some(20),
        g: None,
        b: None,
    })
    .unwrap();
    lamp.set_color(&ColorRequest {
        r: None,
        g: Some(30),
        b: None,
    })
    .unwrap();

    // Jedes Feld behält den zuletzt akzeptierten Wert
    let status = lamp.status();
    assert_eq!(status.r, 20);
    assert_eq!(status.g, 30);
    assert_eq!(status.b, DEFAULT_COLOR.b);
}

// ============================================================================
// Tests: Rendern
// ============================================================================

#[test]
fn test_power_on_renders_scaled_default_color() {
    let mut lamp = controller();
    lamp.power_on().unwrap();

    let status = lamp.status();
    assert!(status.is_on);

    // 255*0.6, 184*0.6, 144*0.6 - abgeschnitten, nicht gerundet
    assert_eq!(
        lamp.strip().last_color,
        Some(RGB8 {
            r: 153,
            g: 110,
            b: 86,
        })
    );
}

#[test]
fn test_power_off_renders_black_regardless_of_state() {
    let mut lamp = controller();
    lamp.power_on().unwrap();
    lamp.set_color(&ColorRequest {
        r: Some(255),
        g: Some(255),
        b: Some(255),
    })
    .unwrap();
    lamp.power_off().unwrap();

    assert!(!lamp.status().is_on);
    assert_eq!(lamp.strip().last_color, Some(RGB8::default()));
}

#[test]
fn test_every_mutation_renders() {
    let mut lamp = controller();
    lamp.power_on().unwrap();
    lamp.set_color(&ColorRequest {
        r: Some(10),
        g: None,
        b: None,
    })
    .unwrap();
    lamp.set_intensity(&IntensityRequest { value: Some(0.5) })
        .unwrap();
    lamp.power_off().unwrap();

    assert_eq!(lamp.strip().fill_count, 4);
}

#[test]
fn test_status_does_not_render() {
    let lamp = controller();
    let _ = lamp.status();
    assert_eq!(lamp.strip().fill_count, 0);
}

#[test]
fn test_power_on_is_idempotent() {
    let mut lamp = controller();
    lamp.power_on().unwrap();
    let first = *lamp.state();
    let first_color = lamp.strip().last_color;

    lamp.power_on().unwrap();

    assert_eq!(*lamp.state(), first);
    assert_eq!(lamp.strip().last_color, first_color);
}

#[test]
fn test_strip_failure_is_reported() {
    let mut lamp = controller();
    lamp.strip_mut().fail_next_fill = true;
    assert_eq!(lamp.power_on(), Err(LedError::WriteFailed));
}

#[test]
fn test_frame_color_matches_render_output() {
    let mut lamp = controller();
    lamp.power_on().unwrap();
    lamp.set_intensity(&IntensityRequest { value: Some(0.3) })
        .unwrap();

    assert_eq!(lamp.strip().last_color, Some(frame_color(lamp.state())));
}

// ============================================================================
// Tests: Body-Parsing (derselbe Pfad wie in der Firmware)
// ============================================================================

#[test]
fn test_parse_empty_body_is_missing() {
    let result = api::parse_request::<ColorRequest>(b"");
    assert_eq!(result, Err(BodyError::MissingBody));
    assert_eq!(BodyError::MissingBody.message(), "missing body");
}

#[test]
fn test_parse_garbage_body_is_invalid_json() {
    let result = api::parse_request::<ColorRequest>(b"not json");
    assert_eq!(result, Err(BodyError::InvalidJson));
    assert_eq!(BodyError::InvalidJson.message(), "invalid json");
}

#[test]
fn test_parse_empty_object_is_full_noop() {
    let request = api::parse_request::<ColorRequest>(b"{}").unwrap();
    assert_eq!(request, ColorRequest::default());
}

#[test]
fn test_parse_partial_color_body() {
    let request = api::parse_request::<ColorRequest>(br#"{"r":10}"#).unwrap();
    assert_eq!(request.r, Some(10));
    assert_eq!(request.g, None);
    assert_eq!(request.b, None);
}

#[test]
fn test_parse_color_out_of_channel_range_fails() {
    // Die Kanäle sind u8 - mehr Validierung gibt es nicht, ein Wert
    // außerhalb 0..=255 scheitert bereits am Parsen
    let result = api::parse_request::<ColorRequest>(br#"{"r":300}"#);
    assert_eq!(result, Err(BodyError::InvalidJson));
}

#[test]
fn test_parse_intensity_body() {
    let request = api::parse_request::<IntensityRequest>(br#"{"value":2.5}"#).unwrap();
    assert_eq!(request.value, Some(2.5));
}

#[test]
fn test_rejected_body_leaves_state_unchanged() {
    let mut lamp = controller();
    lamp.power_on().unwrap();
    let before = *lamp.state();

    // Handler-Pfad: Parse-Fehler → 400, set_color wird nie aufgerufen
    assert!(api::parse_request::<ColorRequest>(b"").is_err());
    assert!(api::parse_request::<ColorRequest>(b"{broken").is_err());

    assert_eq!(*lamp.state(), before);
}

// ============================================================================
// Tests: Status-Wire-Format
// ============================================================================

/// Spiegel-Struct zum Zurücklesen der Status-Antwort
#[derive(Deserialize)]
struct StatusEcho {
    #[serde(rename = "isOn")]
    is_on: bool,
    intensity: f32,
    r: u8,
    g: u8,
    b: u8,
}

#[test]
fn test_status_roundtrip_after_mutations() {
    let mut lamp = controller();
    lamp.power_on().unwrap();
    lamp.set_color(&ColorRequest {
        r: Some(10),
        g: None,
        b: None,
    })
    .unwrap();
    lamp.set_intensity(&IntensityRequest { value: Some(2.5) })
        .unwrap();

    let mut buffer = [0u8; 128];
    let len = api::write_status(lamp.state(), &mut buffer).unwrap();
    let (echo, _) = serde_json_core::from_slice::<StatusEcho>(&buffer[..len]).unwrap();

    assert!(echo.is_on);
    assert_eq!(echo.intensity, 1.0);
    assert_eq!(echo.r, 10);
    assert_eq!(echo.g, DEFAULT_COLOR.g);
    assert_eq!(echo.b, DEFAULT_COLOR.b);
}
