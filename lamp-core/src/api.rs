//! HTTP-API Datentypen
//!
//! JSON-Nachrichten zwischen Client (iOS-App, curl) und Lampe.
//! Die Feld-Namen sind das Wire-Format und dürfen sich nicht ändern.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::state::LampState;

/// POST /color Body: {"r"?:int, "g"?:int, "b"?:int}
///
/// Alle Felder optional; fehlende Felder lassen den jeweiligen Kanal
/// unverändert. Die Kanäle sind u8 - mehr Validierung gibt es nicht,
/// ein Wert außerhalb 0..=255 scheitert bereits am Parsen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct ColorRequest {
    pub r: Option<u8>,
    pub g: Option<u8>,
    pub b: Option<u8>,
}

/// POST /intensity Body: {"value"?:number}
///
/// Der Wert wird beim Übernehmen auf [0.0, 1.0] geclampt.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct IntensityRequest {
    pub value: Option<f32>,
}

/// GET /status Antwort: {"isOn":bool,"intensity":number,"r":int,"g":int,"b":int}
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StatusResponse {
    #[cfg_attr(feature = "serde", serde(rename = "isOn"))]
    pub is_on: bool,
    pub intensity: f32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<&LampState> for StatusResponse {
    fn from(state: &LampState) -> Self {
        Self {
            is_on: state.is_on,
            intensity: state.intensity,
            r: state.color.r,
            g: state.color.g,
            b: state.color.b,
        }
    }
}

/// Fehler-Klassifikation für Request-Bodies
///
/// Beide Fälle führen zu 400 mit festem Text; der Zustand bleibt
/// unverändert (fail closed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyError {
    MissingBody,
    InvalidJson,
}

impl BodyError {
    /// Fester Antwort-Text für die 400-Response
    pub fn message(self) -> &'static str {
        match self {
            BodyError::MissingBody => "missing body",
            BodyError::InvalidJson => "invalid json",
        }
    }
}

/// Parst einen Request-Body als JSON
///
/// Leerer Body → `MissingBody`, Parse-Fehler → `InvalidJson`.
#[cfg(feature = "json")]
pub fn parse_request<'a, T: serde::Deserialize<'a>>(body: &'a [u8]) -> Result<T, BodyError> {
    if body.is_empty() {
        return Err(BodyError::MissingBody);
    }
    match serde_json_core::from_slice::<T>(body) {
        Ok((value, _consumed)) => Ok(value),
        Err(_) => Err(BodyError::InvalidJson),
    }
}

/// Serialisiert den Status in den Buffer, gibt die Länge zurück
#[cfg(feature = "json")]
pub fn write_status(
    state: &LampState,
    buffer: &mut [u8],
) -> Result<usize, serde_json_core::ser::Error> {
    serde_json_core::to_slice(&StatusResponse::from(state), buffer)
}
