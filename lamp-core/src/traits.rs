//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use rgb::RGB8;

/// Fehler-Typ für Strip-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedError {
    WriteFailed,
}

/// Trait für den LED-Strip
///
/// Abstrahiert einen Strip adressierbarer Pixel (WS2812/Neopixel).
/// Der Strip kennt genau zwei Operationen: alle Pixel auf eine Farbe
/// setzen und zur Hardware flushen. `fill` macht beides in einem Schritt.
///
/// # Implementierungen
/// - **Production:** RmtStripWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockStripWriter (in-memory Mock)
pub trait StripWriter: Send {
    /// Setzt alle Pixel auf die Farbe und flusht zur Hardware
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn fill(&mut self, color: RGB8) -> Result<(), LedError>;
}
