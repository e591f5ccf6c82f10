// Strip-Writer Implementierungen
//
// Implementiert den StripWriter-Trait aus lamp-core für die echte
// Hardware (RMT) und als Mock für Tests.

use lamp_core::{LedError, StripWriter};
use rgb::RGB8;

use crate::config::LED_COUNT;

/// Buffer-Größe für den Strip (3 Farben * 8 Bits pro LED + 1 Reset)
pub const STRIP_BUFFER_SIZE: usize = 24 * LED_COUNT + 1;

// ============================================================================
// Real Hardware Implementation (nur für ESP32-Target)
// ============================================================================

#[cfg(not(test))]
mod real_impl {
    use super::*;
    use esp_hal::Blocking;
    use esp_hal::rmt::Rmt;
    use esp_hal::time::Rate;
    use esp_hal_smartled::SmartLedsAdapter;
    use smart_leds_trait::SmartLedsWrite;

    /// Real Hardware Strip Writer
    ///
    /// Nutzt das ESP32 RMT Peripheral um den WS2812-Strip anzusteuern.
    /// `SmartLedsWrite::write` taktet alle Pixel aus und latcht danach -
    /// setzen und flushen sind damit ein einziger Hardware-Vorgang.
    ///
    /// Hinweis: Der Buffer muss 'static sein, daher wird er beim Aufrufer
    /// erstellt und als Parameter übergeben statt im Constructor allokiert.
    pub struct RmtStripWriter<'a> {
        strip: SmartLedsAdapter<'a, STRIP_BUFFER_SIZE>,
    }

    impl<'a> RmtStripWriter<'a> {
        /// Erstellt einen neuen RmtStripWriter
        ///
        /// # Parameter
        /// - `gpio8`: GPIO8 Peripheral für die Strip-Datenleitung
        /// - `rmt_peripheral`: RMT Peripheral
        /// - `rmt_clock_mhz`: RMT Clock Frequenz in MHz (z.B. 80)
        /// - `buffer`: Buffer für LED-Daten (erstellt mit smart_led_buffer!)
        pub fn new(
            gpio8: esp_hal::peripherals::GPIO8<'a>,
            rmt_peripheral: esp_hal::peripherals::RMT<'a>,
            rmt_clock_mhz: u32,
            buffer: &'a mut [esp_hal::rmt::PulseCode; STRIP_BUFFER_SIZE],
        ) -> Self {
            // RMT initialisieren
            let rmt: Rmt<'a, Blocking> =
                Rmt::new(rmt_peripheral, Rate::from_mhz(rmt_clock_mhz)).unwrap();

            // SmartLED Adapter erstellen
            let strip = SmartLedsAdapter::new(rmt.channel0, gpio8, buffer);

            Self { strip }
        }
    }

    impl<'a> StripWriter for RmtStripWriter<'a> {
        fn fill(&mut self, color: RGB8) -> Result<(), LedError> {
            self.strip
                .write(core::iter::repeat(color).take(LED_COUNT))
                .map_err(|_| LedError::WriteFailed)
        }
    }
}

#[cfg(not(test))]
pub use real_impl::RmtStripWriter;

// ============================================================================
// Mock Implementation (nur für Tests)
// ============================================================================

#[cfg(test)]
pub struct MockStripWriter {
    /// Zuletzt geschriebene Farbe (für Assertions in Tests)
    pub last_color: Option<RGB8>,
    /// Anzahl der fill() Aufrufe
    pub fill_count: usize,
    /// Simuliere Fehler beim nächsten fill()
    pub fail_next_fill: bool,
}

#[cfg(test)]
impl MockStripWriter {
    pub fn new() -> Self {
        Self {
            last_color: None,
            fill_count: 0,
            fail_next_fill: false,
        }
    }
}

#[cfg(test)]
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

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

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
}
