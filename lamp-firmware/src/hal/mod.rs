// Hardware Abstraction Layer (HAL) Module
//
// Kapselt Hardware-Zugriffe hinter dem StripWriter-Trait aus lamp-core,
// um Testbarkeit und Wartbarkeit zu verbessern.

pub mod strip_writer;

pub use strip_writer::{RmtStripWriter, STRIP_BUFFER_SIZE};

#[cfg(test)]
pub use strip_writer::MockStripWriter;
