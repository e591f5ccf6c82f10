// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod provisioning;
pub mod tasks;
pub mod web;

// Re-exports von lamp-core
pub use lamp_core::{LampController, LampState, LedError, StripWriter};

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use esp_storage::FlashStorage;

use crate::hal::RmtStripWriter;

// ============================================================================
// Type-Aliase für geteilte Ressourcen
// ============================================================================
//
// HTTP-Task und main teilen sich Controller und Flash. Alle Tasks laufen
// auf demselben Single-Core-Executor, daher genügt ein blocking Mutex mit
// RefCell: zwischen lock und unlock liegt kein await, die Sequenz
// Mutation + Render ist damit atomar.

/// Controller-Typ mit dem echten Hardware-Writer
pub type HwLampController = LampController<RmtStripWriter<'static>>;

/// Geteilter Lampen-Zugriff für die HTTP-Handler
pub type SharedLamp = Mutex<NoopRawMutex, RefCell<HwLampController>>;

/// Geteilter Flash-Zugriff (Credential-Store)
pub type SharedFlash = Mutex<NoopRawMutex, RefCell<FlashStorage<'static>>>;
