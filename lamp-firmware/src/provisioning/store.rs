// Credential-Store im Flash
//
// Die WiFi-Credentials sind der einzige Zustand, der einen Power-Cycle
// überlebt. Ein Sektor am festen Offset: Magic-Header plus
// längen-präfixierte SSID/Passwort-Felder fester Breite.

use embedded_storage::nor_flash::{NorFlash, ReadNorFlash};
use esp_storage::FlashStorage;
use heapless::String;

use crate::config::{CREDENTIALS_FLASH_OFFSET, FLASH_SECTOR_SIZE};

/// Maximale SSID-Länge laut IEEE 802.11
pub const MAX_SSID_LEN: usize = 32;

/// Maximale Passwort-Länge (WPA2-PSK Passphrase)
pub const MAX_PASSWORD_LEN: usize = 64;

/// Magic-Header: markiert einen gültig beschriebenen Sektor
const MAGIC_HEADER: u16 = 0x4C50;

/// Datensatz-Größe: magic(2) + ssid_len(1) + pass_len(1) + Felder
/// Durch 4 teilbar (Flash-Write-Alignment)
const RECORD_SIZE: usize = 4 + MAX_SSID_LEN + MAX_PASSWORD_LEN;

/// Offset des SSID-Felds im Datensatz
const SSID_OFFSET: usize = 4;

/// Offset des Passwort-Felds im Datensatz
const PASSWORD_OFFSET: usize = SSID_OFFSET + MAX_SSID_LEN;

/// Gespeicherte WiFi-Credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub ssid: String<MAX_SSID_LEN>,
    pub password: String<MAX_PASSWORD_LEN>,
}

impl Credentials {
    /// Erstellt Credentials aus den Portal-Eingaben
    ///
    /// # Fehlerbehandlung
    /// `StorageError::FieldTooLong` wenn ein Feld die feste Breite sprengt
    pub fn new(ssid: &str, password: &str) -> Result<Self, StorageError> {
        Ok(Self {
            ssid: String::try_from(ssid).map_err(|_| StorageError::FieldTooLong)?,
            password: String::try_from(password).map_err(|_| StorageError::FieldTooLong)?,
        })
    }
}

/// Fehler-Typ für Store-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Flash-Treiber hat den Zugriff verweigert
    DriverError,
    /// SSID oder Passwort passt nicht in die festen Feldbreiten
    FieldTooLong,
}

/// Lädt Credentials aus dem Flash
///
/// `None` wenn der Sektor keinen gültigen Datensatz enthält
/// (fabrikneu, gelöscht oder korrupt).
pub fn load(flash: &mut FlashStorage<'_>) -> Option<Credentials> {
    let mut record = [0u8; RECORD_SIZE];
    flash.read(CREDENTIALS_FLASH_OFFSET, &mut record).ok()?;
    decode(&record)
}

/// Speichert Credentials im Flash
///
/// Löscht den Sektor und schreibt den Datensatz neu. Kein Wear-Leveling:
/// der Sektor wird nur bei der Einrichtung beschrieben.
pub fn save(flash: &mut FlashStorage<'_>, credentials: &Credentials) -> Result<(), StorageError> {
    let record = encode(credentials);
    flash
        .erase(
            CREDENTIALS_FLASH_OFFSET,
            CREDENTIALS_FLASH_OFFSET + FLASH_SECTOR_SIZE,
        )
        .map_err(|_| StorageError::DriverError)?;
    flash
        .write(CREDENTIALS_FLASH_OFFSET, &record)
        .map_err(|_| StorageError::DriverError)
}

fn encode(credentials: &Credentials) -> [u8; RECORD_SIZE] {
    let mut record = [0u8; RECORD_SIZE];
    record[0..2].copy_from_slice(&MAGIC_HEADER.to_le_bytes());
    record[2] = credentials.ssid.len() as u8;
    record[3] = credentials.password.len() as u8;
    record[SSID_OFFSET..SSID_OFFSET + credentials.ssid.len()]
        .copy_from_slice(credentials.ssid.as_bytes());
    record[PASSWORD_OFFSET..PASSWORD_OFFSET + credentials.password.len()]
        .copy_from_slice(credentials.password.as_bytes());
    record
}

fn decode(record: &[u8; RECORD_SIZE]) -> Option<Credentials> {
    if u16::from_le_bytes([record[0], record[1]]) != MAGIC_HEADER {
        return None;
    }

    let ssid_len = record[2] as usize;
    let password_len = record[3] as usize;
    if ssid_len == 0 || ssid_len > MAX_SSID_LEN || password_len > MAX_PASSWORD_LEN {
        return None;
    }

    let ssid = core::str::from_utf8(&record[SSID_OFFSET..SSID_OFFSET + ssid_len]).ok()?;
    let password =
        core::str::from_utf8(&record[PASSWORD_OFFSET..PASSWORD_OFFSET + password_len]).ok()?;

    Some(Credentials {
        ssid: String::try_from(ssid).ok()?,
        password: String::try_from(password).ok()?,
    })
}
