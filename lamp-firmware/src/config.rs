// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

// ============================================================================
// LED-Strip Konfiguration
// ============================================================================

/// GPIO-Pin für die Datenleitung des Strips (WS2812/Neopixel)
pub const LED_GPIO_PIN: u8 = 8;

/// Anzahl der LEDs im Strip
pub const LED_COUNT: usize = 30;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

// Die Boot-Defaults der Lampe (aus, warmweiß, 60%) definiert lamp-core,
// damit die Host-Tests dieselben Werte sehen wie die Firmware.

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// Gesamt-Heap: ~100 KB für WiFi-Stack

/// Zeitfenster für den ersten Verbindungsversuch mit gespeicherten
/// Credentials (Sekunden). Ohne DHCPv4-Lease innerhalb dieses Fensters
/// startet das Setup-Portal.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Setup-Portal Konfiguration
// ============================================================================

/// SSID des Access Points für die Erst-Einrichtung
pub const SETUP_AP_SSID: &str = "SmartLamp-Setup";

/// Statische IPv4-Adresse des Access Points
/// Die Portal-Seite ist unter http://192.168.4.1/ erreichbar
pub const SETUP_AP_ADDRESS: [u8; 4] = [192, 168, 4, 1];

/// Präfix-Länge des AP-Subnetzes (255.255.255.0)
pub const SETUP_AP_PREFIX_LEN: u8 = 24;

/// Zeitfenster des Portals (Sekunden)
/// Gehen innerhalb des Fensters keine Credentials ein, wird geloggt
/// und neu gestartet - Recovery läuft über Restart-by-Reboot, nicht
/// über eine in-process Retry-Policy.
pub const PORTAL_TIMEOUT_SECS: u64 = 300;

/// Wartezeit vor dem Software-Reset (Sekunden)
pub const RESTART_DELAY_SECS: u64 = 3;

// ============================================================================
// Credential-Store Konfiguration
// ============================================================================

/// Flash-Offset des Credential-Sektors
/// Liegt in der NVS-Partition der Standard-Partitionstabelle;
/// die Firmware nutzt den Bereich roh (ein Sektor genügt).
pub const CREDENTIALS_FLASH_OFFSET: u32 = 0x9000;

/// Flash-Sektor-Größe in Bytes
pub const FLASH_SECTOR_SIZE: u32 = 4096;

// ============================================================================
// HTTP Server Konfiguration
// ============================================================================

/// TCP-Port der Lampen-API und der Portal-Seite
pub const HTTP_PORT: u16 = 80;

/// HTTP Buffer-Größe in Bytes
/// Für HTTP Request/Response Headers und Body
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX Buffer-Größe in Bytes
/// Für eingehende TCP-Daten vom Client
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
/// Für ausgehende TCP-Daten zum Client
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// JSON Serialisierungs-Buffer für die Status-Antwort
/// Für {"isOn":bool,"intensity":number,"r":int,"g":int,"b":int}
pub const STATUS_JSON_BUFFER_SIZE: usize = 128;
