// Provisioning-Modul: WiFi-Credentials über Power-Cycles hinweg
//
// Boot-Ablauf: gespeicherte Credentials versuchen; ohne Credentials
// oder ohne DHCPv4-Lease innerhalb des Zeitfensters öffnet das
// Setup-Portal einen Access Point mit Konfigurationsseite.

pub mod dhcp;
pub mod portal;
pub mod store;

// Re-exports für einfachen Import
pub use dhcp::dhcp_server_task;
pub use portal::{CREDENTIALS_SAVED, access_point_config, portal_http_task};
pub use store::{Credentials, StorageError};
