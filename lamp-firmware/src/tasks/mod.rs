// Task-Modul: Enthält die Embassy Tasks des Normalbetriebs
//
// Jeder Task läuft asynchron und unabhängig. Die Portal-Tasks für die
// Erst-Einrichtung liegen im provisioning-Modul.

pub mod http;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use http::http_server_task;
pub use wifi::{connection_task, net_task, wait_for_ip};
