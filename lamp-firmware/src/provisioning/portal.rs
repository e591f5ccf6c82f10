// Setup-Portal: Access Point + Konfigurationsseite
//
// Öffnet einen offenen AP mit fester SSID und serviert eine kleine
// HTML-Seite, über die der Operator die WiFi-Credentials einträgt.
// Nach dem Speichern startet die Firmware neu und bootet in den
// Station-Modus.

use defmt::{error, info};
use embassy_net::Stack;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Duration;
use esp_radio::wifi::{AccessPointConfig, AuthMethod, ModeConfig};
use picoserve::response::IntoResponse;
use picoserve::routing::{get, post};
use serde::Deserialize;

use crate::SharedFlash;
use crate::config::*;
use crate::provisioning::store::{self, Credentials};
use crate::web::PORTAL_HTML;

/// Signalisiert main, dass Credentials gespeichert wurden
/// (main wartet darauf und löst dann den Neustart aus)
pub static CREDENTIALS_SAVED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Baut die Access-Point-Konfiguration für das Portal
///
/// Offenes Netz mit fester SSID - das Portal lebt nur für die
/// Einrichtung und verschwindet mit dem Neustart.
pub fn access_point_config() -> ModeConfig {
    ModeConfig::AccessPoint(
        AccessPointConfig::default()
            .with_ssid(SETUP_AP_SSID.into())
            .with_auth_method(AuthMethod::None),
    )
}

/// Formular-Daten der Portal-Seite (POST /save, urlencoded)
#[derive(Deserialize)]
struct CredentialForm {
    ssid: heapless::String<{ store::MAX_SSID_LEN }>,
    #[serde(default)]
    password: heapless::String<{ store::MAX_PASSWORD_LEN }>,
}

/// Antwort auf POST /save
enum SaveResponse {
    Saved,
    EmptySsid,
    FlashError,
}

impl IntoResponse for SaveResponse {
    async fn write_to<
        R: picoserve::io::embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        let (status, body) = match self {
            SaveResponse::Saved => (
                picoserve::response::StatusCode::OK,
                "credentials saved - the lamp is restarting",
            ),
            SaveResponse::EmptySsid => (
                picoserve::response::StatusCode::new(400),
                "network name must not be empty",
            ),
            SaveResponse::FlashError => (
                picoserve::response::StatusCode::new(500),
                "could not write credentials to flash",
            ),
        };
        picoserve::response::Response::new(status, body)
            .write_to(connection, response_writer)
            .await
    }
}

/// Serviert die Portal-Seite
async fn serve_portal_page() -> impl IntoResponse {
    picoserve::response::Response::new(picoserve::response::StatusCode::OK, PORTAL_HTML)
        .with_header("Content-Type", "text/html; charset=utf-8")
}

/// Speichert die eingereichten Credentials und signalisiert den Neustart
fn save_credentials(flash: &SharedFlash, form: &CredentialForm) -> SaveResponse {
    if form.ssid.is_empty() {
        return SaveResponse::EmptySsid;
    }

    // Die Formular-Felder haben dieselben Breiten wie die Store-Felder,
    // FieldTooLong kann hier also nicht mehr auftreten
    let Ok(credentials) = Credentials::new(form.ssid.as_str(), form.password.as_str()) else {
        return SaveResponse::FlashError;
    };

    let result = flash.lock(|cell| store::save(&mut cell.borrow_mut(), &credentials));
    match result {
        Ok(()) => {
            info!(
                "Portal: credentials for '{}' saved",
                credentials.ssid.as_str()
            );
            CREDENTIALS_SAVED.signal(());
            SaveResponse::Saved
        }
        Err(_) => {
            error!("Portal: flash write failed");
            SaveResponse::FlashError
        }
    }
}

/// HTTP Server Task für die Portal-Seite
///
/// Nur zwei Routen: das Formular und sein Submit-Ziel. Clients landen
/// per DHCP-Lease im AP-Subnetz und erreichen die Seite unter der
/// festen AP-Adresse.
///
/// # Parameter
/// - `stack`: embassy-net Stack des Access Points
/// - `flash`: geteilter Flash-Zugriff für den Credential-Store
#[embassy_executor::task]
pub async fn portal_http_task(stack: &'static Stack<'static>, flash: &'static SharedFlash) {
    info!("Portal: HTTP server starting on port {}...", HTTP_PORT);

    let app = picoserve::Router::new()
        .route("/", get(serve_portal_page))
        .route(
            "/save",
            post(
                move |picoserve::extract::Form(form): picoserve::extract::Form<
                    CredentialForm,
                >| async move { save_credentials(flash, &form) },
            ),
        );

    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    })
    .keep_connection_alive();

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);
    let _ = server
        .listen_and_serve(0, *stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("Portal: HTTP server task ended");
}
