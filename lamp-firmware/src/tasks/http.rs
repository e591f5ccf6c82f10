// HTTP Server Task - Lampen-API auf Port 80
use defmt::{error, info};
use embassy_net::Stack;
use embassy_time::Duration;
use lamp_core::api::{ColorRequest, IntensityRequest, StatusResponse};
use picoserve::response::IntoResponse;
use picoserve::routing::{get, post};

use crate::SharedLamp;
use crate::config::*;
use crate::web::extract::LampBody;

/// Response-Typ für GET /status
///
/// Serialisiert den Status erst beim Schreiben in einen lokalen Buffer,
/// damit der Handler keine Allokation braucht.
struct StatusJson(StatusResponse);

impl IntoResponse for StatusJson {
    async fn write_to<
        R: picoserve::io::embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        let mut json_buffer = [0u8; STATUS_JSON_BUFFER_SIZE];
        match serde_json_core::to_slice(&self.0, &mut json_buffer) {
            Ok(len) => {
                let body = core::str::from_utf8(&json_buffer[..len]).unwrap();
                picoserve::response::Response::new(picoserve::response::StatusCode::OK, body)
                    .with_header("Content-Type", "application/json")
                    .write_to(connection, response_writer)
                    .await
            }
            Err(_) => {
                picoserve::response::Response::new(
                    picoserve::response::StatusCode::new(500),
                    "status serialization failed",
                )
                .write_to(connection, response_writer)
                .await
            }
        }
    }
}

/// Schaltet die Lampe und rendert, gibt den festen Antwort-Text zurück
fn set_power(lamp: &SharedLamp, on: bool) -> &'static str {
    lamp.lock(|cell| {
        let mut controller = cell.borrow_mut();
        let result = if on {
            controller.power_on()
        } else {
            controller.power_off()
        };
        if result.is_err() {
            error!("LED: strip write failed");
        }
    });
    if on { "on" } else { "off" }
}

/// HTTP Server Task für die Lampen-API
///
/// Eine einzige Server-Instanz: Requests werden strikt nacheinander
/// abgearbeitet (parse → mutate/read → render → respond), nie
/// verschachtelt. Ein langsamer Client blockiert damit den nächsten
/// Request, bis seine Verbindung freigegeben ist.
///
/// # Parameter
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `lamp`: geteilter Lampen-Controller
#[embassy_executor::task]
pub async fn http_server_task(stack: &'static Stack<'static>, lamp: &'static SharedLamp) {
    info!("HTTP: Lamp API starting on port {}...", HTTP_PORT);

    // Router: fünf Routen, alles andere beantwortet picoserve mit 404
    let app = picoserve::Router::new()
        .route("/on", post(move || async move { set_power(lamp, true) }))
        .route("/off", post(move || async move { set_power(lamp, false) }))
        .route(
            "/color",
            post(
                move |LampBody(request): LampBody<ColorRequest>| async move {
                    lamp.lock(|cell| {
                        if cell.borrow_mut().set_color(&request).is_err() {
                            error!("LED: strip write failed");
                        }
                    });
                    "color set"
                },
            ),
        )
        .route(
            "/intensity",
            post(
                move |LampBody(request): LampBody<IntensityRequest>| async move {
                    lamp.lock(|cell| {
                        if cell.borrow_mut().set_intensity(&request).is_err() {
                            error!("LED: strip write failed");
                        }
                    });
                    "intensity set"
                },
            ),
        )
        .route(
            "/status",
            get(move || async move { StatusJson(lamp.lock(|cell| cell.borrow().status())) }),
        );

    // Server-Konfiguration
    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    })
    .keep_connection_alive();

    // HTTP-Buffer für Requests/Responses
    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];

    // TCP-Buffers für Socket
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    // Server erstellen und starten (lauscht auf Port 80)
    let server = picoserve::Server::new(&app, &config, &mut http_buffer);
    let _ = server
        .listen_and_serve(0, *stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Lamp API task ended");
}
