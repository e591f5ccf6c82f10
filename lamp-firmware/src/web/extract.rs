// Request-Body Extraktion für die Lampen-API
//
// Liest den Body und klassifiziert ihn über lamp_core::api::parse_request.
// Schlägt die Extraktion fehl, antwortet die Rejection mit 400 und festem
// Text; der Handler wird gar nicht erst aufgerufen und der Zustand bleibt
// unverändert (fail closed).

use lamp_core::api::{self, BodyError};
use picoserve::extract::FromRequest;
use picoserve::io::embedded_io_async;
use picoserve::request::{RequestBody, RequestParts};
use picoserve::response::IntoResponse;

/// JSON-Body Extractor für die mutierenden POST-Routen
pub struct LampBody<T>(pub T);

/// Rejection: 400 mit festem Text ("missing body" / "invalid json")
pub struct BadRequest(pub BodyError);

impl IntoResponse for BadRequest {
    async fn write_to<
        R: embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        picoserve::response::Response::new(
            picoserve::response::StatusCode::new(400),
            self.0.message(),
        )
        .write_to(connection, response_writer)
        .await
    }
}

impl<'r, State, T: serde::de::DeserializeOwned> FromRequest<'r, State> for LampBody<T> {
    type Rejection = BadRequest;

    async fn from_request<R: embedded_io_async::Read>(
        _state: &'r State,
        _request_parts: RequestParts<'r>,
        request_body: RequestBody<'r, R>,
    ) -> Result<Self, Self::Rejection> {
        // Konnte der Body nicht gelesen werden, behandeln wir das wie
        // einen fehlenden Body (der Client hat die Verbindung gekappt
        // oder nichts geschickt)
        let raw = request_body
            .read_all()
            .await
            .map_err(|_| BadRequest(BodyError::MissingBody))?;

        api::parse_request::<T>(raw).map(LampBody).map_err(BadRequest)
    }
}
