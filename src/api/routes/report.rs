//! The environment report endpoint.

use crate::api::state::AppState;
use crate::cf::CloudFoundryApi;
use crate::report::{ReportSink, write_report};
use axum::{
    body::Body,
    extract::State,
    http::{Uri, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures::channel::mpsc::{UnboundedSender, unbounded};
use std::convert::Infallible;

/// Report output goes straight into the response body as it is produced.
struct ChannelSink(UnboundedSender<Result<Bytes, Infallible>>);

impl ReportSink for ChannelSink {
    fn emit(&mut self, chunk: Bytes) {
        // Fails only once the caller has gone away
        if self.0.unbounded_send(Ok(chunk)).is_err() {
            log::debug!("Client disconnected, discarding report output");
        }
    }
}

/// `ANY /{name}`
///
/// Always answers 200 with a streamed `text/plain` body; lookup and fetch
/// failures are reported in the text.
pub async fn report_environment<C: CloudFoundryApi + 'static>(
    State(state): State<AppState<C>>,
    uri: Uri,
) -> Response {
    let name = application_name(uri.path());
    let (tx, rx) = unbounded();

    tokio::spawn(async move {
        let mut sink = ChannelSink(tx);
        write_report(state.client(), &name, &mut sink).await;
    });

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(rx),
    )
        .into_response()
}

/// The request path minus its leading `/`, percent-decoded. Paths that do not
/// decode to UTF-8 are used as they are.
pub(crate) fn application_name(path: &str) -> String {
    let raw = path.strip_prefix('/').unwrap_or(path);
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}
