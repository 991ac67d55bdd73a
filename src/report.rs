//! Plain-text environment report for one application.

use bytes::Bytes;
use serde_json::Value;

use crate::cf::{Application, CloudFoundryApi};
use crate::environment::{EnvironmentError, fetch_raw_environment};
use crate::lookup::find_application;

/// Destination for report output, written in order as it becomes available.
pub trait ReportSink: Send {
    fn emit(&mut self, chunk: Bytes);
}

impl ReportSink for Vec<u8> {
    fn emit(&mut self, chunk: Bytes) {
        self.extend_from_slice(&chunk);
    }
}

/// Look up `name` and write its environment to `sink`.
///
/// Every failure ends up as text in the report; nothing is returned.
pub async fn write_report(client: &impl CloudFoundryApi, name: &str, sink: &mut impl ReportSink) {
    sink.emit(format!("looking for {name:?} ...\n\n").into());

    let app = match find_application(client, name).await {
        Ok(app) => app,
        Err(e) => {
            log::info!("Lookup of {name:?} failed: {e}");
            sink.emit(format!("Error: {e}\n").into());
            return;
        }
    };

    sink.emit(render_known_environment(&app).into());
    sink.emit(Bytes::from_static(b"\nAdditional environment variables:\n\n"));

    match fetch_raw_environment(client, &app.guid).await {
        Ok(payload) => {
            sink.emit(payload);
            sink.emit(Bytes::from_static(b"\n"));
        }
        Err(e @ EnvironmentError::Request { .. }) => {
            log::warn!("{e}");
            sink.emit(format!("Error: {e}\n").into());
        }
        // The caller gets a truncated report; the cause only goes to the log.
        Err(e @ EnvironmentError::Read { .. }) => {
            log::error!("{e}");
        }
    }
}

fn render_known_environment(app: &Application) -> String {
    let mut out = format!(
        "Found the below environment variables for {:?}\n\n",
        app.name
    );
    for (key, value) in &app.environment {
        out.push_str(&format!("  {key:?} : {:?}\n", render_value(value)));
    }
    out
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
