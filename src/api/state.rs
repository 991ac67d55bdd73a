//! Application state for the HTTP server.

use crate::cf::CloudFoundryApi;
use std::sync::Arc;

/// State shared across all request handlers.
///
/// Generic over the Cloud Controller client so tests can plug in an
/// in-memory fake.
pub struct AppState<C: CloudFoundryApi> {
    client: Arc<C>,
}

impl<C: CloudFoundryApi> AppState<C> {
    pub fn new(client: C) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: CloudFoundryApi> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}
