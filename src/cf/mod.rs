//! Cloud Foundry Cloud Controller (v2) access.

mod auth;
mod client;
mod error;
mod models;

pub use client::CloudFoundryClient;
pub use error::CloudFoundryError;
pub use models::{AppEntity, AppPage, Application, Metadata, Resource};

use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use http::{Method, StatusCode};
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

/// Listing endpoint for applications.
pub const APPS_PATH: &str = "/v2/apps";

/// Path of the full environment of one application.
pub fn app_env_path(guid: &str) -> String {
    format!("{APPS_PATH}/{guid}/env")
}

/// A request against a Cloud Controller path, relative to the API address.
/// The path may carry a query string, as the `next_url` of a page does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }
}

pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes, CloudFoundryError>> + Send>>;

/// A successful response whose body has not been read yet.
///
/// Sending the request and reading its body fail separately, so callers can
/// tell a rejected request from a connection dropped halfway through the body.
pub struct ApiResponse {
    pub status: StatusCode,
    body: BodyStream,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: BodyStream) -> Self {
        Self { status, body }
    }

    pub fn from_bytes(status: StatusCode, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self::new(status, Box::pin(futures::stream::once(async move { Ok(body) })))
    }

    /// Read the whole body.
    pub async fn bytes(self) -> Result<Bytes, CloudFoundryError> {
        let chunks: Vec<Bytes> = self.body.try_collect().await?;
        Ok(Bytes::from(chunks.concat()))
    }
}

impl std::fmt::Debug for ApiResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Operations the service needs from the Cloud Controller.
///
/// Implemented by [`CloudFoundryClient`] in production and by an in-memory
/// fake in tests. Shared between concurrent request handlers.
pub trait CloudFoundryApi: Send + Sync {
    /// Send an authenticated request. Statuses >= 400 are errors.
    fn do_request(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, CloudFoundryError>> + Send;

    /// List every application visible to the user, following pagination.
    fn list_apps(&self) -> impl Future<Output = Result<Vec<Application>, CloudFoundryError>> + Send {
        async move {
            let mut apps = Vec::new();
            let mut visited = HashSet::new();
            let mut next = Some(APPS_PATH.to_string());

            while let Some(path) = next {
                if !visited.insert(path.clone()) {
                    log::warn!("Cloud Controller repeated page {path}, stopping the listing");
                    break;
                }
                log::debug!("Fetching application page {path}");
                let body = self.do_request(ApiRequest::get(path)).await?.bytes().await?;
                let page: AppPage = serde_json::from_slice(&body)?;
                if page.resources.is_empty() {
                    break;
                }
                apps.extend(page.resources.into_iter().map(Application::from));
                next = page.next_url;
            }

            log::debug!("Listed {} applications", apps.len());
            Ok(apps)
        }
    }
}
