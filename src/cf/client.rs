use futures::TryStreamExt;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::future::Future;
use url::Url;

use super::auth::{Authenticator, fetch_info};
use super::{ApiRequest, ApiResponse, CloudFoundryApi, CloudFoundryError};
use crate::configuration::ClientConfiguration;

/// Authenticated Cloud Controller client.
///
/// Built once at startup and shared by every request handler. The underlying
/// `reqwest::Client` pools connections and is safe to use concurrently.
pub struct CloudFoundryClient {
    http: reqwest::Client,
    api_address: Url,
    auth: Authenticator,
}

impl CloudFoundryClient {
    /// Discover the token endpoint and log in. Fails if the platform is
    /// unreachable or rejects the credentials.
    pub async fn connect(config: &ClientConfiguration) -> Result<Self, CloudFoundryError> {
        let api_address =
            Url::parse(&config.api_address).map_err(|source| CloudFoundryError::InvalidAddress {
                address: config.api_address.clone(),
                source,
            })?;

        if config.skip_ssl_validation {
            log::warn!("TLS certificate validation is disabled for {api_address}");
        }
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.skip_ssl_validation)
            .user_agent(concat!("cfenv/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CloudFoundryError::ClientBuild)?;

        let info = fetch_info(&http, &api_address).await?;
        log::debug!(
            "Token endpoint {}, authorization endpoint {:?}",
            info.token_endpoint,
            info.authorization_endpoint
        );
        let auth = Authenticator::login(
            http.clone(),
            &info,
            config.username.clone(),
            config.password.clone(),
        )
        .await?;

        Ok(Self {
            http,
            api_address,
            auth,
        })
    }

    fn url_for(&self, path: &str) -> Result<Url, CloudFoundryError> {
        self.api_address
            .join(path)
            .map_err(|source| CloudFoundryError::InvalidAddress {
                address: format!("{}{}", self.api_address, path),
                source,
            })
    }
}

impl CloudFoundryApi for CloudFoundryClient {
    fn do_request(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, CloudFoundryError>> + Send {
        async move {
            let url = self.url_for(&request.path)?;
            let token = self.auth.bearer().await?;
            log::debug!("{} {}", request.method, url);

            let response = self
                .http
                .request(request.method, url)
                .header(AUTHORIZATION, format!("bearer {token}"))
                .header(ACCEPT, "application/json")
                .send()
                .await?;

            let status = response.status();
            if status.is_client_error() || status.is_server_error() {
                let body = response.bytes().await.unwrap_or_default();
                return Err(CloudFoundryError::from_status(status.as_u16(), &body));
            }

            let body = response.bytes_stream().map_err(CloudFoundryError::Transport);
            Ok(ApiResponse::new(status, Box::pin(body)))
        }
    }
}
