//! UAA password-grant authentication for the Cloud Controller.

use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::Url;

use super::CloudFoundryError;

/// OAuth client the cf CLI registers with every UAA.
const CLIENT_ID: &str = "cf";
const CLIENT_SECRET: &str = "";

/// Tokens this close to expiry are refreshed before use.
const EXPIRY_MARGIN: Duration = Duration::from_secs(10);

/// Subset of `GET /v2/info` we need.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Info {
    pub(crate) token_endpoint: String,
    #[serde(default)]
    pub(crate) authorization_endpoint: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct Token {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: Option<Instant>,
}

impl Token {
    fn is_fresh(&self) -> bool {
        self.expires_at
            .is_none_or(|expires_at| Instant::now() + EXPIRY_MARGIN < expires_at)
    }
}

impl From<TokenResponse> for Token {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: response
                .expires_in
                .map(|secs| Instant::now() + Duration::from_secs(secs)),
        }
    }
}

pub(crate) async fn fetch_info(
    http: &reqwest::Client,
    api_address: &Url,
) -> Result<Info, CloudFoundryError> {
    let url = api_address
        .join("/v2/info")
        .map_err(|source| CloudFoundryError::InvalidAddress {
            address: api_address.to_string(),
            source,
        })?;
    log::debug!("Fetching platform info from {url}");

    let response = http.get(url).header(ACCEPT, "application/json").send().await?;
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(CloudFoundryError::from_status(status.as_u16(), &body));
    }
    Ok(serde_json::from_slice(&body)?)
}

/// Holds the current access token and renews it when it runs out.
pub(crate) struct Authenticator {
    http: reqwest::Client,
    token_url: Url,
    username: String,
    password: String,
    token: Mutex<Token>,
}

impl Authenticator {
    /// Log in with the password grant against the token endpoint in `info`.
    pub(crate) async fn login(
        http: reqwest::Client,
        info: &Info,
        username: String,
        password: String,
    ) -> Result<Self, CloudFoundryError> {
        let endpoint = format!("{}/oauth/token", info.token_endpoint.trim_end_matches('/'));
        let token_url = Url::parse(&endpoint).map_err(|source| {
            CloudFoundryError::InvalidAddress {
                address: endpoint.clone(),
                source,
            }
        })?;

        let token = password_grant(&http, &token_url, &username, &password).await?;
        log::info!("Authenticated as {username} against {token_url}");

        Ok(Self {
            http,
            token_url,
            username,
            password,
            token: Mutex::new(token),
        })
    }

    /// Current access token, renewed first if it is about to expire.
    pub(crate) async fn bearer(&self) -> Result<String, CloudFoundryError> {
        let mut token = self.token.lock().await;
        if token.is_fresh() {
            return Ok(token.access_token.clone());
        }

        log::debug!("Access token expired, renewing");
        let renewed = match &token.refresh_token {
            Some(refresh_token) => {
                match refresh_grant(&self.http, &self.token_url, refresh_token).await {
                    Ok(renewed) => renewed,
                    Err(e) => {
                        log::warn!("Token refresh failed: {e}. Logging in again");
                        self.relogin().await?
                    }
                }
            }
            None => self.relogin().await?,
        };

        *token = renewed;
        Ok(token.access_token.clone())
    }

    async fn relogin(&self) -> Result<Token, CloudFoundryError> {
        password_grant(&self.http, &self.token_url, &self.username, &self.password).await
    }
}

async fn password_grant(
    http: &reqwest::Client,
    token_url: &Url,
    username: &str,
    password: &str,
) -> Result<Token, CloudFoundryError> {
    request_token(
        http,
        token_url,
        &[
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ],
    )
    .await
}

async fn refresh_grant(
    http: &reqwest::Client,
    token_url: &Url,
    refresh_token: &str,
) -> Result<Token, CloudFoundryError> {
    request_token(
        http,
        token_url,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
    )
    .await
}

async fn request_token(
    http: &reqwest::Client,
    token_url: &Url,
    form: &[(&str, &str)],
) -> Result<Token, CloudFoundryError> {
    let response = http
        .post(token_url.clone())
        .basic_auth(CLIENT_ID, Some(CLIENT_SECRET))
        .header(ACCEPT, "application/json")
        .form(form)
        .send()
        .await?;

    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(CloudFoundryError::Auth {
            endpoint: token_url.to_string(),
            reason: format!("{status}: {}", String::from_utf8_lossy(&body).trim()),
        });
    }

    let parsed: TokenResponse = serde_json::from_slice(&body)?;
    Ok(parsed.into())
}
