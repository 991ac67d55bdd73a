use bytes::Bytes;

use crate::cf::{ApiRequest, CloudFoundryApi, CloudFoundryError, app_env_path};

#[derive(thiserror::Error, Debug)]
pub enum EnvironmentError {
    #[error("Error requesting environment of app {guid}: {source}")]
    Request {
        guid: String,
        #[source]
        source: CloudFoundryError,
    },
    #[error("Error reading environment of app {guid}: {source}")]
    Read {
        guid: String,
        #[source]
        source: CloudFoundryError,
    },
}

/// Fetch the complete environment document of an application, unparsed.
pub async fn fetch_raw_environment(
    client: &impl CloudFoundryApi,
    guid: &str,
) -> Result<Bytes, EnvironmentError> {
    let response = client
        .do_request(ApiRequest::get(app_env_path(guid)))
        .await
        .map_err(|source| EnvironmentError::Request {
            guid: guid.to_string(),
            source,
        })?;

    response.bytes().await.map_err(|source| EnvironmentError::Read {
        guid: guid.to_string(),
        source,
    })
}
