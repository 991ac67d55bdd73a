use crate::cf::{Application, CloudFoundryApi, CloudFoundryError};

#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    #[error("No app name given")]
    EmptyName,
    #[error("Could not find app with name {0:?}")]
    NotFound(String),
    #[error("Could not list apps: {0}")]
    Listing(#[source] CloudFoundryError),
}

/// Find the first application whose name is exactly `name`.
///
/// Matching is case-sensitive and follows the order the Cloud Controller
/// returned the applications in.
pub async fn find_application(
    client: &impl CloudFoundryApi,
    name: &str,
) -> Result<Application, LookupError> {
    if name.is_empty() {
        return Err(LookupError::EmptyName);
    }

    let apps = client.list_apps().await.map_err(LookupError::Listing)?;
    log::debug!("Searching {} apps for {name:?}", apps.len());

    apps.into_iter()
        .find(|app| app.name == name)
        .ok_or_else(|| LookupError::NotFound(name.to_string()))
}
