use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One page of a Cloud Controller v2 listing.
#[derive(Debug, Clone, Deserialize)]
pub struct AppPage {
    #[serde(default)]
    pub next_url: Option<String>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Resource {
    pub metadata: Metadata,
    pub entity: AppEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    pub guid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppEntity {
    pub name: String,
    #[serde(default)]
    pub space_guid: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// User-provided environment. The Cloud Controller sends `null` when unset.
    #[serde(default)]
    pub environment_json: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub service_bindings_url: Option<String>,
}

/// A deployed application as seen in the listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub guid: String,
    pub name: String,
    pub space_guid: Option<String>,
    pub state: Option<String>,
    pub environment: BTreeMap<String, Value>,
    pub service_bindings_url: Option<String>,
}

impl From<Resource> for Application {
    fn from(resource: Resource) -> Self {
        Self {
            guid: resource.metadata.guid,
            name: resource.entity.name,
            space_guid: resource.entity.space_guid,
            state: resource.entity.state,
            environment: resource.entity.environment_json.unwrap_or_default(),
            service_bindings_url: resource.entity.service_bindings_url,
        }
    }
}
