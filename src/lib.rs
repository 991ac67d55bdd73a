pub mod api;
pub mod cf;
mod configuration;
mod environment;
mod lookup;
mod report;
pub mod utils;


pub use cf::{Application, CloudFoundryApi, CloudFoundryClient, CloudFoundryError};
pub use configuration::{
    ClientConfiguration, ConfigurationError, DEFAULT_PORT, ServiceConfiguration,
};
pub use environment::{EnvironmentError, fetch_raw_environment};
pub use lookup::{LookupError, find_application};
pub use report::{ReportSink, write_report};
