pub mod azure_devops;
mod azure_models;
mod azure_scope;
pub mod http;
pub mod wharf_client;

pub use azure_devops::{AzureDevOpsClient, AzureDevOpsConnector};
pub use http::build_client;
pub use wharf_client::WharfClient;
