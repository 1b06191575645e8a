use crate::{logging, server};
use anyhow::Context;
use azdo_bridge_core::config::{AppConfig, default_config_path};
use azdo_bridge_core::importer::Importer;
use azdo_bridge_core::model::ImportRequest;
use azdo_bridge_core::naming::translate;
use azdo_bridge_providers::{AzureDevOpsConnector, WharfClient, build_client};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

mod app;
mod args;
mod import_cmd;
mod scope_cmd;

use args::*;

use import_cmd::handle_import;
use scope_cmd::handle_scope;

pub async fn run() -> anyhow::Result<()> {
    app::run().await
}
