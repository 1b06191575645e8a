use super::*;

pub(super) async fn handle_import(args: ImportArgs, config: &AppConfig) -> anyhow::Result<()> {
    let wharf_api_url = config.require_wharf_api_url()?;
    let client = build_client(config.accept_invalid_certs).context("build HTTP client")?;
    let wharf = WharfClient::new(client.clone(), wharf_api_url, args.auth.clone())
        .context("configure Wharf API client")?;
    let connector = AzureDevOpsConnector::new(client);

    let request = args.to_request();
    let summary = Importer::new(&wharf, &connector)
        .run(&request)
        .await
        .context("import failed")?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
