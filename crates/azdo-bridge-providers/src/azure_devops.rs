use crate::azure_models::{ListResponse, RefItem};
use crate::azure_scope::{
    continuation_token, items_url, project_url, projects_url, refs_url, repositories_url,
    repository_url,
};
use crate::http::{parse_base, send, send_json, send_text};
use azdo_bridge_core::error::{RequestError, SyncError};
use azdo_bridge_core::model::{Provider, RemoteBranch, RemoteProject, RemoteRepository, Token};
use azdo_bridge_core::provider::{ProviderFuture, RemoteSource, SourceConnector};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Url};
use std::collections::HashSet;
use tracing::{debug, info};

const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Azure DevOps REST client bound to one provider URL and one credential.
pub struct AzureDevOpsClient {
    client: Client,
    base: Url,
    user_name: String,
    token: String,
}

impl AzureDevOpsClient {
    pub fn new(client: Client, base_url: &str, token: &Token) -> Result<Self, SyncError> {
        let base = parse_base(base_url).map_err(|err| SyncError::InvalidConfig {
            detail: format!("Unable to parse provider URL {base_url:?}."),
            source: Some(err),
        })?;
        Ok(Self {
            client,
            base,
            user_name: token.user_name.clone(),
            token: token.token.clone(),
        })
    }

    fn get(&self, url: Url) -> RequestBuilder {
        self.client
            .get(url)
            .basic_auth(&self.user_name, Some(&self.token))
    }
}

impl RemoteSource for AzureDevOpsClient {
    fn organization_projects<'a>(
        &'a self,
        org: &'a str,
    ) -> ProviderFuture<'a, Vec<RemoteProject>> {
        Box::pin(async move {
            let detail = || format!("Unable to list projects of organization {org:?}.");
            let mut projects = Vec::new();
            let mut continuation: Option<String> = None;
            let mut followed = HashSet::new();
            loop {
                let url = projects_url(&self.base, org, continuation.as_deref())
                    .map_err(|err| SyncError::provider_response(detail(), err))?;
                debug!(org, continuation = ?continuation, "listing Azure DevOps projects");
                let response = send(self.get(url))
                    .await
                    .map_err(|err| SyncError::provider_response(detail(), err))?;
                let next = continuation_token(response.headers());
                let page: ListResponse<RemoteProject> = response
                    .json()
                    .await
                    .map_err(|err| {
                        SyncError::provider_response(detail(), RequestError::Decode(Box::new(err)))
                    })?;
                projects.extend(page.value);
                let Some(next) = next else {
                    break;
                };
                if !followed.insert(next.clone()) {
                    return Err(SyncError::provider_response(
                        detail(),
                        RequestError::Decode(
                            format!("continuation token {next:?} was already followed").into(),
                        ),
                    ));
                }
                continuation = Some(next);
            }
            info!(org, count = projects.len(), "listed Azure DevOps projects");
            Ok(projects)
        })
    }

    fn project<'a>(&'a self, org: &'a str, project: &'a str) -> ProviderFuture<'a, RemoteProject> {
        Box::pin(async move {
            let detail = || format!("Unable to get project {org}/{project}.");
            let url = project_url(&self.base, org, project)
                .map_err(|err| SyncError::provider_response(detail(), err))?;
            send_json(self.get(url))
                .await
                .map_err(|err| SyncError::provider_response(detail(), err))
        })
    }

    fn repositories<'a>(
        &'a self,
        org: &'a str,
        project: &'a str,
    ) -> ProviderFuture<'a, Vec<RemoteRepository>> {
        Box::pin(async move {
            let detail = || format!("Unable to list repositories of project {org}/{project}.");
            let url = repositories_url(&self.base, org, project)
                .map_err(|err| SyncError::provider_response(detail(), err))?;
            let list: ListResponse<RemoteRepository> = send_json(self.get(url))
                .await
                .map_err(|err| SyncError::provider_response(detail(), err))?;
            debug!(org, project, count = list.count, "listed Azure DevOps repositories");
            Ok(list.value)
        })
    }

    fn repository<'a>(
        &'a self,
        org: &'a str,
        project: &'a str,
        repo: &'a str,
    ) -> ProviderFuture<'a, RemoteRepository> {
        Box::pin(async move {
            let detail = || format!("Unable to get repository {org}/{project}/{repo}.");
            let url = repository_url(&self.base, org, project, repo)
                .map_err(|err| SyncError::provider_response(detail(), err))?;
            send_json(self.get(url))
                .await
                .map_err(|err| SyncError::provider_response(detail(), err))
        })
    }

    fn file<'a>(
        &'a self,
        org: &'a str,
        project: &'a str,
        repo: &'a str,
        path: &'a str,
    ) -> ProviderFuture<'a, String> {
        Box::pin(async move {
            let detail = || format!("Unable to fetch {path} from {org}/{project}/{repo}.");
            let url = items_url(&self.base, org, project, repo, path)
                .map_err(|err| SyncError::provider_response(detail(), err))?;
            match send_text(self.get(url).header(ACCEPT, "text/plain")).await {
                Ok(body) => Ok(body),
                Err(err) if err.is_not_found() => {
                    debug!(org, project, repo, path, "file not found, using empty content");
                    Ok(String::new())
                }
                Err(err) => Err(SyncError::FetchBuildDefinition {
                    detail: detail(),
                    source: err,
                }),
            }
        })
    }

    fn branches<'a>(
        &'a self,
        org: &'a str,
        project: &'a str,
        repo: &'a str,
    ) -> ProviderFuture<'a, Vec<RemoteBranch>> {
        Box::pin(async move {
            let detail = || format!("Unable to list branches of {org}/{project}/{repo}.");
            let url = refs_url(&self.base, org, project, repo)
                .map_err(|err| SyncError::provider_response(detail(), err))?;
            let list: ListResponse<RefItem> = send_json(self.get(url))
                .await
                .map_err(|err| SyncError::provider_response(detail(), err))?;
            Ok(list
                .value
                .into_iter()
                .map(|item| RemoteBranch {
                    name: item
                        .name
                        .strip_prefix(BRANCH_REF_PREFIX)
                        .unwrap_or(&item.name)
                        .to_string(),
                    ref_name: item.name,
                })
                .collect())
        })
    }
}

/// Connects to the Azure DevOps instance recorded in a Wharf provider.
#[derive(Clone)]
pub struct AzureDevOpsConnector {
    client: Client,
}

impl AzureDevOpsConnector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl SourceConnector for AzureDevOpsConnector {
    type Source = AzureDevOpsClient;

    fn connect(&self, provider: &Provider, token: &Token) -> Result<Self::Source, SyncError> {
        AzureDevOpsClient::new(self.client.clone(), &provider.url, token)
    }
}
