use crate::http::{join_segments, parse_base, send_json};
use azdo_bridge_core::error::{RequestError, SyncError};
use azdo_bridge_core::model::{Branch, Project, ProjectSearch, Provider, Token};
use azdo_bridge_core::provider::ProviderFuture;
use azdo_bridge_core::wharf::WharfApi;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse<T> {
    #[serde(default = "Vec::new")]
    list: Vec<T>,
    #[serde(default)]
    total_count: u64,
}

/// Client for the Wharf API. The caller's `Authorization` header is passed
/// through unchanged on every request.
pub struct WharfClient {
    client: Client,
    base: Url,
    authorization: Option<String>,
}

impl WharfClient {
    pub fn new(
        client: Client,
        base_url: &str,
        authorization: Option<String>,
    ) -> Result<Self, RequestError> {
        let base = parse_base(base_url)?;
        Ok(Self {
            client,
            base,
            authorization,
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, RequestError> {
        join_segments(&self.base, segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.authorization {
            Some(value) => builder.header(AUTHORIZATION, value),
            None => builder,
        }
    }

    async fn get_by_id<T>(&self, segments: &[&str], what: &str) -> Result<Option<T>, SyncError>
    where
        T: DeserializeOwned,
    {
        let detail = || format!("Unable to get {what} from the Wharf API.");
        let url = self
            .url(segments)
            .map_err(|err| SyncError::api_read(detail(), err))?;
        match send_json(self.request(Method::GET, url)).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(SyncError::api_read(detail(), err)),
        }
    }

    async fn search<T>(
        &self,
        segment: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<Vec<T>, SyncError>
    where
        T: DeserializeOwned,
    {
        let detail = || format!("Unable to search {what} in the Wharf API.");
        let mut url = self
            .url(&["api", segment])
            .map_err(|err| SyncError::api_read(detail(), err))?;
        url.query_pairs_mut().extend_pairs(query);
        let response: SearchResponse<T> = send_json(self.request(Method::GET, url))
            .await
            .map_err(|err| SyncError::api_read(detail(), err))?;
        debug!(what, total = response.total_count, "searched Wharf API");
        Ok(response.list)
    }

    async fn write<T, B>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
        what: &str,
    ) -> Result<T, SyncError>
    where
        T: DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let detail = || format!("Unable to write {what} to the Wharf API.");
        let url = self
            .url(segments)
            .map_err(|err| SyncError::api_write(detail(), err))?;
        send_json(self.request(method, url).json(body))
            .await
            .map_err(|err| SyncError::api_write(detail(), err))
    }
}

impl WharfApi for WharfClient {
    fn token_by_id(&self, token_id: u64) -> ProviderFuture<'_, Option<Token>> {
        Box::pin(async move {
            let id = token_id.to_string();
            self.get_by_id(&["api", "token", id.as_str()], "token").await
        })
    }

    fn search_tokens<'a>(&'a self, user_name: &'a str) -> ProviderFuture<'a, Vec<Token>> {
        Box::pin(async move {
            self.search("token", &[("userName", user_name)], "tokens")
                .await
        })
    }

    fn create_token<'a>(&'a self, token: &'a Token) -> ProviderFuture<'a, Token> {
        Box::pin(async move {
            let body = json!({ "token": token.token, "userName": token.user_name });
            self.write(Method::POST, &["api", "token"], &body, "token")
                .await
        })
    }

    fn provider_by_id(&self, provider_id: u64) -> ProviderFuture<'_, Option<Provider>> {
        Box::pin(async move {
            let id = provider_id.to_string();
            self.get_by_id(&["api", "provider", id.as_str()], "provider").await
        })
    }

    fn search_providers<'a>(
        &'a self,
        name: &'a str,
        url: &'a str,
    ) -> ProviderFuture<'a, Vec<Provider>> {
        Box::pin(async move {
            self.search("provider", &[("name", name), ("url", url)], "providers")
                .await
        })
    }

    fn create_provider<'a>(&'a self, provider: &'a Provider) -> ProviderFuture<'a, Provider> {
        Box::pin(async move {
            let body = json!({
                "name": provider.name,
                "url": provider.url,
                "uploadUrl": provider.upload_url,
                "tokenId": provider.token_id,
            });
            self.write(Method::POST, &["api", "provider"], &body, "provider")
                .await
        })
    }

    fn search_projects<'a>(
        &'a self,
        search: &'a ProjectSearch,
    ) -> ProviderFuture<'a, Vec<Project>> {
        Box::pin(async move {
            let provider_id = search.provider_id.to_string();
            self.search(
                "project",
                &[
                    ("name", search.name.as_str()),
                    ("groupName", search.group_name.as_str()),
                    ("providerId", provider_id.as_str()),
                ],
                "projects",
            )
            .await
        })
    }

    fn create_project<'a>(&'a self, project: &'a Project) -> ProviderFuture<'a, Project> {
        Box::pin(async move {
            self.write(Method::POST, &["api", "project"], project, "project")
                .await
        })
    }

    fn update_project<'a>(&'a self, project: &'a Project) -> ProviderFuture<'a, Project> {
        Box::pin(async move {
            let id = project.project_id.to_string();
            self.write(Method::PUT, &["api", "project", id.as_str()], project, "project")
                .await
        })
    }

    fn replace_branches<'a>(
        &'a self,
        project_id: u64,
        branches: &'a [Branch],
    ) -> ProviderFuture<'a, Vec<Branch>> {
        Box::pin(async move {
            let id = project_id.to_string();
            self.write(
                Method::PUT,
                &["api", "project", id.as_str(), "branch"],
                branches,
                "branches",
            )
            .await
        })
    }

    fn start_build<'a>(
        &'a self,
        project_id: u64,
        stage: &'a str,
        branch: &'a str,
        environment: &'a str,
    ) -> ProviderFuture<'a, Value> {
        Box::pin(async move {
            let detail = || format!("Unable to start a build of project {project_id}.");
            let id = project_id.to_string();
            let mut url = self
                .url(&["api", "project", id.as_str(), "build"])
                .map_err(|err| SyncError::trigger_dispatch(detail(), err))?;
            url.query_pairs_mut()
                .append_pair("stage", stage)
                .append_pair("branch", branch)
                .append_pair("environment", environment);
            send_json(self.request(Method::POST, url))
                .await
                .map_err(|err| SyncError::trigger_dispatch(detail(), err))
        })
    }
}
