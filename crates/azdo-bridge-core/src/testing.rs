//! In-memory stand-ins for the Wharf API and Azure DevOps used by unit tests.

use crate::error::{RequestError, SyncError};
use crate::model::{
    Branch, Project, ProjectSearch, Provider, RemoteBranch, RemoteProject, RemoteRepository, Token,
};
use crate::provider::{ProviderFuture, RemoteSource, SourceConnector};
use crate::wharf::WharfApi;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub(crate) fn project(id: &str, name: &str) -> RemoteProject {
    RemoteProject {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{name} description"),
        ..RemoteProject::default()
    }
}

pub(crate) fn repository(id: &str, name: &str, project: &RemoteProject) -> RemoteRepository {
    RemoteRepository {
        id: id.to_string(),
        name: name.to_string(),
        project: project.clone(),
        default_branch_ref: "refs/heads/main".to_string(),
        ssh_url: format!("git@ssh.example.com:v3/Org/{}/{name}", project.name),
        ..RemoteRepository::default()
    }
}

fn not_found(what: &str) -> SyncError {
    SyncError::provider_response(
        format!("{what} not found"),
        RequestError::Status {
            status: 404,
            www_authenticate: None,
        },
    )
}

#[derive(Default)]
pub(crate) struct FakeSource {
    projects: Vec<RemoteProject>,
    repositories: Vec<(String, RemoteRepository)>,
    files: HashMap<String, String>,
    refs: Mutex<HashMap<String, Vec<String>>>,
    failing_branches: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub(crate) fn with_project(mut self, project: RemoteProject) -> Self {
        self.projects.push(project);
        self
    }

    pub(crate) fn with_repository(mut self, listed_under: &str, repo: RemoteRepository) -> Self {
        self.repositories.push((listed_under.to_string(), repo));
        self
    }

    pub(crate) fn with_file(mut self, repo: &str, contents: &str) -> Self {
        self.files.insert(repo.to_string(), contents.to_string());
        self
    }

    pub(crate) fn with_refs(self, repo: &str, refs: &[&str]) -> Self {
        self.set_refs(repo, refs);
        self
    }

    pub(crate) fn failing_branches(mut self, repo: &str) -> Self {
        self.failing_branches.insert(repo.to_string());
        self
    }

    pub(crate) fn set_refs(&self, repo: &str, refs: &[&str]) {
        self.refs.lock().unwrap().insert(
            repo.to_string(),
            refs.iter().map(|value| value.to_string()).collect(),
        );
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl RemoteSource for Arc<FakeSource> {
    fn organization_projects<'a>(
        &'a self,
        org: &'a str,
    ) -> ProviderFuture<'a, Vec<RemoteProject>> {
        Box::pin(async move {
            self.record(format!("projects {org}"));
            Ok(self.projects.clone())
        })
    }

    fn project<'a>(&'a self, org: &'a str, project: &'a str) -> ProviderFuture<'a, RemoteProject> {
        Box::pin(async move {
            self.record(format!("project {org}/{project}"));
            self.projects
                .iter()
                .find(|candidate| candidate.name == project)
                .cloned()
                .ok_or_else(|| not_found(project))
        })
    }

    fn repositories<'a>(
        &'a self,
        org: &'a str,
        project: &'a str,
    ) -> ProviderFuture<'a, Vec<RemoteRepository>> {
        Box::pin(async move {
            self.record(format!("repositories {org}/{project}"));
            Ok(self
                .repositories
                .iter()
                .filter(|(listed_under, _)| listed_under == project)
                .map(|(_, repo)| repo.clone())
                .collect())
        })
    }

    fn repository<'a>(
        &'a self,
        org: &'a str,
        project: &'a str,
        repo: &'a str,
    ) -> ProviderFuture<'a, RemoteRepository> {
        Box::pin(async move {
            self.record(format!("repository {org}/{project}/{repo}"));
            self.repositories
                .iter()
                .find(|(listed_under, candidate)| listed_under == project && candidate.name == repo)
                .map(|(_, candidate)| candidate.clone())
                .ok_or_else(|| not_found(repo))
        })
    }

    fn file<'a>(
        &'a self,
        org: &'a str,
        project: &'a str,
        repo: &'a str,
        _path: &'a str,
    ) -> ProviderFuture<'a, String> {
        Box::pin(async move {
            self.record(format!("file {org}/{project}/{repo}"));
            Ok(self.files.get(repo).cloned().unwrap_or_default())
        })
    }

    fn branches<'a>(
        &'a self,
        org: &'a str,
        project: &'a str,
        repo: &'a str,
    ) -> ProviderFuture<'a, Vec<RemoteBranch>> {
        Box::pin(async move {
            self.record(format!("branches {org}/{project}/{repo}"));
            if self.failing_branches.contains(repo) {
                return Err(SyncError::provider_response(
                    format!("refs of {repo}"),
                    RequestError::Status {
                        status: 500,
                        www_authenticate: None,
                    },
                ));
            }
            let refs = self.refs.lock().unwrap();
            Ok(refs
                .get(repo)
                .map(|refs| {
                    refs.iter()
                        .map(|ref_name| RemoteBranch {
                            name: ref_name.trim_start_matches("refs/heads/").to_string(),
                            ref_name: ref_name.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default())
        })
    }
}

pub(crate) struct FakeConnector {
    source: Arc<FakeSource>,
    connected: Mutex<Vec<u64>>,
}

impl FakeConnector {
    pub(crate) fn new(source: FakeSource) -> Self {
        Self {
            source: Arc::new(source),
            connected: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn source(&self) -> &FakeSource {
        &self.source
    }

    pub(crate) fn connected_tokens(&self) -> Vec<u64> {
        self.connected.lock().unwrap().clone()
    }
}

impl SourceConnector for FakeConnector {
    type Source = Arc<FakeSource>;

    fn connect(&self, _provider: &Provider, token: &Token) -> Result<Self::Source, SyncError> {
        self.connected.lock().unwrap().push(token.token_id);
        Ok(Arc::clone(&self.source))
    }
}

#[derive(Default)]
struct WharfState {
    next_id: u64,
    tokens: Vec<Token>,
    providers: Vec<Provider>,
    projects: Vec<Project>,
    branches: HashMap<u64, Vec<Branch>>,
    builds: Vec<(u64, String, String, String)>,
    calls: Vec<String>,
}

impl WharfState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub(crate) struct FakeWharf {
    state: Mutex<WharfState>,
}

impl FakeWharf {
    pub(crate) fn insert_token(&self, mut token: Token) -> Token {
        let mut state = self.state.lock().unwrap();
        token.token_id = state.next_id();
        state.tokens.push(token.clone());
        token
    }

    pub(crate) fn insert_provider(&self, mut provider: Provider) -> Provider {
        let mut state = self.state.lock().unwrap();
        provider.provider_id = state.next_id();
        state.providers.push(provider.clone());
        provider
    }

    pub(crate) fn tokens(&self) -> Vec<Token> {
        self.state.lock().unwrap().tokens.clone()
    }

    pub(crate) fn providers(&self) -> Vec<Provider> {
        self.state.lock().unwrap().providers.clone()
    }

    pub(crate) fn projects(&self) -> Vec<Project> {
        self.state.lock().unwrap().projects.clone()
    }

    pub(crate) fn branches(&self, project_id: u64) -> Vec<Branch> {
        self.state
            .lock()
            .unwrap()
            .branches
            .get(&project_id)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn builds(&self) -> Vec<(u64, String, String, String)> {
        self.state.lock().unwrap().builds.clone()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn with_state<T>(&self, call: &str, f: impl FnOnce(&mut WharfState) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.to_string());
        f(&mut state)
    }
}

impl WharfApi for FakeWharf {
    fn token_by_id(&self, token_id: u64) -> ProviderFuture<'_, Option<Token>> {
        Box::pin(async move {
            Ok(self.with_state("token_by_id", |state| {
                state
                    .tokens
                    .iter()
                    .find(|token| token.token_id == token_id)
                    .cloned()
            }))
        })
    }

    fn search_tokens<'a>(&'a self, user_name: &'a str) -> ProviderFuture<'a, Vec<Token>> {
        Box::pin(async move {
            Ok(self.with_state("search_tokens", |state| {
                state
                    .tokens
                    .iter()
                    .filter(|token| token.user_name == user_name)
                    .cloned()
                    .collect()
            }))
        })
    }

    fn create_token<'a>(&'a self, token: &'a Token) -> ProviderFuture<'a, Token> {
        Box::pin(async move {
            Ok(self.with_state("create_token", |state| {
                let mut token = token.clone();
                token.token_id = state.next_id();
                state.tokens.push(token.clone());
                token
            }))
        })
    }

    fn provider_by_id(&self, provider_id: u64) -> ProviderFuture<'_, Option<Provider>> {
        Box::pin(async move {
            Ok(self.with_state("provider_by_id", |state| {
                state
                    .providers
                    .iter()
                    .find(|provider| provider.provider_id == provider_id)
                    .cloned()
            }))
        })
    }

    fn search_providers<'a>(
        &'a self,
        name: &'a str,
        _url: &'a str,
    ) -> ProviderFuture<'a, Vec<Provider>> {
        Box::pin(async move {
            Ok(self.with_state("search_providers", |state| {
                state
                    .providers
                    .iter()
                    .filter(|provider| provider.name == name)
                    .cloned()
                    .collect()
            }))
        })
    }

    fn create_provider<'a>(&'a self, provider: &'a Provider) -> ProviderFuture<'a, Provider> {
        Box::pin(async move {
            Ok(self.with_state("create_provider", |state| {
                let mut provider = provider.clone();
                provider.provider_id = state.next_id();
                state.providers.push(provider.clone());
                provider
            }))
        })
    }

    fn search_projects<'a>(
        &'a self,
        search: &'a ProjectSearch,
    ) -> ProviderFuture<'a, Vec<Project>> {
        Box::pin(async move {
            Ok(self.with_state("search_projects", |state| {
                state
                    .projects
                    .iter()
                    .filter(|project| {
                        project.name == search.name
                            && project.group_name == search.group_name
                            && project.provider_id == search.provider_id
                    })
                    .cloned()
                    .collect()
            }))
        })
    }

    fn create_project<'a>(&'a self, project: &'a Project) -> ProviderFuture<'a, Project> {
        Box::pin(async move {
            Ok(self.with_state("create_project", |state| {
                let mut project = project.clone();
                project.project_id = state.next_id();
                state.projects.push(project.clone());
                project
            }))
        })
    }

    fn update_project<'a>(&'a self, project: &'a Project) -> ProviderFuture<'a, Project> {
        Box::pin(async move {
            Ok(self.with_state("update_project", |state| {
                if let Some(existing) = state
                    .projects
                    .iter_mut()
                    .find(|existing| existing.project_id == project.project_id)
                {
                    *existing = project.clone();
                }
                project.clone()
            }))
        })
    }

    fn replace_branches<'a>(
        &'a self,
        project_id: u64,
        branches: &'a [Branch],
    ) -> ProviderFuture<'a, Vec<Branch>> {
        Box::pin(async move {
            Ok(self.with_state("replace_branches", |state| {
                state.branches.insert(project_id, branches.to_vec());
                branches.to_vec()
            }))
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
            Ok(self.with_state("start_build", |state| {
                state.builds.push((
                    project_id,
                    stage.to_string(),
                    branch.to_string(),
                    environment.to_string(),
                ));
                json!({ "buildId": state.builds.len() })
            }))
        })
    }
}
