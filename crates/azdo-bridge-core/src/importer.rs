//! Mirrors Azure DevOps projects, repositories and branches into the Wharf API.
//!
//! One import resolves the token and provider records once, translates the
//! Wharf group/project names into an Azure DevOps scope, and then imports every
//! repository in that scope one at a time. The first failure aborts the rest;
//! repositories imported before it stay imported.

use crate::error::SyncError;
use crate::model::{
    BUILD_DEFINITION_FILE, Branch, ImportRequest, Project, ProjectSearch, Provider, ProviderKind,
    RemoteBranch, RemoteProject, RemoteRepository, Token,
};
use crate::naming::{ImportScope, ScopeLevel, translate};
use crate::provider::{RemoteSource, SourceConnector};
use crate::wharf::WharfApi;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub repositories: u32,
    pub projects_created: u32,
    pub projects_updated: u32,
    pub branches_written: u32,
}

pub struct Importer<'a, A: ?Sized, C> {
    api: &'a A,
    connector: &'a C,
}

impl<'a, A, C> Importer<'a, A, C>
where
    A: WharfApi + ?Sized,
    C: SourceConnector,
{
    pub fn new(api: &'a A, connector: &'a C) -> Self {
        Self { api, connector }
    }

    pub async fn run(&self, request: &ImportRequest) -> Result<ImportSummary, SyncError> {
        if request.group.is_empty() {
            return Err(SyncError::invalid_param(
                "group",
                "Unable to import due to empty group.",
            ));
        }

        let token = self.resolve_token(request).await?;
        debug!(token_id = token.token_id, user = %token.user_name, "token from Wharf");

        let provider = self.resolve_provider(request, &token).await?;
        debug!(
            provider_id = provider.provider_id,
            url = %provider.url,
            "provider from Wharf"
        );

        let scope = translate(&request.group, request.project.as_deref().unwrap_or_default());
        info!(scope = %scope, level = ?scope.level(), "importing from Azure DevOps");

        let source = self.connector.connect(&provider, &token)?;
        let mut session = ImportSession {
            api: self.api,
            source: &source,
            token: &token,
            provider: &provider,
            summary: ImportSummary::default(),
        };
        session.import_scope(&scope).await?;

        info!(scope = %scope, summary = ?session.summary, "import finished");
        Ok(session.summary)
    }

    async fn resolve_token(&self, request: &ImportRequest) -> Result<Token, SyncError> {
        if let Some(token_id) = request.token_id.filter(|id| *id != 0) {
            return self
                .api
                .token_by_id(token_id)
                .await?
                .ok_or_else(|| SyncError::ApiRead {
                    detail: format!("Unable to get token by ID {token_id}."),
                    source: None,
                });
        }

        let user_name = request.user_name.as_deref().unwrap_or_default();
        let secret = request.token.as_deref().unwrap_or_default();
        if user_name.is_empty() {
            return Err(SyncError::invalid_param(
                "user",
                "Unable to import when both user and token ID are omitted.",
            ));
        }
        if secret.is_empty() {
            return Err(SyncError::invalid_param(
                "token",
                "Unable to import when both token and token ID are omitted.",
            ));
        }

        let candidates = self.api.search_tokens(user_name).await?;
        if let Some(found) = candidates
            .into_iter()
            .find(|candidate| candidate.user_name == user_name && candidate.token == secret)
        {
            return Ok(found);
        }

        debug!(user = user_name, "no matching token, creating one");
        self.api
            .create_token(&Token {
                token_id: 0,
                token: secret.to_string(),
                user_name: user_name.to_string(),
            })
            .await
    }

    async fn resolve_provider(
        &self,
        request: &ImportRequest,
        token: &Token,
    ) -> Result<Provider, SyncError> {
        if let Some(provider_id) = request.provider_id.filter(|id| *id != 0) {
            return self
                .api
                .provider_by_id(provider_id)
                .await?
                .ok_or_else(|| SyncError::ApiRead {
                    detail: format!("Unable to get provider by ID {provider_id}."),
                    source: None,
                });
        }

        if request.url.is_empty() {
            return Err(SyncError::invalid_param(
                "url",
                "Unable to import without a provider URL.",
            ));
        }

        let name = ProviderKind::AzureDevOps.as_str();
        let candidates = self.api.search_providers(name, &request.url).await?;
        if let Some(found) = candidates
            .into_iter()
            .find(|candidate| candidate.name == name && candidate.url == request.url)
        {
            return Ok(found);
        }

        debug!(url = %request.url, "no matching provider, creating one");
        self.api
            .create_provider(&Provider {
                provider_id: 0,
                name: name.to_string(),
                url: request.url.clone(),
                upload_url: request.upload_url.clone().unwrap_or_default(),
                token_id: token.token_id,
            })
            .await
    }
}

struct ImportSession<'s, A: ?Sized, S> {
    api: &'s A,
    source: &'s S,
    token: &'s Token,
    provider: &'s Provider,
    summary: ImportSummary,
}

impl<A, S> ImportSession<'_, A, S>
where
    A: WharfApi + ?Sized,
    S: RemoteSource,
{
    async fn import_scope(&mut self, scope: &ImportScope) -> Result<(), SyncError> {
        let org = scope.organization.as_str();
        match scope.level() {
            ScopeLevel::Organization => {
                let projects = self.source.organization_projects(org).await?;
                info!(org, count = projects.len(), "importing organization");
                for project in &projects {
                    self.import_project(org, project).await?;
                }
            }
            ScopeLevel::Project => {
                let project = self.source.project(org, &scope.project).await?;
                self.import_project(org, &project).await?;
            }
            ScopeLevel::Repository => {
                let project = self.source.project(org, &scope.project).await?;
                let repository = self
                    .source
                    .repository(org, &scope.project, &scope.repository)
                    .await?;
                self.import_repository(org, &project, &repository).await?;
            }
        }
        Ok(())
    }

    async fn import_project(&mut self, org: &str, project: &RemoteProject) -> Result<(), SyncError> {
        let repositories = self.source.repositories(org, &project.name).await?;
        info!(
            org,
            project = %project.name,
            count = repositories.len(),
            "importing project repositories"
        );
        for repository in &repositories {
            self.import_repository(org, project, repository).await?;
        }
        Ok(())
    }

    async fn import_repository(
        &mut self,
        org: &str,
        project: &RemoteProject,
        repository: &RemoteRepository,
    ) -> Result<(), SyncError> {
        if repository.project.id != project.id {
            return Err(SyncError::Consistency {
                detail: format!(
                    "Repository {:?} belongs to project ID {:?}, expected {:?} ({}).",
                    repository.name, repository.project.id, project.id, project.name
                ),
            });
        }

        let build_definition = self
            .source
            .file(org, &project.name, &repository.name, BUILD_DEFINITION_FILE)
            .await?;
        let branches = self
            .source
            .branches(org, &project.name, &repository.name)
            .await?;

        let wharf_project = self
            .put_project(org, project, repository, build_definition)
            .await?;
        self.put_branches(&wharf_project, repository, &branches)
            .await?;

        self.summary.repositories += 1;
        info!(
            project_id = wharf_project.project_id,
            group = %wharf_project.group_name,
            name = %wharf_project.name,
            branches = branches.len(),
            "imported repository"
        );
        Ok(())
    }

    async fn put_project(
        &mut self,
        org: &str,
        project: &RemoteProject,
        repository: &RemoteRepository,
        build_definition: String,
    ) -> Result<Project, SyncError> {
        let search = ProjectSearch {
            name: repository.name.clone(),
            group_name: format!("{org}/{}", project.name),
            provider_id: self.provider.provider_id,
        };
        let existing = self.api.search_projects(&search).await?;

        let mut wharf_project = Project {
            project_id: 0,
            name: search.name,
            group_name: search.group_name,
            token_id: self.token.token_id,
            build_definition,
            description: project.description.clone(),
            provider_id: self.provider.provider_id,
            git_url: repository.ssh_url.clone(),
            remote_project_id: None,
        };

        if let [found] = existing.as_slice() {
            wharf_project.project_id = found.project_id;
            wharf_project.remote_project_id = found.remote_project_id.clone();
            let updated = self.api.update_project(&wharf_project).await?;
            self.summary.projects_updated += 1;
            Ok(updated)
        } else {
            wharf_project.remote_project_id = Some(repository.id.clone());
            let created = self.api.create_project(&wharf_project).await?;
            self.summary.projects_created += 1;
            Ok(created)
        }
    }

    async fn put_branches(
        &mut self,
        wharf_project: &Project,
        repository: &RemoteRepository,
        branches: &[RemoteBranch],
    ) -> Result<(), SyncError> {
        let branches: Vec<Branch> = branches
            .iter()
            .map(|branch| Branch {
                name: branch.name.clone(),
                project_id: wharf_project.project_id,
                default: branch.is_default(&repository.default_branch_ref),
                token_id: self.token.token_id,
            })
            .collect();
        self.api
            .replace_branches(wharf_project.project_id, &branches)
            .await?;
        self.summary.branches_written += branches.len() as u32;
        Ok(())
    }
}
