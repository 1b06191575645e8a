use crate::model::{Branch, Project, ProjectSearch, Provider, Token};
use crate::provider::ProviderFuture;
use serde_json::Value;

/// Calls into the Wharf API consumed by the importer and the trigger relay.
///
/// Lookups by ID resolve to `None` when the record does not exist. Searches
/// return every candidate; picking the exact match is the caller's job.
pub trait WharfApi: Send + Sync {
    fn token_by_id(&self, token_id: u64) -> ProviderFuture<'_, Option<Token>>;
    fn search_tokens<'a>(&'a self, user_name: &'a str) -> ProviderFuture<'a, Vec<Token>>;
    fn create_token<'a>(&'a self, token: &'a Token) -> ProviderFuture<'a, Token>;

    fn provider_by_id(&self, provider_id: u64) -> ProviderFuture<'_, Option<Provider>>;
    fn search_providers<'a>(&'a self, name: &'a str, url: &'a str)
    -> ProviderFuture<'a, Vec<Provider>>;
    fn create_provider<'a>(&'a self, provider: &'a Provider) -> ProviderFuture<'a, Provider>;

    fn search_projects<'a>(&'a self, search: &'a ProjectSearch)
    -> ProviderFuture<'a, Vec<Project>>;
    fn create_project<'a>(&'a self, project: &'a Project) -> ProviderFuture<'a, Project>;
    fn update_project<'a>(&'a self, project: &'a Project) -> ProviderFuture<'a, Project>;

    /// Replaces the whole branch set of a project.
    fn replace_branches<'a>(
        &'a self,
        project_id: u64,
        branches: &'a [Branch],
    ) -> ProviderFuture<'a, Vec<Branch>>;

    /// Starts a build and returns the Wharf API response untouched.
    fn start_build<'a>(
        &'a self,
        project_id: u64,
        stage: &'a str,
        branch: &'a str,
        environment: &'a str,
    ) -> ProviderFuture<'a, Value>;
}
