use crate::error::SyncError;
use crate::model::{Provider, RemoteBranch, RemoteProject, RemoteRepository, Token};
use std::future::Future;
use std::pin::Pin;

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SyncError>> + Send + 'a>>;

/// Read-only access to the remote Azure DevOps instance.
///
/// Implementations report failures through [`SyncError`]: malformed base URLs
/// as `InvalidConfig`, anything else as `ProviderResponse`.
pub trait RemoteSource: Send + Sync {
    fn organization_projects<'a>(&'a self, org: &'a str)
    -> ProviderFuture<'a, Vec<RemoteProject>>;

    fn project<'a>(&'a self, org: &'a str, project: &'a str) -> ProviderFuture<'a, RemoteProject>;

    fn repositories<'a>(
        &'a self,
        org: &'a str,
        project: &'a str,
    ) -> ProviderFuture<'a, Vec<RemoteRepository>>;

    fn repository<'a>(
        &'a self,
        org: &'a str,
        project: &'a str,
        repo: &'a str,
    ) -> ProviderFuture<'a, RemoteRepository>;

    /// Contents of `path` in the repository root. A missing file yields an
    /// empty string.
    fn file<'a>(
        &'a self,
        org: &'a str,
        project: &'a str,
        repo: &'a str,
        path: &'a str,
    ) -> ProviderFuture<'a, String>;

    fn branches<'a>(
        &'a self,
        org: &'a str,
        project: &'a str,
        repo: &'a str,
    ) -> ProviderFuture<'a, Vec<RemoteBranch>>;
}

/// Builds a [`RemoteSource`] once the Wharf provider and token are known.
pub trait SourceConnector: Send + Sync {
    type Source: RemoteSource;

    fn connect(&self, provider: &Provider, token: &Token) -> Result<Self::Source, SyncError>;
}
