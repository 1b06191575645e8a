use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the build definition file read from each repository root.
pub const BUILD_DEFINITION_FILE: &str = ".wharf-ci.yml";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "azuredevops")]
    AzureDevOps,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::AzureDevOps => "azuredevops",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "azuredevops" => Ok(ProviderKind::AzureDevOps),
            other => Err(format!("unsupported provider {other:?}")),
        }
    }
}

/// Body of an import request.
///
/// `token_id` and `provider_id` are only set when refreshing an import that
/// already has its records in the Wharf API.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportRequest {
    pub token_id: Option<u64>,
    pub token: Option<String>,
    #[serde(rename = "user")]
    pub user_name: Option<String>,
    pub url: String,
    pub upload_url: Option<String>,
    pub provider_id: Option<u64>,
    /// Accepted on the wire for compatibility with existing callers; imports ignore it.
    pub project_id: Option<u64>,
    pub project: Option<String>,
    pub group: String,
}

impl fmt::Debug for ImportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportRequest")
            .field("token_id", &self.token_id)
            .field("token", &self.token.as_ref().map(|_| REDACTED))
            .field("user_name", &self.user_name)
            .field("url", &self.url)
            .field("upload_url", &self.upload_url)
            .field("provider_id", &self.provider_id)
            .field("project_id", &self.project_id)
            .field("project", &self.project)
            .field("group", &self.group)
            .finish()
    }
}

const REDACTED: &str = "*REDACTED*";

/// Stored credential in the Wharf API. Used as Basic auth against the provider.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Token {
    pub token_id: u64,
    pub token: String,
    pub user_name: String,
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("token_id", &self.token_id)
            .field("token", &REDACTED)
            .field("user_name", &self.user_name)
            .finish()
    }
}

/// Wharf API record of a configured provider instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Provider {
    pub provider_id: u64,
    pub name: String,
    pub url: String,
    pub upload_url: String,
    pub token_id: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub project_id: u64,
    pub name: String,
    pub group_name: String,
    pub token_id: u64,
    pub build_definition: String,
    pub description: String,
    pub provider_id: u64,
    pub git_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_project_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Branch {
    pub name: String,
    pub project_id: u64,
    pub default: bool,
    pub token_id: u64,
}

/// Search filter for Wharf projects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectSearch {
    pub name: String,
    pub group_name: String,
    pub provider_id: u64,
}

/// Project as listed by Azure DevOps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteProject {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub state: String,
    pub revision: i64,
    pub visibility: String,
}

/// Git repository as listed by Azure DevOps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteRepository {
    pub id: String,
    pub name: String,
    pub url: String,
    pub project: RemoteProject,
    #[serde(rename = "defaultBranch")]
    pub default_branch_ref: String,
    pub size: i64,
    pub remote_url: String,
    pub ssh_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteBranch {
    pub name: String,
    pub ref_name: String,
}

impl RemoteBranch {
    /// The provider marks the default branch only through the repository's
    /// `defaultBranch` ref, so default-ness is a string comparison.
    pub fn is_default(&self, default_branch_ref: &str) -> bool {
        self.ref_name == default_branch_ref
    }
}
