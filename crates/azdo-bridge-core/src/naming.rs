//! Mapping between Wharf's two-level names (group, project) and Azure DevOps'
//! three-level names (organization, project, repository).

use serde::Serialize;
use std::fmt;

/// Breadth of an import, resolved from a Wharf group and project name.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize)]
pub struct ImportScope {
    pub organization: String,
    pub project: String,
    pub repository: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScopeLevel {
    Organization,
    Project,
    Repository,
}

impl ImportScope {
    pub fn level(&self) -> ScopeLevel {
        if self.project.is_empty() {
            ScopeLevel::Organization
        } else if self.repository.is_empty() {
            ScopeLevel::Project
        } else {
            ScopeLevel::Repository
        }
    }

    /// Wharf group name that projects imported from `project_name` live under.
    pub fn wharf_group(&self, project_name: &str) -> String {
        format!("{}/{}", self.organization, project_name)
    }
}

impl fmt::Display for ImportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.organization)?;
        for segment in [&self.project, &self.repository] {
            if segment.is_empty() {
                break;
            }
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// Resolves a Wharf group and project name into an Azure DevOps scope.
///
/// A group without `/` is the legacy layout, where the Wharf project is the
/// Azure DevOps project and every repository in it is imported. A group of the
/// form `org/project` is the current layout, where the Wharf project names a
/// single repository. Only the first `/` splits.
///
/// ```
/// use azdo_bridge_core::naming::translate;
///
/// let scope = translate("iver-wharf/wharf", "provider-azuredevops");
/// assert_eq!(scope.organization, "iver-wharf");
/// assert_eq!(scope.project, "wharf");
/// assert_eq!(scope.repository, "provider-azuredevops");
/// ```
pub fn translate(group_name: &str, project_name: &str) -> ImportScope {
    let (organization, remainder) = split_once_slash(group_name);
    if remainder.is_empty() {
        ImportScope {
            organization: group_name.to_string(),
            project: project_name.to_string(),
            repository: String::new(),
        }
    } else {
        ImportScope {
            organization: organization.to_string(),
            project: remainder.to_string(),
            repository: project_name.to_string(),
        }
    }
}

fn split_once_slash(value: &str) -> (&str, &str) {
    value.split_once('/').unwrap_or((value, ""))
}
