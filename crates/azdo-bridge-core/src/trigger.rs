use crate::error::SyncError;
use crate::wharf::WharfApi;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

pub const PR_CREATED_EVENT: &str = "git.pullrequest.created";
pub const PR_CREATED_STAGE: &str = "prcreated";

const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Service hook payload sent by Azure DevOps.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PullRequestEvent {
    pub event_type: String,
    pub resource: PullRequestResource,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PullRequestResource {
    pub pull_request_id: u64,
    pub source_ref_name: String,
}

/// Starts the `prcreated` stage of a Wharf project for the pull request's
/// source branch and returns the Wharf API response as-is.
pub async fn relay_pr_created<A>(
    api: &A,
    project_id: u64,
    environment: Option<&str>,
    event: &PullRequestEvent,
) -> Result<Value, SyncError>
where
    A: WharfApi + ?Sized,
{
    if event.event_type != PR_CREATED_EVENT {
        return Err(SyncError::UnsupportedEvent {
            expected: PR_CREATED_EVENT,
            actual: event.event_type.clone(),
        });
    }
    if project_id == 0 {
        return Err(SyncError::invalid_param(
            "projectId",
            "Project ID must be a positive integer.",
        ));
    }
    let environment = environment.filter(|value| !value.is_empty()).ok_or_else(|| {
        SyncError::invalid_param("environment", "Missing required query parameter.")
    })?;

    let branch = source_branch(&event.resource.source_ref_name);
    info!(
        project_id,
        branch,
        environment,
        pull_request_id = event.resource.pull_request_id,
        "starting prcreated build"
    );
    api.start_build(project_id, PR_CREATED_STAGE, branch, environment)
        .await
}

fn source_branch(ref_name: &str) -> &str {
    ref_name.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(ref_name)
}
