use crate::http::{join_segments, string_header};
use azdo_bridge_core::error::RequestError;
use reqwest::Url;
use reqwest::header::HeaderMap;

pub(crate) const API_VERSION: &str = "5.0";
const CONTINUATION_HEADER: &str = "x-ms-continuationtoken";

fn api_url(base: &Url, segments: &[&str]) -> Result<Url, RequestError> {
    let mut url = join_segments(base, segments)?;
    url.query_pairs_mut().append_pair("api-version", API_VERSION);
    Ok(url)
}

pub(crate) fn projects_url(
    base: &Url,
    org: &str,
    continuation: Option<&str>,
) -> Result<Url, RequestError> {
    let mut url = api_url(base, &[org, "_apis", "projects"])?;
    if let Some(token) = continuation {
        url.query_pairs_mut().append_pair("continuationToken", token);
    }
    Ok(url)
}

pub(crate) fn project_url(base: &Url, org: &str, project: &str) -> Result<Url, RequestError> {
    api_url(base, &[org, "_apis", "projects", project])
}

pub(crate) fn repositories_url(base: &Url, org: &str, project: &str) -> Result<Url, RequestError> {
    api_url(base, &[org, project, "_apis", "git", "repositories"])
}

pub(crate) fn repository_url(
    base: &Url,
    org: &str,
    project: &str,
    repo: &str,
) -> Result<Url, RequestError> {
    api_url(base, &[org, project, "_apis", "git", "repositories", repo])
}

pub(crate) fn items_url(
    base: &Url,
    org: &str,
    project: &str,
    repo: &str,
    file: &str,
) -> Result<Url, RequestError> {
    let mut url = api_url(
        base,
        &[org, project, "_apis", "git", "repositories", repo, "items"],
    )?;
    let scope_path = format!("/{}", file.trim_start_matches('/'));
    url.query_pairs_mut().append_pair("scopePath", &scope_path);
    Ok(url)
}

pub(crate) fn refs_url(
    base: &Url,
    org: &str,
    project: &str,
    repo: &str,
) -> Result<Url, RequestError> {
    let mut url = api_url(
        base,
        &[org, project, "_apis", "git", "repositories", repo, "refs"],
    )?;
    url.query_pairs_mut().append_pair("filter", "heads/");
    Ok(url)
}

pub(crate) fn continuation_token(headers: &HeaderMap) -> Option<String> {
    string_header(headers, CONTINUATION_HEADER).filter(|token| !token.is_empty())
}
