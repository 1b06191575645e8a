use azdo_bridge_core::error::RequestError;
use reqwest::header::{HeaderMap, WWW_AUTHENTICATE};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

/// Outbound client. `accept_invalid_certs` applies to this client only.
pub fn build_client(accept_invalid_certs: bool) -> anyhow::Result<Client> {
    let client = Client::builder()
        .user_agent(concat!("azdo-bridge/", env!("CARGO_PKG_VERSION")))
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()?;
    Ok(client)
}

/// Sends once and turns any non-2xx status into [`RequestError::Status`].
pub(crate) async fn send(builder: RequestBuilder) -> Result<Response, RequestError> {
    let response = builder
        .send()
        .await
        .map_err(|err| RequestError::Transport(Box::new(err)))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let www_authenticate = string_header(response.headers(), WWW_AUTHENTICATE.as_str());
    let _ = response.bytes().await;
    Err(RequestError::Status {
        status: status.as_u16(),
        www_authenticate,
    })
}

pub(crate) async fn send_json<T>(builder: RequestBuilder) -> Result<T, RequestError>
where
    T: DeserializeOwned,
{
    send(builder)
        .await?
        .json::<T>()
        .await
        .map_err(|err| RequestError::Decode(Box::new(err)))
}

pub(crate) async fn send_text(builder: RequestBuilder) -> Result<String, RequestError> {
    send(builder)
        .await?
        .text()
        .await
        .map_err(|err| RequestError::Decode(Box::new(err)))
}

pub(crate) fn parse_base(base: &str) -> Result<Url, RequestError> {
    let url = Url::parse(base).map_err(|err| RequestError::InvalidUrl {
        url: base.to_string(),
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(RequestError::InvalidUrl {
            url: base.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}

/// Appends percent-encoded path segments to `base`, keeping any path the base
/// already carries.
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, RequestError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| RequestError::InvalidUrl {
            url: base.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub(crate) fn string_header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}
