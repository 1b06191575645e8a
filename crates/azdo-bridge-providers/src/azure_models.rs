use serde::Deserialize;

/// Envelope of every Azure DevOps collection response.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    #[serde(default)]
    pub(crate) count: u64,
    #[serde(default = "Vec::new")]
    pub(crate) value: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefItem {
    pub(crate) name: String,
}
