use serde::{Deserialize, Serialize};

use crate::error::LabelkitError;
use crate::model::{Label, LabelId};

/// One page request against a [`TagService`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagQuery {
    pub query: String,
    /// 1-based.
    pub page: u32,
    pub limit: u32,
}

/// One page of search results.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPage {
    pub labels: Vec<Label>,
    pub total: u64,
    pub has_more: bool,
}

/// Partial label edit; `None` leaves the field alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Label management provided by the host.
///
/// Failures are reported as [`LabelkitError::TagService`] and are never
/// retried by the catalog.
pub trait TagService {
    fn search(&mut self, query: &TagQuery) -> Result<TagPage, LabelkitError>;

    fn create(&mut self, name: &str, color: Option<&str>) -> Result<Label, LabelkitError>;

    fn delete(&mut self, id: &LabelId) -> Result<(), LabelkitError>;

    fn update(&mut self, id: &LabelId, update: &TagUpdate) -> Result<Label, LabelkitError>;
}
