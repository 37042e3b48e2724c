//! Label catalog backed by optional host tag capabilities.
//!
//! Hosts that manage labels remotely implement [`TagService`]; everything
//! else gets local filtering over the project's own label list.

mod catalog;
mod service;

pub use catalog::{LabelCatalog, PAGE_SIZE, PRESET_COLORS};
pub use service::{TagPage, TagQuery, TagService, TagUpdate};
