use std::fmt;

use tracing::debug;

use super::service::{TagQuery, TagService, TagUpdate};
use crate::error::LabelkitError;
use crate::model::{Label, LabelId};

/// Labels requested per page.
pub const PAGE_SIZE: u32 = 20;

/// Colors offered for new labels; the first is used when none is given.
pub const PRESET_COLORS: [&str; 8] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
];

/// The searchable label list shown to the annotator.
///
/// With a service, searches are paged remotely: page 1 replaces the
/// results and [`LabelCatalog::load_more`] appends. Without one, searches
/// filter the local labels by case-insensitive substring on the name.
pub struct LabelCatalog {
    local: Vec<Label>,
    service: Option<Box<dyn TagService>>,
    query: String,
    page: u32,
    results: Vec<Label>,
    has_more: bool,
}

impl fmt::Debug for LabelCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelCatalog")
            .field("local", &self.local.len())
            .field("remote", &self.service.is_some())
            .field("query", &self.query)
            .field("page", &self.page)
            .field("results", &self.results.len())
            .field("has_more", &self.has_more)
            .finish()
    }
}

impl LabelCatalog {
    /// A catalog over local labels only.
    pub fn new(local: Vec<Label>) -> Self {
        Self {
            results: local.clone(),
            local,
            service: None,
            query: String::new(),
            page: 1,
            has_more: false,
        }
    }

    pub fn with_service(mut self, service: Box<dyn TagService>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Label] {
        &self.results
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Replaces the local labels and refilters when there is no service.
    pub fn set_local_labels(&mut self, labels: Vec<Label>) {
        self.local = labels;
        if self.service.is_none() {
            self.results = self.filter_local();
        }
    }

    /// Runs a fresh search from page 1.
    ///
    /// # Errors
    /// Propagates the service's failure; the previous results are kept.
    pub fn search(&mut self, query: &str) -> Result<(), LabelkitError> {
        self.query = query.to_string();
        self.page = 1;
        self.fetch()
    }

    /// Fetches the next page if the last one said there is more.
    ///
    /// Returns whether a page was requested.
    pub fn load_more(&mut self) -> Result<bool, LabelkitError> {
        if !self.has_more {
            return Ok(false);
        }
        self.page += 1;
        if let Err(err) = self.fetch() {
            self.page -= 1;
            return Err(err);
        }
        Ok(true)
    }

    fn fetch(&mut self) -> Result<(), LabelkitError> {
        let Some(service) = self.service.as_mut() else {
            self.results = self.filter_local();
            self.has_more = false;
            return Ok(());
        };

        let request = TagQuery {
            query: self.query.clone(),
            page: self.page,
            limit: PAGE_SIZE,
        };
        let page = service.search(&request)?;
        debug!(query = %request.query, page = request.page, returned = page.labels.len(), total = page.total, "tag search");

        if request.page == 1 {
            self.results = page.labels;
        } else {
            self.results.extend(page.labels);
        }
        self.has_more = page.has_more;
        Ok(())
    }

    fn filter_local(&self) -> Vec<Label> {
        let needle = self.query.to_lowercase();
        self.local
            .iter()
            .filter(|label| label.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    fn service(&mut self, operation: &'static str) -> Result<&mut Box<dyn TagService>, LabelkitError> {
        self.service.as_mut().ok_or_else(|| LabelkitError::TagService {
            operation,
            message: "no tag service configured".to_string(),
        })
    }

    /// Creates a label and appends it to the results.
    ///
    /// The name is trimmed; a blank name creates nothing and returns
    /// `Ok(None)`.
    pub fn create(&mut self, name: &str, color: Option<&str>) -> Result<Option<Label>, LabelkitError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let color = color.unwrap_or(PRESET_COLORS[0]);
        let label = self.service("create")?.create(name, Some(color))?;
        self.results.push(label.clone());
        Ok(Some(label))
    }

    /// Deletes a label and drops it from the results.
    pub fn delete(&mut self, id: &LabelId) -> Result<(), LabelkitError> {
        self.service("delete")?.delete(id)?;
        self.results.retain(|label| &label.id != id);
        Ok(())
    }

    /// Edits a label and swaps the returned label into the results.
    pub fn update(&mut self, id: &LabelId, update: &TagUpdate) -> Result<Label, LabelkitError> {
        let label = self.service("update")?.update(id, update)?;
        if let Some(slot) = self.results.iter_mut().find(|existing| &existing.id == id) {
            *slot = label.clone();
        }
        Ok(label)
    }
}
