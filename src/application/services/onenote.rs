//! OneNote service

use std::sync::Arc;

use tracing::instrument;

use super::{decode, id_segment};
use crate::application::{ApplicationResult, GraphResultExt};
use crate::domain::{Collection, Notebook, Page, Query, Section};
use crate::infrastructure::traits::GraphClient;

pub struct OneNoteService {
    graph: Arc<dyn GraphClient>,
}

impl OneNoteService {
    pub fn new(graph: Arc<dyn GraphClient>) -> Self {
        Self { graph }
    }

    #[instrument(skip(self))]
    pub fn notebooks(&self) -> ApplicationResult<Collection<Notebook>> {
        let query = Query::new().order_by("displayName");
        let value = self
            .graph
            .get_json("/me/onenote/notebooks", &query)
            .context("list notebooks")?;
        decode(value, "notebooks")
    }

    #[instrument(skip(self))]
    pub fn sections(&self, notebook_id: &str) -> ApplicationResult<Collection<Section>> {
        let path = format!("/me/onenote/notebooks/{}/sections", id_segment(notebook_id)?);
        let value = self
            .graph
            .get_json(&path, &Query::new())
            .context("list sections")?;
        decode(value, "sections")
    }

    #[instrument(skip(self))]
    pub fn pages(&self, section_id: &str) -> ApplicationResult<Collection<Page>> {
        let path = format!("/me/onenote/sections/{}/pages", id_segment(section_id)?);
        let query = Query::new().order_by("createdDateTime desc");
        let value = self
            .graph
            .get_json(&path, &query)
            .context("list pages")?;
        decode(value, "pages")
    }

    /// Page body as HTML.
    #[instrument(skip(self))]
    pub fn page_content(&self, page_id: &str) -> ApplicationResult<String> {
        let path = format!("/me/onenote/pages/{}/content", id_segment(page_id)?);
        let bytes = self.graph.get_bytes(&path).context("get page content")?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Notebooks with their sections in one request.
    #[instrument(skip(self))]
    pub fn tree(&self) -> ApplicationResult<Collection<Notebook>> {
        let query = Query::new()
            .order_by("displayName")
            .expand("sections($select=id,displayName)");
        let value = self
            .graph
            .get_json("/me/onenote/notebooks", &query)
            .context("list notebooks with sections")?;
        decode(value, "notebooks")
    }
}
