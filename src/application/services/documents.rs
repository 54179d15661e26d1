//! Word, PowerPoint and Excel documents stored in OneDrive

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use super::drive::{Download, DriveService};
use super::decode;
use crate::application::{ApplicationResult, GraphResultExt};
use crate::config::Settings;
use crate::domain::drive::worksheet_segment;
use crate::domain::{
    odata_string, CellRange, Collection, DocumentKind, DriveItem, DrivePath, Query, RangeValues,
    Worksheet,
};
use crate::infrastructure::traits::GraphClient;

/// Find and fetch Office documents of one kind.
pub struct DocumentService {
    graph: Arc<dyn GraphClient>,
    drive: DriveService,
    settings: Arc<Settings>,
}

impl DocumentService {
    pub fn new(graph: Arc<dyn GraphClient>, drive: DriveService, settings: Arc<Settings>) -> Self {
        Self {
            graph,
            drive,
            settings,
        }
    }

    /// Search the drive for the kind's preferred extension and keep files
    /// whose extension belongs to the kind.
    #[instrument(skip(self))]
    pub fn list(
        &self,
        kind: DocumentKind,
        top: Option<u32>,
    ) -> ApplicationResult<Collection<DriveItem>> {
        let term = kind.extensions()[0];
        let path = format!("/me/drive/root/search(q={})", odata_string(term));
        let query = Query::new().top(top.unwrap_or(self.settings.page_size));

        let value = self
            .graph
            .get_json(&path, &query)
            .context(&format!("search {} documents", kind.label()))?;
        let mut found: Collection<DriveItem> = decode(value, "drive items")?;

        found.value.retain(|item| {
            !item.is_folder()
                && item
                    .extension()
                    .map(|ext| kind.matches_extension(&ext))
                    .unwrap_or(false)
        });
        debug!("list: {} {} documents", found.value.len(), kind.label());
        Ok(found)
    }

    #[instrument(skip(self))]
    pub fn download(
        &self,
        kind: DocumentKind,
        path: &DrivePath,
        dest: Option<&Path>,
    ) -> ApplicationResult<Download> {
        kind.check(path)?;
        self.drive.download(path, dest)
    }
}

/// Read Excel workbooks through the workbook API.
pub struct WorkbookService {
    graph: Arc<dyn GraphClient>,
}

impl WorkbookService {
    pub fn new(graph: Arc<dyn GraphClient>) -> Self {
        Self { graph }
    }

    #[instrument(skip(self))]
    pub fn sheets(&self, path: &DrivePath) -> ApplicationResult<Collection<Worksheet>> {
        DocumentKind::Excel.check(path)?;
        let url = format!("{}/worksheets", path.workbook_url());
        let value = self
            .graph
            .get_json(&url, &Query::new())
            .context(&format!("list worksheets of {}", path))?;
        decode(value, "worksheets")
    }

    /// Cell values of `range`, or of the sheet's used range when `None`.
    #[instrument(skip(self))]
    pub fn read(
        &self,
        path: &DrivePath,
        sheet: &str,
        range: Option<&CellRange>,
    ) -> ApplicationResult<RangeValues> {
        DocumentKind::Excel.check(path)?;
        let selector = match range {
            Some(r) => format!("range(address='{}')", r.as_str()),
            None => "usedRange(valuesOnly=true)".to_string(),
        };
        let url = format!(
            "{}/{}/{}",
            path.workbook_url(),
            worksheet_segment(sheet),
            selector
        );
        let query = Query::new().select(&["address", "values"]);
        let value = self
            .graph
            .get_json(&url, &query)
            .context(&format!("read {}!{}", sheet, range.map(CellRange::as_str).unwrap_or("used range")))?;
        decode(value, "range")
    }
}
