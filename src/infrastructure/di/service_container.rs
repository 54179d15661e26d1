//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{
    CalendarService, ContactsService, DocumentService, DriveService, MailService, OneNoteService,
    TasksService, WorkbookService,
};
use crate::application::ApplicationError;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, GraphClient, RealFileSystem};
use crate::infrastructure::{HttpGraphClient, InfraResult};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Graph request abstraction
    pub graph: Arc<dyn GraphClient>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a container talking to Graph over HTTP.
    ///
    /// Fails with [`ApplicationError::MissingToken`] when no access token is configured.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let token = settings
            .access_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ApplicationError::MissingToken)?;
        let graph = HttpGraphClient::new(
            &settings.graph_url,
            &token,
            Duration::from_secs(settings.timeout_secs),
        )?;
        Ok(Self::with_deps(
            settings,
            Arc::new(graph),
            Arc::new(RealFileSystem),
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        graph: Arc<dyn GraphClient>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            graph,
            fs,
        }
    }

    pub fn mail(&self) -> MailService {
        MailService::new(self.graph.clone(), self.settings.clone())
    }

    pub fn calendar(&self) -> CalendarService {
        CalendarService::new(self.graph.clone(), self.settings.clone())
    }

    pub fn drive(&self) -> DriveService {
        DriveService::new(self.graph.clone(), self.fs.clone())
    }

    pub fn contacts(&self) -> ContactsService {
        ContactsService::new(self.graph.clone(), self.settings.clone())
    }

    pub fn tasks(&self) -> TasksService {
        TasksService::new(self.graph.clone())
    }

    pub fn documents(&self) -> DocumentService {
        DocumentService::new(self.graph.clone(), self.drive(), self.settings.clone())
    }

    pub fn workbook(&self) -> WorkbookService {
        WorkbookService::new(self.graph.clone())
    }

    pub fn onenote(&self) -> OneNoteService {
        OneNoteService::new(self.graph.clone())
    }
}
