//! Outlook contacts service

use std::sync::Arc;

use tracing::instrument;

use super::{decode, decode_created, id_segment, to_body};
use crate::application::{ApplicationResult, GraphResultExt};
use crate::config::Settings;
use crate::domain::{Collection, Contact, NewContact, Query};
use crate::infrastructure::traits::GraphClient;

pub struct ContactsService {
    graph: Arc<dyn GraphClient>,
    settings: Arc<Settings>,
}

impl ContactsService {
    pub fn new(graph: Arc<dyn GraphClient>, settings: Arc<Settings>) -> Self {
        Self { graph, settings }
    }

    #[instrument(skip(self))]
    pub fn list(&self, top: Option<u32>) -> ApplicationResult<Collection<Contact>> {
        let query = Query::new()
            .top(top.unwrap_or(self.settings.page_size))
            .order_by("displayName");
        let value = self
            .graph
            .get_json("/me/contacts", &query)
            .context("list contacts")?;
        decode(value, "contacts")
    }

    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> ApplicationResult<Contact> {
        let path = format!("/me/contacts/{}", id_segment(id)?);
        let value = self
            .graph
            .get_json(&path, &Query::new())
            .context("get contact")?;
        decode(value, "contact")
    }

    #[instrument(skip(self, contact), fields(name = %contact.display_name))]
    pub fn create(&self, contact: &NewContact) -> ApplicationResult<Contact> {
        let body = to_body(contact, "contact")?;
        let created = self
            .graph
            .post_json("/me/contacts", &body)
            .context("create contact")?;
        decode_created(created, "contact")
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> ApplicationResult<()> {
        let path = format!("/me/contacts/{}", id_segment(id)?);
        self.graph.delete(&path).context("delete contact")
    }
}
