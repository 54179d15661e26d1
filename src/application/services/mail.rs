//! Outlook mail service

use std::sync::Arc;

use tracing::{debug, instrument};

use super::{decode, id_segment, to_body};
use crate::application::{ApplicationResult, GraphResultExt};
use crate::config::Settings;
use crate::domain::{Collection, Message, OutgoingMail, Query};
use crate::infrastructure::traits::GraphClient;

const LIST_FIELDS: &[&str] = &[
    "id",
    "subject",
    "from",
    "receivedDateTime",
    "isRead",
    "bodyPreview",
];

/// Read, send and delete mail.
pub struct MailService {
    graph: Arc<dyn GraphClient>,
    settings: Arc<Settings>,
}

impl MailService {
    pub fn new(graph: Arc<dyn GraphClient>, settings: Arc<Settings>) -> Self {
        Self { graph, settings }
    }

    /// Newest messages of a folder (well-known name like `inbox` or a folder id).
    ///
    /// Graph rejects `$orderby` on a property that is not also the first
    /// `$filter` clause, so the unread filter is anchored on `receivedDateTime`.
    #[instrument(skip(self))]
    pub fn list(
        &self,
        folder: &str,
        top: Option<u32>,
        unread_only: bool,
    ) -> ApplicationResult<Collection<Message>> {
        let path = format!("/me/mailFolders/{}/messages", id_segment(folder)?);
        let mut query = Query::new()
            .top(top.unwrap_or(self.settings.page_size))
            .select(LIST_FIELDS)
            .order_by("receivedDateTime desc");
        if unread_only {
            query = query.filter("receivedDateTime ge 1900-01-01T00:00:00Z and isRead eq false");
        }

        let value = self.graph.get_json(&path, &query).context("list messages")?;
        let messages: Collection<Message> = decode(value, "messages")?;
        debug!("list: {} messages in {}", messages.value.len(), folder);
        Ok(messages)
    }

    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> ApplicationResult<Message> {
        let path = format!("/me/messages/{}", id_segment(id)?);
        let value = self
            .graph
            .get_json(&path, &Query::new())
            .context("get message")?;
        decode(value, "message")
    }

    #[instrument(skip(self, mail))]
    pub fn send(&self, mail: &OutgoingMail) -> ApplicationResult<()> {
        debug!(
            "send: {} recipient(s), subject={:?}",
            mail.message.to_recipients.len(),
            mail.message.subject
        );
        let body = to_body(mail, "mail")?;
        self.graph
            .post_json("/me/sendMail", &body)
            .context("send mail")?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> ApplicationResult<()> {
        let path = format!("/me/messages/{}", id_segment(id)?);
        self.graph.delete(&path).context("delete message")
    }
}
