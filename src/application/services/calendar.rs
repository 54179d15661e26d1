//! Outlook calendar service

use std::sync::Arc;

use tracing::{debug, instrument};

use super::{decode, decode_created, id_segment, to_body};
use crate::application::{ApplicationResult, GraphResultExt};
use crate::config::Settings;
use crate::domain::time::to_rfc3339;
use crate::domain::{Collection, Event, NewEvent, Query, TimeRange};
use crate::infrastructure::traits::GraphClient;

/// List, create and delete calendar events.
pub struct CalendarService {
    graph: Arc<dyn GraphClient>,
    settings: Arc<Settings>,
}

impl CalendarService {
    pub fn new(graph: Arc<dyn GraphClient>, settings: Arc<Settings>) -> Self {
        Self { graph, settings }
    }

    /// Event occurrences overlapping `range`, recurring series expanded.
    #[instrument(skip(self))]
    pub fn list(&self, range: TimeRange, top: Option<u32>) -> ApplicationResult<Collection<Event>> {
        let query = Query::new()
            .param("startDateTime", to_rfc3339(&range.start))
            .param("endDateTime", to_rfc3339(&range.end))
            .top(top.unwrap_or(self.settings.page_size))
            .order_by("start/dateTime")
            .select(&["id", "subject", "start", "end", "location", "isAllDay", "organizer"]);

        let value = self
            .graph
            .get_json("/me/calendarView", &query)
            .context("list events")?;
        let events: Collection<Event> = decode(value, "events")?;
        debug!("list: {} events", events.value.len());
        Ok(events)
    }

    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> ApplicationResult<Event> {
        let path = format!("/me/events/{}", id_segment(id)?);
        let value = self
            .graph
            .get_json(&path, &Query::new())
            .context("get event")?;
        decode(value, "event")
    }

    #[instrument(skip(self, event), fields(subject = %event.subject))]
    pub fn create(&self, event: &NewEvent) -> ApplicationResult<Event> {
        let body = to_body(event, "event")?;
        let created = self
            .graph
            .post_json("/me/events", &body)
            .context("create event")?;
        decode_created(created, "event")
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> ApplicationResult<()> {
        let path = format!("/me/events/{}", id_segment(id)?);
        self.graph.delete(&path).context("delete event")
    }
}
