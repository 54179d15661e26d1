//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (GraphClient, FileSystem)
//! but are themselves concrete structs, not traits.
//! Each operation issues a single Graph request.

mod calendar;
mod contacts;
mod documents;
mod drive;
mod mail;
mod onenote;
mod tasks;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::DomainError;

pub use calendar::CalendarService;
pub use contacts::ContactsService;
pub use documents::{DocumentService, WorkbookService};
pub use drive::{Download, DriveService};
pub use mail::MailService;
pub use onenote::OneNoteService;
pub use tasks::TasksService;

/// Deserialize a Graph response into a typed resource.
fn decode<T: DeserializeOwned>(value: Value, what: &str) -> ApplicationResult<T> {
    serde_json::from_value(value).map_err(|e| ApplicationError::OperationFailed {
        context: format!("decode {}", what),
        source: Box::new(e),
    })
}

/// Deserialize the body of a create request, which Graph always returns.
fn decode_created<T: DeserializeOwned>(value: Option<Value>, what: &str) -> ApplicationResult<T> {
    match value {
        Some(v) => decode(v, what),
        None => Err(ApplicationError::OperationFailed {
            context: format!("create {}", what),
            source: "empty response body".into(),
        }),
    }
}

fn to_body<T: Serialize>(body: &T, what: &str) -> ApplicationResult<Value> {
    serde_json::to_value(body).map_err(|e| ApplicationError::OperationFailed {
        context: format!("encode {}", what),
        source: Box::new(e),
    })
}

/// Percent-encode a resource id for use as a path segment.
fn id_segment(id: &str) -> ApplicationResult<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(DomainError::EmptyValue("id").into());
    }
    Ok(urlencoding::encode(id).into_owned())
}
