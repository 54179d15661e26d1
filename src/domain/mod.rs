//! Domain layer: Graph resources, request bodies and input validation
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod drive;
pub mod entities;
pub mod error;
pub mod query;
pub mod requests;
pub mod time;

pub use drive::{CellRange, DocumentKind, DrivePath, SIMPLE_UPLOAD_LIMIT};
pub use entities::*;
pub use error::DomainError;
pub use query::{odata_string, Query};
pub use requests::{NewContact, NewEvent, NewTask, OutgoingMail};
pub use time::TimeRange;
