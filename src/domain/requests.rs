//! Outgoing request bodies and their validation

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{
    Attendee, DateTimeTimeZone, EmailAddress, ItemBody, Location, Recipient,
};
use crate::domain::error::DomainError;
use crate::domain::time::{to_graph, TimeRange};

fn parse_address(raw: &str) -> Result<EmailAddress, DomainError> {
    let address = raw.trim();
    match address.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            Ok(EmailAddress::new(address))
        }
        _ => Err(DomainError::InvalidAddress(raw.to_string())),
    }
}

fn parse_recipients(raw: &[String]) -> Result<Vec<Recipient>, DomainError> {
    raw.iter()
        .map(|a| parse_address(a).map(Recipient::from))
        .collect()
}

/// Body of `POST /me/sendMail`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMail {
    pub message: OutgoingMessage,
    pub save_to_sent_items: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub subject: String,
    pub body: ItemBody,
    pub to_recipients: Vec<Recipient>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc_recipients: Vec<Recipient>,
}

impl OutgoingMail {
    /// Validate recipients and build a plain-text message.
    pub fn new(
        to: &[String],
        cc: &[String],
        subject: &str,
        body: &str,
    ) -> Result<Self, DomainError> {
        if to.is_empty() {
            return Err(DomainError::NoRecipients);
        }
        Ok(Self {
            message: OutgoingMessage {
                subject: subject.to_string(),
                body: ItemBody::text(body),
                to_recipients: parse_recipients(to)?,
                cc_recipients: parse_recipients(cc)?,
            },
            save_to_sent_items: true,
        })
    }
}

/// Body of `POST /me/events`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub subject: String,
    pub start: DateTimeTimeZone,
    pub end: DateTimeTimeZone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<Attendee>,
    /// Client-generated id; Graph drops duplicate creates carrying the same value.
    pub transaction_id: String,
}

impl NewEvent {
    pub fn new(
        subject: &str,
        range: TimeRange,
        location: Option<&str>,
        attendees: &[String],
    ) -> Result<Self, DomainError> {
        if subject.trim().is_empty() {
            return Err(DomainError::EmptyValue("subject"));
        }
        let attendees = attendees
            .iter()
            .map(|a| {
                parse_address(a).map(|email_address| Attendee {
                    email_address,
                    kind: Some("required".into()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            subject: subject.to_string(),
            start: to_graph(&range.start),
            end: to_graph(&range.end),
            location: location.map(|l| Location {
                display_name: Some(l.to_string()),
            }),
            attendees,
            transaction_id: uuid::Uuid::new_v4().to_string(),
        })
    }
}

/// Body of `POST /me/contacts`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub given_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    pub display_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
}

impl NewContact {
    /// The last whitespace-separated word of `name` becomes the surname.
    pub fn new(name: &str, emails: &[String], phone: Option<&str>) -> Result<Self, DomainError> {
        let display_name = name.split_whitespace().collect::<Vec<_>>().join(" ");
        if display_name.is_empty() {
            return Err(DomainError::EmptyValue("name"));
        }
        let (given_name, surname) = match display_name.rsplit_once(' ') {
            Some((given, sur)) => (given.to_string(), Some(sur.to_string())),
            None => (display_name.clone(), None),
        };
        let email_addresses = emails
            .iter()
            .map(|e| parse_address(e))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            given_name,
            surname,
            display_name,
            email_addresses,
            mobile_phone: phone.map(str::to_string),
        })
    }
}

/// Body of `POST /me/todo/lists/{id}/tasks`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date_time: Option<DateTimeTimeZone>,
}

impl NewTask {
    pub fn new(title: &str, due: Option<DateTime<Utc>>) -> Result<Self, DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::EmptyValue("title"));
        }
        Ok(Self {
            title: title.to_string(),
            due_date_time: due.as_ref().map(to_graph),
        })
    }
}
