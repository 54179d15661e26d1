//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.
//! Status lines go through the colored helpers; result tables are built as
//! plain strings so they stay greppable.

use std::io::{self, IsTerminal};

use colored::Colorize;
use serde::Serialize;
use termtree::Tree;

use crate::cli::error::{CliError, CliResult};
use crate::domain::time::display_time;
use crate::domain::{
    Collection, Contact, DriveItem, Event, Message, Notebook, Page, RangeValues, Section, TodoList,
    TodoTask, Worksheet,
};

/// Longest cell printed in a table column before it is cut.
const MAX_CELL_WIDTH: usize = 60;

/// Print error (red bold "error:" prefix) to stderr
///
/// colored only looks at stdout, so a redirected stderr gets the plain prefix.
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}", error_line(msg, io::stderr().is_terminal()));
}

fn error_line(msg: &(impl std::fmt::Display + ?Sized), color: bool) -> String {
    if color {
        format!("{}: {}", "error".red().bold(), msg)
    } else {
        format!("error: {}", msg)
    }
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print a labelled field, skipping empty values.
pub fn field(label: &str, value: &str) {
    if !value.is_empty() {
        println!("{:<10} {}", format!("{}:", label).dimmed(), value);
    }
}

/// Pretty JSON of any result.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Usage(format!("cannot render JSON: {}", e)))
}

/// Print `value` as JSON, or run `table` to print it for humans.
pub fn emit<T, F>(json: bool, value: &T, table: F) -> CliResult<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(),
{
    if json {
        info(&to_json(value)?);
    } else {
        table();
    }
    Ok(())
}

/// What to tell the user when Graph has more results than were shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoreHint {
    /// The command takes `--top`.
    RaiseTop,
    /// The command has no paging flag.
    FirstPage,
}

impl MoreHint {
    pub fn message(self) -> &'static str {
        match self {
            MoreHint::RaiseTop => "more results available; raise --top to see them",
            MoreHint::FirstPage => "more results available; only the first page is shown",
        }
    }
}

/// Print a list result: table (or `empty` when there are no rows) plus a
/// hint when Graph has further pages.
pub fn emit_collection<T: Serialize>(
    json: bool,
    collection: &Collection<T>,
    empty: &str,
    hint: MoreHint,
    render: impl FnOnce(&[T]) -> String,
) -> CliResult<()> {
    emit(json, collection, || {
        if collection.value.is_empty() {
            info(empty);
        } else {
            print!("{}", render(&collection.value));
        }
        if collection.has_more() {
            warning(hint.message());
        }
    })
}

fn truncate(s: &str) -> String {
    let flat = s.replace(['\r', '\n', '\t'], " ");
    if flat.chars().count() <= MAX_CELL_WIDTH {
        flat
    } else {
        let cut: String = flat.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{}…", cut)
    }
}

/// Left-aligned columns separated by two spaces; the last column is not padded.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|r| r.iter().map(|c| truncate(c)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            } else {
                widths.push(cell.chars().count());
            }
        }
    }

    let line = |cells: &mut dyn Iterator<Item = String>| -> String {
        let cells: Vec<String> = cells.collect();
        let last = cells.len().saturating_sub(1);
        let mut out = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i == last {
                out.push_str(cell);
            } else {
                let pad = widths[i].saturating_sub(cell.chars().count());
                out.push_str(cell);
                out.push_str(&" ".repeat(pad + 2));
            }
        }
        out.trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&line(&mut headers.iter().map(|h| h.to_string())));
    out.push('\n');
    for row in &rows {
        out.push_str(&line(&mut row.iter().cloned()));
        out.push('\n');
    }
    out
}

pub fn messages(items: &[Message]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|m| {
            vec![
                if m.is_read { " " } else { "*" }.to_string(),
                m.received_date_time
                    .as_deref()
                    .map(display_time)
                    .unwrap_or_default(),
                m.sender(),
                m.subject.clone().unwrap_or_default(),
                m.id.clone(),
            ]
        })
        .collect();
    render_table(&["", "RECEIVED", "FROM", "SUBJECT", "ID"], &rows)
}

pub fn message_detail(m: &Message) {
    header(&m.subject.as_deref().unwrap_or("(no subject)"));
    field("From", &m.sender());
    field("To", &join_recipients(&m.to_recipients));
    field("Cc", &join_recipients(&m.cc_recipients));
    field(
        "Received",
        &m.received_date_time
            .as_deref()
            .map(display_time)
            .unwrap_or_default(),
    );
    field("Id", &m.id);
    if let Some(body) = m.body.as_ref() {
        println!();
        info(&body.content);
    } else if let Some(preview) = m.body_preview.as_deref() {
        println!();
        info(&preview);
    }
}

fn join_recipients(recipients: &[crate::domain::Recipient]) -> String {
    recipients
        .iter()
        .map(|r| r.email_address.display())
        .collect::<Vec<_>>()
        .join(", ")
}

fn event_time(e: &Event) -> (String, String) {
    let show = |dt: &Option<crate::domain::DateTimeTimeZone>| {
        dt.as_ref()
            .map(|d| display_time(&d.date_time))
            .unwrap_or_default()
    };
    (show(&e.start), show(&e.end))
}

pub fn events(items: &[Event]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|e| {
            let (start, end) = event_time(e);
            vec![
                start,
                end,
                e.subject.clone().unwrap_or_default(),
                e.location_name().unwrap_or("").to_string(),
                e.id.clone(),
            ]
        })
        .collect();
    render_table(&["START", "END", "SUBJECT", "LOCATION", "ID"], &rows)
}

pub fn event_detail(e: &Event) {
    let (start, end) = event_time(e);
    header(&e.subject.as_deref().unwrap_or("(no subject)"));
    field("Start", &start);
    field("End", &end);
    field("Location", e.location_name().unwrap_or(""));
    field(
        "Organizer",
        &e.organizer
            .as_ref()
            .map(|o| o.email_address.display())
            .unwrap_or_default(),
    );
    field(
        "Attendees",
        &e.attendees
            .iter()
            .map(|a| a.email_address.display())
            .collect::<Vec<_>>()
            .join(", "),
    );
    field("Link", e.web_link.as_deref().unwrap_or(""));
    field("Id", &e.id);
}

/// Human readable byte count (1024 based).
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

pub fn drive_items(items: &[DriveItem]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|i| {
            let name = if i.is_folder() {
                format!("{}/", i.name)
            } else {
                i.name.clone()
            };
            vec![
                name,
                match (&i.folder, i.size) {
                    (Some(f), _) => format!("{} items", f.child_count),
                    (None, Some(size)) => human_size(size),
                    (None, None) => String::new(),
                },
                i.last_modified_date_time
                    .as_deref()
                    .map(display_time)
                    .unwrap_or_default(),
            ]
        })
        .collect();
    render_table(&["NAME", "SIZE", "MODIFIED"], &rows)
}

pub fn drive_item_detail(i: &DriveItem) {
    header(&i.name);
    field("Path", &i.drive_path());
    field("Type", if i.is_folder() { "folder" } else { "file" });
    field("Size", &i.size.map(human_size).unwrap_or_default());
    field(
        "Modified",
        &i.last_modified_date_time
            .as_deref()
            .map(display_time)
            .unwrap_or_default(),
    );
    field("Link", i.web_url.as_deref().unwrap_or(""));
    field("Id", &i.id);
}

/// Search hits with their full drive path.
pub fn documents(items: &[DriveItem]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|i| {
            vec![
                i.drive_path(),
                i.size.map(human_size).unwrap_or_default(),
                i.last_modified_date_time
                    .as_deref()
                    .map(display_time)
                    .unwrap_or_default(),
            ]
        })
        .collect();
    render_table(&["PATH", "SIZE", "MODIFIED"], &rows)
}

pub fn contacts(items: &[Contact]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|c| {
            vec![
                c.display_name.clone().unwrap_or_default(),
                c.primary_email().unwrap_or("").to_string(),
                c.primary_phone().unwrap_or("").to_string(),
                c.id.clone(),
            ]
        })
        .collect();
    render_table(&["NAME", "EMAIL", "PHONE", "ID"], &rows)
}

pub fn contact_detail(c: &Contact) {
    header(&c.display_name.as_deref().unwrap_or("(no name)"));
    field(
        "Email",
        &c.email_addresses
            .iter()
            .map(|e| e.address.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    );
    field("Mobile", c.mobile_phone.as_deref().unwrap_or(""));
    field("Business", &c.business_phones.join(", "));
    field("Company", c.company_name.as_deref().unwrap_or(""));
    field("Id", &c.id);
}

pub fn task_lists(items: &[TodoList]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|l| {
            let name = match l.wellknown_list_name.as_deref() {
                Some("defaultList") => format!("{} (default)", l.display_name),
                _ => l.display_name.clone(),
            };
            vec![name, l.id.clone()]
        })
        .collect();
    render_table(&["NAME", "ID"], &rows)
}

pub fn tasks(items: &[TodoTask]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|t| {
            vec![
                if t.is_completed() { "x" } else { " " }.to_string(),
                t.title.clone(),
                t.due_date_time
                    .as_ref()
                    .map(|d| display_time(&d.date_time))
                    .unwrap_or_default(),
                t.id.clone(),
            ]
        })
        .collect();
    render_table(&["", "TITLE", "DUE", "ID"], &rows)
}

pub fn worksheets(items: &[Worksheet]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|w| {
            vec![
                w.position.to_string(),
                w.name.clone(),
                w.visibility.clone().unwrap_or_default(),
            ]
        })
        .collect();
    render_table(&["#", "NAME", "VISIBILITY"], &rows)
}

/// Cell values as tab separated lines, ready for `cut`/`column`.
pub fn range(values: &RangeValues) -> String {
    let mut out = String::new();
    for row in values.rows() {
        out.push_str(&row.join("\t"));
        out.push('\n');
    }
    out
}

pub fn notebooks(items: &[Notebook]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|n| {
            vec![
                n.display_name.clone(),
                n.last_modified_date_time
                    .as_deref()
                    .map(display_time)
                    .unwrap_or_default(),
                n.id.clone(),
            ]
        })
        .collect();
    render_table(&["NAME", "MODIFIED", "ID"], &rows)
}

pub fn sections(items: &[Section]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|s| vec![s.display_name.clone(), s.id.clone()])
        .collect();
    render_table(&["NAME", "ID"], &rows)
}

pub fn pages(items: &[Page]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|p| {
            vec![
                p.title.clone().unwrap_or_else(|| "(untitled)".into()),
                p.created_date_time
                    .as_deref()
                    .map(display_time)
                    .unwrap_or_default(),
                p.id.clone(),
            ]
        })
        .collect();
    render_table(&["TITLE", "CREATED", "ID"], &rows)
}

/// Notebooks with their sections as a tree rooted at "OneNote".
pub fn notebook_tree(items: &[Notebook]) -> Tree<String> {
    let mut root = Tree::new("OneNote".to_string());
    for notebook in items {
        let leaves = notebook
            .sections
            .iter()
            .map(|s| Tree::new(s.display_name.clone()));
        root.push(Tree::new(notebook.display_name.clone()).with_leaves(leaves));
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn item(value: serde_json::Value) -> DriveItem {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn given_rows_when_render_table_then_columns_aligned() {
        let rows = vec![
            vec!["a".to_string(), "first".to_string()],
            vec!["long name".to_string(), "second".to_string()],
        ];
        let out = render_table(&["NAME", "VALUE"], &rows);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "NAME       VALUE");
        assert_eq!(lines[1], "a          first");
        assert_eq!(lines[2], "long name  second");
    }

    #[test]
    fn given_stderr_not_a_terminal_when_error_line_then_plain_prefix() {
        assert_eq!(error_line("no access token", false), "error: no access token");
    }

    #[test]
    fn given_command_without_top_flag_when_more_hint_then_does_not_mention_top() {
        assert!(MoreHint::RaiseTop.message().contains("--top"));
        assert!(!MoreHint::FirstPage.message().contains("--top"));
    }

    #[test]
    fn given_long_cell_when_render_table_then_truncated() {
        let long = "x".repeat(100);
        let out = render_table(&["A"], &[vec![long]]);
        let row = out.lines().nth(1).unwrap();
        assert_eq!(row.chars().count(), MAX_CELL_WIDTH);
        assert!(row.ends_with('…'));
    }

    #[rstest]
    #[case(0, "0 B")]
    #[case(1023, "1023 B")]
    #[case(1024, "1.0 KB")]
    #[case(1536, "1.5 KB")]
    #[case(5 * 1024 * 1024, "5.0 MB")]
    fn given_bytes_when_human_size_then_readable(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(human_size(bytes), expected);
    }

    #[test]
    fn given_folder_and_file_when_render_drive_items_then_folder_has_slash() {
        let items = vec![
            item(json!({"id": "1", "name": "Docs", "folder": {"childCount": 3}})),
            item(json!({"id": "2", "name": "a.txt", "size": 2048, "file": {}})),
        ];
        let out = drive_items(&items);
        assert!(out.contains("Docs/"));
        assert!(out.contains("3 items"));
        assert!(out.contains("2.0 KB"));
    }

    #[test]
    fn given_range_values_when_render_then_tab_separated() {
        let values: RangeValues = serde_json::from_value(json!({
            "address": "Sheet1!A1:B2",
            "values": [["Name", "Qty"], ["apple", 3]]
        }))
        .unwrap();
        assert_eq!(range(&values), "Name\tQty\napple\t3\n");
    }

    #[test]
    fn given_notebooks_when_tree_then_sections_nested() {
        let notebooks: Vec<Notebook> = serde_json::from_value(json!([
            {"id": "n1", "displayName": "Work", "sections": [
                {"id": "s1", "displayName": "Meetings"},
                {"id": "s2", "displayName": "Ideas"}
            ]},
            {"id": "n2", "displayName": "Home"}
        ]))
        .unwrap();

        let rendered = notebook_tree(&notebooks).to_string();

        assert!(rendered.starts_with("OneNote\n"));
        assert!(rendered.contains("Work"));
        assert!(rendered.contains("Meetings"));
        assert!(rendered.contains("Home"));
        let work = rendered.find("Work").unwrap();
        let meetings = rendered.find("Meetings").unwrap();
        let home = rendered.find("Home").unwrap();
        assert!(work < meetings && meetings < home);
    }

    #[test]
    fn given_unread_message_when_render_then_marked() {
        let msgs: Vec<Message> = serde_json::from_value(json!([
            {"id": "m1", "subject": "Hi", "isRead": false,
             "from": {"emailAddress": {"name": "Ann", "address": "ann@example.com"}},
             "receivedDateTime": "2024-05-01T08:30:00Z"}
        ]))
        .unwrap();
        let out = messages(&msgs);
        let row = out.lines().nth(1).unwrap();
        assert!(row.starts_with('*'));
        assert!(row.contains("2024-05-01 08:30"));
        assert!(row.contains("Ann <ann@example.com>"));
    }

    #[test]
    fn given_collection_when_to_json_then_value_key_present() {
        let c: Collection<Section> = Collection {
            value: vec![Section {
                id: "s1".into(),
                display_name: "Ideas".into(),
            }],
            next_link: None,
        };
        let out = to_json(&c).unwrap();
        assert!(out.contains("\"value\""));
        assert!(out.contains("\"displayName\": \"Ideas\""));
    }
}
