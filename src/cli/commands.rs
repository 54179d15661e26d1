//! Command dispatch: settings, service wiring and rendering per subcommand

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::CommandFactory;
use serde_json::json;
use tracing::{debug, instrument};

use crate::cli::args::{
    CalendarCommands, Cli, Commands, ConfigCommands, ContactsCommands, DocumentCommands,
    DriveCommands, ExcelCommands, MailCommands, OneNoteCommands, TasksCommands,
};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output::{self, MoreHint};
use crate::config::{global_config_dir, global_config_path, OutputFormat, Settings};
use crate::domain::time::parse_date_time;
use crate::domain::{
    CellRange, DocumentKind, DrivePath, NewContact, NewEvent, NewTask, OutgoingMail, TimeRange,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;
use crate::util::path::expand_path;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| InfraError::io("print help", e))?;
            Ok(())
        }
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(command) => {
            let settings = load_settings(cli)?;
            let json = cli.json || settings.output == OutputFormat::Json;
            let container = ServiceContainer::new(settings)?;
            dispatch(&container, json, command)
        }
    }
}

fn config_path(cli: &Cli) -> Option<PathBuf> {
    cli.config.as_deref().map(expand_path)
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let path = config_path(cli);
    debug!("load_settings: config={:?}", path);
    Ok(Settings::load(path.as_deref())?)
}

fn dispatch(c: &ServiceContainer, json: bool, command: &Commands) -> CliResult<()> {
    match command {
        Commands::Mail { command } => cmd_mail(c, json, command),
        Commands::Calendar { command } => cmd_calendar(c, json, command),
        Commands::Drive { command } => cmd_drive(c, json, command),
        Commands::Contacts { command } => cmd_contacts(c, json, command),
        Commands::Tasks { command } => cmd_tasks(c, json, command),
        Commands::Word { command } => cmd_document(c, json, DocumentKind::Word, command),
        Commands::Ppt { command } => cmd_document(c, json, DocumentKind::PowerPoint, command),
        Commands::Excel { command } => cmd_excel(c, json, command),
        Commands::Onenote { command } => cmd_onenote(c, json, command),
        Commands::Config { .. } | Commands::Completion { .. } => Err(CliError::Usage(
            "command does not talk to Microsoft Graph".into(),
        )),
    }
}

/// Confirmation for commands without a result body.
fn done(json: bool, value: serde_json::Value, msg: &str) -> CliResult<()> {
    output::emit(json, &value, || output::success(&msg))
}

// ============================================================
// Mail
// ============================================================

#[instrument(skip(c))]
fn cmd_mail(c: &ServiceContainer, json: bool, command: &MailCommands) -> CliResult<()> {
    let mail = c.mail();
    match command {
        MailCommands::List {
            folder,
            top,
            unread,
        } => {
            let messages = mail.list(folder, top.top, *unread)?;
            output::emit_collection(
                json,
                &messages,
                "No messages.",
                MoreHint::RaiseTop,
                output::messages,
            )
        }
        MailCommands::Get { id } => {
            let message = mail.get(id)?;
            output::emit(json, &message, || output::message_detail(&message))
        }
        MailCommands::Send {
            to,
            cc,
            subject,
            body,
        } => {
            let outgoing = OutgoingMail::new(to, cc, subject, body)?;
            mail.send(&outgoing)?;
            done(
                json,
                json!({"sent": true, "to": to}),
                &format!("Sent to {}", to.join(", ")),
            )
        }
        MailCommands::Delete { id } => {
            mail.delete(id)?;
            done(json, json!({"deleted": id}), &format!("Deleted message {}", id))
        }
    }
}

// ============================================================
// Calendar
// ============================================================

#[instrument(skip(c))]
fn cmd_calendar(c: &ServiceContainer, json: bool, command: &CalendarCommands) -> CliResult<()> {
    let calendar = c.calendar();
    match command {
        CalendarCommands::List { from, to, top } => {
            let range = TimeRange::from_args(from.as_deref(), to.as_deref(), Utc::now())?;
            let events = calendar.list(range, top.top)?;
            output::emit_collection(
                json,
                &events,
                "No events.",
                MoreHint::RaiseTop,
                output::events,
            )
        }
        CalendarCommands::Get { id } => {
            let event = calendar.get(id)?;
            output::emit(json, &event, || output::event_detail(&event))
        }
        CalendarCommands::Create {
            subject,
            start,
            end,
            location,
            attendee,
        } => {
            let range = TimeRange::new(parse_date_time(start)?, parse_date_time(end)?)?;
            let event = NewEvent::new(subject, range, location.as_deref(), attendee)?;
            let created = calendar.create(&event)?;
            output::emit(json, &created, || {
                output::success(&format!("Created event {}", created.id));
                output::event_detail(&created);
            })
        }
        CalendarCommands::Delete { id } => {
            calendar.delete(id)?;
            done(json, json!({"deleted": id}), &format!("Deleted event {}", id))
        }
    }
}

// ============================================================
// Drive
// ============================================================

#[instrument(skip(c))]
fn cmd_drive(c: &ServiceContainer, json: bool, command: &DriveCommands) -> CliResult<()> {
    let drive = c.drive();
    match command {
        DriveCommands::Ls { path } => {
            let path = DrivePath::parse(path);
            let items = drive.list(&path)?;
            output::emit_collection(
                json,
                &items,
                "Empty folder.",
                MoreHint::FirstPage,
                output::drive_items,
            )
        }
        DriveCommands::Get { path } => {
            let item = drive.get(&DrivePath::parse(path))?;
            output::emit(json, &item, || output::drive_item_detail(&item))
        }
        DriveCommands::Download { path, output: dest } => {
            let dest = dest.as_deref().map(expand_path);
            let download = drive.download(&DrivePath::parse(path), dest.as_deref())?;
            report_download(json, &download)
        }
        DriveCommands::Upload { file, remote } => {
            let local = expand_path(file);
            let item = drive.upload(&local, remote.as_deref())?;
            output::emit(json, &item, || {
                output::success(&format!(
                    "Uploaded {} -> /{}",
                    local.display(),
                    item.drive_path()
                ))
            })
        }
        DriveCommands::Mkdir { path } => {
            let item = drive.mkdir(&DrivePath::parse(path))?;
            output::emit(json, &item, || {
                output::success(&format!("Created folder /{}", item.drive_path()))
            })
        }
        DriveCommands::Rm { path } => {
            let path = DrivePath::parse(path);
            drive.remove(&path)?;
            done(
                json,
                json!({"deleted": path.to_string()}),
                &format!("Deleted {}", path),
            )
        }
    }
}

fn report_download(json: bool, download: &crate::application::services::Download) -> CliResult<()> {
    done(
        json,
        json!({"path": download.path, "bytes": download.bytes}),
        &format!(
            "Downloaded {} ({})",
            download.path.display(),
            output::human_size(download.bytes)
        ),
    )
}

// ============================================================
// Contacts
// ============================================================

#[instrument(skip(c))]
fn cmd_contacts(c: &ServiceContainer, json: bool, command: &ContactsCommands) -> CliResult<()> {
    let contacts = c.contacts();
    match command {
        ContactsCommands::List { top } => {
            let list = contacts.list(top.top)?;
            output::emit_collection(
                json,
                &list,
                "No contacts.",
                MoreHint::RaiseTop,
                output::contacts,
            )
        }
        ContactsCommands::Get { id } => {
            let contact = contacts.get(id)?;
            output::emit(json, &contact, || output::contact_detail(&contact))
        }
        ContactsCommands::Create { name, email, phone } => {
            let new = NewContact::new(name, email, phone.as_deref())?;
            let created = contacts.create(&new)?;
            output::emit(json, &created, || {
                output::success(&format!("Created contact {}", created.id));
                output::contact_detail(&created);
            })
        }
        ContactsCommands::Delete { id } => {
            contacts.delete(id)?;
            done(json, json!({"deleted": id}), &format!("Deleted contact {}", id))
        }
    }
}

// ============================================================
// Tasks
// ============================================================

#[instrument(skip(c))]
fn cmd_tasks(c: &ServiceContainer, json: bool, command: &TasksCommands) -> CliResult<()> {
    let tasks = c.tasks();
    match command {
        TasksCommands::Lists => {
            let lists = tasks.lists()?;
            output::emit_collection(
                json,
                &lists,
                "No task lists.",
                MoreHint::FirstPage,
                output::task_lists,
            )
        }
        TasksCommands::List { list_id, all } => {
            let list = tasks.list(list_id, *all)?;
            output::emit_collection(
                json,
                &list,
                "No open tasks.",
                MoreHint::FirstPage,
                output::tasks,
            )
        }
        TasksCommands::Add {
            list_id,
            title,
            due,
        } => {
            let due = due.as_deref().map(parse_date_time).transpose()?;
            let task = NewTask::new(title, due)?;
            let created = tasks.add(list_id, &task)?;
            output::emit(json, &created, || {
                output::success(&format!("Added task {} ({})", created.title, created.id))
            })
        }
        TasksCommands::Complete { list_id, task_id } => {
            let task = tasks.complete(list_id, task_id)?;
            output::emit(json, &task, || {
                output::success(&format!("Completed {}", task.title))
            })
        }
        TasksCommands::Delete { list_id, task_id } => {
            tasks.delete(list_id, task_id)?;
            done(
                json,
                json!({"deleted": task_id}),
                &format!("Deleted task {}", task_id),
            )
        }
    }
}

// ============================================================
// Word / PowerPoint / Excel
// ============================================================

#[instrument(skip(c))]
fn cmd_document(
    c: &ServiceContainer,
    json: bool,
    kind: DocumentKind,
    command: &DocumentCommands,
) -> CliResult<()> {
    match command {
        DocumentCommands::List { top } => list_documents(c, json, kind, top.top),
        DocumentCommands::Download { path, output: dest } => {
            download_document(c, json, kind, path, dest.as_deref())
        }
    }
}

fn list_documents(
    c: &ServiceContainer,
    json: bool,
    kind: DocumentKind,
    top: Option<u32>,
) -> CliResult<()> {
    let items = c.documents().list(kind, top)?;
    let empty = format!("No {} files found.", kind.label());
    output::emit_collection(json, &items, &empty, MoreHint::RaiseTop, output::documents)
}

fn download_document(
    c: &ServiceContainer,
    json: bool,
    kind: DocumentKind,
    path: &str,
    dest: Option<&Path>,
) -> CliResult<()> {
    let dest = dest.map(expand_path);
    let download = c
        .documents()
        .download(kind, &DrivePath::parse(path), dest.as_deref())?;
    report_download(json, &download)
}

#[instrument(skip(c))]
fn cmd_excel(c: &ServiceContainer, json: bool, command: &ExcelCommands) -> CliResult<()> {
    match command {
        ExcelCommands::List { top } => list_documents(c, json, DocumentKind::Excel, top.top),
        ExcelCommands::Download { path, output: dest } => {
            download_document(c, json, DocumentKind::Excel, path, dest.as_deref())
        }
        ExcelCommands::Sheets { path } => {
            let sheets = c.workbook().sheets(&DrivePath::parse(path))?;
            output::emit_collection(
                json,
                &sheets,
                "No worksheets.",
                MoreHint::FirstPage,
                output::worksheets,
            )
        }
        ExcelCommands::Read { path, sheet, range } => {
            let range = range.as_deref().map(CellRange::parse).transpose()?;
            let values = c
                .workbook()
                .read(&DrivePath::parse(path), sheet, range.as_ref())?;
            output::emit(json, &values, || print!("{}", output::range(&values)))
        }
    }
}

// ============================================================
// OneNote
// ============================================================

#[instrument(skip(c))]
fn cmd_onenote(c: &ServiceContainer, json: bool, command: &OneNoteCommands) -> CliResult<()> {
    let onenote = c.onenote();
    match command {
        OneNoteCommands::Notebooks => {
            let notebooks = onenote.notebooks()?;
            output::emit_collection(
                json,
                &notebooks,
                "No notebooks.",
                MoreHint::FirstPage,
                output::notebooks,
            )
        }
        OneNoteCommands::Sections { notebook_id } => {
            let sections = onenote.sections(notebook_id)?;
            output::emit_collection(
                json,
                &sections,
                "No sections.",
                MoreHint::FirstPage,
                output::sections,
            )
        }
        OneNoteCommands::Pages { section_id } => {
            let pages = onenote.pages(section_id)?;
            output::emit_collection(
                json,
                &pages,
                "No pages.",
                MoreHint::FirstPage,
                output::pages,
            )
        }
        OneNoteCommands::Get { page_id } => {
            let html = onenote.page_content(page_id)?;
            output::emit(json, &json!({"id": page_id, "content": html}), || {
                output::info(&html)
            })
        }
        OneNoteCommands::Tree => {
            let notebooks = onenote.tree()?;
            output::emit(json, &notebooks, || {
                print!("{}", output::notebook_tree(&notebooks.value))
            })
        }
    }
}

// ============================================================
// Config
// ============================================================

#[instrument(skip(cli))]
fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            if cli.json || settings.output == OutputFormat::Json {
                output::info(&output::to_json(&settings.redacted())?);
            } else {
                print!("{}", settings.to_toml()?);
            }
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let path = config_path(cli)
                .or_else(global_config_path)
                .ok_or_else(|| CliError::Usage("cannot determine config directory".into()))?;
            let fs = RealFileSystem;
            if fs.exists(&path) && !force {
                return Err(CliError::Usage(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            fs.ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            fs.write(&path, Settings::template().as_bytes())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("Created {}", path.display()));
            Ok(())
        }
        ConfigCommands::Path => {
            output::header(&"Config paths:");
            match global_config_dir() {
                Some(dir) => output::detail(&format!("Global dir:  {}", dir.display())),
                None => output::detail(&"Global dir:  (unavailable)"),
            }
            if let Some(path) = global_config_path() {
                let status = if path.exists() { "exists" } else { "missing" };
                output::detail(&format!("Global file: {} ({})", path.display(), status));
            }
            if let Some(path) = config_path(cli) {
                let status = if path.exists() { "exists" } else { "missing" };
                output::detail(&format!("--config:    {} ({})", path.display(), status));
            }
            Ok(())
        }
    }
}
