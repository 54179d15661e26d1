//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Microsoft 365 from the command line: mail, calendar, drive, contacts, tasks, office files and OneNote
#[derive(Parser, Debug)]
#[command(name = "mog")]
#[command(author, version = crate::VERSION, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = "Run `mog --ai-help` for a complete plain-text reference.")]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: ~/.config/mog/mog.toml)
    #[arg(short, long, global = true, env = "MOG_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Outlook mail
    Mail {
        #[command(subcommand)]
        command: MailCommands,
    },

    /// Outlook calendar
    Calendar {
        #[command(subcommand)]
        command: CalendarCommands,
    },

    /// OneDrive files
    Drive {
        #[command(subcommand)]
        command: DriveCommands,
    },

    /// Outlook contacts
    Contacts {
        #[command(subcommand)]
        command: ContactsCommands,
    },

    /// Microsoft To Do
    Tasks {
        #[command(subcommand)]
        command: TasksCommands,
    },

    /// Word documents in OneDrive
    Word {
        #[command(subcommand)]
        command: DocumentCommands,
    },

    /// PowerPoint presentations in OneDrive
    Ppt {
        #[command(subcommand)]
        command: DocumentCommands,
    },

    /// Excel workbooks in OneDrive
    Excel {
        #[command(subcommand)]
        command: ExcelCommands,
    },

    /// OneNote notebooks
    Onenote {
        #[command(subcommand)]
        command: OneNoteCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// `--top` shared by list commands.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct TopArg {
    /// Maximum number of items (default: page_size setting)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=999))]
    pub top: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum MailCommands {
    /// List newest messages
    List {
        /// Folder name (inbox, sentitems, drafts, archive, ...) or folder id
        #[arg(long, default_value = "inbox")]
        folder: String,
        #[command(flatten)]
        top: TopArg,
        /// Only unread messages
        #[arg(long)]
        unread: bool,
    },

    /// Show one message
    Get {
        /// Message id
        id: String,
    },

    /// Send a plain-text message
    Send {
        /// Recipient address (repeatable)
        #[arg(long, required = true)]
        to: Vec<String>,
        /// Cc address (repeatable)
        #[arg(long)]
        cc: Vec<String>,
        /// Subject line
        #[arg(short, long)]
        subject: String,
        /// Message body
        #[arg(short, long, default_value = "")]
        body: String,
    },

    /// Delete a message (moves it to Deleted Items)
    Delete {
        /// Message id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CalendarCommands {
    /// List events in a time window
    List {
        /// Window start (default: now)
        #[arg(long)]
        from: Option<String>,
        /// Window end (default: start + 7 days)
        #[arg(long)]
        to: Option<String>,
        #[command(flatten)]
        top: TopArg,
    },

    /// Show one event
    Get {
        /// Event id
        id: String,
    },

    /// Create an event
    Create {
        /// Event title
        #[arg(short, long)]
        subject: String,
        /// Start (YYYY-MM-DD, YYYY-MM-DDTHH:MM or RFC 3339)
        #[arg(long)]
        start: String,
        /// End (YYYY-MM-DD, YYYY-MM-DDTHH:MM or RFC 3339)
        #[arg(long)]
        end: String,
        /// Location name
        #[arg(short, long)]
        location: Option<String>,
        /// Attendee address (repeatable)
        #[arg(long)]
        attendee: Vec<String>,
    },

    /// Delete an event
    Delete {
        /// Event id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DriveCommands {
    /// List a folder
    Ls {
        /// Folder path (default: root)
        #[arg(default_value = "")]
        path: String,
    },

    /// Show item metadata
    Get {
        /// Item path
        path: String,
    },

    /// Download a file
    Download {
        /// File path in OneDrive
        path: String,
        /// Local destination (default: file name in current directory)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Upload a file (up to 4 MiB)
    Upload {
        /// Local file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Destination path; ending in / means folder (default: root)
        remote: Option<String>,
    },

    /// Create a folder
    Mkdir {
        /// Folder path
        path: String,
    },

    /// Delete a file or folder
    Rm {
        /// Item path
        path: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ContactsCommands {
    /// List contacts
    List {
        #[command(flatten)]
        top: TopArg,
    },

    /// Show one contact
    Get {
        /// Contact id
        id: String,
    },

    /// Create a contact
    Create {
        /// Full name
        #[arg(short, long)]
        name: String,
        /// Email address (repeatable)
        #[arg(short, long)]
        email: Vec<String>,
        /// Mobile phone
        #[arg(short, long)]
        phone: Option<String>,
    },

    /// Delete a contact
    Delete {
        /// Contact id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TasksCommands {
    /// List task lists
    Lists,

    /// List tasks of a list
    List {
        /// Task list id
        list_id: String,
        /// Include completed tasks
        #[arg(short, long)]
        all: bool,
    },

    /// Add a task
    Add {
        /// Task list id
        list_id: String,
        /// Task title
        #[arg(short, long)]
        title: String,
        /// Due date
        #[arg(long)]
        due: Option<String>,
    },

    /// Mark a task completed
    Complete {
        /// Task list id
        list_id: String,
        /// Task id
        task_id: String,
    },

    /// Delete a task
    Delete {
        /// Task list id
        list_id: String,
        /// Task id
        task_id: String,
    },
}

/// Word and PowerPoint subcommands.
#[derive(Subcommand, Debug)]
pub enum DocumentCommands {
    /// Find documents in OneDrive
    List {
        #[command(flatten)]
        top: TopArg,
    },

    /// Download a document
    Download {
        /// Document path in OneDrive
        path: String,
        /// Local destination
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExcelCommands {
    /// Find workbooks in OneDrive
    List {
        #[command(flatten)]
        top: TopArg,
    },

    /// Download a workbook
    Download {
        /// Workbook path in OneDrive
        path: String,
        /// Local destination
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// List worksheets
    Sheets {
        /// Workbook path in OneDrive
        path: String,
    },

    /// Print cell values
    Read {
        /// Workbook path in OneDrive
        path: String,
        /// Worksheet name
        sheet: String,
        /// Range like A1:C10 (default: used range)
        range: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum OneNoteCommands {
    /// List notebooks
    Notebooks,

    /// List sections of a notebook
    Sections {
        /// Notebook id
        notebook_id: String,
    },

    /// List pages of a section
    Pages {
        /// Section id
        section_id: String,
    },

    /// Print page content (HTML)
    Get {
        /// Page id
        page_id: String,
    },

    /// Show notebooks and sections as a tree
    Tree,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective config (token masked)
    Show,

    /// Create config template
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
