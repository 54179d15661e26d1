//! `--ai-help`: a plain-text command reference for LLM agents
//!
//! The flag is not registered with clap. It is matched on the
//! raw arguments before parsing so it works next to any other (even invalid)
//! arguments.

use std::ffi::OsStr;

/// Flags that print [`AI_HELP`] and exit successfully.
pub const AI_HELP_FLAGS: [&str; 2] = ["--ai-help", "-ai-help"];

/// True if any argument equals an AI help flag (case-sensitive).
pub fn wants_ai_help<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    args.into_iter()
        .any(|arg| AI_HELP_FLAGS.iter().any(|flag| arg.as_ref() == OsStr::new(flag)))
}

pub const AI_HELP: &str = r#"mog - Microsoft 365 from the command line (Microsoft Graph v1.0)

USAGE
  mog [-d...] [--json] [-c CONFIG] <group> <command> [args]

AUTH
  mog does not sign in by itself. Provide a Graph access token:
    export MOG_ACCESS_TOKEN=<token>
  or set access_token in ~/.config/mog/mog.toml (mog config init).
  Needed delegated scopes depend on the group: Mail.ReadWrite, Mail.Send,
  Calendars.ReadWrite, Files.ReadWrite, Contacts.ReadWrite, Tasks.ReadWrite,
  Notes.Read.

GLOBAL FLAGS
  -d, --debug        repeat for more log output on stderr (-d info, -dd debug, -ddd trace)
  --json             print results as JSON instead of tables
  -c, --config FILE  config file (env: MOG_CONFIG)
  --version          print version

COMMANDS
  mail list [--folder inbox] [--top N] [--unread]
  mail get <ID>
  mail send --to ADDR [--to ADDR...] [--cc ADDR...] --subject TEXT [--body TEXT]
  mail delete <ID>

  calendar list [--from DATE] [--to DATE] [--top N]      default window: now .. +7 days
  calendar get <ID>
  calendar create --subject TEXT --start TIME --end TIME [--location TEXT] [--attendee ADDR...]
  calendar delete <ID>

  drive ls [PATH]
  drive get <PATH>
  drive download <PATH> [-o FILE]
  drive upload <FILE> [REMOTE_PATH]                         files up to 4 MiB; REMOTE_PATH ending in / is a folder
  drive mkdir <PATH>
  drive rm <PATH>

  contacts list [--top N]
  contacts get <ID>
  contacts create --name "First Last" [--email ADDR...] [--phone NUMBER]
  contacts delete <ID>

  tasks lists
  tasks list <LIST_ID> [--all]
  tasks add <LIST_ID> --title TEXT [--due DATE]
  tasks complete <LIST_ID> <TASK_ID>
  tasks delete <LIST_ID> <TASK_ID>

  word list [--top N]            word download <PATH> [-o FILE]
  ppt list [--top N]             ppt download <PATH> [-o FILE]
  excel list [--top N]           excel download <PATH> [-o FILE]
  excel sheets <PATH>
  excel read <PATH> <SHEET> [RANGE]                         RANGE like A1:C10, default used range

  onenote notebooks
  onenote sections <NOTEBOOK_ID>
  onenote pages <SECTION_ID>
  onenote get <PAGE_ID>                                     prints page HTML
  onenote tree

  config show | config init [--force] | config path
  completion <bash|zsh|fish|elvish|powershell>

FORMATS
  DATE/TIME: YYYY-MM-DD, YYYY-MM-DDTHH:MM (UTC) or RFC 3339 (2024-05-01T09:00:00+02:00)
  PATH: OneDrive path relative to the drive root, e.g. Documents/report.docx

ENVIRONMENT
  MOG_ACCESS_TOKEN, MOG_GRAPH_URL, MOG_TIMEOUT_SECS, MOG_PAGE_SIZE, MOG_OUTPUT (table|json), MOG_CONFIG

EXIT CODES
  0 success, 1 command failed (message on stderr as "error: <message>"), 2 invalid arguments

TIPS
  Use --json for machine-readable output. IDs from list commands feed get/delete.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["--ai-help"], true)]
    #[case(&["-ai-help"], true)]
    #[case(&["mail", "list", "--ai-help"], true)]
    #[case(&["--bogus", "-ai-help", "whatever"], true)]
    #[case(&["--AI-HELP"], false)]
    #[case(&["--ai-help=1"], false)]
    #[case(&["--help"], false)]
    #[case(&[], false)]
    fn given_args_when_scanned_then_detects_exact_flag(#[case] args: &[&str], #[case] expected: bool) {
        assert_eq!(wants_ai_help(args), expected);
    }

    #[test]
    fn given_help_text_when_inspected_then_mentions_every_group() {
        for group in [
            "mail", "calendar", "drive", "contacts", "tasks", "word", "ppt", "excel", "onenote",
        ] {
            assert!(AI_HELP.contains(&format!("\n  {} ", group)), "missing {}", group);
        }
    }
}
