//! OneDrive addressing: paths, Office document kinds and workbook ranges

use std::fmt;

use crate::domain::error::DomainError;

/// Largest file accepted by the single-request upload endpoint.
pub const SIMPLE_UPLOAD_LIMIT: u64 = 4 * 1024 * 1024;

/// Path of an item relative to the drive root.
///
/// Leading, trailing and repeated `/` are ignored; an empty path is the root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DrivePath {
    segments: Vec<String>,
}

impl DrivePath {
    pub fn parse(raw: &str) -> Self {
        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Lowercased extension of the last segment.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    pub fn join(&self, name: &str) -> Self {
        let mut joined = self.clone();
        joined
            .segments
            .extend(Self::parse(name).segments);
        joined
    }

    /// Graph address of the item: `/me/drive/root` or `/me/drive/root:/a/b:`.
    pub fn item_url(&self) -> String {
        if self.is_root() {
            return "/me/drive/root".into();
        }
        let encoded = self
            .segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("/me/drive/root:/{}:", encoded)
    }

    pub fn children_url(&self) -> String {
        format!("{}/children", self.item_url())
    }

    pub fn content_url(&self) -> String {
        format!("{}/content", self.item_url())
    }

    pub fn workbook_url(&self) -> String {
        format!("{}/workbook", self.item_url())
    }
}

impl fmt::Display for DrivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

/// Office document families handled by the `word`, `ppt` and `excel` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Word,
    PowerPoint,
    Excel,
}

impl DocumentKind {
    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Word => "Word",
            DocumentKind::PowerPoint => "PowerPoint",
            DocumentKind::Excel => "Excel",
        }
    }

    /// Accepted file extensions, preferred one first.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            DocumentKind::Word => &["docx", "doc", "docm"],
            DocumentKind::PowerPoint => &["pptx", "ppt", "pptm"],
            DocumentKind::Excel => &["xlsx", "xls", "xlsm"],
        }
    }

    pub fn matches_extension(self, ext: &str) -> bool {
        self.extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Reject paths whose extension does not belong to this kind.
    pub fn check(self, path: &DrivePath) -> Result<(), DomainError> {
        match path.extension() {
            Some(ext) if self.matches_extension(&ext) => Ok(()),
            _ => Err(DomainError::WrongDocumentKind {
                path: path.to_string(),
                kind: self.label(),
            }),
        }
    }
}

/// A1-style cell or range address, e.g. `B2` or `A1:C10`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange(String);

impl CellRange {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let valid = match trimmed.split_once(':') {
            Some((from, to)) => is_cell(from) && is_cell(to),
            None => is_cell(trimmed),
        };
        if !valid {
            return Err(DomainError::InvalidRange(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_cell(s: &str) -> bool {
    let letters = s.chars().take_while(|c| c.is_ascii_alphabetic()).count();
    let digits = &s[letters..];
    (1..=3).contains(&letters)
        && !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0')
}

/// `worksheets('name')` path segment with OData quote escaping.
pub fn worksheet_segment(name: &str) -> String {
    let quoted = name.replace('\'', "''");
    format!("worksheets('{}')", urlencoding::encode(&quoted))
}
