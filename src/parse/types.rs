//! Record types produced by the parsers.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// What happened to a file in a changelist.
///
/// The tool reports more actions than the four common ones; anything else is
/// kept verbatim in [`ChangeKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Add,
    Edit,
    Delete,
    Integrate,
    Other(String),
}

impl ChangeKind {
    /// Classify an action token as printed by `describe`.
    #[must_use]
    pub fn from_action(action: &str) -> Self {
        match action {
            "add" => Self::Add,
            "edit" => Self::Edit,
            "delete" => Self::Delete,
            "integrate" => Self::Integrate,
            other => Self::Other(other.to_string()),
        }
    }

    /// Classify an annotate header token.
    ///
    /// Only `add`, `edit` and `delete` are recognized, case-sensitively.
    #[must_use]
    pub fn from_annotate(token: &str) -> Option<Self> {
        match token {
            "add" => Some(Self::Add),
            "edit" => Some(Self::Edit),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Whether the file no longer exists at this revision.
    ///
    /// Covers plain deletes and the rename, purge and archive forms.
    #[must_use]
    pub fn is_deletion(&self) -> bool {
        match self {
            Self::Delete => true,
            Self::Other(action) => matches!(action.as_str(), "move/delete" | "purge" | "archive"),
            Self::Add | Self::Edit | Self::Integrate => false,
        }
    }

    /// The action token as the tool prints it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Add => "add",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Integrate => "integrate",
            Self::Other(action) => action,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One version-control transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// Changelist number as printed by the server.
    pub revision: String,
    /// Client workspace the change was submitted from.
    pub workspace: String,
    /// Submitting user.
    pub user: String,
    /// Commit (or, while pending, creation) time in server-local time.
    ///
    /// Always set by [`parse_describe`](super::parse_describe); the summary
    /// scan leaves it `None` when the date does not parse.
    pub date: Option<NaiveDateTime>,
    /// Whether the header carried the `*pending*` marker.
    #[serde(default)]
    pub is_pending: bool,
    /// Free-text description, line breaks collapsed to single spaces.
    pub description: String,
    /// Affected files in the order the tool listed them.
    #[serde(default)]
    pub files: Vec<ChangeFile>,
}

impl Change {
    /// Number of affected files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// One file affected by a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeFile {
    /// Depot path without the revision suffix.
    pub path: String,
    /// File revision (`#N`) created by the change.
    pub revision: String,
    pub kind: ChangeKind,
    /// Diff paragraphs for this file, empty unless differences were requested.
    #[serde(default)]
    pub differences: Vec<String>,
    #[serde(default)]
    pub annotate: Option<Annotate>,
}

impl ChangeFile {
    /// Create a file record with no differences or annotation.
    #[must_use]
    pub fn new(path: impl Into<String>, revision: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            revision: revision.into(),
            kind,
            differences: Vec::new(),
            annotate: None,
        }
    }

    /// Attach an annotation to this file.
    #[must_use]
    pub fn with_annotate(mut self, annotate: Annotate) -> Self {
        self.annotate = Some(annotate);
        self
    }

    /// `path#revision`, the file specifier for this exact revision.
    #[must_use]
    pub fn file_spec(&self) -> String {
        format!("{}#{}", self.path, self.revision)
    }
}

/// A client workspace spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    pub root: String,
    /// View mappings; earlier entries take precedence.
    pub views: Vec<ClientView>,
}

impl Client {
    /// Map a depot path to its workspace path.
    ///
    /// Views are applied first-match-wins. A matching exclusion view (depot
    /// side prefixed with `-`) maps to `None`.
    #[must_use]
    pub fn map_to_local(&self, depot_path: &str) -> Option<String> {
        self.views.iter().find_map(|view| view.apply(depot_path))?
    }
}

/// One `View:` mapping line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientView {
    pub remote: String,
    pub local: String,
}

impl ClientView {
    #[must_use]
    pub fn new(remote: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            local: local.into(),
        }
    }

    /// Whether this view excludes the paths it matches.
    #[must_use]
    pub fn is_exclusion(&self) -> bool {
        self.remote.starts_with('-')
    }

    /// Outer `None`: no match. `Some(None)`: matched an exclusion.
    fn apply(&self, depot_path: &str) -> Option<Option<String>> {
        let remote = self.remote.trim_start_matches(['-', '+']);
        let mapped = match remote.strip_suffix("...") {
            Some(prefix) => {
                let rest = depot_path.strip_prefix(prefix)?;
                let local = self.local.strip_suffix("...").unwrap_or(&self.local);
                format!("{local}{rest}")
            }
            None if remote == depot_path => self.local.clone(),
            None => return None,
        };

        if self.is_exclusion() {
            Some(None)
        } else {
            Some(Some(mapped))
        }
    }
}

/// One entry of a tagged `clients` listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub name: String,
    pub root: String,
    /// Host the workspace is bound to; empty when unrestricted.
    #[serde(default)]
    pub host: String,
}

/// Per-line authorship for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotate {
    pub file: String,
    /// Revision at which the annotation was taken.
    pub revision: String,
    /// `None` when the header token is not add, edit or delete.
    pub change: Option<ChangeKind>,
    pub lines: Vec<AnnotateLine>,
}

/// One annotated line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotateLine {
    /// Revision (or change) that last touched the line.
    pub revision: String,
    pub text: String,
    /// Position after the header within the caller's filtered lines.
    ///
    /// Skipped noise lines still advance the count, so this can drift from
    /// the physical line number of the file.
    pub line_number: usize,
}
