//! The `I`/`W`/`R`/`X`/`E` status lifecycle shared by jobs and actions.

use std::fmt;

/// A job or action's lifecycle status.
///
/// Jobs: `Initialized` → `Waiting` (actions added) → `Running` →
/// `Executed`/`Error` (terminal). Actions: `Waiting` (created) → `Running`
/// → `Executed`/`Error`, only while the owning job is `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Initialized,
    Waiting,
    Running,
    Executed,
    Error,
}

impl Status {
    /// The single-character code stored in the database.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Initialized => "I",
            Self::Waiting => "W",
            Self::Running => "R",
            Self::Executed => "X",
            Self::Error => "E",
        }
    }

    /// `true` for `Executed`/`Error` — no further transitions expected.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Executed | Self::Error)
    }

    /// Parse a stored status code. Unknown codes are treated as `Error`
    /// rather than panicking — a corrupted or hand-edited row should not
    /// crash the reader.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "I" => Self::Initialized,
            "W" => Self::Waiting,
            "R" => Self::Running,
            "X" => Self::Executed,
            _ => Self::Error,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A `T`/`F` boolean column, stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriBool(pub bool);

impl TriBool {
    #[must_use]
    pub const fn code(self) -> &'static str {
        if self.0 {
            "T"
        } else {
            "F"
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Self {
        Self(code == "T")
    }
}
