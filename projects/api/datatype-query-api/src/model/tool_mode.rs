//! Operation modes a tool can be bound to.

use core::fmt;
use core::str::FromStr;
use derive_enum_all_values::AllValues;
use thiserror::Error;

/// The operation requested on a file.
///
/// The discriminants are the mode codes stored in descriptor files.
/// Code 0 and codes above 5 are invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
#[repr(u16)]
pub enum ToolMode {
    /// Show information about the file
    Info = 1,
    /// View the file. Printed as `VIEW`.
    Browse = 2,
    /// Edit the file
    Edit = 3,
    /// Print the file
    Print = 4,
    /// Send the file by mail
    Mail = 5,
}

impl ToolMode {
    /// Decode a stored mode code.
    ///
    /// Returns [`None`] for codes outside `1..=5`.
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(Self::Info),
            2 => Some(Self::Browse),
            3 => Some(Self::Edit),
            4 => Some(Self::Print),
            5 => Some(Self::Mail),
            _ => None,
        }
    }

    /// The stored mode code.
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Upper case name used in user facing output.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Browse => "VIEW",
            Self::Edit => "EDIT",
            Self::Print => "PRINT",
            Self::Mail => "MAIL",
        }
    }
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A string that does not name a [`ToolMode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown tool mode '{0}' (expected info, view, edit, print or mail)")]
pub struct ParseToolModeError(pub String);

impl FromStr for ToolMode {
    type Err = ParseToolModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "browse" | "view" => Ok(Self::Browse),
            "edit" => Ok(Self::Edit),
            "print" => Ok(Self::Print),
            "mail" => Ok(Self::Mail),
            _ => Err(ParseToolModeError(s.to_owned())),
        }
    }
}
