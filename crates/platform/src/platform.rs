//! OS-family and compiler-family identification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system family, as visible to build scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Windows,
    Unix,
}

impl OsFamily {
    /// Detect the current OS family at compile time
    #[cfg(windows)]
    pub const fn current() -> Self {
        OsFamily::Windows
    }

    #[cfg(not(windows))]
    pub const fn current() -> Self {
        OsFamily::Unix
    }

    /// Returns the family name as used in scripts
    pub const fn as_str(&self) -> &'static str {
        match self {
            OsFamily::Windows => "windows",
            OsFamily::Unix => "unix",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compiler family, derived from the compiler identity string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilerFamily {
    Clang,
    Gcc,
    Msvc,
    #[default]
    Unknown,
}

impl CompilerFamily {
    /// Map a compiler identity string (e.g. the `CXX_COMPILER_ID` variable)
    /// to a family tag. Unrecognized identities map to `Unknown`.
    pub fn from_id(id: &str) -> Self {
        match id {
            "Clang" | "AppleClang" => CompilerFamily::Clang,
            "GNU" => CompilerFamily::Gcc,
            "MSVC" => CompilerFamily::Msvc,
            _ => CompilerFamily::Unknown,
        }
    }

    /// Returns the family name as used in scripts
    pub const fn as_str(&self) -> &'static str {
        match self {
            CompilerFamily::Clang => "clang",
            CompilerFamily::Gcc => "gcc",
            CompilerFamily::Msvc => "msvc",
            CompilerFamily::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compiler information exposed to build scripts
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CompilerInfo {
    pub family: CompilerFamily,
}

/// System information exposed to build scripts
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: OsFamily,
}

impl SystemInfo {
    /// Gather current system information
    pub fn current() -> Self {
        Self {
            os: OsFamily::current(),
        }
    }

    /// Check if running on Windows
    pub fn is_windows(&self) -> bool {
        self.os == OsFamily::Windows
    }

    /// Check if running on a unix-like OS
    pub fn is_unix(&self) -> bool {
        self.os == OsFamily::Unix
    }
}
