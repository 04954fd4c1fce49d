//! Platform detection and path primitives for bld.lua
//!
//! This crate provides the cross-platform bits the build graph relies on:
//! - OS-family and compiler-family identification
//! - Path normalization and subdirectory containment checks

mod paths;
mod platform;

pub use paths::{is_full_path, is_subdirectory, normalize_path};
pub use platform::{CompilerFamily, CompilerInfo, OsFamily, SystemInfo};
