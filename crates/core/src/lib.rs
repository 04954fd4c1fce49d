//! bld-core: build graph engine and scripting facade for bld.lua
//!
//! This crate provides the pieces a build-description script drives:
//! - the build graph engine (targets, tests, install rules, custom steps)
//! - the scope stack mirroring the script's subdirectory traversal
//! - the facade the interpreter calls instead of touching the graph directly
//! - the legacy declarative `build.toml` configuration path

mod error;
mod facade;
mod genex;
mod graph;
mod legacy;
mod paths;
mod props;
mod scope;

pub use error::CoreError;
pub use facade::{BuildFacade, FacadeHandle, FacadeVersion, Outcome, ScopeGuard};
pub use genex::{escape as escape_genex, find as find_genex};
pub use graph::{
    BuildGraph, CacheEntry, CacheEntryKind, CustomCommand, CustomTarget, InstallDefaults,
    InstallRule, MessageLevel, Target, TargetKind, Test, is_on,
};
pub use legacy::{DirectoryManifest, MANIFEST_FILE, configure_directory, configure_subdirectory};
pub use paths::{resolve_paths, resolve_sources};
pub use props::{Visibility, adjust_known_property, compose_definitions, compose_options};
pub use scope::{Scope, ScopeStack};

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
