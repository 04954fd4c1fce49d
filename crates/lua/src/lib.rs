//! bld-lua: Lua runtime for build.lua evaluation
//!
//! This crate exposes the build facade to Lua scripts:
//! - Global functions: project, add_executable, target_link_libraries, ...
//! - The `bld` table: environment queries and diagnostics
//! - Nested `add_subdirectory` runs with balanced scope entry/exit
//! - The execution-strategy dispatcher selecting script vs. legacy
//!   configuration per directory

mod error;
mod globals;
mod runtime;
mod strategy;

pub use error::{LuaError, Result};
pub use runtime::{Runtime, SCRIPT_FILE};
pub use strategy::{
    ExecutionStrategy, LegacyStrategy, ScriptStrategy, configure_tree, select_strategy,
};
