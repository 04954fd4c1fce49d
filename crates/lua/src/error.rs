//! Error types for bld-lua

use thiserror::Error;

/// Errors that can occur during script evaluation
#[derive(Debug, Error)]
pub enum LuaError {
    #[error("Lua runtime error: {0}")]
    Runtime(#[from] mlua::Error),

    #[error("Build script not found: {0}")]
    ScriptNotFound(String),

    #[error("No build description in {0}")]
    NoBuildDescription(String),

    #[error("Core error: {0}")]
    Core(#[from] bld_core::CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for script evaluation
pub type Result<T> = std::result::Result<T, LuaError>;
