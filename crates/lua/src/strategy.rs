//! Execution-strategy dispatch
//!
//! Each directory's build description is executed by exactly one strategy,
//! selected once: the script path through the Lua runtime, or the legacy
//! declarative path through the engine's own routine. Every strategy
//! produces a process-exit-shaped status, and a recorded fatal error
//! overrides any reported success.

use crate::error::{LuaError, Result};
use crate::runtime::{Runtime, SCRIPT_FILE};
use bld_core::{BuildFacade, BuildGraph, FacadeHandle, MANIFEST_FILE, Scope};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info};

/// One way of executing a directory's build description
pub trait ExecutionStrategy {
    fn execute(&self, facade: &FacadeHandle) -> i32;
}

/// Interpreter-driven execution of `build.lua`, either from the scope's
/// entry-point file or from a caller-supplied in-memory buffer
pub struct ScriptStrategy {
    source: Option<String>,
}

impl ScriptStrategy {
    /// Execute the entry-point script found in the scope's source directory
    pub fn new() -> Self {
        Self { source: None }
    }

    /// Execute an already-loaded script buffer against the scope
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
        }
    }
}

impl Default for ScriptStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionStrategy for ScriptStrategy {
    fn execute(&self, facade: &FacadeHandle) -> i32 {
        let runtime = match Runtime::new(Rc::clone(facade)) {
            Ok(runtime) => runtime,
            Err(err) => {
                facade.borrow_mut().fatal_error(&err.to_string());
                return 1;
            }
        };

        let result = match &self.source {
            Some(source) => runtime.run_source(source, "<buffer>"),
            None => runtime.run_entry_point(),
        };

        let status = match result {
            Ok(()) => 0,
            Err(err) => {
                facade.borrow_mut().fatal_error(&err.to_string());
                1
            }
        };

        // A fatal error recorded anywhere during the run wins
        if facade.borrow().fatal_error_occurred() {
            return 1;
        }
        status
    }
}

/// Legacy execution: the engine's declarative routine, no interpreter
pub struct LegacyStrategy;

impl ExecutionStrategy for LegacyStrategy {
    fn execute(&self, facade: &FacadeHandle) -> i32 {
        let result = {
            let mut facade = facade.borrow_mut();
            bld_core::configure_directory(&mut facade)
        };

        let status = match result {
            Ok(()) => 0,
            Err(err) => {
                facade.borrow_mut().fatal_error(&err.to_string());
                1
            }
        };

        if facade.borrow().fatal_error_occurred() {
            return 1;
        }
        status
    }
}

/// Select how `source_dir` is executed. The script wins when both
/// descriptions are present.
pub fn select_strategy(source_dir: &Path) -> Result<Box<dyn ExecutionStrategy>> {
    if source_dir.join(SCRIPT_FILE).is_file() {
        debug!(dir = %source_dir.display(), "selected script strategy");
        return Ok(Box::new(ScriptStrategy::new()));
    }
    if source_dir.join(MANIFEST_FILE).is_file() {
        debug!(dir = %source_dir.display(), "selected legacy strategy");
        return Ok(Box::new(LegacyStrategy));
    }
    Err(LuaError::NoBuildDescription(
        source_dir.display().to_string(),
    ))
}

/// Configure a whole tree rooted at `source_dir`, returning the exit status
/// and the populated graph
pub fn configure_tree(
    source_dir: &Path,
    binary_dir: &Path,
    extern_defines: HashMap<String, String>,
) -> Result<(i32, Rc<RefCell<BuildGraph>>)> {
    let graph = Rc::new(RefCell::new(BuildGraph::new()));
    let root = Scope::root(source_dir, binary_dir);

    let mut facade = BuildFacade::new(Rc::clone(&graph), root);
    facade.set_extern_defines(extern_defines);
    let handle = facade.into_handle();

    let strategy = select_strategy(source_dir)?;
    let status = strategy.execute(&handle);
    info!(status, "configuration finished");

    Ok((status, graph))
}
