//! Script runtime: evaluation and nested subdirectory runs

use crate::error::{LuaError, Result};
use crate::globals;
use bld_core::{FacadeHandle, ScopeGuard};
use bld_platform::is_full_path;
use mlua::{Lua, Result as LuaResult};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, info};

/// Entry-point script file name per directory
pub const SCRIPT_FILE: &str = "build.lua";

/// The Lua runtime bound to one facade
pub struct Runtime {
    lua: Lua,
    facade: FacadeHandle,
}

impl Runtime {
    /// Create a runtime with all build globals registered
    pub fn new(facade: FacadeHandle) -> Result<Self> {
        let lua = Lua::new();
        globals::register_globals(&lua, &facade)?;
        setup_subdirectory_function(&lua, Rc::clone(&facade))?;
        Ok(Self { lua, facade })
    }

    pub fn facade(&self) -> FacadeHandle {
        Rc::clone(&self.facade)
    }

    /// Get access to the raw Lua state (for advanced use cases)
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    /// Run the entry-point script of the current scope's source directory
    pub fn run_entry_point(&self) -> Result<()> {
        let dir = self.facade.borrow().current_source_dir().to_path_buf();
        let path = dir.join(SCRIPT_FILE);
        if !path.is_file() {
            return Err(LuaError::ScriptNotFound(path.display().to_string()));
        }

        info!("Evaluating {}", path.display());
        let source = std::fs::read_to_string(&path)?;
        self.run_source(&source, &path.to_string_lossy())
    }

    /// Run an in-memory buffer against the current scope
    pub fn run_source(&self, source: &str, name: &str) -> Result<()> {
        self.lua.load(source).set_name(name).exec()?;
        Ok(())
    }
}

/// Register `add_subdirectory`. The child directory may carry either a
/// script (interpreter-driven flavor: the scope stays addressable for the
/// whole nested run, popped exactly once by the guard) or a legacy manifest
/// (the engine's own routine configures it). Failures go to the fatal-error
/// channel; nothing unwinds into the calling script.
fn setup_subdirectory_function(lua: &Lua, facade: FacadeHandle) -> LuaResult<()> {
    let subdir_fn = lua.create_function(move |lua, dir: String| {
        // No invariant holds for mutations after a fatal error
        if facade.borrow().fatal_error_occurred() {
            debug!(%dir, "skipping subdirectory after fatal error");
            return Ok(());
        }

        let source_dir = facade.borrow().current_source_dir().to_path_buf();
        let child = if is_full_path(&dir) {
            PathBuf::from(&dir)
        } else {
            source_dir.join(&dir)
        };

        let script = child.join(SCRIPT_FILE);
        if script.is_file() {
            let Ok(_guard) = ScopeGuard::enter(&facade, &dir) else {
                // Scope validation already reported through the fatal channel
                return Ok(());
            };

            let source = match std::fs::read_to_string(&script) {
                Ok(source) => source,
                Err(err) => {
                    facade
                        .borrow_mut()
                        .fatal_error(&format!("failed to read {}: {err}", script.display()));
                    return Ok(());
                }
            };

            debug!(script = %script.display(), "running subdirectory script");
            if let Err(err) = lua.load(&source).set_name(script.to_string_lossy()).exec() {
                facade
                    .borrow_mut()
                    .fatal_error(&format!("error in {}: {err}", script.display()));
            }
            return Ok(());
        }

        if child.join(bld_core::MANIFEST_FILE).is_file() {
            let result = {
                let mut facade = facade.borrow_mut();
                bld_core::configure_subdirectory(&mut facade, &dir)
            };
            if let Err(err) = result {
                facade.borrow_mut().fatal_error(&err.to_string());
            }
            return Ok(());
        }

        facade.borrow_mut().fatal_error(&format!(
            "add_subdirectory given \"{dir}\" which provides neither {SCRIPT_FILE} nor {}",
            bld_core::MANIFEST_FILE
        ));
        Ok(())
    })?;

    lua.globals().set("add_subdirectory", subdir_fn)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bld_core::{BuildFacade, BuildGraph, Scope};
    use std::cell::RefCell;
    use tempfile::TempDir;

    fn runtime_in(temp: &TempDir) -> Runtime {
        let graph = Rc::new(RefCell::new(BuildGraph::new()));
        let root = Scope::root(temp.path(), temp.path().join("out"));
        let facade = BuildFacade::new(graph, root).into_handle();
        Runtime::new(facade).unwrap()
    }

    fn write_script(dir: &std::path::Path, content: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(SCRIPT_FILE), content).unwrap();
    }

    #[test]
    fn test_run_entry_point() {
        let temp = TempDir::new().unwrap();
        write_script(
            temp.path(),
            r#"
            project("demo")
            add_executable("app", { "main.cpp" })
        "#,
        );

        let runtime = runtime_in(&temp);
        runtime.run_entry_point().unwrap();

        let facade = runtime.facade();
        let facade = facade.borrow();
        assert!(facade.has_target("app"));
        assert!(!facade.fatal_error_occurred());
    }

    #[test]
    fn test_missing_entry_point() {
        let temp = TempDir::new().unwrap();
        let runtime = runtime_in(&temp);
        assert!(matches!(
            runtime.run_entry_point(),
            Err(LuaError::ScriptNotFound(_))
        ));
    }

    #[test]
    fn test_subdirectory_script_scope_roundtrip() {
        let temp = TempDir::new().unwrap();
        write_script(
            temp.path(),
            r#"
            add_subdirectory("sub")
            set_variable("WHERE", bld.current_source_dir())
        "#,
        );
        write_script(
            &temp.path().join("sub"),
            r#"add_library("util", { "util.cpp" })"#,
        );

        let runtime = runtime_in(&temp);
        runtime.run_entry_point().unwrap();

        let facade = runtime.facade();
        let facade = facade.borrow();
        // Back in the root scope after the nested run
        assert_eq!(
            facade.get_variable("WHERE").unwrap(),
            temp.path().display().to_string()
        );

        let graph = facade.graph();
        let graph = graph.borrow();
        let util = graph.find_target("util").unwrap();
        assert!(util.sources()[0].ends_with("sub/util.cpp"));
    }

    #[test]
    fn test_subdirectory_legacy_manifest() {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), r#"add_subdirectory("lib")"#);

        let lib = temp.path().join("lib");
        std::fs::create_dir_all(&lib).unwrap();
        std::fs::write(
            lib.join(bld_core::MANIFEST_FILE),
            r#"
            [[library]]
            name = "util"
            sources = ["util.cpp"]
        "#,
        )
        .unwrap();

        let runtime = runtime_in(&temp);
        runtime.run_entry_point().unwrap();

        let facade = runtime.facade();
        assert!(facade.borrow().has_target("util"));
        assert!(!facade.borrow().fatal_error_occurred());
    }

    #[test]
    fn test_subdirectory_missing_is_fatal_not_unwinding() {
        let temp = TempDir::new().unwrap();
        write_script(
            temp.path(),
            r#"
            add_subdirectory("nope")
            set_variable("AFTER", "1")
        "#,
        );

        let runtime = runtime_in(&temp);
        // The script itself completes; the failure is on the fatal channel
        runtime.run_entry_point().unwrap();

        let facade = runtime.facade();
        let facade = facade.borrow();
        assert!(facade.fatal_error_occurred());
        assert_eq!(facade.get_variable("AFTER").as_deref(), Some("1"));
    }

    #[test]
    fn test_fatal_in_child_still_pops_scope() {
        let temp = TempDir::new().unwrap();
        write_script(
            temp.path(),
            r#"
            add_subdirectory("sub")
        "#,
        );
        write_script(
            &temp.path().join("sub"),
            r#"bld.fatal_error("child failed")"#,
        );

        let runtime = runtime_in(&temp);
        runtime.run_entry_point().unwrap();

        let facade = runtime.facade();
        let facade = facade.borrow();
        assert!(facade.fatal_error_occurred());
        // Parent's view of "current" was restored before it resumed
        assert_eq!(
            facade.current_source_dir(),
            temp.path()
        );
    }

    #[test]
    fn test_subdirectory_skipped_after_fatal() {
        let temp = TempDir::new().unwrap();
        write_script(
            temp.path(),
            r#"
            bld.fatal_error("stop here")
            add_subdirectory("sub")
        "#,
        );
        write_script(
            &temp.path().join("sub"),
            r#"add_library("util", { "util.cpp" })"#,
        );

        let runtime = runtime_in(&temp);
        runtime.run_entry_point().unwrap();

        let facade = runtime.facade();
        assert!(!facade.borrow().has_target("util"));
    }

    #[test]
    fn test_child_lua_error_becomes_fatal() {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), r#"add_subdirectory("sub")"#);
        write_script(&temp.path().join("sub"), r#"error("script bug")"#);

        let runtime = runtime_in(&temp);
        runtime.run_entry_point().unwrap();

        let facade = runtime.facade();
        let facade = facade.borrow();
        assert!(facade.fatal_error_occurred());
        assert!(facade.fatal_error_message().unwrap().contains("script bug"));
        assert_eq!(facade.scope_depth(), 1);
    }
}
