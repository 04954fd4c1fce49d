//! Global Lua functions and the bld table
//!
//! Every registration function captures a shared facade handle; the script
//! never sees the build graph itself. Graph-mutating operations are globals;
//! environment queries and diagnostics live on the `bld` table so Lua
//! builtins like `error` stay untouched.

use bld_core::{FacadeHandle, Visibility};
use mlua::{Lua, Result as LuaResult, Table, Value};
use std::rc::Rc;

/// Register every script-visible function on `lua`
pub fn register_globals(lua: &Lua, facade: &FacadeHandle) -> LuaResult<()> {
    setup_project_function(lua, Rc::clone(facade))?;
    setup_target_functions(lua, facade)?;
    setup_rule_functions(lua, facade)?;
    setup_variable_functions(lua, facade)?;
    setup_bld_table(lua, Rc::clone(facade))?;
    Ok(())
}

fn table_of_strings(table: Table) -> LuaResult<Vec<String>> {
    table.sequence_values::<String>().collect()
}

/// A command line is either one string or a sequence of strings
fn command_line(value: Value) -> LuaResult<Vec<String>> {
    match value {
        Value::String(s) => Ok(vec![s.to_str()?.to_string()]),
        Value::Table(t) => table_of_strings(t),
        other => Err(mlua::Error::runtime(format!(
            "command must be a string or a table of strings, got {}",
            other.type_name()
        ))),
    }
}

fn parse_visibility(s: &str) -> LuaResult<Visibility> {
    Visibility::parse(s).ok_or_else(|| {
        mlua::Error::runtime(format!(
            "invalid visibility '{s}'; expected 'private', 'public' or 'interface'"
        ))
    })
}

fn setup_project_function(lua: &Lua, facade: FacadeHandle) -> LuaResult<()> {
    let project_fn = lua.create_function(move |_, name: String| {
        facade.borrow_mut().register_project(&name);
        Ok(())
    })?;
    lua.globals().set("project", project_fn)?;
    Ok(())
}

fn setup_target_functions(lua: &Lua, facade: &FacadeHandle) -> LuaResult<()> {
    let globals = lua.globals();

    let handle = Rc::clone(facade);
    globals.set(
        "add_executable",
        lua.create_function(move |_, (name, sources): (String, Table)| {
            let sources = table_of_strings(sources)?;
            handle.borrow_mut().create_executable(&name, &sources);
            Ok(())
        })?,
    )?;

    let handle = Rc::clone(facade);
    globals.set(
        "add_library",
        lua.create_function(move |_, (name, sources): (String, Table)| {
            let sources = table_of_strings(sources)?;
            handle.borrow_mut().create_library(&name, &sources);
            Ok(())
        })?,
    )?;

    let handle = Rc::clone(facade);
    globals.set(
        "target_link_libraries",
        lua.create_function(
            move |_, (target, visibility, library): (String, String, String)| {
                let visibility = parse_visibility(&visibility)?;
                handle.borrow_mut().link(&target, visibility, &library);
                Ok(())
            },
        )?,
    )?;

    let handle = Rc::clone(facade);
    globals.set(
        "target_include_directories",
        lua.create_function(
            move |_, (target, visibility, dirs): (String, String, Table)| {
                let visibility = parse_visibility(&visibility)?;
                let dirs = table_of_strings(dirs)?;
                handle
                    .borrow_mut()
                    .add_include_directories(&target, visibility, &dirs);
                Ok(())
            },
        )?,
    )?;

    let handle = Rc::clone(facade);
    globals.set(
        "target_compile_definitions",
        lua.create_function(
            move |_, (target, visibility, definitions): (String, String, Table)| {
                let visibility = parse_visibility(&visibility)?;
                let definitions = table_of_strings(definitions)?;
                handle
                    .borrow_mut()
                    .add_compile_definitions(&target, visibility, &definitions);
                Ok(())
            },
        )?,
    )?;

    let handle = Rc::clone(facade);
    globals.set(
        "target_compile_options",
        lua.create_function(
            move |_, (target, visibility, options): (String, String, Table)| {
                let visibility = parse_visibility(&visibility)?;
                let options = table_of_strings(options)?;
                handle
                    .borrow_mut()
                    .add_compile_options(&target, visibility, &options);
                Ok(())
            },
        )?,
    )?;

    let handle = Rc::clone(facade);
    globals.set(
        "target_exists",
        lua.create_function(move |_, name: String| Ok(handle.borrow().has_target(&name)))?,
    )?;

    Ok(())
}

fn setup_rule_functions(lua: &Lua, facade: &FacadeHandle) -> LuaResult<()> {
    let globals = lua.globals();

    let handle = Rc::clone(facade);
    globals.set(
        "install",
        lua.create_function(move |_, (target, destination): (String, String)| {
            handle.borrow_mut().install(&target, &destination);
            Ok(())
        })?,
    )?;

    let handle = Rc::clone(facade);
    globals.set(
        "add_test",
        lua.create_function(move |_, (name, command): (String, Value)| {
            let command = command_line(command)?;
            handle.borrow_mut().register_test(&name, &command);
            Ok(())
        })?,
    )?;

    let handle = Rc::clone(facade);
    globals.set(
        "add_custom_command",
        lua.create_function(move |_, (command, output): (Table, String)| {
            let command = table_of_strings(command)?;
            handle.borrow_mut().add_custom_command(&command, &output);
            Ok(())
        })?,
    )?;

    let handle = Rc::clone(facade);
    globals.set(
        "add_custom_target",
        lua.create_function(move |_, (name, command): (String, Table)| {
            let command = table_of_strings(command)?;
            handle.borrow_mut().add_custom_target(&name, &command);
            Ok(())
        })?,
    )?;

    let handle = Rc::clone(facade);
    globals.set(
        "enable_testing",
        lua.create_function(move |_, ()| {
            handle.borrow_mut().enable_testing();
            Ok(())
        })?,
    )?;

    let handle = Rc::clone(facade);
    globals.set(
        "make_directory",
        lua.create_function(move |_, dir: String| {
            handle
                .borrow()
                .make_directory(&dir)
                .map_err(|err| mlua::Error::runtime(err.to_string()))
        })?,
    )?;

    Ok(())
}

fn setup_variable_functions(lua: &Lua, facade: &FacadeHandle) -> LuaResult<()> {
    let globals = lua.globals();

    let handle = Rc::clone(facade);
    globals.set(
        "option",
        lua.create_function(
            move |_, (name, description, default): (String, String, bool)| {
                handle
                    .borrow_mut()
                    .register_option(&name, &description, default);
                Ok(())
            },
        )?,
    )?;

    let handle = Rc::clone(facade);
    globals.set(
        "get_option",
        lua.create_function(move |_, name: String| Ok(handle.borrow().get_option(&name)))?,
    )?;

    let handle = Rc::clone(facade);
    globals.set(
        "set_property",
        lua.create_function(move |_, (name, value): (String, String)| {
            handle.borrow_mut().set_property(&name, &value);
            Ok(())
        })?,
    )?;

    let handle = Rc::clone(facade);
    globals.set(
        "set_variable",
        lua.create_function(move |_, (name, value): (String, String)| {
            handle.borrow_mut().set_variable(&name, &value);
            Ok(())
        })?,
    )?;

    let handle = Rc::clone(facade);
    globals.set(
        "get_variable",
        lua.create_function(move |_, name: String| Ok(handle.borrow().get_variable(&name)))?,
    )?;

    Ok(())
}

/// The `bld` table: environment queries plus diagnostics.
///
/// Diagnostics live here rather than as globals so Lua's own `error`
/// builtin keeps working inside scripts.
fn setup_bld_table(lua: &Lua, facade: FacadeHandle) -> LuaResult<()> {
    let bld = lua.create_table()?;

    let info = facade.borrow().system_info();
    bld.set("os", info.os.as_str())?;
    bld.set("is_windows", info.is_windows())?;
    bld.set("is_unix", info.is_unix())?;

    let version = facade.borrow().version();
    let version_table = lua.create_table()?;
    version_table.set("major", version.major)?;
    version_table.set("minor", version.minor)?;
    version_table.set("patch", version.patch)?;
    bld.set("version", version_table)?;

    let handle = Rc::clone(&facade);
    bld.set(
        "compiler",
        lua.create_function(move |_, ()| {
            Ok(handle.borrow().compiler_info().family.as_str().to_string())
        })?,
    )?;

    let handle = Rc::clone(&facade);
    bld.set(
        "current_source_dir",
        lua.create_function(move |_, ()| {
            Ok(handle.borrow().current_source_dir().display().to_string())
        })?,
    )?;

    let handle = Rc::clone(&facade);
    bld.set(
        "current_binary_dir",
        lua.create_function(move |_, ()| {
            Ok(handle.borrow().current_binary_dir().display().to_string())
        })?,
    )?;

    let handle = Rc::clone(&facade);
    bld.set(
        "root_source_dir",
        lua.create_function(move |_, ()| {
            Ok(handle.borrow().root_source_dir().display().to_string())
        })?,
    )?;

    let handle = Rc::clone(&facade);
    bld.set(
        "extern_define",
        lua.create_function(move |_, name: String| {
            Ok(handle.borrow().try_get_extern_define(&name))
        })?,
    )?;

    let handle = Rc::clone(&facade);
    bld.set(
        "test_runner",
        lua.create_function(move |_, ()| Ok(handle.borrow().test_runner_command()))?,
    )?;

    let handle = Rc::clone(&facade);
    bld.set(
        "message",
        lua.create_function(move |_, what: String| {
            handle.borrow().message(&what);
            Ok(())
        })?,
    )?;

    let handle = Rc::clone(&facade);
    bld.set(
        "warning",
        lua.create_function(move |_, what: String| {
            handle.borrow().warning(&what);
            Ok(())
        })?,
    )?;

    let handle = Rc::clone(&facade);
    bld.set(
        "error",
        lua.create_function(move |_, what: String| {
            handle.borrow().error(&what);
            Ok(())
        })?,
    )?;

    let handle = Rc::clone(&facade);
    bld.set(
        "fatal_error",
        lua.create_function(move |_, what: String| {
            handle.borrow_mut().fatal_error(&what);
            Ok(())
        })?,
    )?;

    lua.globals().set("bld", bld)?;
    Ok(())
}
